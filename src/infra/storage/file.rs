use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use super::lock::mutex_lock;
use crate::application::repos::{KeyValueStore, StorageError};

const SOURCE: &str = "infra::storage::file";

/// Slots kept in a single JSON object on disk, one string value per key.
///
/// Every write rewrites the file through a temporary sibling and a rename, so
/// a crash mid-write leaves the previous contents intact. Concurrent writers
/// from other processes are not coordinated: the last rename wins.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    guard: Mutex<()>,
}

impl FileStore {
    /// Open the store at `path`, creating its parent directory if needed. The
    /// file itself is created on the first write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        if let Some(parent) = parent_dir(&path) {
            fs::create_dir_all(parent)?;
        }
        Ok(Self {
            path,
            guard: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_slots(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(err) => return Err(err.into()),
        };

        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&raw)
            .map_err(|err| StorageError::corrupt(self.path.display().to_string(), err))
    }

    /// Slots to start a write from; a corrupt file is replaced rather than
    /// blocking every later write.
    fn slots_for_write(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match self.read_slots() {
            Err(err @ StorageError::Corrupt { .. }) => {
                warn!(path = %self.path.display(), error = %err, "overwriting corrupt storage file");
                Ok(BTreeMap::new())
            }
            other => other,
        }
    }

    fn write_slots(&self, slots: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let encoded = serde_json::to_vec_pretty(slots).map_err(|source| StorageError::Encode {
            slot: "*",
            source,
        })?;

        let dir = parent_dir(&self.path).unwrap_or(Path::new("."));
        let mut file = NamedTempFile::new_in(dir)?;
        file.write_all(&encoded)?;
        file.as_file().sync_all()?;
        file.persist(&self.path).map_err(|err| StorageError::Io(err.error))?;

        debug!(path = %self.path.display(), slots = slots.len(), "storage file written");
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = mutex_lock(&self.guard, SOURCE, "get");
        Ok(self.read_slots()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = mutex_lock(&self.guard, SOURCE, "set");
        let mut slots = self.slots_for_write()?;
        slots.insert(key.to_string(), value.to_string());
        self.write_slots(&slots)
    }
}

fn parent_dir(path: &Path) -> Option<&Path> {
    path.parent().filter(|parent| !parent.as_os_str().is_empty())
}
