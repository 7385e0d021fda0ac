//! Theme flag persisted independently of the rest of the view state.

use std::sync::Arc;

use tracing::{info, warn};

use crate::application::repos::{KeyValueStore, StorageError, THEME_SLOT};
use crate::domain::types::Theme;

pub struct ThemeSettings {
    theme: Theme,
    storage: Arc<dyn KeyValueStore>,
}

impl ThemeSettings {
    /// Read the `theme` slot; a missing or unparseable value means light mode.
    pub fn load(storage: Arc<dyn KeyValueStore>) -> Self {
        let theme = match storage.get(THEME_SLOT) {
            Ok(Some(raw)) => match serde_json::from_str::<bool>(raw.trim()) {
                Ok(dark) => Theme::from_dark(dark),
                Err(err) => {
                    warn!(slot = THEME_SLOT, error = %err, "ignoring unparseable theme flag");
                    Theme::default()
                }
            },
            Ok(None) => Theme::default(),
            Err(err) => {
                warn!(slot = THEME_SLOT, error = %err, "failed to read theme flag");
                Theme::default()
            }
        };
        Self { theme, storage }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn set(&mut self, theme: Theme) -> Result<(), StorageError> {
        self.theme = theme;
        let encoded = serde_json::to_string(&theme.is_dark()).map_err(|source| {
            StorageError::Encode {
                slot: THEME_SLOT,
                source,
            }
        })?;
        self.storage.set(THEME_SLOT, &encoded)?;
        info!(theme = theme.as_str(), "theme switched");
        Ok(())
    }

    pub fn toggle(&mut self) -> Result<Theme, StorageError> {
        let next = self.theme.toggled();
        self.set(next)?;
        Ok(next)
    }
}
