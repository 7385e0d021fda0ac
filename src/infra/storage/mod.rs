//! Key/value slot adapters backing the post store and theme flag.

mod file;
mod lock;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;
