//! Storage abstraction for persistence.
//!
//! Drawings are kept as one JSON document under a single string key, the
//! way the browser's `localStorage` is used. Backends only need to get and
//! set whole values.

mod gallery;
mod memory;

#[cfg(not(target_arch = "wasm32"))]
mod file;

#[cfg(target_arch = "wasm32")]
mod local_storage;

pub use gallery::{Gallery, GalleryError, SavedDrawing};
pub use memory::MemoryStore;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;

#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorage;

use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// A string-keyed store of string values.
///
/// Writes replace the whole value; there is no partial update.
pub trait KeyValueStore {
    /// Read the value under `key`, `None` when never written.
    fn get_item(&self, key: &str) -> StorageResult<Option<String>>;

    /// Replace the value under `key`.
    fn set_item(&self, key: &str, value: &str) -> StorageResult<()>;
}

/// Platform storage: a directory of files natively, `localStorage` on the web.
#[cfg(not(target_arch = "wasm32"))]
pub type PlatformStore = FileStore;

#[cfg(target_arch = "wasm32")]
pub type PlatformStore = LocalStorage;

/// Create the platform's default store.
#[cfg(not(target_arch = "wasm32"))]
pub fn create_default_store() -> StorageResult<PlatformStore> {
    FileStore::default_location()
}

#[cfg(target_arch = "wasm32")]
pub fn create_default_store() -> StorageResult<PlatformStore> {
    LocalStorage::new()
}
