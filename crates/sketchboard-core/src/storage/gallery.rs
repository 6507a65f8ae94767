//! Named drawings kept in a key-value store.

use super::{KeyValueStore, StorageError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Gallery errors.
#[derive(Debug, Error)]
pub enum GalleryError {
    #[error("Please enter a name for your drawing")]
    MissingName,
    #[error("No drawing at index {0}")]
    OutOfRange(usize),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// A saved drawing: one encoded image per layer, bottom first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedDrawing {
    pub name: String,
    pub layers: Vec<String>,
}

/// The collection of saved drawings under one storage key.
///
/// Every save or delete rewrites the whole collection.
pub struct Gallery<S: KeyValueStore> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> Gallery<S> {
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// All saved drawings in save order.
    ///
    /// Unreadable or corrupt storage reads as an empty gallery.
    pub fn drawings(&self) -> Vec<SavedDrawing> {
        self.load().unwrap_or_else(|e| {
            log::warn!("Failed to read gallery '{}': {}", self.key, e);
            Vec::new()
        })
    }

    /// The stored collection, with read and parse errors passed through.
    fn load(&self) -> Result<Vec<SavedDrawing>, GalleryError> {
        match self.store.get_item(&self.key)? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }

    pub fn get(&self, index: usize) -> Option<SavedDrawing> {
        self.drawings().into_iter().nth(index)
    }

    pub fn len(&self) -> usize {
        self.drawings().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append a drawing under `name`. Blank names are rejected.
    ///
    /// Nothing is written when the stored collection cannot be read.
    pub fn save(&self, name: &str, layers: Vec<String>) -> Result<(), GalleryError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GalleryError::MissingName);
        }

        let mut drawings = self.load()?;
        drawings.push(SavedDrawing {
            name: name.to_string(),
            layers,
        });
        self.write(&drawings)?;
        log::info!("Saved drawing '{}' ({} total)", name, drawings.len());
        Ok(())
    }

    /// Remove and return the drawing at `index`.
    pub fn delete(&self, index: usize) -> Result<SavedDrawing, GalleryError> {
        let mut drawings = self.load()?;
        if index >= drawings.len() {
            return Err(GalleryError::OutOfRange(index));
        }
        let removed = drawings.remove(index);
        self.write(&drawings)?;
        log::info!("Deleted drawing '{}'", removed.name);
        Ok(removed)
    }

    fn write(&self, drawings: &[SavedDrawing]) -> Result<(), GalleryError> {
        let json = serde_json::to_string(drawings)?;
        self.store.set_item(&self.key, &json)?;
        Ok(())
    }
}
