//! Directory-backed key-value store for native builds.

use super::{KeyValueStore, StorageError, StorageResult};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Application directory name under the platform data directory.
const APP_DIR: &str = "sketchboard";

/// Keeps each key's value in its own `<key>.json` file inside one directory.
///
/// Keys are escaped so that any key maps to a distinct, portable file name.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `dir`, creating the directory when missing.
    pub fn new(dir: PathBuf) -> StorageResult<Self> {
        fs::create_dir_all(&dir)
            .map_err(|e| StorageError::Io(format!("Cannot create {}: {}", dir.display(), e)))?;
        Ok(Self { dir })
    }

    /// Open the store in the user's local data directory, falling back to
    /// the home directory.
    pub fn default_location() -> StorageResult<Self> {
        let root = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Unavailable("No data or home directory".to_string()))?;
        Self::new(root.join(APP_DIR))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding `key`. ASCII letters, digits, `-` and `_` are kept;
    /// every other byte is written as `%XX`.
    fn file_for(&self, key: &str) -> PathBuf {
        let mut name = String::with_capacity(key.len() + 5);
        for byte in key.bytes() {
            if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
                name.push(char::from(byte));
            } else {
                name.push_str(&format!("%{:02X}", byte));
            }
        }
        name.push_str(".json");
        self.dir.join(name)
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        let file = self.file_for(key);
        match fs::read_to_string(&file) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io(format!("Cannot read {}: {}", file.display(), e))),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        let file = self.file_for(key);
        fs::write(&file, value)
            .map_err(|e| StorageError::Io(format!("Cannot write {}: {}", file.display(), e)))
    }
}
