//! # Filesystem-backed key-value store
//!
//! [`FileStore`] persists each key as a JSON text file so that a storefront
//! session survives process restarts (the CLI uses it).
//!
//! ## Layout
//!
//! ```text
//! <base_dir>/
//! ├── APP_USERS.json
//! ├── APP_CURRENT_USER.json
//! ├── APP_PRODS.json
//! └── APP_CART.json
//! ```
//!
//! Writes go to a temporary sibling first and are renamed into place, so a
//! crash mid-write leaves either the old or the new value.
//!
//! A key file that exists but cannot be read still counts as present, so
//! seeding never replaces it.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{KeyValueStore, StoreError};

/// Filesystem-backed key-value store.
#[derive(Clone, Debug)]
pub struct FileStore {
    base: PathBuf,
}

impl FileStore {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// The directory holding the key files.
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.base.join(format!("{}.json", sanitize_key(key)))
    }
}

/// Keep keys from escaping the base directory.
fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn io_error(key: &str, source: std::io::Error) -> StoreError {
    StoreError::Io {
        key: key.to_owned(),
        source,
    }
}

impl KeyValueStore for FileStore {
    fn get_raw(&self, key: &str) -> Option<String> {
        match std::fs::read(self.key_path(key)) {
            Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(key, error = %e, "Failed to read stored value, treating as absent");
                None
            }
        }
    }

    fn set_raw(&self, key: &str, value: &str) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.base).map_err(|e| io_error(key, e))?;
        let path = self.key_path(key);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value).map_err(|e| io_error(key, e))?;
        std::fs::rename(&tmp, &path).map_err(|e| io_error(key, e))
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        match std::fs::remove_file(self.key_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(key, e)),
        }
    }

    fn contains_key(&self, key: &str) -> bool {
        // Anything but a definite "not found" is present.
        self.key_path(key).try_exists().unwrap_or(true)
    }
}
