//! Local key-value store.
//!
//! The storefront persists everything as JSON text under a handful of
//! well-known keys (see [`keys`]). Backends implement [`KeyValueStore`];
//! typed access goes through [`JsonStoreExt`], which never fails on read:
//! absent or malformed text yields a default.
//!
//! Tables are JSON arrays. [`JsonStoreExt::read_list`] parses them record
//! by record so one bad record does not hide the rest, and writers load
//! them with [`JsonStoreExt::load_records`], which refuses to hand back an
//! empty table for a value that is present but unreadable.
//!
//! # Backends
//!
//! - [`MemoryStore`] - process-local, used by tests and ephemeral sessions
//! - [`FileStore`] - one `<key>.json` file per key under a data directory

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

/// Storage keys for the storefront's tables and records.
pub mod keys {
    /// Registered users (JSON array).
    pub const USERS: &str = "APP_USERS";

    /// The current session record (JSON object).
    pub const CURRENT_USER: &str = "APP_CURRENT_USER";

    /// Product catalog (JSON array).
    pub const PRODUCTS: &str = "APP_PRODS";

    /// Shopping cart lines, owned by the cart page (JSON array).
    pub const CART: &str = "APP_CART";
}

/// Errors raised by store writes.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backend I/O failed.
    #[error("storage I/O error for key {key}: {source}")]
    Io {
        /// Key being written or removed.
        key: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Value could not be serialized.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A stored table is present but unreadable, so it is not overwritten.
    #[error("stored value for key {key} is unreadable, refusing to overwrite it")]
    Unreadable {
        /// Key holding the unreadable value.
        key: String,
    },
}

/// Raw text access to a key-value backend.
///
/// Reads never fail: an unreadable key behaves as absent.
pub trait KeyValueStore: Send + Sync {
    /// Get the raw text stored under `key`.
    fn get_raw(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if a persistent backend cannot write.
    fn set_raw(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove `key`. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if a persistent backend cannot delete.
    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// Whether anything is stored under `key`, readable or not.
    fn contains_key(&self, key: &str) -> bool {
        self.get_raw(key).is_some()
    }
}

/// Typed JSON access on top of any [`KeyValueStore`].
pub trait JsonStoreExt: KeyValueStore {
    /// Returns `true` if anything has ever been written under `key`.
    fn contains(&self, key: &str) -> bool {
        self.contains_key(key)
    }

    /// Read and parse `key`, or `None` if it is absent or malformed.
    fn read_optional<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get_raw(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "Malformed stored value, treating as empty");
                None
            }
        }
    }

    /// Read and parse `key`, falling back to `T::default()`.
    fn read<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        self.read_optional(key).unwrap_or_default()
    }

    /// Read a JSON array under `key` record by record.
    ///
    /// Records that do not parse as `T` are skipped with a warning. An
    /// absent or malformed array reads as empty.
    fn read_list<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        self.read::<Vec<Value>>(key)
            .into_iter()
            .enumerate()
            .filter_map(|(index, record)| match serde_json::from_value(record) {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::warn!(key, index, error = %e, "Skipping malformed record");
                    None
                }
            })
            .collect()
    }

    /// Load the raw records of a JSON array for a read-modify-write.
    ///
    /// An absent key or `null` is an empty table. Records are returned
    /// untouched, so rewriting the table keeps records this version cannot
    /// parse.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unreadable` if the key is present but does not
    /// hold a JSON array.
    fn load_records(&self, key: &str) -> Result<Vec<Value>, StoreError> {
        let unreadable = || StoreError::Unreadable { key: key.to_owned() };
        let Some(raw) = self.get_raw(key) else {
            return if self.contains_key(key) { Err(unreadable()) } else { Ok(Vec::new()) };
        };
        match serde_json::from_str::<Option<Vec<Value>>>(&raw) {
            Ok(records) => Ok(records.unwrap_or_default()),
            Err(e) => {
                tracing::warn!(key, error = %e, "Stored table is malformed, not overwriting it");
                Err(unreadable())
            }
        }
    }

    /// Serialize `value` as JSON and store it under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if serialization or the backend write fails.
    fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let text = serde_json::to_string(value)?;
        self.set_raw(key, &text)
    }
}

impl<S: KeyValueStore + ?Sized> JsonStoreExt for S {}

impl<S: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<S> {
    fn get_raw(&self, key: &str) -> Option<String> {
        (**self).get_raw(key)
    }

    fn set_raw(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set_raw(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }

    fn contains_key(&self, key: &str) -> bool {
        (**self).contains_key(key)
    }
}
