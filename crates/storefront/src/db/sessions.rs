//! Session record repository.

use super::StoreError;
use crate::models::Session;
use crate::store::{JsonStoreExt, KeyValueStore, keys};

/// Repository for the single current-session record.
pub struct SessionRepository<'a, S> {
    store: &'a S,
}

impl<'a, S: KeyValueStore> SessionRepository<'a, S> {
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// The stored session; malformed state reads as no session.
    #[must_use]
    pub fn get(&self) -> Option<Session> {
        self.store.read_optional(keys::CURRENT_USER)
    }

    /// Replace the session record.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the write fails.
    pub fn set(&self, session: &Session) -> Result<(), StoreError> {
        self.store.write(keys::CURRENT_USER, session)
    }

    /// Remove the session record.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend cannot delete it.
    pub fn clear(&self) -> Result<(), StoreError> {
        self.store.remove(keys::CURRENT_USER)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use scooter_shop_core::{Email, Role};

    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_set_get_clear() {
        let store = MemoryStore::new();
        let repo = SessionRepository::new(&store);
        assert!(repo.get().is_none());

        let session = Session {
            name: "Jo".to_string(),
            email: Email::parse("jo@gmail.com").unwrap(),
            role: Role::User,
            points: 10,
        };
        repo.set(&session).unwrap();
        assert_eq!(repo.get().unwrap(), session);

        repo.clear().unwrap();
        assert!(repo.get().is_none());
    }

    #[test]
    fn test_malformed_session_is_absent() {
        let store = MemoryStore::new();
        store.set_raw(keys::CURRENT_USER, "\"just a string\"").unwrap();
        assert!(SessionRepository::new(&store).get().is_none());
    }
}
