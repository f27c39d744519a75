//! User repository.
//!
//! The user table is a JSON array scanned linearly; emails are compared in
//! normalized form (trimmed, lower-cased). Records that do not parse are
//! invisible to lookups but survive every write.

use scooter_shop_core::normalize_email;

use super::StoreError;
use crate::models::User;
use crate::store::{JsonStoreExt, KeyValueStore, keys};

/// Repository for the user table.
pub struct UserRepository<'a, S> {
    store: &'a S,
}

impl<'a, S: KeyValueStore> UserRepository<'a, S> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// All readable users; empty if the table is absent or unreadable.
    #[must_use]
    pub fn get_all(&self) -> Vec<User> {
        self.store.read_list(keys::USERS)
    }

    /// Replace the whole user table.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the write fails.
    pub fn save_all(&self, users: &[User]) -> Result<(), StoreError> {
        self.store.write(keys::USERS, users)
    }

    /// Find a user by email, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn get_by_email(&self, email: &str) -> Option<User> {
        let wanted = normalize_email(email);
        self.get_all()
            .into_iter()
            .find(|u| u.email.normalized() == wanted)
    }

    /// Append a user. Uniqueness is the caller's responsibility.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unreadable` if the table is present but not an
    /// array, or `StoreError` if the write fails.
    pub fn insert(&self, user: User) -> Result<(), StoreError> {
        let mut records = self.store.load_records(keys::USERS)?;
        records.push(serde_json::to_value(user)?);
        self.store.write(keys::USERS, &records)
    }

    /// Apply `f` to the user with this email and persist the table.
    ///
    /// Returns the updated user, or `None` (without writing) if no user
    /// matches. An unreadable table has no users to match.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the write fails.
    pub fn update_by_email<F>(&self, email: &str, f: F) -> Result<Option<User>, StoreError>
    where
        F: FnOnce(&mut User),
    {
        let wanted = normalize_email(email);
        let Ok(mut records) = self.store.load_records(keys::USERS) else {
            return Ok(None);
        };
        let Some((record, mut user)) = records.iter_mut().find_map(|record| {
            let user: User = serde_json::from_value(record.clone()).ok()?;
            (user.email.normalized() == wanted).then_some((record, user))
        }) else {
            return Ok(None);
        };
        f(&mut user);
        *record = serde_json::to_value(&user)?;
        self.store.write(keys::USERS, &records)?;
        Ok(Some(user))
    }

    /// Write the built-in users if the table has never been written.
    ///
    /// Returns `true` if it seeded.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the write fails.
    pub fn seed_if_absent(&self) -> Result<bool, StoreError> {
        if self.store.contains(keys::USERS) {
            return Ok(false);
        }
        self.save_all(&User::builtin())?;
        Ok(true)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use scooter_shop_core::{Email, Role};

    use super::*;
    use crate::store::MemoryStore;

    fn user(email: &str) -> User {
        User::new("Jo", Email::parse(email).unwrap(), "abc123", Role::User)
    }

    #[test]
    fn test_insert_and_lookup_is_case_insensitive() {
        let store = MemoryStore::new();
        let repo = UserRepository::new(&store);

        repo.insert(user("Jo@Gmail.com")).unwrap();

        assert!(repo.get_by_email("jo@gmail.com").is_some());
        assert!(repo.get_by_email("  JO@GMAIL.COM ").is_some());
        assert!(repo.get_by_email("other@gmail.com").is_none());
    }

    #[test]
    fn test_update_by_email() {
        let store = MemoryStore::new();
        let repo = UserRepository::new(&store);
        repo.insert(user("jo@gmail.com")).unwrap();

        let updated = repo
            .update_by_email("JO@gmail.com", |u| u.points += 50)
            .unwrap()
            .unwrap();
        assert_eq!(updated.points, 50);
        assert_eq!(repo.get_by_email("jo@gmail.com").unwrap().points, 50);

        let before = store.get_raw(keys::USERS);
        assert!(repo.update_by_email("nobody@gmail.com", |u| u.points += 1).unwrap().is_none());
        assert_eq!(store.get_raw(keys::USERS), before);
    }

    #[test]
    fn test_writes_keep_unparseable_records() {
        let store = MemoryStore::new();
        let repo = UserRepository::new(&store);
        repo.seed_if_absent().unwrap();
        let mut records = store.load_records(keys::USERS).unwrap();
        records.push(serde_json::json!({
            "name": "Old", "email": "old@gmail.com", "password": "abc123",
            "role": "user", "points": 12.5
        }));
        store.write(keys::USERS, &records).unwrap();
        assert_eq!(repo.get_all().len(), 2);

        repo.insert(user("jo@gmail.com")).unwrap();
        repo.update_by_email("user@gmail.com", |u| u.points = 10).unwrap().unwrap();

        assert_eq!(repo.get_all().len(), 3);
        assert!(repo.get_by_email("admin@duocuc.cl").is_some());
        let raw = store.get_raw(keys::USERS).unwrap();
        assert!(raw.contains(r#""points":12.5"#));
        assert_eq!(store.load_records(keys::USERS).unwrap().len(), 4);
    }

    #[test]
    fn test_insert_refuses_malformed_table() {
        let store = MemoryStore::new();
        store.set_raw(keys::USERS, "{not json").unwrap();
        let repo = UserRepository::new(&store);

        assert!(matches!(
            repo.insert(user("jo@gmail.com")),
            Err(StoreError::Unreadable { .. })
        ));
        assert!(repo.update_by_email("jo@gmail.com", |u| u.points = 1).unwrap().is_none());
        assert_eq!(store.get_raw(keys::USERS).as_deref(), Some("{not json"));
    }

    #[test]
    fn test_seed_only_when_absent() {
        let store = MemoryStore::new();
        let repo = UserRepository::new(&store);

        assert!(repo.seed_if_absent().unwrap());
        assert_eq!(repo.get_all().len(), 2);
        assert!(!repo.seed_if_absent().unwrap());

        let emptied = MemoryStore::new();
        let repo = UserRepository::new(&emptied);
        repo.save_all(&[]).unwrap();
        assert!(!repo.seed_if_absent().unwrap());
        assert!(repo.get_all().is_empty());
    }
}
