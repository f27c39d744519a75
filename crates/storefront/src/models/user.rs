//! User domain type.

use serde::{Deserialize, Serialize};

use scooter_shop_core::{Email, Role};

/// A registered storefront user.
///
/// Passwords are stored in clear text: the store is fully visible to the
/// person operating the browser, so hashing would protect nothing. `Debug`
/// still redacts the password so it stays out of logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Display name.
    pub name: String,
    /// Email address as entered (trimmed). Identity is its normalized form.
    pub email: Email,
    /// Password. Older tables stored this field as `pass`.
    #[serde(alias = "pass")]
    pub password: String,
    /// Role.
    #[serde(default)]
    pub role: Role,
    /// Accumulated reward points.
    #[serde(default)]
    pub points: u64,
}

impl User {
    /// Create a new user with no points.
    #[must_use]
    pub fn new(name: impl Into<String>, email: Email, password: impl Into<String>, role: Role) -> Self {
        Self {
            name: name.into(),
            email,
            password: password.into(),
            role,
            points: 0,
        }
    }

    /// The users written on first run when no user table exists.
    #[must_use]
    pub fn builtin() -> Vec<Self> {
        [
            ("Admin", "admin@duocuc.cl", Role::Admin),
            ("Usuario", "user@gmail.com", Role::User),
        ]
        .into_iter()
        .filter_map(|(name, email, role)| {
            Email::parse(email)
                .ok()
                .map(|email| Self::new(name, email, "123456", role))
        })
        .collect()
    }
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("role", &self.role)
            .field("points", &self.points)
            .finish()
    }
}
