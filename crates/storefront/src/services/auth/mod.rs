//! Authentication service.
//!
//! Registration and login against the local user table, plus the single
//! current-session record. Passwords are compared as entered; there is no
//! hashing because the store is readable by whoever holds the browser.

mod error;

pub use error::{AuthError, AuthErrorCode, AuthForm};

use std::sync::Mutex;

use serde::Serialize;
use tracing::{debug, info, instrument};

use scooter_shop_core::{Email, Role};

use super::lock;
use crate::config::StorefrontConfig;
use crate::db::StoreError;
use crate::db::sessions::SessionRepository;
use crate::db::users::UserRepository;
use crate::events::{EventBus, StoreEvent};
use crate::models::{Session, User};
use crate::store::KeyValueStore;

/// Minimum display name length, after trimming.
pub const MIN_NAME_LENGTH: usize = 2;

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Where the page should navigate after an auth action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Destination {
    /// Admin landing page.
    AdminLanding,
    /// Default landing page.
    DefaultLanding,
    /// Login page.
    LoginPage,
}

impl Destination {
    /// Page file name.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::AdminLanding => "admin.html",
            Self::DefaultLanding => "index.html",
            Self::LoginPage => "login.html",
        }
    }

    /// Landing page for a freshly started session.
    #[must_use]
    pub const fn landing_for(role: Role) -> Self {
        if role.is_admin() {
            Self::AdminLanding
        } else {
            Self::DefaultLanding
        }
    }
}

/// What a successful auth action did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SuccessCode {
    Registered,
    RegisteredAndLoggedIn,
    LoggedIn,
}

impl SuccessCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Registered => "registered",
            Self::RegisteredAndLoggedIn => "registered_and_logged_in",
            Self::LoggedIn => "logged_in",
        }
    }
}

/// Successful register/login outcome.
#[derive(Debug, Clone)]
pub struct AuthSuccess {
    pub code: SuccessCode,
    pub user: User,
    /// Set when a session was started.
    pub destination: Option<Destination>,
}

/// Authentication service.
///
/// Borrowed from a [`crate::state::Storefront`]; cheap to create per call.
pub struct AuthService<'a, S> {
    store: &'a S,
    events: &'a EventBus,
    config: &'a StorefrontConfig,
    write_lock: &'a Mutex<()>,
}

impl<'a, S: KeyValueStore> AuthService<'a, S> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(
        store: &'a S,
        events: &'a EventBus,
        config: &'a StorefrontConfig,
        write_lock: &'a Mutex<()>,
    ) -> Self {
        Self {
            store,
            events,
            config,
            write_lock,
        }
    }

    const fn users(&self) -> UserRepository<'a, S> {
        UserRepository::new(self.store)
    }

    const fn sessions(&self) -> SessionRepository<'a, S> {
        SessionRepository::new(self.store)
    }

    // =========================================================================
    // Registration & Login
    // =========================================================================

    /// Register a new user.
    ///
    /// Checks run in a fixed order and the first failure wins: blank fields,
    /// name length, email domain, password length, then uniqueness.
    ///
    /// # Errors
    ///
    /// Returns the first failing validation as an `AuthError`, or
    /// `AuthError::Storage` if the user table cannot be written.
    #[instrument(skip(self, name, email, password), fields(email = %email.trim()))]
    pub fn register(&self, name: &str, email: &str, password: &str) -> Result<AuthSuccess, AuthError> {
        let name = name.trim();
        let email = email.trim();

        if name.is_empty() || email.is_empty() || password.trim().is_empty() {
            return Err(AuthError::MissingFields(AuthForm::Register));
        }
        if name.chars().count() < MIN_NAME_LENGTH {
            return Err(AuthError::InvalidName { min: MIN_NAME_LENGTH });
        }
        let email = self.allowed_email(email)?;
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AuthError::WeakPassword {
                min: MIN_PASSWORD_LENGTH,
            });
        }

        let user = {
            let _guard = lock(self.write_lock);
            let users = self.users();
            if users.get_by_email(email.as_str()).is_some() {
                return Err(AuthError::AlreadyExists);
            }
            let user = User::new(name, email, password, Role::User);
            users.insert(user.clone())?;
            user
        };
        info!("User registered");

        if !self.config.auto_login_after_register {
            return Ok(AuthSuccess {
                code: SuccessCode::Registered,
                user,
                destination: None,
            });
        }

        self.start_session(&user)?;
        Ok(AuthSuccess {
            code: SuccessCode::RegisteredAndLoggedIn,
            destination: Some(Destination::landing_for(user.role)),
            user,
        })
    }

    /// Log in with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingFields`, `BadDomain`, `NotFound` or
    /// `BadCredentials`, or `AuthError::Storage` if the session cannot be
    /// written.
    #[instrument(skip(self, email, password), fields(email = %email.trim()))]
    pub fn login(&self, email: &str, password: &str) -> Result<AuthSuccess, AuthError> {
        let email = email.trim();
        if email.is_empty() || password.trim().is_empty() {
            return Err(AuthError::MissingFields(AuthForm::Login));
        }
        let email = self.allowed_email(email)?;

        let user = self
            .users()
            .get_by_email(email.as_str())
            .ok_or(AuthError::NotFound)?;
        if user.password != password {
            debug!("Password mismatch");
            return Err(AuthError::BadCredentials);
        }

        self.start_session(&user)?;
        info!(role = %user.role, "User logged in");
        Ok(AuthSuccess {
            code: SuccessCode::LoggedIn,
            destination: Some(Destination::landing_for(user.role)),
            user,
        })
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// The logged-in user, if any.
    #[must_use]
    pub fn current_session(&self) -> Option<Session> {
        self.sessions().get()
    }

    /// Clear the session and announce it.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend cannot delete the record.
    #[instrument(skip(self))]
    pub fn logout(&self) -> Result<(), StoreError> {
        self.sessions().clear()?;
        self.events.publish(StoreEvent::SessionEnded);
        info!("Session ended");
        Ok(())
    }

    /// Log out from anywhere and go to the default landing page.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend cannot delete the record.
    pub fn global_logout(&self) -> Result<Destination, StoreError> {
        self.logout()?;
        Ok(Destination::DefaultLanding)
    }

    fn start_session(&self, user: &User) -> Result<(), StoreError> {
        let session = Session::from(user);
        self.sessions().set(&session)?;
        self.events.publish(StoreEvent::SessionStarted(session));
        Ok(())
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    /// Whether a user with this email is registered.
    #[must_use]
    pub fn email_exists(&self, email: &str) -> bool {
        self.find_user_by_email(email).is_some()
    }

    /// Find a user by email, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn find_user_by_email(&self, email: &str) -> Option<User> {
        let found = self.users().get_by_email(email);
        debug!(email = %email.trim(), found = found.is_some(), "User lookup");
        found
    }

    /// Write the built-in users if no user table exists yet.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the write fails.
    #[instrument(skip(self))]
    pub fn seed_users_if_empty(&self) -> Result<bool, StoreError> {
        let _guard = lock(self.write_lock);
        let seeded = self.users().seed_if_absent()?;
        if seeded {
            info!("Seeded built-in users");
        }
        Ok(seeded)
    }

    /// Parse `email` and check it against the allowed domains.
    fn allowed_email(&self, email: &str) -> Result<Email, AuthError> {
        let bad_domain = || AuthError::BadDomain {
            allowed: self.config.allowed_domains.clone(),
        };
        let email = Email::parse(email).map_err(|_| bad_domain())?;
        if email.has_domain_in(&self.config.allowed_domains) {
            Ok(email)
        } else {
            Err(bad_domain())
        }
    }
}
