//! Unified error type.
//!
//! Each concern has its own `thiserror` enum; `AppError` wraps them for
//! callers (the CLI) that drive several services in one flow.

use thiserror::Error;

use crate::config::ConfigError;
use crate::layout::FragmentError;
use crate::services::auth::AuthError;
use crate::services::catalog::CatalogError;
use crate::store::StoreError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Store write failed.
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Registration or login rejected.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Catalog operation failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// A layout fragment could not be fetched.
    #[error("Fragment error: {0}")]
    Fragment(#[from] FragmentError),

    /// Bad input from the caller.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// Whether this is an infrastructure failure worth reporting, as opposed
    /// to a rejected input.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        match self {
            Self::Config(_) | Self::Store(_) | Self::Fragment(_) => true,
            Self::Auth(err) => matches!(err, AuthError::Storage(_)),
            Self::Catalog(err) => matches!(err, CatalogError::Store(_) | CatalogError::Seed(_)),
            Self::BadRequest(_) => false,
        }
    }

    /// Message suitable for showing to the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Auth(err) => err.message(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::auth::AuthForm;

    #[test]
    fn test_auth_errors_show_localized_message() {
        let err = AppError::from(AuthError::MissingFields(AuthForm::Login));
        assert_eq!(err.user_message(), "Correo y contraseña son obligatorios.");
        assert!(!err.is_internal());
    }

    #[test]
    fn test_storage_is_internal() {
        let io = std::io::Error::other("disk full");
        let err = AppError::from(StoreError::Io {
            key: "APP_USERS".into(),
            source: io,
        });
        assert!(err.is_internal());
        assert!(err.user_message().contains("APP_USERS"));
    }
}
