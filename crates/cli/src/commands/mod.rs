//! CLI command implementations.

pub mod account;
pub mod layout;
pub mod points;
pub mod products;
pub mod seed;

use std::io::BufRead;

use secrecy::SecretString;
use thiserror::Error;

use scooter_shop_storefront::config::{ConfigError, StorefrontConfig};
use scooter_shop_storefront::error::AppError;
use scooter_shop_storefront::services::{AuthError, CatalogError};
use scooter_shop_storefront::state::Storefront;
use scooter_shop_storefront::store::{FileStore, StoreError};

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Storefront operation failed.
    #[error(transparent)]
    App(#[from] AppError),

    /// Reading from the terminal failed.
    #[error("Failed to read input: {0}")]
    Input(#[from] std::io::Error),

    /// Password was not provided.
    #[error("No password given")]
    MissingPassword,
}

macro_rules! from_app_error {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for CliError {
                fn from(e: $ty) -> Self {
                    Self::App(e.into())
                }
            }
        )*
    };
}

from_app_error!(AuthError, CatalogError, ConfigError, StoreError);

impl CliError {
    /// Whether this should be reported to Sentry.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        match self {
            Self::App(e) => e.is_internal(),
            Self::Input(_) => true,
            Self::MissingPassword => false,
        }
    }

    /// Message for the operator.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::App(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}

/// Open the file-backed storefront, seeding an empty store.
///
/// # Errors
///
/// Returns an error if seeding cannot write to the data directory.
pub fn open_storefront(config: StorefrontConfig) -> Result<Storefront<FileStore>, CliError> {
    let store = FileStore::new(config.data_dir.clone());
    tracing::debug!(dir = %config.data_dir.display(), "Opening store");
    Ok(Storefront::new(store, config)?)
}

/// Use the password from the command line, or read one line from stdin.
///
/// # Errors
///
/// Returns an error if stdin cannot be read or yields nothing.
pub fn read_password(given: Option<SecretString>) -> Result<SecretString, CliError> {
    if let Some(password) = given {
        return Ok(password);
    }

    tracing::info!("Password:");
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    let password = line.trim_end_matches(['\r', '\n']);
    if password.is_empty() {
        return Err(CliError::MissingPassword);
    }
    Ok(SecretString::from(password.to_owned()))
}
