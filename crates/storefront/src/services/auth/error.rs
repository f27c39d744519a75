//! Authentication error types.

use serde::Serialize;
use thiserror::Error;

use crate::db::StoreError;

/// Which form a validation error came from.
///
/// The two forms word the "missing fields" message differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthForm {
    Register,
    Login,
}

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// A required field was blank.
    #[error("missing required fields")]
    MissingFields(AuthForm),

    /// Display name too short.
    #[error("name must be at least {min} characters")]
    InvalidName { min: usize },

    /// Email is malformed or not on an allowed domain.
    #[error("email domain is not allowed")]
    BadDomain { allowed: Vec<String> },

    /// Password too short.
    #[error("password must be at least {min} characters")]
    WeakPassword { min: usize },

    /// User already exists.
    #[error("user already exists")]
    AlreadyExists,

    /// No user with that email.
    #[error("user not found")]
    NotFound,

    /// Password did not match.
    #[error("invalid credentials")]
    BadCredentials,

    /// Store write failed.
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),
}

/// Machine-readable discriminator for [`AuthError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthErrorCode {
    MissingFields,
    InvalidName,
    BadDomain,
    WeakPassword,
    AlreadyExists,
    NotFound,
    BadCredentials,
    Storage,
}

impl AuthErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MissingFields => "missing_fields",
            Self::InvalidName => "invalid_name",
            Self::BadDomain => "bad_domain",
            Self::WeakPassword => "weak_password",
            Self::AlreadyExists => "already_exists",
            Self::NotFound => "not_found",
            Self::BadCredentials => "bad_credentials",
            Self::Storage => "storage",
        }
    }
}

impl std::fmt::Display for AuthErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AuthError {
    /// The error's code.
    #[must_use]
    pub const fn code(&self) -> AuthErrorCode {
        match self {
            Self::MissingFields(_) => AuthErrorCode::MissingFields,
            Self::InvalidName { .. } => AuthErrorCode::InvalidName,
            Self::BadDomain { .. } => AuthErrorCode::BadDomain,
            Self::WeakPassword { .. } => AuthErrorCode::WeakPassword,
            Self::AlreadyExists => AuthErrorCode::AlreadyExists,
            Self::NotFound => AuthErrorCode::NotFound,
            Self::BadCredentials => AuthErrorCode::BadCredentials,
            Self::Storage(_) => AuthErrorCode::Storage,
        }
    }

    /// User-facing message in the storefront locale.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::MissingFields(AuthForm::Register) => "Todos los campos son obligatorios.".to_owned(),
            Self::MissingFields(AuthForm::Login) => "Correo y contraseña son obligatorios.".to_owned(),
            Self::InvalidName { min } => {
                format!("El nombre debe tener al menos {min} caracteres.")
            }
            Self::BadDomain { allowed } => {
                let listed: Vec<String> = allowed.iter().map(|d| format!("@{d}")).collect();
                format!("Dominio no permitido. Usa {}.", join_spanish(&listed))
            }
            Self::WeakPassword { min } => {
                format!("La contraseña debe tener al menos {min} caracteres.")
            }
            Self::AlreadyExists => "El correo ya está registrado.".to_owned(),
            Self::NotFound => "Este correo no está registrado.".to_owned(),
            Self::BadCredentials => "Usuario o contraseña incorrectos.".to_owned(),
            Self::Storage(_) => "No se pudo guardar la información. Intenta nuevamente.".to_owned(),
        }
    }
}

/// `["a", "b", "c"]` -> `"a, b o c"`.
fn join_spanish(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} o {last}", init.join(", ")),
    }
}
