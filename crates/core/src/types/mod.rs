//! Core types for Scooter Shop.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod code;
pub mod email;
pub mod id;
pub mod price;
pub mod role;
pub mod tier;

pub use code::{ProductCode, ProductCodeError};
pub use email::{Email, EmailError, normalize_email};
pub use id::*;
pub use price::Price;
pub use role::Role;
pub use tier::Tier;
