//! Business logic services for storefront.
//!
//! # Services
//!
//! - `auth` - Registration, login and the current session
//! - `points` - Reward points and tiers
//! - `catalog` - Product catalog seeding, ids and codes
//!
//! Services borrow the store and the storefront-wide write lock from
//! [`crate::state::Storefront`]. Every read-modify-write of a table holds
//! the lock for its whole duration.

pub mod auth;
pub mod catalog;
pub mod points;

pub use auth::{AuthError, AuthService, AuthSuccess, Destination, SuccessCode};
pub use catalog::{CatalogError, CatalogService, NewProduct};
pub use points::PointsService;

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Take the write lock. A panic in another holder does not leave the
/// tables half-written, so a poisoned lock is still usable.
pub(crate) fn lock(write_lock: &Mutex<()>) -> MutexGuard<'_, ()> {
    write_lock.lock().unwrap_or_else(PoisonError::into_inner)
}
