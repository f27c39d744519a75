//! Repositories over the local key-value store.
//!
//! # Tables
//!
//! Each "table" is one JSON value under a key from [`crate::store::keys`]:
//!
//! - `APP_USERS` - registered users ([`users::UserRepository`])
//! - `APP_CURRENT_USER` - the session record ([`sessions::SessionRepository`])
//! - `APP_PRODS` - the product catalog ([`products::ProductRepository`])
//! - `APP_CART` - cart lines, written by the cart page ([`cart::CartRepository`])
//!
//! Reads never fail: absent or malformed tables read as empty and
//! unparseable records are skipped. Appends and updates rewrite the table
//! from its raw records, keeping the ones they cannot parse, and refuse
//! with [`StoreError::Unreadable`] to replace a table that is present but
//! not an array.

pub mod cart;
pub mod products;
pub mod sessions;
pub mod users;

pub use crate::store::StoreError;
