//! Domain models for the storefront.
//!
//! These are the records persisted in the key-value store. Field names match
//! the stored JSON; legacy spellings are accepted on read via serde aliases.

pub mod cart;
pub mod product;
pub mod session;
pub mod user;

pub use cart::CartLine;
pub use product::Product;
pub use session::Session;
pub use user::User;
