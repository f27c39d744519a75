//! Scooter Shop Storefront library.
//!
//! The client-side data layer of the storefront: registration and login
//! against a local key-value store, a seeded product catalog, reward points,
//! and the layout controller that binds session state into a page.
//!
//! Everything hangs off [`state::Storefront`], which owns the injected
//! [`store::KeyValueStore`] backend and the notification channel.
//!
//! ```
//! use scooter_shop_storefront::config::StorefrontConfig;
//! use scooter_shop_storefront::state::Storefront;
//! use scooter_shop_storefront::store::MemoryStore;
//!
//! let shop = Storefront::new(MemoryStore::new(), StorefrontConfig::default()).unwrap();
//! let outcome = shop.auth().register("Jo", "jo@gmail.com", "abc123").unwrap();
//! assert_eq!(outcome.destination.map(|d| d.path()), Some("index.html"));
//! assert!(shop.auth().current_session().is_some());
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod events;
pub mod layout;
pub mod models;
pub mod services;
pub mod state;
pub mod store;
