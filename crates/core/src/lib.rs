//! Scooter Shop Core - Shared types library.
//!
//! This crate provides common types used across all Scooter Shop components:
//! - `storefront` - Client-side data layer (auth, catalog, points, layout)
//! - `cli` - Command-line tools for inspecting and driving a local store
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no storage
//! access, no HTTP clients. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, product
//!   codes, roles and reward tiers

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
