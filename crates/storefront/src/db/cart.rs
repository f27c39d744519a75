//! Read-only view of the cart record.

use serde_json::Value;

use crate::models::CartLine;
use crate::models::cart::total_quantity;
use crate::store::{JsonStoreExt, KeyValueStore, keys};

/// Reads the cart written by the cart page.
pub struct CartRepository<'a, S> {
    store: &'a S,
}

impl<'a, S: KeyValueStore> CartRepository<'a, S> {
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Cart lines; empty if the cart is absent or not an array.
    #[must_use]
    pub fn lines(&self) -> Vec<CartLine> {
        self.store
            .read::<Vec<Value>>(keys::CART)
            .iter()
            .map(CartLine::from_record)
            .collect()
    }

    /// Total units in the cart, for the navbar badge.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        total_quantity(&self.lines())
    }
}
