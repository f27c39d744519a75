//! Product catalog repository.

use serde_json::Value;

use super::StoreError;
use crate::models::Product;
use crate::store::{JsonStoreExt, KeyValueStore, keys};

/// Repository for the product table.
pub struct ProductRepository<'a, S> {
    store: &'a S,
}

impl<'a, S: KeyValueStore> ProductRepository<'a, S> {
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Whether the product table has ever been written.
    ///
    /// An explicitly emptied table (`[]`) counts as present.
    #[must_use]
    pub fn is_present(&self) -> bool {
        self.store.contains(keys::PRODUCTS)
    }

    /// All readable products; empty if the table is absent or unreadable.
    #[must_use]
    pub fn get_all(&self) -> Vec<Product> {
        self.store.read_list(keys::PRODUCTS)
    }

    /// Raw catalog records, including ones that do not parse as [`Product`].
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unreadable` if the table is present but not an
    /// array.
    pub fn records(&self) -> Result<Vec<Value>, StoreError> {
        self.store.load_records(keys::PRODUCTS)
    }

    /// Append a product to `records` and persist them.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if serialization or the write fails.
    pub fn append(&self, mut records: Vec<Value>, product: &Product) -> Result<(), StoreError> {
        records.push(serde_json::to_value(product)?);
        self.store.write(keys::PRODUCTS, &records)
    }

    /// Replace the whole catalog.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the write fails.
    pub fn save_all(&self, products: &[Product]) -> Result<(), StoreError> {
        self.store.write(keys::PRODUCTS, products)
    }
}
