//! Product catalog service.
//!
//! Seeds the built-in catalog on first run and hands out product ids and
//! unique `PREFIX-NNNN` codes for new products.

use std::collections::HashSet;
use std::sync::Mutex;

use rand::Rng;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, instrument};

use scooter_shop_core::{Price, ProductCode, ProductCodeError, ProductId};

use super::lock;
use crate::db::StoreError;
use crate::db::products::ProductRepository;
use crate::models::Product;
use crate::store::KeyValueStore;

/// Catalog written on first run.
const SEED_CATALOG: &str = include_str!("../../data/seed_catalog.json");

/// Random draws before falling back to a linear scan.
const RANDOM_CODE_ATTEMPTS: usize = 50;

/// Catalog errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    #[error("built-in catalog is invalid: {0}")]
    Seed(#[source] serde_json::Error),

    #[error("invalid product code: {0}")]
    Code(#[from] ProductCodeError),

    #[error("all codes with prefix {prefix} are taken")]
    CodeSpaceExhausted { prefix: String },
}

/// A product to add; id and code are assigned by the catalog.
#[derive(Debug, Clone)]
pub struct NewProduct {
    /// Code prefix, e.g. `"BMS"`.
    pub prefix: String,
    pub name: String,
    pub description: String,
    pub price: Price,
    pub stock: u32,
    pub category: String,
    pub brand: String,
    pub image: String,
}

/// The built-in catalog.
///
/// # Errors
///
/// Returns `CatalogError::Seed` if the embedded data does not parse.
pub fn builtin_catalog() -> Result<Vec<Product>, CatalogError> {
    serde_json::from_str(SEED_CATALOG).map_err(CatalogError::Seed)
}

/// Pick a code with `prefix` that is not in `taken`.
///
/// Tries random numbers first, then the lowest free number.
///
/// # Errors
///
/// Returns `CatalogError::Code` for an invalid prefix, or
/// `CatalogError::CodeSpaceExhausted` if every number is taken.
pub fn pick_code<R: Rng + ?Sized>(
    prefix: &str,
    taken: &HashSet<&ProductCode>,
    rng: &mut R,
) -> Result<ProductCode, CatalogError> {
    for _ in 0..RANDOM_CODE_ATTEMPTS {
        let code = ProductCode::new(prefix, rng.random_range(0..=ProductCode::MAX_NUMBER))?;
        if !taken.contains(&code) {
            return Ok(code);
        }
    }

    debug!(prefix, "Random codes collided, scanning for a free one");
    for number in 0..=ProductCode::MAX_NUMBER {
        let code = ProductCode::new(prefix, number)?;
        if !taken.contains(&code) {
            return Ok(code);
        }
    }

    Err(CatalogError::CodeSpaceExhausted {
        prefix: prefix.trim().to_ascii_uppercase(),
    })
}

/// Catalog service.
pub struct CatalogService<'a, S> {
    store: &'a S,
    write_lock: &'a Mutex<()>,
}

impl<'a, S: KeyValueStore> CatalogService<'a, S> {
    #[must_use]
    pub const fn new(store: &'a S, write_lock: &'a Mutex<()>) -> Self {
        Self { store, write_lock }
    }

    const fn repo(&self) -> ProductRepository<'a, S> {
        ProductRepository::new(self.store)
    }

    /// Write the built-in catalog if the product table was never written.
    ///
    /// An emptied or even malformed table is left alone. Returns `true` if
    /// it seeded.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the seed data is invalid or the write fails.
    #[instrument(skip(self))]
    pub fn seed_if_empty(&self) -> Result<bool, CatalogError> {
        let _guard = lock(self.write_lock);
        let repo = self.repo();
        if repo.is_present() {
            return Ok(false);
        }
        let products = builtin_catalog()?;
        repo.save_all(&products)?;
        info!(count = products.len(), "Seeded built-in catalog");
        Ok(true)
    }

    /// All products.
    #[must_use]
    pub fn products(&self) -> Vec<Product> {
        self.repo().get_all()
    }

    /// Find a product by code.
    #[must_use]
    pub fn find_by_code(&self, code: &ProductCode) -> Option<Product> {
        self.products()
            .into_iter()
            .find(|p| p.code.as_ref() == Some(code))
    }

    /// Replace the catalog as-is.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Store` if the write fails.
    pub fn save_products(&self, products: &[Product]) -> Result<(), CatalogError> {
        let _guard = lock(self.write_lock);
        self.repo().save_all(products)?;
        Ok(())
    }

    /// One past the highest product id (1 for an empty catalog).
    #[must_use]
    pub fn next_id(&self) -> ProductId {
        next_id_of(&self.products())
    }

    /// A code with `prefix` that no product uses yet.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Code` for an invalid prefix, or
    /// `CatalogError::CodeSpaceExhausted` if every number is taken.
    pub fn generate_unique_code(&self, prefix: &str) -> Result<ProductCode, CatalogError> {
        let codes: Vec<ProductCode> = self.products().into_iter().filter_map(|p| p.code).collect();
        let taken: HashSet<&ProductCode> = codes.iter().collect();
        pick_code(prefix, &taken, &mut rand::rng())
    }

    /// Append a product with a fresh id and code.
    ///
    /// Ids and codes of stored records are avoided even when the record
    /// itself does not parse as a product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if no code can be assigned, the stored catalog
    /// is present but unreadable, or the write fails.
    #[instrument(skip(self, new), fields(prefix = %new.prefix, name = %new.name))]
    pub fn add_product(&self, new: NewProduct) -> Result<Product, CatalogError> {
        let _guard = lock(self.write_lock);
        let repo = self.repo();
        let records = repo.records()?;

        let codes: Vec<ProductCode> = records.iter().filter_map(record_code).collect();
        let taken: HashSet<&ProductCode> = codes.iter().collect();
        let code = pick_code(&new.prefix, &taken, &mut rand::rng())?;
        let id = records
            .iter()
            .filter_map(|r| r.get("id").and_then(Value::as_i64))
            .max()
            .map_or(ProductId::new(1), |max| ProductId::new(max).next());

        let product = Product {
            id,
            code: Some(code),
            name: new.name,
            description: new.description,
            price: new.price,
            stock: new.stock,
            category: new.category,
            brand: new.brand,
            image: new.image,
        };
        repo.append(records, &product)?;

        info!(code = product.code_label(), id = %product.id, "Product added");
        Ok(product)
    }
}

fn record_code(record: &Value) -> Option<ProductCode> {
    record
        .get("code")
        .and_then(Value::as_str)
        .and_then(|code| ProductCode::parse(code).ok())
}

fn next_id_of(products: &[Product]) -> ProductId {
    products
        .iter()
        .map(|p| p.id)
        .max()
        .map_or(ProductId::new(1), |id| id.next())
}
