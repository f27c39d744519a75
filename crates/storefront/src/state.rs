//! Storefront state shared by every component on a page.

use std::sync::{Arc, Mutex};

use tracing::info;

use crate::config::StorefrontConfig;
use crate::db::cart::CartRepository;
use crate::error::AppError;
use crate::events::{EventBus, StoreEvent};
use crate::services::{AuthService, CatalogService, PointsService};
use crate::store::KeyValueStore;

/// The storefront: an injected store backend plus the notification channel
/// and configuration.
///
/// This struct is cheaply cloneable via `Arc`; clones share the store, the
/// event bus and the write lock.
pub struct Storefront<S> {
    inner: Arc<StorefrontInner<S>>,
}

struct StorefrontInner<S> {
    store: S,
    config: StorefrontConfig,
    events: EventBus,
    write_lock: Mutex<()>,
}

impl<S> Clone for Storefront<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: KeyValueStore> Storefront<S> {
    /// Create the storefront and seed the built-in users and catalog into
    /// a store that has never held them.
    ///
    /// # Errors
    ///
    /// Returns `AppError` if seeding cannot write to the store.
    pub fn new(store: S, config: StorefrontConfig) -> Result<Self, AppError> {
        let shop = Self {
            inner: Arc::new(StorefrontInner {
                store,
                config,
                events: EventBus::new(),
                write_lock: Mutex::new(()),
            }),
        };

        let users = shop.auth().seed_users_if_empty()?;
        let products = shop.catalog().seed_if_empty()?;
        if users || products {
            info!(users, products, "Store initialized");
        }
        Ok(shop)
    }

    /// Authentication service.
    #[must_use]
    pub fn auth(&self) -> AuthService<'_, S> {
        let inner = &*self.inner;
        AuthService::new(&inner.store, &inner.events, &inner.config, &inner.write_lock)
    }

    /// Points service.
    #[must_use]
    pub fn points(&self) -> PointsService<'_, S> {
        PointsService::new(&self.inner.store, &self.inner.write_lock)
    }

    /// Catalog service.
    #[must_use]
    pub fn catalog(&self) -> CatalogService<'_, S> {
        CatalogService::new(&self.inner.store, &self.inner.write_lock)
    }

    /// Units in the cart.
    #[must_use]
    pub fn cart_count(&self) -> u64 {
        CartRepository::new(&self.inner.store).item_count()
    }

    /// Announce that the cart record was changed by its owner.
    pub fn notify_cart_updated(&self) {
        self.inner.events.publish(StoreEvent::CartUpdated);
    }

    /// Get a reference to the event bus.
    #[must_use]
    pub fn events(&self) -> &EventBus {
        &self.inner.events
    }

    /// Get a reference to the store backend.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.inner.store
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }
}
