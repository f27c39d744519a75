//! Integration tests for Scooter Shop.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p scooter-shop-integration-tests
//! ```
//!
//! Everything runs in-process: the storefront over a [`MemoryStore`] (or a
//! temporary [`FileStore`]) and layout fragments from a
//! [`StaticFragmentSource`]. Nothing needs to be running.
//!
//! # Test Categories
//!
//! - `auth_flow` - registration, login and logout scenarios
//! - `catalog_and_points` - seeding, product codes and reward points
//! - `layout` - page-load bindings and event-driven refresh

use scooter_shop_storefront::config::StorefrontConfig;
use scooter_shop_storefront::layout::{LayoutController, PageModel, StaticFragmentSource};
use scooter_shop_storefront::state::Storefront;
use scooter_shop_storefront::store::{FileStore, KeyValueStore, MemoryStore};

/// Navbar markup with every element the layout controller binds.
pub const NAVBAR_HTML: &str = r##"<nav class="navbar navbar-dark">
  <a class="navbar-brand" href="index.html">Scooter Shop</a>
  <ul class="navbar-nav">
    <li class="nav-item"><a class="nav-link" href="index.html">Inicio</a></li>
    <li class="nav-item"><a class="nav-link" href="productos.html">Productos</a></li>
    <li class="nav-item"><a class="nav-link" href="carrito.html">Carrito <span id="cartCount" class="badge">0</span></a></li>
    <li class="nav-item admin-only d-none"><a class="nav-link" href="admin.html">Admin</a></li>
  </ul>
  <div id="scooterPointsSection" class="d-none">
    <span id="user-points">0</span> pts <span id="user-tier">Beginner</span>
  </div>
  <span id="navUserName"></span>
  <a id="btnLogout" class="btn btn-outline-light" href="#">Salir</a>
</nav>"##;

/// Footer markup.
pub const FOOTER_HTML: &str =
    r#"<footer class="py-3"><small>&copy; <span id="yearNow"></span> Scooter Shop</small></footer>"#;

/// A storefront plus the fragments a page would load.
pub struct TestContext<S> {
    pub shop: Storefront<S>,
    pub fragments: StaticFragmentSource,
}

impl TestContext<MemoryStore> {
    /// Fresh in-memory storefront with default configuration.
    ///
    /// # Panics
    ///
    /// Panics if the storefront cannot be created.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(StorefrontConfig::default())
    }

    /// Fresh in-memory storefront with `config`.
    ///
    /// # Panics
    ///
    /// Panics if the storefront cannot be created.
    #[must_use]
    pub fn with_config(config: StorefrontConfig) -> Self {
        Self::over(MemoryStore::new(), config)
    }
}

impl Default for TestContext<MemoryStore> {
    fn default() -> Self {
        Self::new()
    }
}

impl TestContext<FileStore> {
    /// Storefront over a file store in `dir`.
    ///
    /// # Panics
    ///
    /// Panics if the storefront cannot be created.
    #[must_use]
    pub fn in_dir(dir: &std::path::Path) -> Self {
        Self::over(FileStore::new(dir), StorefrontConfig::default())
    }
}

impl<S: KeyValueStore> TestContext<S> {
    /// Storefront over `store`, with fragments served from the primary
    /// `assets/partials/` locations.
    ///
    /// # Panics
    ///
    /// Panics if the storefront cannot be created.
    #[must_use]
    pub fn over(store: S, config: StorefrontConfig) -> Self {
        let shop = Storefront::new(store, config).expect("Failed to create storefront");
        let fragments = StaticFragmentSource::new()
            .with("assets/partials/navbar.html", NAVBAR_HTML)
            .with("assets/partials/footer.html", FOOTER_HTML);
        Self { shop, fragments }
    }

    /// A layout controller over this storefront.
    #[must_use]
    pub fn layout(&self) -> LayoutController<S, StaticFragmentSource> {
        LayoutController::new(self.shop.clone(), self.fragments.clone())
    }

    /// Load `path` the way a browser would and return the bound page.
    pub async fn load_page(&self, path: &str) -> PageModel {
        let mut page = PageModel::shell(path);
        self.layout().init(&mut page).await;
        page
    }
}

/// Text set on the element with this id, or `""`.
#[must_use]
pub fn text_of(page: &PageModel, id: &str) -> String {
    page.get(id)
        .and_then(|e| e.text.clone())
        .unwrap_or_default()
}

/// Whether the element with this id carries `class`.
#[must_use]
pub fn has_class(page: &PageModel, id: &str, class: &str) -> bool {
    page.get(id).is_some_and(|e| e.has_class(class))
}
