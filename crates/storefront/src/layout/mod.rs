//! Layout controller.
//!
//! Runs once per page load: loads the shared navbar and footer fragments,
//! binds the session into the navbar, shows the cart badge and marks the
//! active navigation link. Afterwards it re-binds on storefront events.
//!
//! # Element ids
//!
//! - `#navbar-container`, `#footer-container` - fragment targets
//! - `#navUserName`, `#btnLogout`, `.admin-only` - session bindings
//! - `#scooterPointsSection`, `#user-points`, `#user-tier` - points panel
//! - `#cartCount` - cart badge
//! - `#yearNow` - footer year

mod fragments;
mod page;

pub use fragments::{
    ConfiguredFragmentSource, DirFragmentSource, FragmentError, FragmentSource,
    HttpFragmentSource, StaticFragmentSource,
};
pub use page::{Element, ElementRef, Page, PageModel, Selector};

use chrono::Datelike;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tracing::{debug, info, instrument, warn};

use crate::db::StoreError;
use crate::events::StoreEvent;
use crate::models::Session;
use crate::services::Destination;
use crate::services::points::PointsService;
use crate::state::Storefront;
use crate::store::KeyValueStore;

/// Navbar fragment locations, tried in order.
pub const NAVBAR_PATHS: [&str; 2] = ["assets/partials/navbar.html", "partials/navbar.html"];

/// Footer fragment locations, tried in order.
pub const FOOTER_PATHS: [&str; 2] = ["assets/partials/footer.html", "partials/footer.html"];

/// Rendered into a container when its fragment cannot be loaded.
pub const FRAGMENT_ERROR_HTML: &str =
    r#"<div class="alert alert-danger m-0">No se pudo cargar el contenido.</div>"#;

/// Navbar label when nobody is logged in.
pub const GUEST_LABEL: &str = "Invitado";

const HIDDEN: &str = "d-none";

/// What [`LayoutController::init`] managed to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutOutcome {
    pub navbar_loaded: bool,
    pub footer_loaded: bool,
}

/// Binds storefront state into a [`Page`].
pub struct LayoutController<S, F> {
    shop: Storefront<S>,
    fragments: F,
}

impl<S: KeyValueStore, F: FragmentSource> LayoutController<S, F> {
    #[must_use]
    pub const fn new(shop: Storefront<S>, fragments: F) -> Self {
        Self { shop, fragments }
    }

    // =========================================================================
    // Page load
    // =========================================================================

    /// Load fragments and bind everything. Fragment failures never abort;
    /// the container shows the inline error instead.
    #[instrument(skip(self, page), fields(path = %page.current_path()))]
    pub async fn init<P: Page>(&self, page: &mut P) -> LayoutOutcome {
        let (navbar, footer) = tokio::join!(
            self.load_fragment(&NAVBAR_PATHS),
            self.load_fragment(&FOOTER_PATHS),
        );

        let navbar_loaded = Self::insert_fragment(page, "navbar-container", navbar.as_deref());
        if navbar_loaded {
            self.bind_navbar(page);
            self.refresh_cart_badge(page);
            Self::mark_active_links(page);
        }

        let footer_loaded = Self::insert_fragment(page, "footer-container", footer.as_deref());
        if footer_loaded {
            Self::set_year(page);
        }

        info!(navbar_loaded, footer_loaded, "Layout initialized");
        LayoutOutcome {
            navbar_loaded,
            footer_loaded,
        }
    }

    /// First fragment that loads from `paths`.
    async fn load_fragment(&self, paths: &[&str]) -> Option<String> {
        for path in paths {
            match self.fragments.fetch(path).await {
                Ok(html) => return Some(html),
                Err(e) => warn!(path, error = %e, "Fragment unavailable"),
            }
        }
        None
    }

    /// Put `html` (or the error placeholder) into the container. Returns
    /// whether real content was inserted.
    fn insert_fragment<P: Page>(page: &mut P, container_id: &str, html: Option<&str>) -> bool {
        let Some(container) = page.by_id(container_id) else {
            debug!(container_id, "Container missing on this page");
            return false;
        };
        page.set_inner_html(container, html.unwrap_or(FRAGMENT_ERROR_HTML));
        html.is_some()
    }

    fn set_year<P: Page>(page: &mut P) {
        if let Some(year) = page.by_id("yearNow") {
            page.set_text(year, &chrono::Local::now().year().to_string());
        }
    }

    // =========================================================================
    // Bindings
    // =========================================================================

    /// Apply the current session to the navbar.
    pub fn bind_navbar<P: Page>(&self, page: &mut P) {
        match self.shop.auth().current_session() {
            Some(session) => self.bind_session(page, &session),
            None => Self::bind_guest(page),
        }
    }

    fn bind_session<P: Page>(&self, page: &mut P, session: &Session) {
        if let Some(label) = page.by_id("navUserName") {
            page.set_text(label, &session.display_label());
        }
        if let Some(logout) = page.by_id("btnLogout") {
            page.remove_class(logout, "disabled");
            page.set_attribute(logout, "tabindex", "0");
            page.set_attribute(logout, "aria-disabled", "false");
        }

        let section = page.by_id("scooterPointsSection");
        if session.role.is_admin() {
            for element in page.select(Selector::Class("admin-only")) {
                page.remove_class(element, HIDDEN);
            }
            if let Some(section) = section {
                page.add_class(section, HIDDEN);
            }
            return;
        }

        // Stored totals win over the session's cached copy.
        let points = self.shop.points().get_points(session.email.as_str());
        if let Some(section) = section {
            page.remove_class(section, HIDDEN);
        }
        if let Some(total) = page.by_id("user-points") {
            page.set_text(total, &points.to_string());
        }
        if let Some(tier) = page.by_id("user-tier") {
            page.set_text(tier, PointsService::<S>::tier_for(points).label());
        }
    }

    fn bind_guest<P: Page>(page: &mut P) {
        if let Some(label) = page.by_id("navUserName") {
            page.set_text(label, GUEST_LABEL);
        }
        if let Some(logout) = page.by_id("btnLogout") {
            page.add_class(logout, "disabled");
            page.set_attribute(logout, "tabindex", "-1");
            page.set_attribute(logout, "aria-disabled", "true");
        }
        for element in page.select(Selector::Class("admin-only")) {
            page.add_class(element, HIDDEN);
        }
        if let Some(section) = page.by_id("scooterPointsSection") {
            page.add_class(section, HIDDEN);
        }
    }

    /// Show the cart badge count.
    pub fn refresh_cart_badge<P: Page>(&self, page: &mut P) {
        if let Some(badge) = page.by_id("cartCount") {
            page.set_text(badge, &self.shop.cart_count().to_string());
        }
    }

    /// Mark navigation links that point at the current page.
    pub fn mark_active_links<P: Page>(page: &mut P) {
        let current = current_file_name(page.current_path());
        for link in page.select(Selector::TagClass("a", "nav-link")) {
            let href = page.attribute(link, "href").unwrap_or_default();
            if href.trim().to_lowercase() == current {
                page.add_class(link, "active");
            }
        }
    }

    // =========================================================================
    // Interaction
    // =========================================================================

    /// The navbar logout button: end the session and go to the login page.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the session cannot be cleared.
    pub fn handle_logout_click(&self) -> Result<Destination, StoreError> {
        self.shop.auth().logout()?;
        Ok(Destination::LoginPage)
    }

    /// React to one storefront event.
    pub fn handle_event<P: Page>(&self, page: &mut P, event: &StoreEvent) {
        debug!(event = event.name(), "Layout event");
        match event {
            StoreEvent::CartUpdated => self.refresh_cart_badge(page),
            StoreEvent::SessionStarted(_) | StoreEvent::SessionEnded => self.bind_navbar(page),
        }
    }

    /// Handle every event already queued on `events`. Returns how many were
    /// handled.
    pub fn drain_events<P: Page>(&self, page: &mut P, events: &mut broadcast::Receiver<StoreEvent>) -> usize {
        let mut handled = 0;
        loop {
            match events.try_recv() {
                Ok(event) => {
                    self.handle_event(page, &event);
                    handled += 1;
                }
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "Layout fell behind on events, rebinding");
                    self.rebind(page);
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => return handled,
            }
        }
    }

    /// Handle events until the channel closes.
    pub async fn listen<P: Page>(&self, page: &mut P, mut events: broadcast::Receiver<StoreEvent>) {
        loop {
            match events.recv().await {
                Ok(event) => self.handle_event(page, &event),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Layout fell behind on events, rebinding");
                    self.rebind(page);
                }
                Err(RecvError::Closed) => return,
            }
        }
    }

    fn rebind<P: Page>(&self, page: &mut P) {
        self.bind_navbar(page);
        self.refresh_cart_badge(page);
    }
}

/// Lower-cased last path segment, `index.html` for a directory.
fn current_file_name(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let name = path.rsplit('/').next().unwrap_or_default().trim();
    if name.is_empty() {
        "index.html".to_owned()
    } else {
        name.to_lowercase()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::StorefrontConfig;
    use crate::store::{MemoryStore, keys};

    const NAVBAR: &str = r#"<nav>
        <a class="nav-link" href="index.html">Inicio</a>
        <a class="nav-link" href="Productos.html">Productos</a>
        <li class="admin-only d-none"><a class="nav-link" href="admin.html">Admin</a></li>
        <div id="scooterPointsSection" class="d-none">
          <span id="user-points"></span><span id="user-tier"></span>
        </div>
        <span id="navUserName"></span>
        <span id="cartCount" class="badge">0</span>
        <button id="btnLogout" class="btn">Salir</button>
      </nav>"#;

    const FOOTER: &str = r#"<footer>&copy; <span id="yearNow"></span></footer>"#;

    fn shop() -> Storefront<MemoryStore> {
        Storefront::new(MemoryStore::new(), StorefrontConfig::default()).unwrap()
    }

    fn fragments() -> StaticFragmentSource {
        StaticFragmentSource::new()
            .with("partials/navbar.html", NAVBAR)
            .with("assets/partials/footer.html", FOOTER)
    }

    fn text(page: &PageModel, id: &str) -> String {
        page.get(id).unwrap().text.clone().unwrap_or_default()
    }

    fn hidden(page: &PageModel, id: &str) -> bool {
        page.get(id).unwrap().has_class(HIDDEN)
    }

    #[tokio::test]
    async fn test_guest_page() {
        let layout = LayoutController::new(shop(), fragments());
        let mut page = PageModel::shell("/productos.html");

        let outcome = layout.init(&mut page).await;
        assert!(outcome.navbar_loaded && outcome.footer_loaded);

        assert_eq!(text(&page, "navUserName"), GUEST_LABEL);
        let logout = page.get("btnLogout").unwrap();
        assert!(logout.has_class("disabled"));
        assert_eq!(logout.attributes["tabindex"], "-1");
        assert_eq!(logout.attributes["aria-disabled"], "true");
        assert!(hidden(&page, "scooterPointsSection"));
        assert_eq!(text(&page, "cartCount"), "0");
        assert_eq!(text(&page, "yearNow"), chrono::Local::now().year().to_string());

        let active: Vec<String> = page
            .elements()
            .filter(|e| e.has_class("active"))
            .map(|e| e.attributes["href"].clone())
            .collect();
        assert_eq!(active, vec!["Productos.html"]);
    }

    #[tokio::test]
    async fn test_user_sees_points() {
        let shop = shop();
        shop.auth().login("user@gmail.com", "123456").unwrap();
        shop.points().add_points("user@gmail.com", 520).unwrap();

        let layout = LayoutController::new(shop, fragments());
        let mut page = PageModel::shell("/");
        layout.init(&mut page).await;

        assert_eq!(text(&page, "navUserName"), "Usuario (user)");
        assert!(!hidden(&page, "scooterPointsSection"));
        assert_eq!(text(&page, "user-points"), "520");
        assert_eq!(text(&page, "user-tier"), "Expert");
        assert!(page.select(Selector::Class("admin-only")).iter().all(|e| {
            page.element(*e).unwrap().has_class(HIDDEN)
        }));
    }

    #[tokio::test]
    async fn test_admin_sees_admin_links() {
        let shop = shop();
        shop.auth().login("admin@duocuc.cl", "123456").unwrap();

        let layout = LayoutController::new(shop, fragments());
        let mut page = PageModel::shell("/admin.html");
        layout.init(&mut page).await;

        assert_eq!(text(&page, "navUserName"), "Admin (admin)");
        let admin_only = page.select(Selector::Class("admin-only"));
        assert_eq!(admin_only.len(), 1);
        assert!(!page.element(admin_only[0]).unwrap().has_class(HIDDEN));
        assert!(hidden(&page, "scooterPointsSection"));
    }

    #[tokio::test]
    async fn test_missing_fragments_render_placeholder() {
        let layout = LayoutController::new(shop(), StaticFragmentSource::new());
        let mut page = PageModel::shell("/");

        let outcome = layout.init(&mut page).await;
        assert!(!outcome.navbar_loaded && !outcome.footer_loaded);
        for id in ["navbar-container", "footer-container"] {
            assert_eq!(page.get(id).unwrap().inner_html.as_deref(), Some(FRAGMENT_ERROR_HTML));
        }
        assert!(page.get("navUserName").is_none());
        assert_eq!(page.select(Selector::Class("alert-danger")).len(), 2);
    }

    #[tokio::test]
    async fn test_events_rebind_navbar() {
        let shop = shop();
        let mut events = shop.events().subscribe();
        let layout = LayoutController::new(shop.clone(), fragments());
        let mut page = PageModel::shell("/");
        layout.init(&mut page).await;

        shop.auth().login("user@gmail.com", "123456").unwrap();
        shop.store().set_raw(keys::CART, r#"[{"qty":4}]"#).unwrap();
        shop.notify_cart_updated();
        assert_eq!(layout.drain_events(&mut page, &mut events), 2);
        assert_eq!(text(&page, "navUserName"), "Usuario (user)");
        assert_eq!(text(&page, "cartCount"), "4");

        assert_eq!(layout.handle_logout_click().unwrap(), Destination::LoginPage);
        layout.drain_events(&mut page, &mut events);
        assert_eq!(text(&page, "navUserName"), GUEST_LABEL);
        assert!(page.get("btnLogout").unwrap().has_class("disabled"));
    }

    #[test]
    fn test_current_file_name() {
        assert_eq!(current_file_name("/"), "index.html");
        assert_eq!(current_file_name(""), "index.html");
        assert_eq!(current_file_name("/tienda/Carrito.HTML?x=1"), "carrito.html");
        assert_eq!(current_file_name("login.html#top"), "login.html");
    }
}
