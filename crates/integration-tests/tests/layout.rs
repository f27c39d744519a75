//! Page-load bindings and event-driven refresh.

#![allow(clippy::unwrap_used)]

use scooter_shop_integration_tests::{TestContext, has_class, text_of};
use scooter_shop_storefront::layout::{
    FRAGMENT_ERROR_HTML, GUEST_LABEL, LayoutController, Page, PageModel, Selector, StaticFragmentSource,
};
use scooter_shop_storefront::services::Destination;
use scooter_shop_storefront::store::{KeyValueStore, keys};

#[tokio::test]
async fn test_guest_navbar() {
    let ctx = TestContext::new();
    let page = ctx.load_page("/carrito.html").await;

    assert_eq!(text_of(&page, "navUserName"), GUEST_LABEL);
    assert!(has_class(&page, "btnLogout", "disabled"));
    assert!(has_class(&page, "scooterPointsSection", "d-none"));
    assert!(!text_of(&page, "yearNow").is_empty());

    let active: Vec<_> = page
        .select(Selector::TagClass("a", "active"))
        .into_iter()
        .filter_map(|link| page.element(link))
        .map(|e| e.attributes["href"].clone())
        .collect();
    assert_eq!(active, vec!["carrito.html"]);
}

#[tokio::test]
async fn test_user_navbar_shows_points_and_cart() {
    let ctx = TestContext::new();
    ctx.shop.auth().login("user@gmail.com", "123456").unwrap();
    ctx.shop.points().add_points("user@gmail.com", 230).unwrap();
    ctx.shop
        .store()
        .set_raw(keys::CART, r#"[{"id":1,"qty":2},{"id":2,"qty":"3"},{"id":3}]"#)
        .unwrap();

    let page = ctx.load_page("/").await;
    assert_eq!(text_of(&page, "navUserName"), "Usuario (user)");
    assert!(!has_class(&page, "scooterPointsSection", "d-none"));
    assert_eq!(text_of(&page, "user-points"), "230");
    assert_eq!(text_of(&page, "user-tier"), "Advanced");
    assert_eq!(text_of(&page, "cartCount"), "6");

    let active: Vec<_> = page
        .elements()
        .filter(|e| e.has_class("active"))
        .map(|e| e.attributes["href"].clone())
        .collect();
    assert_eq!(active, vec!["index.html"]);
}

#[tokio::test]
async fn test_fallback_path_and_error_placeholder() {
    let ctx = TestContext::new();
    let fragments = StaticFragmentSource::new().with("partials/navbar.html", "<nav><span id=\"navUserName\"></span></nav>");
    let layout = LayoutController::new(ctx.shop.clone(), fragments);

    let mut page = PageModel::shell("/index.html");
    let outcome = layout.init(&mut page).await;

    assert!(outcome.navbar_loaded);
    assert_eq!(text_of(&page, "navUserName"), GUEST_LABEL);
    assert!(!outcome.footer_loaded);
    assert_eq!(
        page.get("footer-container").unwrap().inner_html.as_deref(),
        Some(FRAGMENT_ERROR_HTML)
    );
    assert!(page.get("yearNow").is_none());
}

#[tokio::test]
async fn test_logout_click_and_events() {
    let ctx = TestContext::new();
    ctx.shop.auth().login("admin@duocuc.cl", "123456").unwrap();
    let mut events = ctx.shop.events().subscribe();
    let layout = ctx.layout();

    let mut page = PageModel::shell("/admin.html");
    layout.init(&mut page).await;
    assert_eq!(text_of(&page, "navUserName"), "Admin (admin)");
    let admin_links = page.select(Selector::Class("admin-only"));
    assert!(admin_links.iter().all(|l| !page.element(*l).unwrap().has_class("d-none")));

    ctx.shop.store().set_raw(keys::CART, r#"[{"qty":1}]"#).unwrap();
    ctx.shop.notify_cart_updated();
    assert_eq!(layout.handle_logout_click().unwrap(), Destination::LoginPage);
    assert_eq!(layout.drain_events(&mut page, &mut events), 2);

    assert_eq!(text_of(&page, "cartCount"), "1");
    assert_eq!(text_of(&page, "navUserName"), GUEST_LABEL);
    assert!(admin_links.iter().all(|l| page.element(*l).unwrap().has_class("d-none")));
    assert!(ctx.shop.auth().current_session().is_none());
}

#[tokio::test]
async fn test_listen_until_channel_closes() {
    let ctx = TestContext::new();
    let layout = ctx.layout();
    let mut page = ctx.load_page("/").await;

    let (tx, rx) = tokio::sync::broadcast::channel(4);
    ctx.shop.store().set_raw(keys::CART, r#"[{"qty":5}]"#).unwrap();
    tx.send(scooter_shop_storefront::events::StoreEvent::CartUpdated).unwrap();
    drop(tx);

    layout.listen(&mut page, rx).await;
    assert_eq!(text_of(&page, "cartCount"), "5");
}
