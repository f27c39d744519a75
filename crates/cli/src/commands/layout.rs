//! Layout preview: run the page-load bindings against the configured
//! fragment source and print the bound elements.

use tracing::info;

use scooter_shop_storefront::layout::{ConfiguredFragmentSource, LayoutController, PageModel};
use scooter_shop_storefront::state::Storefront;
use scooter_shop_storefront::store::FileStore;

/// Elements worth showing after binding.
const WATCHED_IDS: [&str; 6] = [
    "navUserName",
    "btnLogout",
    "scooterPointsSection",
    "user-points",
    "user-tier",
    "cartCount",
];

/// Render the layout for `page`.
pub async fn render(shop: &Storefront<FileStore>, page_path: &str) {
    let fragments = ConfiguredFragmentSource::from_config(&shop.config().partials);
    let layout = LayoutController::new(shop.clone(), fragments);

    let mut page = PageModel::shell(page_path);
    let outcome = layout.init(&mut page).await;
    info!(
        navbar = outcome.navbar_loaded,
        footer = outcome.footer_loaded,
        "Fragments"
    );

    for id in WATCHED_IDS {
        let Some(element) = page.get(id) else {
            continue;
        };
        info!(
            id,
            text = element.text.as_deref().unwrap_or(""),
            class = element.attributes.get("class").map_or("", String::as_str),
            "Element"
        );
    }

    let active: Vec<&str> = page
        .elements()
        .filter(|e| e.tag == "a" && e.has_class("active"))
        .filter_map(|e| e.attributes.get("href").map(String::as_str))
        .collect();
    info!(?active, "Active links");
}
