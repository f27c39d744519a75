//! Catalog commands.

use tracing::info;

use scooter_shop_storefront::services::NewProduct;
use scooter_shop_storefront::state::Storefront;
use scooter_shop_storefront::store::FileStore;

use super::CliError;

/// List the catalog.
pub fn list(shop: &Storefront<FileStore>) {
    let products = shop.catalog().products();
    if products.is_empty() {
        info!("Catalog is empty");
        return;
    }
    for p in &products {
        info!(
            id = %p.id,
            code = p.code_label(),
            price = %p.price,
            stock = p.stock,
            "{}",
            p.name
        );
    }
    info!(count = products.len(), "Products");
}

/// Add a product.
///
/// # Errors
///
/// Returns an error for an invalid prefix, a full code space, or a failed
/// write.
pub fn add(shop: &Storefront<FileStore>, new: NewProduct) -> Result<(), CliError> {
    let product = shop.catalog().add_product(new)?;
    info!(id = %product.id, code = product.code_label(), "Product added");
    Ok(())
}
