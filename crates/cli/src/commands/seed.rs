//! Seed the store with the built-in users and catalog.
//!
//! Opening the storefront already writes any table that has never existed,
//! so this command only reports what the store holds afterwards.

use tracing::info;

use scooter_shop_storefront::db::users::UserRepository;
use scooter_shop_storefront::state::Storefront;
use scooter_shop_storefront::store::FileStore;

use super::CliError;

/// Report the seeded store.
///
/// # Errors
///
/// Returns an error if a missing table cannot be written.
pub fn run(shop: &Storefront<FileStore>) -> Result<(), CliError> {
    // Tables deleted since the storefront was opened
    let users_seeded = shop.auth().seed_users_if_empty()?;
    let products_seeded = shop.catalog().seed_if_empty()?;

    info!(
        dir = %shop.store().base_dir().display(),
        users = UserRepository::new(shop.store()).get_all().len(),
        products = shop.catalog().products().len(),
        users_seeded,
        products_seeded,
        "Store ready"
    );
    Ok(())
}
