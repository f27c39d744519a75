//! Reward point commands.

use tracing::{info, warn};

use scooter_shop_storefront::services::PointsService;
use scooter_shop_storefront::state::Storefront;
use scooter_shop_storefront::store::FileStore;

use super::CliError;

/// Show a user's points and tier.
pub fn get(shop: &Storefront<FileStore>, email: &str) {
    if !shop.auth().email_exists(email) {
        warn!(email, "No such user");
        return;
    }
    let points = shop.points().get_points(email);
    info!(email, points, tier = %PointsService::<FileStore>::tier_for(points), "Points");
}

/// Add points to a user.
///
/// # Errors
///
/// Returns an error if the store cannot be written.
pub fn add(shop: &Storefront<FileStore>, email: &str, delta: i64) -> Result<(), CliError> {
    if !shop.auth().email_exists(email) {
        warn!(email, "No such user, nothing changed");
        return Ok(());
    }
    let total = shop.points().add_points(email, delta)?;
    info!(email, delta, total, tier = %PointsService::<FileStore>::tier_for(total), "Points updated");
    Ok(())
}
