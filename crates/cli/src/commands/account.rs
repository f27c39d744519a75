//! Account commands: register, login, logout, whoami.

use secrecy::{ExposeSecret, SecretString};
use tracing::info;

use scooter_shop_storefront::services::AuthSuccess;
use scooter_shop_storefront::state::Storefront;
use scooter_shop_storefront::store::FileStore;

use super::CliError;

/// Register a new user.
///
/// # Errors
///
/// Returns the auth error if registration is rejected.
pub fn register(
    shop: &Storefront<FileStore>,
    name: &str,
    email: &str,
    password: &SecretString,
) -> Result<(), CliError> {
    let outcome = shop.auth().register(name, email, password.expose_secret())?;
    report(&outcome);
    Ok(())
}

/// Log in and store the session.
///
/// # Errors
///
/// Returns the auth error if login is rejected.
pub fn login(shop: &Storefront<FileStore>, email: &str, password: &SecretString) -> Result<(), CliError> {
    let outcome = shop.auth().login(email, password.expose_secret())?;
    report(&outcome);
    Ok(())
}

/// Clear the session.
///
/// # Errors
///
/// Returns an error if the session file cannot be removed.
pub fn logout(shop: &Storefront<FileStore>) -> Result<(), CliError> {
    let destination = shop.auth().global_logout()?;
    info!(next = destination.path(), "Logged out");
    Ok(())
}

/// Show the logged-in user.
pub fn whoami(shop: &Storefront<FileStore>) {
    match shop.auth().current_session() {
        Some(session) => info!(
            user = %session.display_label(),
            email = %session.email,
            points = session.points,
            tier = %session.tier(),
            "Logged in"
        ),
        None => info!("Not logged in"),
    }
}

fn report(outcome: &AuthSuccess) {
    info!(
        code = outcome.code.as_str(),
        user = %outcome.user.email,
        next = outcome.destination.map_or("-", |d| d.path()),
        "OK"
    );
}
