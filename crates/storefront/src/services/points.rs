//! Reward points and tiers.

use std::sync::Mutex;

use tracing::{debug, info, instrument};

use scooter_shop_core::Tier;

use super::lock;
use crate::db::StoreError;
use crate::db::sessions::SessionRepository;
use crate::db::users::UserRepository;
use crate::store::KeyValueStore;

/// Points service.
pub struct PointsService<'a, S> {
    store: &'a S,
    write_lock: &'a Mutex<()>,
}

impl<'a, S: KeyValueStore> PointsService<'a, S> {
    #[must_use]
    pub const fn new(store: &'a S, write_lock: &'a Mutex<()>) -> Self {
        Self { store, write_lock }
    }

    /// Points for this user, or 0 if there is no such user.
    #[must_use]
    pub fn get_points(&self, email: &str) -> u64 {
        UserRepository::new(self.store)
            .get_by_email(email)
            .map_or(0, |u| u.points)
    }

    /// Add `delta` points (may be negative) and return the new total.
    ///
    /// Totals never go below zero. An unknown email changes nothing and
    /// returns 0. If the user is the one logged in, the session's cached
    /// total is updated too.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the user table or session cannot be written.
    #[instrument(skip(self))]
    pub fn add_points(&self, email: &str, delta: i64) -> Result<u64, StoreError> {
        let _guard = lock(self.write_lock);

        let updated = UserRepository::new(self.store).update_by_email(email, |user| {
            user.points = user.points.saturating_add_signed(delta);
        })?;
        let Some(user) = updated else {
            debug!("No such user, points unchanged");
            return Ok(0);
        };

        let sessions = SessionRepository::new(self.store);
        if let Some(mut session) = sessions.get()
            && session.email.normalized() == user.email.normalized()
        {
            session.points = user.points;
            sessions.set(&session)?;
        }

        info!(total = user.points, "Points updated");
        Ok(user.points)
    }

    /// Tier for a point total.
    #[must_use]
    pub fn tier_for(points: u64) -> Tier {
        Tier::for_points(points)
    }

    /// Current tier of this user.
    #[must_use]
    pub fn tier_of(&self, email: &str) -> Tier {
        Self::tier_for(self.get_points(email))
    }
}
