//! Session record.

use serde::{Deserialize, Serialize};

use scooter_shop_core::{Email, Role, Tier};

use super::User;

/// The logged-in user, as cached in the store.
///
/// There is no server to verify it against; whatever is stored is trusted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub name: String,
    pub email: Email,
    #[serde(default)]
    pub role: Role,
    /// Cached point total, refreshed when points are added to this user.
    #[serde(default)]
    pub points: u64,
}

impl Session {
    /// Reward tier for the cached points.
    #[must_use]
    pub fn tier(&self) -> Tier {
        Tier::for_points(self.points)
    }

    /// Navbar label, e.g. `"Jo (user)"`.
    #[must_use]
    pub fn display_label(&self) -> String {
        format!("{} ({})", self.name, self.role)
    }
}

impl From<&User> for Session {
    fn from(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            points: user.points,
        }
    }
}
