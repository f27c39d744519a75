//! Reward tiers derived from accumulated points.

use serde::{Deserialize, Serialize};

/// Reward tier label.
///
/// | Tier       | Points        |
/// |------------|---------------|
/// | `Beginner` | `0..200`      |
/// | `Advanced` | `200..500`    |
/// | `Expert`   | `500..1000`   |
/// | `Pro`      | `1000..`      |
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    Beginner,
    Advanced,
    Expert,
    Pro,
}

impl Tier {
    /// Inclusive lower bounds, highest first.
    const THRESHOLDS: [(u64, Self); 3] = [(1000, Self::Pro), (500, Self::Expert), (200, Self::Advanced)];

    /// Map a point total to its tier.
    ///
    /// ```
    /// use scooter_shop_core::Tier;
    ///
    /// assert_eq!(Tier::for_points(199), Tier::Beginner);
    /// assert_eq!(Tier::for_points(200), Tier::Advanced);
    /// assert_eq!(Tier::for_points(1000), Tier::Pro);
    /// ```
    #[must_use]
    pub fn for_points(points: u64) -> Self {
        Self::THRESHOLDS
            .iter()
            .find(|(min, _)| points >= *min)
            .map_or(Self::Beginner, |(_, tier)| *tier)
    }

    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Advanced => "Advanced",
            Self::Expert => "Expert",
            Self::Pro => "Pro",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
