//! Loyalty tier progress and benefits.
//!
//! Tiers are assigned by the backend; this only describes them.

use crate::models::LoyaltyTier;

const BASE_BENEFITS: [&str; 2] = [
    "Earn 10 points per rental day",
    "Exclusive newsletter and promotions",
];

/// Percentage (0 to 100) of the way from the current tier to the next.
#[must_use]
pub fn progress_percent(tier: LoyaltyTier, points: i64) -> f64 {
    let (floor, span) = match tier {
        LoyaltyTier::Bronze => (0, 1000),
        LoyaltyTier::Silver => (1000, 1000),
        LoyaltyTier::Gold => (2000, 3000),
        LoyaltyTier::Platinum => return 100.0,
        LoyaltyTier::Unknown => return 0.0,
    };
    #[allow(clippy::cast_precision_loss)]
    let percent = (points - floor) as f64 / f64::from(span) * 100.0;
    percent.clamp(0.0, 100.0)
}

/// The points threshold and name of the next tier.
#[must_use]
pub fn next_tier(tier: LoyaltyTier) -> Option<(i64, LoyaltyTier)> {
    match tier {
        LoyaltyTier::Bronze => Some((1000, LoyaltyTier::Silver)),
        LoyaltyTier::Silver => Some((2000, LoyaltyTier::Gold)),
        LoyaltyTier::Gold => Some((5000, LoyaltyTier::Platinum)),
        LoyaltyTier::Platinum | LoyaltyTier::Unknown => None,
    }
}

/// "1250/2000 points to Gold tier"
#[must_use]
pub fn next_tier_message(tier: LoyaltyTier, points: i64) -> String {
    match (tier, next_tier(tier)) {
        (_, Some((threshold, next))) => format!("{points}/{threshold} points to {next} tier"),
        (LoyaltyTier::Platinum, None) => "You have reached the highest tier!".to_string(),
        _ => String::new(),
    }
}

/// Benefits of a tier; unknown tiers get Bronze benefits.
#[must_use]
pub fn benefits(tier: LoyaltyTier) -> Vec<&'static str> {
    let mut list = BASE_BENEFITS.to_vec();
    match tier {
        LoyaltyTier::Bronze | LoyaltyTier::Unknown => {}
        LoyaltyTier::Silver => list.push("5% discount on all rentals"),
        LoyaltyTier::Gold => list.extend([
            "10% discount on all rentals",
            "Free vehicle upgrade when available",
        ]),
        LoyaltyTier::Platinum => list.extend([
            "15% discount on all rentals",
            "Free vehicle upgrade when available",
            "Priority customer service",
            "Extended rental hours",
        ]),
    }
    list
}
