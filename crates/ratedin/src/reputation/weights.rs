//! Seniority weight table applied to assessments at submission time.

use super::domain::SeniorityTier;

/// Weight used for any label that is not a known tier.
pub const DEFAULT_WEIGHT: f64 = 1.0;

pub fn weight_for(tier: SeniorityTier) -> f64 {
    match tier {
        SeniorityTier::Junior => 0.8,
        SeniorityTier::Mid => 1.0,
        SeniorityTier::Senior => 1.2,
        SeniorityTier::Lead => 1.5,
        SeniorityTier::Staff => 1.5,
    }
}

/// Total over arbitrary labels: unrecognized input yields [`DEFAULT_WEIGHT`].
pub fn weight_for_label(label: &str) -> f64 {
    match SeniorityTier::parse(label) {
        Some(tier) => weight_for(tier),
        None => DEFAULT_WEIGHT,
    }
}
