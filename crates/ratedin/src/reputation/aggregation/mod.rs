//! Stateless aggregation of weighted assessments into reputation scores.
//!
//! Nothing here caches or performs I/O; callers hand in a materialized snapshot and the
//! functions may run concurrently from any number of threads.

mod normalizer;
mod radar;

pub use normalizer::simple_average;
pub use radar::{radar_breakdown, RadarPoint, SCALE_MAX, SENIOR_WEIGHT_THRESHOLD};

use super::domain::{Assessment, CompetencyScores, ProfileStats, WeightedScores};

/// Anything aggregation can read: six scores plus the weight captured at submission.
pub trait Weighted {
    fn scores(&self) -> &CompetencyScores;
    fn weight(&self) -> f64;
}

impl Weighted for Assessment {
    fn scores(&self) -> &CompetencyScores {
        &self.scores
    }

    fn weight(&self) -> f64 {
        self.weight_applied
    }
}

impl Weighted for WeightedScores {
    fn scores(&self) -> &CompetencyScores {
        &self.scores
    }

    fn weight(&self) -> f64 {
        self.weight_applied
    }
}

/// Weight-weighted mean of per-assessment means. Empty input yields `0.0`.
///
/// Each assessment contributes its own six-way mean once, scaled by its weight. This is
/// not a flat weighted mean over every individual score.
pub fn weighted_average<A: Weighted>(assessments: &[A]) -> f64 {
    let mut weighted_sum = 0.0;
    let mut total_weight = 0.0;

    for assessment in assessments {
        let weight = assessment.weight();
        weighted_sum += simple_average(assessment.scores()) * weight;
        total_weight += weight;
    }

    if total_weight > 0.0 {
        weighted_sum / total_weight
    } else {
        0.0
    }
}

impl ProfileStats {
    /// Formula the cached profile fields must follow.
    pub fn from_assessments<A: Weighted>(assessments: &[A]) -> Self {
        Self {
            average_score: weighted_average(assessments),
            total_assessments: u32::try_from(assessments.len()).unwrap_or(u32::MAX),
        }
    }
}
