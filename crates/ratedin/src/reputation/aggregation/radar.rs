use serde::Serialize;

use super::super::domain::Competency;
use super::Weighted;

/// Assessments weighing at least this much count as senior opinions.
pub const SENIOR_WEIGHT_THRESHOLD: f64 = 1.2;

/// Upper bound of every competency axis.
pub const SCALE_MAX: u8 = 5;

/// One axis of the radar breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarPoint {
    pub competency: Competency,
    pub label: &'static str,
    pub value: f64,
    pub scale_max: u8,
}

impl RadarPoint {
    fn new(competency: Competency, value: f64) -> Self {
        Self {
            competency,
            label: competency.label(),
            value,
            scale_max: SCALE_MAX,
        }
    }
}

/// Weighted per-competency means, always six entries in canonical order.
///
/// The senior filter tests the stored weight, not the tier, so any tier weighing
/// [`SENIOR_WEIGHT_THRESHOLD`] or more is included.
pub fn radar_breakdown<A: Weighted>(assessments: &[A], senior_only: bool) -> Vec<RadarPoint> {
    let filtered: Vec<&A> = assessments
        .iter()
        .filter(|assessment| !senior_only || assessment.weight() >= SENIOR_WEIGHT_THRESHOLD)
        .collect();

    if filtered.is_empty() {
        return Competency::ALL
            .into_iter()
            .map(|competency| RadarPoint::new(competency, 0.0))
            .collect();
    }

    Competency::ALL
        .into_iter()
        .map(|competency| {
            let mut weighted_sum = 0.0;
            let mut total_weight = 0.0;

            for assessment in &filtered {
                let weight = assessment.weight();
                weighted_sum += f64::from(assessment.scores().get(competency)) * weight;
                total_weight += weight;
            }

            let value = if total_weight > 0.0 {
                weighted_sum / total_weight
            } else {
                0.0
            };
            RadarPoint::new(competency, value)
        })
        .collect()
}
