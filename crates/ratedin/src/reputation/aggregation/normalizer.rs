use super::super::domain::{Competency, CompetencyScores};

/// Unweighted arithmetic mean of the six competency scores.
pub fn simple_average(scores: &CompetencyScores) -> f64 {
    let total: u32 = scores.iter().map(|(_, score)| u32::from(score)).sum();
    f64::from(total) / Competency::ALL.len() as f64
}
