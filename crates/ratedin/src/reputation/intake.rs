use chrono::Utc;

use super::domain::{
    Assessment, AssessmentId, AssessmentSubmission, Competency, CompetencyScores, Evaluator,
    RawCompetencyScores,
};
use super::weights::weight_for;

pub const MIN_SCORE: i64 = 1;
pub const MAX_SCORE: i64 = 5;

/// Validation errors raised before anything reaches the record store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{competency} score is missing")]
    MissingScore { competency: Competency },
    #[error("{competency} score {value} is outside 1..=5")]
    ScoreOutOfRange { competency: Competency, value: i64 },
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },
}

/// Checks every competency in canonical order and reports the first problem found.
/// Out-of-range values are rejected, never clamped.
pub fn validate_scores(raw: &RawCompetencyScores) -> Result<CompetencyScores, ValidationError> {
    let mut scores = CompetencyScores::uniform(MIN_SCORE as u8);

    for competency in Competency::ALL {
        let value = raw
            .get(competency)
            .ok_or(ValidationError::MissingScore { competency })?;
        if !(MIN_SCORE..=MAX_SCORE).contains(&value) {
            return Err(ValidationError::ScoreOutOfRange { competency, value });
        }

        let value = value as u8;
        match competency {
            Competency::Communication => scores.communication = value,
            Competency::Resilience => scores.resilience = value,
            Competency::Collaboration => scores.collaboration = value,
            Competency::Ownership => scores.ownership = value,
            Competency::Commitment => scores.commitment = value,
            Competency::Pragmatism => scores.pragmatism = value,
        }
    }

    Ok(scores)
}

/// Guard turning raw submissions into assessments ready for persistence.
#[derive(Debug, Clone, Default)]
pub struct IntakeGuard;

impl IntakeGuard {
    /// Stamp a validated submission with the evaluator's current weight and the
    /// submission time. The identifier is assigned by the caller before insert.
    pub fn assessment_from_submission(
        &self,
        evaluator: &Evaluator,
        submission: AssessmentSubmission,
    ) -> Result<Assessment, ValidationError> {
        let scores = validate_scores(&submission.scores)?;

        Ok(Assessment {
            id: AssessmentId("pending".to_string()),
            evaluator_id: evaluator.id.clone(),
            target_profile_id: submission.target_profile_id,
            scores,
            weight_applied: weight_for(evaluator.seniority),
            created_at: Utc::now(),
        })
    }
}
