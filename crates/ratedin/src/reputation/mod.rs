//! Peer reputation: weighted assessment intake and aggregation.
//!
//! Evaluators submit six 1..=5 competency scores for a profile. Intake stamps each
//! submission with the evaluator's seniority weight and stores it once per
//! (evaluator, profile) pair; aggregation recomputes the overall score and the radar
//! breakdown from the full assessment set on every read.

pub mod aggregation;
pub mod domain;
pub mod identity;
pub mod import;
pub mod intake;
pub mod profiles;
pub mod repository;
pub mod router;
pub mod service;
pub mod sync;
pub mod weights;

#[cfg(test)]
mod tests;

pub use aggregation::{
    radar_breakdown, simple_average, weighted_average, RadarPoint, Weighted, SCALE_MAX,
    SENIOR_WEIGHT_THRESHOLD,
};
pub use domain::{
    Assessment, AssessmentId, AssessmentSubmission, Competency, CompetencyScores, Evaluator,
    EvaluatorId, NewProfile, Profile, ProfileId, ProfileStats, RawCompetencyScores, ScoreBand,
    SeniorityTier, WeightedScores,
};
pub use identity::{AuthenticatedEvaluator, EVALUATOR_ID_HEADER, EVALUATOR_SENIORITY_HEADER};
pub use import::{AssessmentCsvImporter, AssessmentImportError};
pub use intake::{validate_scores, IntakeGuard, ValidationError};
pub use repository::{
    AssessmentObserver, AssessmentRepository, NoopObserver, ObserverError, ProfileReport,
    ProfileRepository, ProfileSummaryView, RepositoryError,
};
pub use router::reputation_router;
pub use service::{ReputationService, ReputationServiceError, DEFAULT_LEADERBOARD_LIMIT};
pub use sync::{refresh_profile_stats, ProfileStatsSync};
pub use weights::{weight_for, weight_for_label, DEFAULT_WEIGHT};
