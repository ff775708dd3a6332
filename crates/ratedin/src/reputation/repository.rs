use serde::Serialize;

use super::aggregation::RadarPoint;
use super::domain::{
    Assessment, EvaluatorId, Profile, ProfileId, ProfileStats, ScoreBand,
};

/// Assessment storage. `insert` must check the (evaluator, target) key and write
/// atomically; concurrent duplicates resolve to exactly one `Ok` and one `Conflict`.
pub trait AssessmentRepository: Send + Sync {
    fn insert(&self, assessment: Assessment) -> Result<Assessment, RepositoryError>;
    fn exists(
        &self,
        evaluator_id: &EvaluatorId,
        profile_id: &ProfileId,
    ) -> Result<bool, RepositoryError>;
    fn for_profile(&self, profile_id: &ProfileId) -> Result<Vec<Assessment>, RepositoryError>;
}

/// Profile storage. `insert` reports `Conflict` when the LinkedIn URL is already taken.
///
/// `update_stats` must apply [`Profile::apply_stats`] under the store's write lock (or
/// an equivalent conditional update), so a refresh computed from an older assessment
/// snapshot never overwrites one computed from a newer snapshot. It returns the profile
/// as stored afterwards.
pub trait ProfileRepository: Send + Sync {
    fn insert(&self, profile: Profile) -> Result<Profile, RepositoryError>;
    fn fetch(&self, id: &ProfileId) -> Result<Option<Profile>, RepositoryError>;
    fn find_by_url(&self, lookup_key: &str) -> Result<Option<Profile>, RepositoryError>;
    fn update_stats(&self, id: &ProfileId, stats: ProfileStats)
        -> Result<Profile, RepositoryError>;
    fn top(&self, limit: usize) -> Result<Vec<Profile>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Hook invoked after an assessment has been persisted.
pub trait AssessmentObserver: Send + Sync {
    fn assessment_recorded(&self, assessment: &Assessment) -> Result<(), ObserverError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ObserverError {
    #[error("profile statistics refresh failed: {0}")]
    Refresh(#[from] RepositoryError),
}

/// Observer that does nothing, for callers that refresh derived views themselves.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl AssessmentObserver for NoopObserver {
    fn assessment_recorded(&self, _assessment: &Assessment) -> Result<(), ObserverError> {
        Ok(())
    }
}

/// Leaderboard entry.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileSummaryView {
    pub id: ProfileId,
    pub full_name: String,
    pub linkedin_url: String,
    pub handle: String,
    pub initials: String,
    pub avatar_url: Option<String>,
    pub average_score: f64,
    pub score_band: ScoreBand,
    pub total_assessments: u32,
}

impl Profile {
    pub fn summary_view(&self) -> ProfileSummaryView {
        ProfileSummaryView {
            id: self.id.clone(),
            full_name: self.full_name.clone(),
            linkedin_url: self.linkedin_url.clone(),
            handle: self.handle().to_string(),
            initials: self.initials(),
            avatar_url: self.avatar_url.clone(),
            average_score: self.average_score,
            score_band: ScoreBand::from_score(self.average_score),
            total_assessments: self.total_assessments,
        }
    }
}

/// Full profile page payload computed from a fresh scan of the assessments.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileReport {
    pub profile: ProfileSummaryView,
    pub overall_score: f64,
    pub score_band: ScoreBand,
    pub assessment_count: usize,
    pub senior_only: bool,
    pub radar: Vec<RadarPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_assessed: Option<bool>,
}
