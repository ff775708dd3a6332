use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::aggregation::{radar_breakdown, weighted_average, RadarPoint};
use super::domain::{
    Assessment, AssessmentId, AssessmentSubmission, Evaluator, EvaluatorId, NewProfile, Profile,
    ProfileId, ScoreBand,
};
use super::intake::{IntakeGuard, ValidationError};
use super::profiles::{lookup_key, profile_from_request};
use super::repository::{
    AssessmentObserver, AssessmentRepository, ProfileReport, ProfileRepository, RepositoryError,
};
use super::sync::refresh_profile_stats;

pub const DEFAULT_LEADERBOARD_LIMIT: usize = 20;

/// Service composing intake validation, the record store, and aggregation.
pub struct ReputationService<R, P, O> {
    guard: IntakeGuard,
    assessments: Arc<R>,
    profiles: Arc<P>,
    observer: Arc<O>,
    leaderboard_limit: usize,
}

static ASSESSMENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static PROFILE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_assessment_id() -> AssessmentId {
    let id = ASSESSMENT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    AssessmentId(format!("asm-{id:06}"))
}

fn next_profile_id() -> ProfileId {
    let id = PROFILE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ProfileId(format!("prf-{id:06}"))
}

impl<R, P, O> ReputationService<R, P, O>
where
    R: AssessmentRepository + 'static,
    P: ProfileRepository + 'static,
    O: AssessmentObserver + 'static,
{
    pub fn new(assessments: Arc<R>, profiles: Arc<P>, observer: Arc<O>) -> Self {
        Self {
            guard: IntakeGuard,
            assessments,
            profiles,
            observer,
            leaderboard_limit: DEFAULT_LEADERBOARD_LIMIT,
        }
    }

    pub fn with_leaderboard_limit(mut self, limit: usize) -> Self {
        self.leaderboard_limit = limit.max(1);
        self
    }

    /// Validate, weight, and persist a new assessment.
    ///
    /// The store's uniqueness check arbitrates concurrent submissions from the same
    /// evaluator; the loser observes `DuplicateAssessment`. Nothing but the new record
    /// is written here; the observer refreshes derived profile fields afterwards.
    pub fn submit(
        &self,
        evaluator: &Evaluator,
        submission: AssessmentSubmission,
    ) -> Result<Assessment, ReputationServiceError> {
        let mut assessment = self
            .guard
            .assessment_from_submission(evaluator, submission)
            .map_err(|error| {
                warn!(evaluator = %evaluator.id, %error, "assessment rejected");
                error
            })?;

        let profile_id = assessment.target_profile_id.clone();
        self.require_profile(&profile_id)?;

        if self.assessments.exists(&evaluator.id, &profile_id)? {
            warn!(evaluator = %evaluator.id, profile = %profile_id, "duplicate assessment");
            return Err(ReputationServiceError::DuplicateAssessment {
                evaluator: evaluator.id.clone(),
                profile: profile_id,
            });
        }

        assessment.id = next_assessment_id();
        let stored = match self.assessments.insert(assessment) {
            Ok(stored) => stored,
            Err(RepositoryError::Conflict) => {
                warn!(evaluator = %evaluator.id, profile = %profile_id, "duplicate assessment");
                return Err(ReputationServiceError::DuplicateAssessment {
                    evaluator: evaluator.id.clone(),
                    profile: profile_id,
                });
            }
            Err(other) => return Err(other.into()),
        };

        info!(
            assessment = %stored.id,
            profile = %stored.target_profile_id,
            seniority = %evaluator.seniority,
            weight = stored.weight_applied,
            "assessment recorded"
        );

        if let Err(error) = self.observer.assessment_recorded(&stored) {
            warn!(profile = %stored.target_profile_id, %error, "assessment observer failed");
        }

        Ok(stored)
    }

    pub fn has_assessed(
        &self,
        evaluator_id: &EvaluatorId,
        profile_id: &ProfileId,
    ) -> Result<bool, ReputationServiceError> {
        Ok(self.assessments.exists(evaluator_id, profile_id)?)
    }

    /// Overall weighted score recomputed from every stored assessment.
    pub fn overall_score(&self, profile_id: &ProfileId) -> Result<f64, ReputationServiceError> {
        self.require_profile(profile_id)?;
        let stored = self.assessments.for_profile(profile_id)?;
        Ok(weighted_average(&stored))
    }

    pub fn radar(
        &self,
        profile_id: &ProfileId,
        senior_only: bool,
    ) -> Result<Vec<RadarPoint>, ReputationServiceError> {
        self.require_profile(profile_id)?;
        let stored = self.assessments.for_profile(profile_id)?;
        debug!(profile = %profile_id, senior_only, count = stored.len(), "radar breakdown");
        Ok(radar_breakdown(&stored, senior_only))
    }

    /// Profile page payload. `viewer` adds whether that evaluator already assessed it.
    pub fn report(
        &self,
        profile_id: &ProfileId,
        viewer: Option<&EvaluatorId>,
        senior_only: bool,
    ) -> Result<ProfileReport, ReputationServiceError> {
        let profile = self.require_profile(profile_id)?;
        let stored = self.assessments.for_profile(profile_id)?;
        let overall_score = weighted_average(&stored);

        let has_assessed = match viewer {
            Some(evaluator_id) => Some(self.assessments.exists(evaluator_id, profile_id)?),
            None => None,
        };

        Ok(ProfileReport {
            profile: profile.summary_view(),
            overall_score,
            score_band: ScoreBand::from_score(overall_score),
            assessment_count: stored.len(),
            senior_only,
            radar: radar_breakdown(&stored, senior_only),
            has_assessed,
        })
    }

    pub fn register_profile(&self, request: NewProfile) -> Result<Profile, ReputationServiceError> {
        let mut profile = profile_from_request(request)?;
        let key = lookup_key(&profile.linkedin_url)?;

        if self.profiles.find_by_url(&key)?.is_some() {
            return Err(ReputationServiceError::ProfileExists(profile.linkedin_url));
        }

        profile.id = next_profile_id();
        let url = profile.linkedin_url.clone();
        let stored = match self.profiles.insert(profile) {
            Ok(stored) => stored,
            Err(RepositoryError::Conflict) => {
                return Err(ReputationServiceError::ProfileExists(url));
            }
            Err(other) => return Err(other.into()),
        };

        info!(profile = %stored.id, url = %stored.linkedin_url, "profile registered");
        Ok(stored)
    }

    pub fn find_by_url(&self, raw: &str) -> Result<Option<Profile>, ReputationServiceError> {
        let key = lookup_key(raw)?;
        Ok(self.profiles.find_by_url(&key)?)
    }

    /// Highest cached scores first. `None` uses the configured limit.
    pub fn leaderboard(&self, limit: Option<usize>) -> Result<Vec<Profile>, ReputationServiceError> {
        let limit = limit.unwrap_or(self.leaderboard_limit).max(1);
        Ok(self.profiles.top(limit)?)
    }

    /// Full-scan recomputation of the cached profile fields, for batch repair.
    pub fn resync_profile(&self, profile_id: &ProfileId) -> Result<Profile, ReputationServiceError> {
        self.require_profile(profile_id)?;
        let profile =
            refresh_profile_stats(self.assessments.as_ref(), self.profiles.as_ref(), profile_id)?;
        Ok(profile)
    }

    fn require_profile(&self, profile_id: &ProfileId) -> Result<Profile, ReputationServiceError> {
        self.profiles
            .fetch(profile_id)?
            .ok_or_else(|| ReputationServiceError::ProfileNotFound(profile_id.clone()))
    }
}

/// Error raised by the reputation service.
#[derive(Debug, thiserror::Error)]
pub enum ReputationServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("evaluator {evaluator} has already assessed profile {profile}")]
    DuplicateAssessment {
        evaluator: EvaluatorId,
        profile: ProfileId,
    },
    #[error("profile {0} not found")]
    ProfileNotFound(ProfileId),
    #[error("a profile for {0} already exists")]
    ProfileExists(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
