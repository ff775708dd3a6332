use std::sync::Arc;

use tracing::debug;

use super::domain::{Assessment, Profile, ProfileId, ProfileStats};
use super::repository::{
    AssessmentObserver, AssessmentRepository, ObserverError, ProfileRepository, RepositoryError,
};

/// Recompute a profile's cached score and count from every stored assessment.
///
/// Concurrent refreshes for one profile may finish out of order; the store keeps the
/// stats of the largest snapshot, so the last write never rolls the cache back.
pub fn refresh_profile_stats<R, P>(
    assessments: &R,
    profiles: &P,
    profile_id: &ProfileId,
) -> Result<Profile, RepositoryError>
where
    R: AssessmentRepository + ?Sized,
    P: ProfileRepository + ?Sized,
{
    let stored = assessments.for_profile(profile_id)?;
    let stats = ProfileStats::from_assessments(&stored);
    debug!(
        profile = %profile_id,
        average_score = stats.average_score,
        total_assessments = stats.total_assessments,
        "refreshing profile statistics"
    );
    let computed = stats.total_assessments;
    let profile = profiles.update_stats(profile_id, stats)?;
    if profile.total_assessments > computed {
        debug!(
            profile = %profile_id,
            computed,
            cached = profile.total_assessments,
            "newer profile statistics already stored"
        );
    }
    Ok(profile)
}

/// Observer keeping `average_score` and `total_assessments` in step with the
/// assessment set, synchronously after every accepted submission.
pub struct ProfileStatsSync<R, P> {
    assessments: Arc<R>,
    profiles: Arc<P>,
}

impl<R, P> ProfileStatsSync<R, P>
where
    R: AssessmentRepository,
    P: ProfileRepository,
{
    pub fn new(assessments: Arc<R>, profiles: Arc<P>) -> Self {
        Self {
            assessments,
            profiles,
        }
    }
}

impl<R, P> AssessmentObserver for ProfileStatsSync<R, P>
where
    R: AssessmentRepository,
    P: ProfileRepository,
{
    fn assessment_recorded(&self, assessment: &Assessment) -> Result<(), ObserverError> {
        refresh_profile_stats(
            self.assessments.as_ref(),
            self.profiles.as_ref(),
            &assessment.target_profile_id,
        )?;
        Ok(())
    }
}
