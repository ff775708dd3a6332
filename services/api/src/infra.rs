use metrics_exporter_prometheus::PrometheusHandle;
use ratedin::reputation::{
    Assessment, AssessmentRepository, EvaluatorId, Profile, ProfileId, ProfileRepository,
    ProfileStats, ProfileStatsSync, RepositoryError, ReputationService,
};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type InMemoryReputationService = ReputationService<
    InMemoryAssessmentRepository,
    InMemoryProfileRepository,
    ProfileStatsSync<InMemoryAssessmentRepository, InMemoryProfileRepository>,
>;

/// Service over process-local stores with synchronous profile statistics refresh.
pub(crate) fn in_memory_service(leaderboard_limit: usize) -> InMemoryReputationService {
    let assessments = Arc::new(InMemoryAssessmentRepository::default());
    let profiles = Arc::new(InMemoryProfileRepository::default());
    let sync = Arc::new(ProfileStatsSync::new(assessments.clone(), profiles.clone()));
    ReputationService::new(assessments, profiles, sync).with_leaderboard_limit(leaderboard_limit)
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, RepositoryError> {
    mutex
        .lock()
        .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))
}

/// Assessments keyed by (evaluator, profile); the key doubles as the uniqueness constraint.
#[derive(Default, Clone)]
pub(crate) struct InMemoryAssessmentRepository {
    records: Arc<Mutex<HashMap<(EvaluatorId, ProfileId), Assessment>>>,
}

impl AssessmentRepository for InMemoryAssessmentRepository {
    fn insert(&self, assessment: Assessment) -> Result<Assessment, RepositoryError> {
        let mut guard = lock(&self.records)?;
        let key = (
            assessment.evaluator_id.clone(),
            assessment.target_profile_id.clone(),
        );
        if guard.contains_key(&key) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(key, assessment.clone());
        Ok(assessment)
    }

    fn exists(
        &self,
        evaluator_id: &EvaluatorId,
        profile_id: &ProfileId,
    ) -> Result<bool, RepositoryError> {
        let guard = lock(&self.records)?;
        Ok(guard.contains_key(&(evaluator_id.clone(), profile_id.clone())))
    }

    fn for_profile(&self, profile_id: &ProfileId) -> Result<Vec<Assessment>, RepositoryError> {
        let guard = lock(&self.records)?;
        let mut stored: Vec<Assessment> = guard
            .values()
            .filter(|assessment| &assessment.target_profile_id == profile_id)
            .cloned()
            .collect();
        stored.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(stored)
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryProfileRepository {
    records: Arc<Mutex<HashMap<ProfileId, Profile>>>,
}

impl ProfileRepository for InMemoryProfileRepository {
    fn insert(&self, profile: Profile) -> Result<Profile, RepositoryError> {
        let mut guard = lock(&self.records)?;
        let key = profile.linkedin_url.to_lowercase();
        if guard.contains_key(&profile.id)
            || guard
                .values()
                .any(|existing| existing.linkedin_url.to_lowercase() == key)
        {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(profile.id.clone(), profile.clone());
        Ok(profile)
    }

    fn fetch(&self, id: &ProfileId) -> Result<Option<Profile>, RepositoryError> {
        let guard = lock(&self.records)?;
        Ok(guard.get(id).cloned())
    }

    fn find_by_url(&self, lookup_key: &str) -> Result<Option<Profile>, RepositoryError> {
        let guard = lock(&self.records)?;
        Ok(guard
            .values()
            .find(|profile| profile.linkedin_url.to_lowercase() == lookup_key)
            .cloned())
    }

    fn update_stats(&self, id: &ProfileId, stats: ProfileStats) -> Result<Profile, RepositoryError> {
        let mut guard = lock(&self.records)?;
        let profile = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        profile.apply_stats(stats);
        Ok(profile.clone())
    }

    fn top(&self, limit: usize) -> Result<Vec<Profile>, RepositoryError> {
        let guard = lock(&self.records)?;
        let mut profiles: Vec<Profile> = guard.values().cloned().collect();
        profiles.sort_by(|a, b| {
            b.average_score
                .total_cmp(&a.average_score)
                .then_with(|| a.full_name.cmp(&b.full_name))
        });
        profiles.truncate(limit);
        Ok(profiles)
    }
}
