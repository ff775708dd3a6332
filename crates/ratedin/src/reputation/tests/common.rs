use std::collections::HashMap;
use std::sync::{mpsc, Arc, Mutex};

use axum::response::Response;
use chrono::Utc;
use serde_json::Value;

use crate::reputation::domain::{
    Assessment, AssessmentId, AssessmentSubmission, CompetencyScores, Evaluator, EvaluatorId,
    NewProfile, Profile, ProfileId, ProfileStats, RawCompetencyScores, SeniorityTier,
    WeightedScores,
};
use crate::reputation::repository::{
    AssessmentObserver, AssessmentRepository, ObserverError, ProfileRepository, RepositoryError,
};
use crate::reputation::sync::ProfileStatsSync;
use crate::reputation::ReputationService;

pub(super) type SyncedService = ReputationService<
    MemoryAssessments,
    MemoryProfiles,
    ProfileStatsSync<MemoryAssessments, MemoryProfiles>,
>;

pub(super) fn approx_eq(left: f64, right: f64) -> bool {
    (left - right).abs() < 1e-9
}

pub(super) fn weighted(scores: CompetencyScores, weight_applied: f64) -> WeightedScores {
    WeightedScores {
        scores,
        weight_applied,
    }
}

pub(super) fn evaluator(id: &str, seniority: SeniorityTier) -> Evaluator {
    Evaluator {
        id: EvaluatorId(id.to_string()),
        seniority,
    }
}

pub(super) fn submission_for(profile_id: &ProfileId, scores: CompetencyScores) -> AssessmentSubmission {
    AssessmentSubmission {
        target_profile_id: profile_id.clone(),
        scores: RawCompetencyScores::from(scores),
    }
}

pub(super) fn new_profile(handle: &str) -> NewProfile {
    NewProfile {
        full_name: "Ada Lovelace".to_string(),
        linkedin_url: handle.to_string(),
        avatar_url: None,
    }
}

pub(super) fn stored_assessment(
    evaluator_id: &str,
    profile_id: &ProfileId,
    scores: CompetencyScores,
    weight_applied: f64,
) -> Assessment {
    Assessment {
        id: AssessmentId(format!("asm-{evaluator_id}")),
        evaluator_id: EvaluatorId(evaluator_id.to_string()),
        target_profile_id: profile_id.clone(),
        scores,
        weight_applied,
        created_at: Utc::now(),
    }
}

pub(super) fn build_service() -> (SyncedService, Arc<MemoryAssessments>, Arc<MemoryProfiles>) {
    let assessments = Arc::new(MemoryAssessments::default());
    let profiles = Arc::new(MemoryProfiles::default());
    let observer = Arc::new(ProfileStatsSync::new(assessments.clone(), profiles.clone()));
    let service = ReputationService::new(assessments.clone(), profiles.clone(), observer);
    (service, assessments, profiles)
}

/// Service plus one registered profile.
pub(super) fn service_with_profile() -> (SyncedService, Profile, Arc<MemoryAssessments>, Arc<MemoryProfiles>) {
    let (service, assessments, profiles) = build_service();
    let profile = service
        .register_profile(new_profile("ada-lovelace"))
        .expect("profile registers");
    (service, profile, assessments, profiles)
}

#[derive(Default, Clone)]
pub(super) struct MemoryAssessments {
    records: Arc<Mutex<HashMap<(EvaluatorId, ProfileId), Assessment>>>,
}

impl MemoryAssessments {
    pub(super) fn len(&self) -> usize {
        self.records.lock().expect("repository mutex poisoned").len()
    }
}

impl AssessmentRepository for MemoryAssessments {
    fn insert(&self, assessment: Assessment) -> Result<Assessment, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
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
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.contains_key(&(evaluator_id.clone(), profile_id.clone())))
    }

    fn for_profile(&self, profile_id: &ProfileId) -> Result<Vec<Assessment>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|assessment| &assessment.target_profile_id == profile_id)
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryProfiles {
    records: Arc<Mutex<HashMap<ProfileId, Profile>>>,
}

impl ProfileRepository for MemoryProfiles {
    fn insert(&self, profile: Profile) -> Result<Profile, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let key = profile.linkedin_url.to_lowercase();
        if guard
            .values()
            .any(|existing| existing.linkedin_url.to_lowercase() == key)
        {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(profile.id.clone(), profile.clone());
        Ok(profile)
    }

    fn fetch(&self, id: &ProfileId) -> Result<Option<Profile>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn find_by_url(&self, lookup_key: &str) -> Result<Option<Profile>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .find(|profile| profile.linkedin_url.to_lowercase() == lookup_key)
            .cloned())
    }

    fn update_stats(
        &self,
        id: &ProfileId,
        stats: ProfileStats,
    ) -> Result<Profile, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let profile = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        profile.apply_stats(stats);
        Ok(profile.clone())
    }

    fn top(&self, limit: usize) -> Result<Vec<Profile>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
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

/// Profile store that parks the first `update_stats` call until released, so a test
/// can land a second refresh in between.
pub(super) struct HeldProfiles {
    inner: MemoryProfiles,
    hold: Mutex<Option<(mpsc::Sender<()>, mpsc::Receiver<()>)>>,
}

impl HeldProfiles {
    pub(super) fn new(entered: mpsc::Sender<()>, release: mpsc::Receiver<()>) -> Self {
        Self {
            inner: MemoryProfiles::default(),
            hold: Mutex::new(Some((entered, release))),
        }
    }
}

impl ProfileRepository for HeldProfiles {
    fn insert(&self, profile: Profile) -> Result<Profile, RepositoryError> {
        self.inner.insert(profile)
    }

    fn fetch(&self, id: &ProfileId) -> Result<Option<Profile>, RepositoryError> {
        self.inner.fetch(id)
    }

    fn find_by_url(&self, lookup_key: &str) -> Result<Option<Profile>, RepositoryError> {
        self.inner.find_by_url(lookup_key)
    }

    fn update_stats(
        &self,
        id: &ProfileId,
        stats: ProfileStats,
    ) -> Result<Profile, RepositoryError> {
        let held = self.hold.lock().expect("hold mutex poisoned").take();
        if let Some((entered, release)) = held {
            entered.send(()).expect("test is waiting");
            release.recv().expect("test releases the refresh");
        }
        self.inner.update_stats(id, stats)
    }

    fn top(&self, limit: usize) -> Result<Vec<Profile>, RepositoryError> {
        self.inner.top(limit)
    }
}

/// Store whose uniqueness check only fires at insert time, like a racing writer.
pub(super) struct RacingAssessments;

impl AssessmentRepository for RacingAssessments {
    fn insert(&self, _assessment: Assessment) -> Result<Assessment, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn exists(
        &self,
        _evaluator_id: &EvaluatorId,
        _profile_id: &ProfileId,
    ) -> Result<bool, RepositoryError> {
        Ok(false)
    }

    fn for_profile(&self, _profile_id: &ProfileId) -> Result<Vec<Assessment>, RepositoryError> {
        Ok(Vec::new())
    }
}

pub(super) struct UnavailableAssessments;

impl AssessmentRepository for UnavailableAssessments {
    fn insert(&self, _assessment: Assessment) -> Result<Assessment, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn exists(
        &self,
        _evaluator_id: &EvaluatorId,
        _profile_id: &ProfileId,
    ) -> Result<bool, RepositoryError> {
        Ok(false)
    }

    fn for_profile(&self, _profile_id: &ProfileId) -> Result<Vec<Assessment>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

#[derive(Default)]
pub(super) struct FailingObserver {
    pub(super) calls: Mutex<usize>,
}

impl AssessmentObserver for FailingObserver {
    fn assessment_recorded(&self, _assessment: &Assessment) -> Result<(), ObserverError> {
        *self.calls.lock().expect("observer mutex poisoned") += 1;
        Err(ObserverError::Refresh(RepositoryError::Unavailable(
            "stats table locked".to_string(),
        )))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
