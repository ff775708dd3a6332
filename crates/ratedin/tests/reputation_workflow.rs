//! Integration tests for assessment intake and reputation aggregation.
//!
//! Scenarios go through the public service facade and HTTP router only, so intake
//! validation, duplicate handling, and aggregation are checked without private modules.

mod common {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use ratedin::reputation::{
        Assessment, AssessmentRepository, AssessmentSubmission, CompetencyScores, Evaluator,
        EvaluatorId, NewProfile, Profile, ProfileId, ProfileRepository, ProfileStats,
        ProfileStatsSync, RawCompetencyScores, RepositoryError, ReputationService, SeniorityTier,
    };

    #[derive(Default, Clone)]
    pub(super) struct Assessments {
        records: Arc<Mutex<HashMap<(EvaluatorId, ProfileId), Assessment>>>,
    }

    impl AssessmentRepository for Assessments {
        fn insert(&self, assessment: Assessment) -> Result<Assessment, RepositoryError> {
            let mut guard = self.records.lock().expect("lock");
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
            let guard = self.records.lock().expect("lock");
            Ok(guard.contains_key(&(evaluator_id.clone(), profile_id.clone())))
        }

        fn for_profile(&self, profile_id: &ProfileId) -> Result<Vec<Assessment>, RepositoryError> {
            let guard = self.records.lock().expect("lock");
            Ok(guard
                .values()
                .filter(|assessment| &assessment.target_profile_id == profile_id)
                .cloned()
                .collect())
        }
    }

    #[derive(Default, Clone)]
    pub(super) struct Profiles {
        records: Arc<Mutex<HashMap<ProfileId, Profile>>>,
    }

    impl ProfileRepository for Profiles {
        fn insert(&self, profile: Profile) -> Result<Profile, RepositoryError> {
            let mut guard = self.records.lock().expect("lock");
            guard.insert(profile.id.clone(), profile.clone());
            Ok(profile)
        }

        fn fetch(&self, id: &ProfileId) -> Result<Option<Profile>, RepositoryError> {
            Ok(self.records.lock().expect("lock").get(id).cloned())
        }

        fn find_by_url(&self, lookup_key: &str) -> Result<Option<Profile>, RepositoryError> {
            let guard = self.records.lock().expect("lock");
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
            let mut guard = self.records.lock().expect("lock");
            let profile = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
            profile.apply_stats(stats);
            Ok(profile.clone())
        }

        fn top(&self, limit: usize) -> Result<Vec<Profile>, RepositoryError> {
            let guard = self.records.lock().expect("lock");
            let mut profiles: Vec<Profile> = guard.values().cloned().collect();
            profiles.sort_by(|a, b| b.average_score.total_cmp(&a.average_score));
            profiles.truncate(limit);
            Ok(profiles)
        }
    }

    pub(super) type Service = ReputationService<Assessments, Profiles, ProfileStatsSync<Assessments, Profiles>>;

    pub(super) fn build_service() -> (Service, Arc<Profiles>) {
        let assessments = Arc::new(Assessments::default());
        let profiles = Arc::new(Profiles::default());
        let sync = Arc::new(ProfileStatsSync::new(assessments.clone(), profiles.clone()));
        (
            ReputationService::new(assessments, profiles.clone(), sync),
            profiles,
        )
    }

    pub(super) fn register(service: &Service, name: &str, handle: &str) -> Profile {
        service
            .register_profile(NewProfile {
                full_name: name.to_string(),
                linkedin_url: handle.to_string(),
                avatar_url: None,
            })
            .expect("profile registers")
    }

    pub(super) fn evaluator(id: &str, seniority: SeniorityTier) -> Evaluator {
        Evaluator {
            id: EvaluatorId(id.to_string()),
            seniority,
        }
    }

    pub(super) fn submission(profile: &Profile, scores: CompetencyScores) -> AssessmentSubmission {
        AssessmentSubmission {
            target_profile_id: profile.id.clone(),
            scores: RawCompetencyScores::from(scores),
        }
    }
}

mod intake {
    use super::common::*;
    use ratedin::reputation::{
        CompetencyScores, ProfileRepository, ReputationServiceError, SeniorityTier,
        ValidationError,
    };

    #[test]
    fn a_panel_of_evaluators_produces_a_weighted_reputation() {
        let (service, profiles) = build_service();
        let profile = register(&service, "Linus Torvalds", "torvalds");

        let panel = [
            ("junior", SeniorityTier::Junior, 2),
            ("mid", SeniorityTier::Mid, 3),
            ("senior", SeniorityTier::Senior, 4),
            ("lead", SeniorityTier::Lead, 5),
        ];
        for (id, tier, score) in panel {
            service
                .submit(&evaluator(id, tier), submission(&profile, CompetencyScores::uniform(score)))
                .expect("accepted");
        }

        let expected = (2.0 * 0.8 + 3.0 * 1.0 + 4.0 * 1.2 + 5.0 * 1.5) / (0.8 + 1.0 + 1.2 + 1.5);
        let overall = service.overall_score(&profile.id).expect("score");
        assert!((overall - expected).abs() < 1e-9);

        let cached = profiles.fetch(&profile.id).expect("fetch").expect("present");
        assert_eq!(cached.total_assessments, 4);
        assert!((cached.average_score - expected).abs() < 1e-9);

        let seniors = service.radar(&profile.id, true).expect("radar");
        let senior_expected = (4.0 * 1.2 + 5.0 * 1.5) / (1.2 + 1.5);
        assert!(seniors
            .iter()
            .all(|point| (point.value - senior_expected).abs() < 1e-9));
    }

    #[test]
    fn duplicate_and_invalid_submissions_leave_state_untouched() {
        let (service, profiles) = build_service();
        let profile = register(&service, "Barbara Liskov", "liskov");
        let staff = evaluator("staff", SeniorityTier::Staff);

        service
            .submit(&staff, submission(&profile, CompetencyScores::uniform(5)))
            .expect("accepted");

        assert!(matches!(
            service.submit(&staff, submission(&profile, CompetencyScores::uniform(1))),
            Err(ReputationServiceError::DuplicateAssessment { .. })
        ));

        let mut bad = submission(&profile, CompetencyScores::uniform(3));
        bad.scores.communication = Some(6);
        assert!(matches!(
            service.submit(&evaluator("other", SeniorityTier::Mid), bad),
            Err(ReputationServiceError::Validation(
                ValidationError::ScoreOutOfRange { value: 6, .. }
            ))
        ));

        let cached = profiles.fetch(&profile.id).expect("fetch").expect("present");
        assert_eq!(cached.total_assessments, 1);
        assert_eq!(cached.average_score, 5.0);
    }
}

mod routing {
    use super::common::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use ratedin::reputation::{
        reputation_router, CompetencyScores, EVALUATOR_ID_HEADER, EVALUATOR_SENIORITY_HEADER,
    };
    use std::sync::Arc;
    use tower::ServiceExt;

    #[tokio::test]
    async fn submitted_assessments_show_up_in_the_radar() {
        let (service, _) = build_service();
        let profile = register(&service, "Margaret Hamilton", "mhamilton");
        let router = reputation_router(Arc::new(service));

        let response = router
            .clone()
            .oneshot(
                Request::post(format!("/api/v1/profiles/{}/assessments", profile.id))
                    .header(header::CONTENT_TYPE, "application/json")
                    .header(EVALUATOR_ID_HEADER, "eval-1")
                    .header(EVALUATOR_SENIORITY_HEADER, "Senior")
                    .body(Body::from(
                        serde_json::to_vec(&CompetencyScores::uniform(5)).expect("serializes"),
                    ))
                    .expect("request builds"),
            )
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::CREATED);

        let radar = router
            .oneshot(
                Request::get(format!("/api/v1/profiles/{}/radar?senior_only=true", profile.id))
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("route executes");
        assert_eq!(radar.status(), StatusCode::OK);

        let body = axum::body::to_bytes(radar.into_body(), 64 * 1024)
            .await
            .expect("read body");
        let points: serde_json::Value = serde_json::from_slice(&body).expect("json payload");
        let points = points.as_array().expect("array");
        assert_eq!(points.len(), 6);
        assert!(points.iter().all(|point| point["value"] == serde_json::json!(5.0)));
    }
}
