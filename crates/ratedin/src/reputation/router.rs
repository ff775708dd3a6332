use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{AssessmentSubmission, NewProfile, ProfileId, RawCompetencyScores};
use super::identity::AuthenticatedEvaluator;
use super::repository::{AssessmentObserver, AssessmentRepository, ProfileRepository};
use super::service::{ReputationService, ReputationServiceError};

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SeniorityFilter {
    #[serde(default)]
    pub(crate) senior_only: bool,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct LeaderboardQuery {
    #[serde(default)]
    pub(crate) limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LookupQuery {
    pub(crate) url: String,
}

/// Router builder exposing profile, assessment, and aggregation endpoints.
pub fn reputation_router<R, P, O>(service: Arc<ReputationService<R, P, O>>) -> Router
where
    R: AssessmentRepository + 'static,
    P: ProfileRepository + 'static,
    O: AssessmentObserver + 'static,
{
    Router::new()
        .route(
            "/api/v1/profiles",
            post(register_handler::<R, P, O>).get(leaderboard_handler::<R, P, O>),
        )
        .route("/api/v1/lookup", get(lookup_handler::<R, P, O>))
        .route(
            "/api/v1/profiles/:profile_id",
            get(report_handler::<R, P, O>),
        )
        .route(
            "/api/v1/profiles/:profile_id/radar",
            get(radar_handler::<R, P, O>),
        )
        .route(
            "/api/v1/profiles/:profile_id/assessments",
            post(submit_handler::<R, P, O>),
        )
        .with_state(service)
}

fn failure_response(error: ReputationServiceError) -> Response {
    let status = match &error {
        ReputationServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ReputationServiceError::DuplicateAssessment { .. }
        | ReputationServiceError::ProfileExists(_) => StatusCode::CONFLICT,
        ReputationServiceError::ProfileNotFound(_) => StatusCode::NOT_FOUND,
        ReputationServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn submit_handler<R, P, O>(
    State(service): State<Arc<ReputationService<R, P, O>>>,
    Path(profile_id): Path<String>,
    AuthenticatedEvaluator(evaluator): AuthenticatedEvaluator,
    axum::Json(scores): axum::Json<RawCompetencyScores>,
) -> Response
where
    R: AssessmentRepository + 'static,
    P: ProfileRepository + 'static,
    O: AssessmentObserver + 'static,
{
    let submission = AssessmentSubmission {
        target_profile_id: ProfileId(profile_id),
        scores,
    };

    match service.submit(&evaluator, submission) {
        Ok(assessment) => (StatusCode::CREATED, axum::Json(assessment)).into_response(),
        Err(error) => failure_response(error),
    }
}

pub(crate) async fn report_handler<R, P, O>(
    State(service): State<Arc<ReputationService<R, P, O>>>,
    Path(profile_id): Path<String>,
    Query(filter): Query<SeniorityFilter>,
    viewer: Option<AuthenticatedEvaluator>,
) -> Response
where
    R: AssessmentRepository + 'static,
    P: ProfileRepository + 'static,
    O: AssessmentObserver + 'static,
{
    let id = ProfileId(profile_id);
    let viewer_id = viewer.as_ref().map(|viewer| &viewer.0.id);

    match service.report(&id, viewer_id, filter.senior_only) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error) => failure_response(error),
    }
}

pub(crate) async fn radar_handler<R, P, O>(
    State(service): State<Arc<ReputationService<R, P, O>>>,
    Path(profile_id): Path<String>,
    Query(filter): Query<SeniorityFilter>,
) -> Response
where
    R: AssessmentRepository + 'static,
    P: ProfileRepository + 'static,
    O: AssessmentObserver + 'static,
{
    let id = ProfileId(profile_id);
    match service.radar(&id, filter.senior_only) {
        Ok(points) => (StatusCode::OK, axum::Json(points)).into_response(),
        Err(error) => failure_response(error),
    }
}

pub(crate) async fn register_handler<R, P, O>(
    State(service): State<Arc<ReputationService<R, P, O>>>,
    axum::Json(request): axum::Json<NewProfile>,
) -> Response
where
    R: AssessmentRepository + 'static,
    P: ProfileRepository + 'static,
    O: AssessmentObserver + 'static,
{
    match service.register_profile(request) {
        Ok(profile) => (StatusCode::CREATED, axum::Json(profile.summary_view())).into_response(),
        Err(error) => failure_response(error),
    }
}

pub(crate) async fn leaderboard_handler<R, P, O>(
    State(service): State<Arc<ReputationService<R, P, O>>>,
    Query(query): Query<LeaderboardQuery>,
) -> Response
where
    R: AssessmentRepository + 'static,
    P: ProfileRepository + 'static,
    O: AssessmentObserver + 'static,
{
    match service.leaderboard(query.limit) {
        Ok(profiles) => {
            let views: Vec<_> = profiles.iter().map(|profile| profile.summary_view()).collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(error) => failure_response(error),
    }
}

pub(crate) async fn lookup_handler<R, P, O>(
    State(service): State<Arc<ReputationService<R, P, O>>>,
    Query(query): Query<LookupQuery>,
) -> Response
where
    R: AssessmentRepository + 'static,
    P: ProfileRepository + 'static,
    O: AssessmentObserver + 'static,
{
    match service.find_by_url(&query.url) {
        Ok(Some(profile)) => (StatusCode::OK, axum::Json(profile.summary_view())).into_response(),
        Ok(None) => {
            let payload = json!({
                "error": "profile not found",
                "url": query.url,
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(error) => failure_response(error),
    }
}
