use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use ratedin::reputation::{
    reputation_router, AssessmentObserver, AssessmentRepository, ProfileRepository,
    ReputationService,
};
use serde_json::json;
use std::sync::atomic::Ordering;
use std::sync::Arc;

/// Reputation API plus liveness, readiness, and metrics endpoints.
pub(crate) fn with_reputation_routes<R, P, O>(service: Arc<ReputationService<R, P, O>>) -> Router
where
    R: AssessmentRepository + 'static,
    P: ProfileRepository + 'static,
    O: AssessmentObserver + 'static,
{
    reputation_router(service)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let (status, label) = if ready {
        (StatusCode::OK, "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "initializing")
    };

    (status, Json(json!({ "status": label })))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
