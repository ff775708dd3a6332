use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::warn;

use super::domain::{Evaluator, EvaluatorId, SeniorityTier};

/// Header carrying the authenticated evaluator id, set by the identity provider.
pub const EVALUATOR_ID_HEADER: &str = "x-evaluator-id";
/// Header carrying the evaluator's current seniority label.
pub const EVALUATOR_SENIORITY_HEADER: &str = "x-evaluator-seniority";

/// Evaluator resolved from identity headers.
///
/// A missing or unrecognized seniority resolves to the default tier (`Mid`), whose weight
/// equals the fallback weight for unknown labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedEvaluator(pub Evaluator);

pub(crate) fn evaluator_from_parts(parts: &Parts) -> Option<Evaluator> {
    let id = parts
        .headers
        .get(EVALUATOR_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())?;

    let label = parts
        .headers
        .get(EVALUATOR_SENIORITY_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    let seniority = match SeniorityTier::parse(label) {
        Some(tier) => tier,
        None => {
            warn!(evaluator = id, label, "unrecognized seniority, using default tier");
            SeniorityTier::default()
        }
    };

    Some(Evaluator {
        id: EvaluatorId(id.to_string()),
        seniority,
    })
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedEvaluator
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match evaluator_from_parts(parts) {
            Some(evaluator) => Ok(Self(evaluator)),
            None => {
                let payload = json!({
                    "error": "missing evaluator identity",
                });
                Err((StatusCode::UNAUTHORIZED, axum::Json(payload)).into_response())
            }
        }
    }
}
