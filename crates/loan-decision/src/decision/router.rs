use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;

use super::domain::ApplicantSubmission;
use super::policy::{DecisionCategory, DecisionKind, DecisionOutcome, DecisionReason};
use super::service::LoanDecisionService;
use super::DecisionError;

/// Response payload for a single evaluation.
#[derive(Debug, Clone, Serialize)]
pub struct DecisionView {
    pub decision: DecisionKind,
    pub category: DecisionCategory,
    pub headline: &'static str,
    pub reason: DecisionReason,
    pub reason_text: &'static str,
    pub confidence: Option<f64>,
    pub confidence_display: String,
    pub summary: String,
    pub evaluated_at: DateTime<Utc>,
}

impl DecisionView {
    pub fn from_outcome(outcome: &DecisionOutcome, evaluated_at: DateTime<Utc>) -> Self {
        let category = outcome.category();
        Self {
            decision: outcome.kind,
            category,
            headline: category.headline(),
            reason: outcome.reason,
            reason_text: outcome.reason.describe(),
            confidence: outcome.confidence,
            confidence_display: outcome.confidence_display(),
            summary: outcome.summary(),
            evaluated_at,
        }
    }
}

/// Router builder exposing HTTP endpoints for loan evaluation.
pub fn decision_router(service: Arc<LoanDecisionService>) -> Router {
    Router::new()
        .route("/api/v1/loan/evaluate", post(evaluate_handler))
        .route("/api/v1/loan/schema", get(schema_handler))
        .with_state(service)
}

pub(crate) async fn evaluate_handler(
    State(service): State<Arc<LoanDecisionService>>,
    payload: Result<axum::Json<ApplicantSubmission>, JsonRejection>,
) -> Response {
    let submission = match payload {
        Ok(axum::Json(submission)) => submission,
        Err(rejection) => {
            let payload = json!({
                "error": rejection.body_text(),
            });
            return (rejection.status(), axum::Json(payload)).into_response();
        }
    };

    match service.evaluate(&submission) {
        Ok(outcome) => {
            let view = DecisionView::from_outcome(&outcome, Utc::now());
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(err) => {
            let status = match err {
                DecisionError::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
                DecisionError::SchemaMismatch(_) => StatusCode::CONFLICT,
                DecisionError::ClassifierInvocation(_) => StatusCode::BAD_GATEWAY,
            };
            let payload = json!({
                "error": err.to_string(),
            });
            (status, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn schema_handler(State(service): State<Arc<LoanDecisionService>>) -> Response {
    let schema = service.schema();
    let payload = json!({
        "version": schema.version(),
        "features": schema.features(),
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}
