use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use super::common::*;
use crate::decision::router::{decision_router, evaluate_handler};

#[tokio::test]
async fn evaluate_handler_returns_decision_view() {
    let response =
        evaluate_handler(State(service(&[0.3, 0.7])), Ok(axum::Json(submission()))).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["decision"], "manual_review");
    assert_eq!(body["category"], "manual_review");
    assert_eq!(body["reason_text"], "borderline model confidence");
    assert_eq!(body["confidence_display"], "0.70");
    assert!(body["evaluated_at"].is_string());
}

#[tokio::test]
async fn hard_rejection_serializes_null_confidence() {
    let mut submission = submission();
    submission.credit_score = 410;

    let response =
        evaluate_handler(State(service(&[0.1, 0.9])), Ok(axum::Json(submission))).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["decision"], "hard_reject");
    assert_eq!(body["category"], "hard_rejection");
    assert!(body["confidence"].is_null());
    assert_eq!(body["confidence_display"], "n/a");
}

#[tokio::test]
async fn evaluate_handler_returns_unprocessable_for_invalid_input() {
    let mut submission = submission();
    submission.credit_score = 950;

    let response =
        evaluate_handler(State(service(&[0.1, 0.9])), Ok(axum::Json(submission))).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json_body(response).await;
    assert!(body["error"]
        .as_str()
        .expect("error message")
        .contains("credit_score"));
}

#[tokio::test]
async fn evaluate_handler_returns_bad_gateway_for_malformed_model_output() {
    let response =
        evaluate_handler(State(service(&[0.6])), Ok(axum::Json(submission()))).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn router_serves_evaluation_and_schema() {
    let app = decision_router(service(&[0.1, 0.9]));

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/loan/evaluate")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "income_annum": 600000.0,
                "loan_amount": 800000.0,
                "loan_term_months": 240,
                "credit_score": 700,
                "dependents": 0,
                "education": "Not Graduate",
                "employment": "Yes"
            })
            .to_string(),
        ))
        .expect("request builds");
    let response = app.clone().oneshot(request).await.expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["decision"], "policy_review");
    assert_eq!(body["headline"], "Manual Review Required");

    let request = Request::builder()
        .uri("/api/v1/loan/schema")
        .body(Body::empty())
        .expect("request builds");
    let response = app.oneshot(request).await.expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["features"].as_array().map(Vec::len), Some(8));
}

#[tokio::test]
async fn malformed_bodies_get_the_json_error_shape() {
    let app = decision_router(service(&[0.1, 0.9]));
    let bodies = [
        json!({
            "income_annum": 600000.0,
            "loan_amount": 500000.0,
            "loan_term_months": 180,
            "credit_score": 700.5,
            "dependents": 1,
            "education": "Graduate",
            "employment": "No"
        }),
        json!({
            "income_annum": 600000.0,
            "loan_amount": 500000.0,
            "credit_score": 700,
            "dependents": 1,
            "education": "Graduate",
            "employment": "No"
        }),
    ];

    for body in bodies {
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/loan/evaluate")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request builds");
        let response = app.clone().oneshot(request).await.expect("router responds");

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let payload = read_json_body(response).await;
        assert!(
            payload["error"].as_str().is_some_and(|text| !text.is_empty()),
            "expected a JSON error, got {payload}"
        );
    }
}
