use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::decision::classifier::{Classifier, ClassifierError};
use crate::decision::domain::{
    ApplicantProfile, ApplicantSubmission, EducationLevel, EmploymentType,
};
use crate::decision::features::{FeatureSchema, FeatureVector};
use crate::decision::{DecisionContext, DecisionEngine, LoanDecisionService};

/// Classifier double returning fixed probabilities and counting invocations.
pub(super) struct StubClassifier {
    probabilities: Vec<f64>,
    calls: AtomicUsize,
}

impl StubClassifier {
    pub(super) fn new(probabilities: &[f64]) -> Self {
        Self {
            probabilities: probabilities.to_vec(),
            calls: AtomicUsize::new(0),
        }
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Classifier for StubClassifier {
    fn predict_probabilities(&self, _features: &FeatureVector) -> Result<Vec<f64>, ClassifierError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.probabilities.clone())
    }

    fn name(&self) -> &str {
        "stub"
    }
}

/// Classifier double whose backend is always down.
pub(super) struct OfflineClassifier;

impl Classifier for OfflineClassifier {
    fn predict_probabilities(&self, _features: &FeatureVector) -> Result<Vec<f64>, ClassifierError> {
        Err(ClassifierError::Unavailable("model server offline".to_string()))
    }
}

pub(super) fn profile(income: f64, loan_amount: f64, credit_score: u16) -> ApplicantProfile {
    ApplicantProfile::from_parts(
        income,
        loan_amount,
        180,
        credit_score,
        2,
        EducationLevel::Graduate,
        EmploymentType::NotSelfEmployed,
    )
}

pub(super) fn submission() -> ApplicantSubmission {
    ApplicantSubmission {
        income_annum: 600_000.0,
        loan_amount: 500_000.0,
        loan_term_months: 180,
        credit_score: 700,
        dependents: 1,
        education: "Graduate".to_string(),
        employment: "No".to_string(),
    }
}

/// Training-time schema with one column the form never fills.
pub(super) fn schema() -> FeatureSchema {
    FeatureSchema::new(
        [
            "no_of_dependents",
            "income_annum",
            "loan_amount",
            "loan_term",
            "cibil_score",
            "residential_assets_value",
            "education_Not_Graduate",
            "self_employed_Yes",
        ]
        .iter()
        .map(|name| name.to_string())
        .collect(),
    )
    .expect("valid schema")
}

pub(super) fn engine() -> DecisionEngine {
    DecisionEngine::default()
}

pub(super) fn context(classifier: Arc<dyn Classifier>) -> DecisionContext {
    DecisionContext::new(classifier, schema())
}

pub(super) fn service(probabilities: &[f64]) -> Arc<LoanDecisionService> {
    let classifier = Arc::new(StubClassifier::new(probabilities));
    let context = Arc::new(context(classifier));
    Arc::new(LoanDecisionService::with_context(context))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 4096)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
