use serde::{Deserialize, Serialize};

/// Which rule produced the decision; five kinds collapse into four display categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionKind {
    HardReject,
    ModelReject,
    ManualReview,
    PolicyReview,
    Approved,
}

impl DecisionKind {
    pub fn category(&self) -> DecisionCategory {
        match self {
            DecisionKind::HardReject => DecisionCategory::HardRejection,
            DecisionKind::ModelReject => DecisionCategory::ModelRejection,
            DecisionKind::ManualReview | DecisionKind::PolicyReview => {
                DecisionCategory::ManualReview
            }
            DecisionKind::Approved => DecisionCategory::Approval,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DecisionKind::HardReject => "hard_reject",
            DecisionKind::ModelReject => "model_reject",
            DecisionKind::ManualReview => "manual_review",
            DecisionKind::PolicyReview => "policy_review",
            DecisionKind::Approved => "approved",
        }
    }
}

/// Outcome categories shown to the applicant-facing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionCategory {
    HardRejection,
    ModelRejection,
    ManualReview,
    Approval,
}

impl DecisionCategory {
    pub fn headline(&self) -> &'static str {
        match self {
            DecisionCategory::HardRejection | DecisionCategory::ModelRejection => "Loan Rejected",
            DecisionCategory::ManualReview => "Manual Review Required",
            DecisionCategory::Approval => "Loan Approved",
        }
    }
}

/// Rationale attached to each decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionReason {
    VeryLowCreditScore,
    ExtremeLoanBurden,
    LowModelConfidence,
    BorderlineModelConfidence,
    HighLoanBurden,
    MeetsApprovalCriteria,
    ModelPredictsRejection,
}

impl DecisionReason {
    pub fn describe(&self) -> &'static str {
        match self {
            DecisionReason::VeryLowCreditScore => "very low credit score",
            DecisionReason::ExtremeLoanBurden => "extreme loan burden relative to income",
            DecisionReason::LowModelConfidence => "low model confidence indicates high risk",
            DecisionReason::BorderlineModelConfidence => "borderline model confidence",
            DecisionReason::HighLoanBurden => "high loan burden flagged by policy",
            DecisionReason::MeetsApprovalCriteria => "meets approval criteria",
            DecisionReason::ModelPredictsRejection => "model predicts rejection",
        }
    }
}

/// Sole output of an evaluation.
///
/// `confidence` is `None` for hard rejections because the classifier is never
/// consulted on those paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionOutcome {
    pub kind: DecisionKind,
    pub reason: DecisionReason,
    pub confidence: Option<f64>,
}

impl DecisionOutcome {
    pub(crate) fn hard_reject(reason: DecisionReason) -> Self {
        Self {
            kind: DecisionKind::HardReject,
            reason,
            confidence: None,
        }
    }

    pub(crate) fn scored(kind: DecisionKind, reason: DecisionReason, confidence: f64) -> Self {
        Self {
            kind,
            reason,
            confidence: Some(confidence),
        }
    }

    pub fn category(&self) -> DecisionCategory {
        self.kind.category()
    }

    /// Confidence rounded to two decimals, or "n/a" when the model was bypassed.
    pub fn confidence_display(&self) -> String {
        match self.confidence {
            Some(confidence) => format!("{confidence:.2}"),
            None => "n/a".to_string(),
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "{}: {} (model confidence {})",
            self.category().headline(),
            self.reason.describe(),
            self.confidence_display()
        )
    }
}
