use serde::{Deserialize, Serialize};

pub const DEFAULT_CREDIT_FLOOR: u16 = 450;
pub const DEFAULT_LOW_CONFIDENCE: f64 = 0.6;
pub const DEFAULT_HIGH_CONFIDENCE: f64 = 0.8;
pub const DEFAULT_EXTREME_LEVERAGE_RATIO: f64 = 5.0;
pub const DEFAULT_POLICY_LEVERAGE_RATIO: f64 = 1.2;

/// Policy dials consulted by the rule cascade.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionThresholds {
    /// Credit scores strictly below this value are rejected outright.
    pub credit_floor: u16,
    /// Confidence strictly below this value is treated as high risk.
    pub low_confidence: f64,
    /// Confidence strictly below this value (and at or above `low_confidence`) needs review.
    pub high_confidence: f64,
    /// Loan-to-income multiple above which the application is rejected without scoring.
    pub extreme_leverage_ratio: f64,
    /// Loan-to-income multiple above which a confident approval is still reviewed.
    pub policy_leverage_ratio: f64,
}

impl Default for DecisionThresholds {
    fn default() -> Self {
        Self {
            credit_floor: DEFAULT_CREDIT_FLOOR,
            low_confidence: DEFAULT_LOW_CONFIDENCE,
            high_confidence: DEFAULT_HIGH_CONFIDENCE,
            extreme_leverage_ratio: DEFAULT_EXTREME_LEVERAGE_RATIO,
            policy_leverage_ratio: DEFAULT_POLICY_LEVERAGE_RATIO,
        }
    }
}

impl DecisionThresholds {
    /// Returns a description of the first inconsistency, if any.
    pub fn inconsistency(&self) -> Option<String> {
        let confidences = [
            ("low_confidence", self.low_confidence),
            ("high_confidence", self.high_confidence),
        ];
        for (name, value) in confidences {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Some(format!("{name} must lie within [0, 1], found {value}"));
            }
        }

        let ratios = [
            ("extreme_leverage_ratio", self.extreme_leverage_ratio),
            ("policy_leverage_ratio", self.policy_leverage_ratio),
        ];
        for (name, value) in ratios {
            if !value.is_finite() || value <= 0.0 {
                return Some(format!("{name} must be a positive number, found {value}"));
            }
        }

        if self.low_confidence > self.high_confidence {
            return Some(format!(
                "low_confidence {:.2} exceeds high_confidence {:.2}",
                self.low_confidence, self.high_confidence
            ));
        }

        if self.policy_leverage_ratio > self.extreme_leverage_ratio {
            return Some(format!(
                "policy_leverage_ratio {:.2} exceeds extreme_leverage_ratio {:.2}",
                self.policy_leverage_ratio, self.extreme_leverage_ratio
            ));
        }

        None
    }

    /// Fails with the first inconsistency found.
    pub fn validate(&self) -> Result<(), InvalidThresholds> {
        match self.inconsistency() {
            Some(detail) => Err(InvalidThresholds(detail)),
            None => Ok(()),
        }
    }
}

/// Thresholds that would make the cascade misfire (NaN, out of range, or inverted).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("decision thresholds are inconsistent: {0}")]
pub struct InvalidThresholds(pub String);

/// Inclusive input bounds enforced when a submission becomes a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileBounds {
    pub min_loan_term_months: u16,
    pub max_loan_term_months: u16,
    pub min_credit_score: u16,
    pub max_credit_score: u16,
}

impl Default for ProfileBounds {
    fn default() -> Self {
        Self {
            min_loan_term_months: 12,
            max_loan_term_months: 360,
            min_credit_score: 300,
            max_credit_score: 900,
        }
    }
}

/// How feature reconciliation treats names the schema and the adapter disagree on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaMode {
    /// Zero-fill missing schema features and drop unknown ones.
    #[default]
    Lenient,
    /// Refuse to score when the produced features and the schema differ.
    Strict,
}
