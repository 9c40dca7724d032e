use serde::{Deserialize, Serialize};

use super::features::FeatureVector;

pub const REJECT_CLASS: usize = 0;
pub const APPROVE_CLASS: usize = 1;
pub const EXPECTED_CLASS_COUNT: usize = 2;
pub const PROBABILITY_SUM_TOLERANCE: f64 = 1e-6;

/// Pre-trained binary classifier consulted by the decision engine.
///
/// Implementations are loaded once and shared read-only across evaluations.
pub trait Classifier: Send + Sync {
    /// Class probabilities indexed by class label (0 = reject, 1 = approve).
    fn predict_probabilities(&self, features: &FeatureVector) -> Result<Vec<f64>, ClassifierError>;

    fn name(&self) -> &str {
        "classifier"
    }
}

/// Failures while obtaining or validating a probability distribution.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClassifierError {
    #[error("classifier unavailable: {0}")]
    Unavailable(String),
    #[error("expected {expected} class probabilities, received {found}")]
    WrongLength { expected: usize, found: usize },
    #[error("probability for class {class} is invalid ({value})")]
    InvalidProbability { class: usize, value: f64 },
    #[error("probabilities sum to {sum}, expected 1")]
    NotNormalized { sum: f64 },
}

/// Prediction derived from a validated probability distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierOutput {
    pub prediction: usize,
    pub confidence: f64,
    pub probabilities: Vec<f64>,
}

impl ClassifierOutput {
    /// Validate the distribution, then take argmax (lowest index wins ties) and max.
    pub fn from_probabilities(probabilities: Vec<f64>) -> Result<Self, ClassifierError> {
        if probabilities.len() != EXPECTED_CLASS_COUNT {
            return Err(ClassifierError::WrongLength {
                expected: EXPECTED_CLASS_COUNT,
                found: probabilities.len(),
            });
        }

        for (class, value) in probabilities.iter().enumerate() {
            if !value.is_finite() || *value < 0.0 {
                return Err(ClassifierError::InvalidProbability {
                    class,
                    value: *value,
                });
            }
        }

        let sum: f64 = probabilities.iter().sum();
        if (sum - 1.0).abs() > PROBABILITY_SUM_TOLERANCE {
            return Err(ClassifierError::NotNormalized { sum });
        }

        let mut prediction = 0;
        let mut confidence = probabilities[0];
        for (class, value) in probabilities.iter().enumerate().skip(1) {
            if *value > confidence {
                prediction = class;
                confidence = *value;
            }
        }

        Ok(Self {
            prediction,
            confidence,
            probabilities,
        })
    }

    pub fn predicts_approval(&self) -> bool {
        self.prediction == APPROVE_CLASS
    }
}
