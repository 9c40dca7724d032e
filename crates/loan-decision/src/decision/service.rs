use std::sync::Arc;

use tracing::{info, warn};

use super::domain::ApplicantSubmission;
use super::features::FeatureSchema;
use super::policy::DecisionOutcome;
use super::validation::ProfileGuard;
use super::{DecisionContext, DecisionEngine, DecisionError};

/// Service composing the profile guard, decision engine, and loaded artifacts.
pub struct LoanDecisionService {
    guard: ProfileGuard,
    engine: DecisionEngine,
    context: Arc<DecisionContext>,
}

impl LoanDecisionService {
    pub fn new(guard: ProfileGuard, engine: DecisionEngine, context: Arc<DecisionContext>) -> Self {
        Self {
            guard,
            engine,
            context,
        }
    }

    /// Service with default bounds, thresholds, and lenient schema handling.
    pub fn with_context(context: Arc<DecisionContext>) -> Self {
        Self::new(ProfileGuard::default(), DecisionEngine::default(), context)
    }

    pub fn engine(&self) -> &DecisionEngine {
        &self.engine
    }

    pub fn schema(&self) -> &FeatureSchema {
        self.context.schema()
    }

    /// Validate an inbound submission and run it through the cascade.
    pub fn evaluate(
        &self,
        submission: &ApplicantSubmission,
    ) -> Result<DecisionOutcome, DecisionError> {
        let profile = match self.guard.profile_from_submission(submission) {
            Ok(profile) => profile,
            Err(err) => {
                warn!(error = %err, "rejected applicant submission");
                return Err(err.into());
            }
        };

        match self.engine.evaluate(&profile, &self.context) {
            Ok(outcome) => {
                info!(
                    decision = outcome.kind.label(),
                    reason = outcome.reason.describe(),
                    confidence = %outcome.confidence_display(),
                    "loan application evaluated"
                );
                Ok(outcome)
            }
            Err(err) => {
                warn!(error = %err, "loan evaluation failed");
                Err(err)
            }
        }
    }
}
