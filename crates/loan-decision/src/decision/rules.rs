use super::classifier::ClassifierOutput;
use super::config::DecisionThresholds;
use super::domain::ApplicantProfile;
use super::policy::{DecisionKind, DecisionOutcome, DecisionReason};

/// A single predicate in the decision cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecisionRule {
    CreditFloor,
    LeverageCeiling,
    LowConfidence,
    BorderlineConfidence,
    PolicyLeverage,
}

/// Rules in evaluation order. The first match wins; when none matches the
/// model's own prediction decides (see [`final_decision`]).
pub const CASCADE: [DecisionRule; 5] = [
    DecisionRule::CreditFloor,
    DecisionRule::LeverageCeiling,
    DecisionRule::LowConfidence,
    DecisionRule::BorderlineConfidence,
    DecisionRule::PolicyLeverage,
];

impl DecisionRule {
    pub fn name(&self) -> &'static str {
        match self {
            DecisionRule::CreditFloor => "credit_floor",
            DecisionRule::LeverageCeiling => "leverage_ceiling",
            DecisionRule::LowConfidence => "low_confidence",
            DecisionRule::BorderlineConfidence => "borderline_confidence",
            DecisionRule::PolicyLeverage => "policy_leverage",
        }
    }

    /// Business rules run before the classifier is consulted.
    pub fn requires_model(&self) -> bool {
        !matches!(self, DecisionRule::CreditFloor | DecisionRule::LeverageCeiling)
    }

    /// Evaluate the rule. Model-dependent rules never match without `model`.
    pub fn apply(
        &self,
        profile: &ApplicantProfile,
        thresholds: &DecisionThresholds,
        model: Option<&ClassifierOutput>,
    ) -> Option<DecisionOutcome> {
        match self {
            DecisionRule::CreditFloor => (profile.credit_score() < thresholds.credit_floor)
                .then(|| DecisionOutcome::hard_reject(DecisionReason::VeryLowCreditScore)),
            DecisionRule::LeverageCeiling => profile
                .loan_exceeds_income_multiple(thresholds.extreme_leverage_ratio)
                .then(|| DecisionOutcome::hard_reject(DecisionReason::ExtremeLoanBurden)),
            DecisionRule::LowConfidence => {
                let confidence = model?.confidence;
                (confidence < thresholds.low_confidence).then(|| {
                    DecisionOutcome::scored(
                        DecisionKind::ModelReject,
                        DecisionReason::LowModelConfidence,
                        confidence,
                    )
                })
            }
            DecisionRule::BorderlineConfidence => {
                let confidence = model?.confidence;
                (confidence < thresholds.high_confidence).then(|| {
                    DecisionOutcome::scored(
                        DecisionKind::ManualReview,
                        DecisionReason::BorderlineModelConfidence,
                        confidence,
                    )
                })
            }
            DecisionRule::PolicyLeverage => {
                let confidence = model?.confidence;
                profile
                    .loan_exceeds_income_multiple(thresholds.policy_leverage_ratio)
                    .then(|| {
                        DecisionOutcome::scored(
                            DecisionKind::PolicyReview,
                            DecisionReason::HighLoanBurden,
                            confidence,
                        )
                    })
            }
        }
    }
}

/// Terminal step of the cascade: follow the model's predicted class.
pub fn final_decision(model: &ClassifierOutput) -> DecisionOutcome {
    if model.predicts_approval() {
        DecisionOutcome::scored(
            DecisionKind::Approved,
            DecisionReason::MeetsApprovalCriteria,
            model.confidence,
        )
    } else {
        DecisionOutcome::scored(
            DecisionKind::ModelReject,
            DecisionReason::ModelPredictsRejection,
            model.confidence,
        )
    }
}
