//! Loan decisioning: applicant validation, feature adaptation, classifier
//! scoring, and the ordered rule cascade that combines them.

pub mod artifacts;
pub mod classifier;
pub mod config;
pub mod domain;
pub mod features;
pub mod policy;
pub mod router;
pub mod rules;
pub mod service;
pub mod validation;

#[cfg(test)]
mod tests;

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

pub use artifacts::{load_schema, ArtifactLoadError, LogisticModel};
pub use classifier::{Classifier, ClassifierError, ClassifierOutput};
pub use config::{DecisionThresholds, InvalidThresholds, ProfileBounds, SchemaMode};
pub use domain::{ApplicantProfile, ApplicantSubmission, EducationLevel, EmploymentType};
pub use features::{to_feature_vector, FeatureSchema, FeatureVector, SchemaMismatch};
pub use policy::{DecisionCategory, DecisionKind, DecisionOutcome, DecisionReason};
pub use router::decision_router;
pub use rules::{DecisionRule, CASCADE};
pub use service::LoanDecisionService;
pub use validation::{InvalidInput, ProfileGuard};

/// Read-only resources loaded once and shared by every evaluation.
#[derive(Clone)]
pub struct DecisionContext {
    classifier: Arc<dyn Classifier>,
    schema: Arc<FeatureSchema>,
}

impl DecisionContext {
    pub fn new(classifier: Arc<dyn Classifier>, schema: FeatureSchema) -> Self {
        Self {
            classifier,
            schema: Arc::new(schema),
        }
    }

    /// Load the schema, then a logistic model checked against it.
    pub fn load(
        model_path: impl AsRef<Path>,
        schema_path: impl AsRef<Path>,
    ) -> Result<Self, ArtifactLoadError> {
        let schema = load_schema(schema_path)?;
        let model = LogisticModel::from_path(model_path, &schema)?;
        Ok(Self::new(Arc::new(model), schema))
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }
}

impl std::fmt::Debug for DecisionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecisionContext")
            .field("classifier", &self.classifier.name())
            .field("schema", &self.schema)
            .finish()
    }
}

/// Errors surfaced to the caller of an evaluation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecisionError {
    #[error("invalid applicant input: {0}")]
    InvalidInput(#[from] InvalidInput),
    #[error(transparent)]
    SchemaMismatch(#[from] SchemaMismatch),
    #[error("classifier invocation failed: {0}")]
    ClassifierInvocation(#[from] ClassifierError),
}

/// Stateless evaluator applying the rule cascade with configured thresholds.
#[derive(Debug, Clone, Default)]
pub struct DecisionEngine {
    thresholds: DecisionThresholds,
    schema_mode: SchemaMode,
}

impl DecisionEngine {
    /// Build an engine, refusing thresholds the cascade cannot compare against.
    pub fn new(thresholds: DecisionThresholds) -> Result<Self, InvalidThresholds> {
        thresholds.validate()?;
        Ok(Self {
            thresholds,
            schema_mode: SchemaMode::default(),
        })
    }

    pub fn with_schema_mode(mut self, schema_mode: SchemaMode) -> Self {
        self.schema_mode = schema_mode;
        self
    }

    pub fn thresholds(&self) -> &DecisionThresholds {
        &self.thresholds
    }

    pub fn schema_mode(&self) -> SchemaMode {
        self.schema_mode
    }

    pub fn evaluate(
        &self,
        profile: &ApplicantProfile,
        context: &DecisionContext,
    ) -> Result<DecisionOutcome, DecisionError> {
        self.evaluate_with(profile, context.classifier(), context.schema())
    }

    /// Run the cascade. The classifier is invoked at most once, and only when
    /// no business rule has already decided.
    pub fn evaluate_with(
        &self,
        profile: &ApplicantProfile,
        classifier: &dyn Classifier,
        schema: &FeatureSchema,
    ) -> Result<DecisionOutcome, DecisionError> {
        let mut model: Option<ClassifierOutput> = None;

        for rule in CASCADE {
            if rule.requires_model() && model.is_none() {
                model = Some(self.score(profile, classifier, schema)?);
            }

            if let Some(outcome) = rule.apply(profile, &self.thresholds, model.as_ref()) {
                debug!(rule = rule.name(), decision = outcome.kind.label(), "cascade matched");
                return Ok(outcome);
            }
        }

        let model = match model {
            Some(model) => model,
            None => self.score(profile, classifier, schema)?,
        };
        let outcome = rules::final_decision(&model);
        debug!(rule = "final_model_decision", decision = outcome.kind.label(), "cascade matched");
        Ok(outcome)
    }

    fn score(
        &self,
        profile: &ApplicantProfile,
        classifier: &dyn Classifier,
        schema: &FeatureSchema,
    ) -> Result<ClassifierOutput, DecisionError> {
        let features = features::reconcile(profile, schema, self.schema_mode)?;
        let probabilities = classifier.predict_probabilities(&features)?;
        let output = ClassifierOutput::from_probabilities(probabilities)?;
        debug!(
            classifier = classifier.name(),
            prediction = output.prediction,
            confidence = output.confidence,
            "classifier scored profile"
        );
        Ok(output)
    }
}

/// Evaluate `profile` with the default thresholds and lenient schema handling.
pub fn evaluate(
    profile: &ApplicantProfile,
    classifier: &dyn Classifier,
    schema: &FeatureSchema,
) -> Result<DecisionOutcome, DecisionError> {
    DecisionEngine::default().evaluate_with(profile, classifier, schema)
}
