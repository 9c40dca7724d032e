use std::collections::HashSet;

use serde::Serialize;

use super::config::SchemaMode;
use super::domain::{ApplicantProfile, EducationLevel, EmploymentType};

pub const INCOME_ANNUM: &str = "income_annum";
pub const LOAN_AMOUNT: &str = "loan_amount";
pub const LOAN_TERM: &str = "loan_term";
pub const CIBIL_SCORE: &str = "cibil_score";
pub const NO_OF_DEPENDENTS: &str = "no_of_dependents";
pub const EDUCATION_NOT_GRADUATE: &str = "education_Not_Graduate";
pub const SELF_EMPLOYED_YES: &str = "self_employed_Yes";

/// Ordered feature names the classifier was trained against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureSchema {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    version: Option<String>,
    features: Vec<String>,
}

/// Structural problems that make a schema unusable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidSchema {
    #[error("feature schema is empty")]
    Empty,
    #[error("feature schema lists '{0}' more than once")]
    DuplicateFeature(String),
    #[error("feature schema contains a blank feature name at position {0}")]
    BlankFeature(usize),
}

impl FeatureSchema {
    pub fn new(features: Vec<String>) -> Result<Self, InvalidSchema> {
        Self::versioned(None, features)
    }

    pub fn versioned(version: Option<String>, features: Vec<String>) -> Result<Self, InvalidSchema> {
        if features.is_empty() {
            return Err(InvalidSchema::Empty);
        }

        let mut seen = HashSet::with_capacity(features.len());
        for (position, name) in features.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(InvalidSchema::BlankFeature(position));
            }
            if !seen.insert(name.as_str()) {
                return Err(InvalidSchema::DuplicateFeature(name.clone()));
            }
        }

        Ok(Self { version, features })
    }

    /// Schema covering exactly the features derived from an applicant profile.
    pub fn standard() -> Self {
        Self {
            version: None,
            features: [
                INCOME_ANNUM,
                LOAN_AMOUNT,
                LOAN_TERM,
                CIBIL_SCORE,
                NO_OF_DEPENDENTS,
                EDUCATION_NOT_GRADUATE,
                SELF_EMPLOYED_YES,
            ]
            .iter()
            .map(|name| name.to_string())
            .collect(),
        }
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn features(&self) -> &[String] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.features.iter().any(|feature| feature == name)
    }
}

/// Feature values keyed and ordered by a [`FeatureSchema`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureVector {
    entries: Vec<(String, f64)>,
}

impl FeatureVector {
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn values(&self) -> Vec<f64> {
        self.entries.iter().map(|(_, value)| *value).collect()
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(feature, _)| feature == name)
            .map(|(_, value)| *value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), *value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Raised in strict mode when the adapter and the schema disagree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "feature schema mismatch (not in schema: [{}], not derivable: [{}])",
    .not_in_schema.join(", "),
    .not_derivable.join(", ")
)]
pub struct SchemaMismatch {
    pub not_in_schema: Vec<String>,
    pub not_derivable: Vec<String>,
}

/// Features derivable from the applicant form, before schema reconciliation.
pub fn produced_features(profile: &ApplicantProfile) -> [(&'static str, f64); 7] {
    let not_graduate = match profile.education() {
        EducationLevel::NotGraduate => 1.0,
        EducationLevel::Graduate => 0.0,
    };
    let self_employed = match profile.employment() {
        EmploymentType::SelfEmployed => 1.0,
        EmploymentType::NotSelfEmployed => 0.0,
    };

    [
        (INCOME_ANNUM, profile.income_annum()),
        (LOAN_AMOUNT, profile.loan_amount()),
        (LOAN_TERM, f64::from(profile.loan_term_months())),
        (CIBIL_SCORE, f64::from(profile.credit_score())),
        (NO_OF_DEPENDENTS, f64::from(profile.dependents())),
        (EDUCATION_NOT_GRADUATE, not_graduate),
        (SELF_EMPLOYED_YES, self_employed),
    ]
}

/// Map a profile onto `schema`: unknown schema features become zero, extra
/// produced features are dropped, and the result follows schema order.
pub fn to_feature_vector(profile: &ApplicantProfile, schema: &FeatureSchema) -> FeatureVector {
    let produced = produced_features(profile);
    let entries = schema
        .features()
        .iter()
        .map(|name| {
            let value = produced
                .iter()
                .find(|(feature, _)| *feature == name.as_str())
                .map(|(_, value)| *value)
                .unwrap_or(0.0);
            (name.clone(), value)
        })
        .collect();

    FeatureVector { entries }
}

/// Reconcile under the requested [`SchemaMode`].
pub fn reconcile(
    profile: &ApplicantProfile,
    schema: &FeatureSchema,
    mode: SchemaMode,
) -> Result<FeatureVector, SchemaMismatch> {
    if mode == SchemaMode::Strict {
        let produced = produced_features(profile);
        let not_in_schema: Vec<String> = produced
            .iter()
            .filter(|(name, _)| !schema.contains(name))
            .map(|(name, _)| name.to_string())
            .collect();
        let not_derivable: Vec<String> = schema
            .features()
            .iter()
            .filter(|name| !produced.iter().any(|(feature, _)| *feature == name.as_str()))
            .cloned()
            .collect();

        if !not_in_schema.is_empty() || !not_derivable.is_empty() {
            return Err(SchemaMismatch {
                not_in_schema,
                not_derivable,
            });
        }
    }

    Ok(to_feature_vector(profile, schema))
}
