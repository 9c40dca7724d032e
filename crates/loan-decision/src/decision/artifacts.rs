//! Loading of the feature schema and model artifacts.
//!
//! Both artifacts are read once at startup and must be kept in lockstep: a
//! model coefficient naming a feature the schema does not list is refused.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::info;

use super::classifier::{Classifier, ClassifierError};
use super::features::{FeatureSchema, FeatureVector, InvalidSchema};

/// Startup failures while reading schema or model artifacts.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactLoadError {
    #[error("failed to open artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("artifact {path} is not valid JSON: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("artifact {path} is not valid CSV: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("unsupported artifact format for {path} (expected .json or .csv)")]
    UnsupportedFormat { path: PathBuf },
    #[error(transparent)]
    Schema(#[from] InvalidSchema),
    #[error("model references feature '{feature}' missing from the schema")]
    UnknownFeature { feature: String },
    #[error("model standardization for '{feature}' has non-positive scale {scale}")]
    InvalidScale { feature: String, scale: f64 },
    #[error("model parameter '{name}' is not a finite number")]
    NonFiniteParameter { name: String },
    #[error("model version '{model}' does not match schema version '{schema}'")]
    VersionMismatch { model: String, schema: String },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SchemaDocument {
    Bare(Vec<String>),
    Versioned {
        #[serde(default)]
        version: Option<String>,
        features: Vec<String>,
    },
}

/// Read a feature schema from a `.json` or `.csv` file.
pub fn load_schema(path: impl AsRef<Path>) -> Result<FeatureSchema, ArtifactLoadError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    let file = open(path)?;
    let schema = match extension.as_deref() {
        Some("json") => schema_from_json(file, path)?,
        Some("csv") => schema_from_csv(file, path)?,
        _ => {
            return Err(ArtifactLoadError::UnsupportedFormat {
                path: path.to_path_buf(),
            })
        }
    };

    info!(
        path = %path.display(),
        features = schema.len(),
        version = schema.version().unwrap_or("unversioned"),
        "feature schema loaded"
    );
    Ok(schema)
}

/// Parse a JSON schema document: a bare array of names or `{version, features}`.
pub fn schema_from_json<R: Read>(
    reader: R,
    path: &Path,
) -> Result<FeatureSchema, ArtifactLoadError> {
    let document: SchemaDocument =
        serde_json::from_reader(BufReader::new(reader)).map_err(|source| {
            ArtifactLoadError::Json {
                path: path.to_path_buf(),
                source,
            }
        })?;

    let schema = match document {
        SchemaDocument::Bare(features) => FeatureSchema::new(features)?,
        SchemaDocument::Versioned { version, features } => {
            FeatureSchema::versioned(version, features)?
        }
    };
    Ok(schema)
}

/// Parse a CSV schema: the header row lists the feature columns in order.
pub fn schema_from_csv<R: Read>(reader: R, path: &Path) -> Result<FeatureSchema, ArtifactLoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = csv_reader
        .headers()
        .map_err(|source| ArtifactLoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?;

    let features = headers.iter().map(str::to_string).collect();
    Ok(FeatureSchema::new(features)?)
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Standardization {
    pub mean: f64,
    pub scale: f64,
}

/// Binary logistic-regression model serialized as JSON.
///
/// ```json
/// {
///   "version": "2025-01",
///   "intercept": -0.4,
///   "coefficients": { "cibil_score": 2.1, "loan_amount": -0.7 },
///   "standardization": { "cibil_score": { "mean": 600.0, "scale": 170.0 } }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LogisticModel {
    #[serde(default)]
    version: Option<String>,
    intercept: f64,
    coefficients: BTreeMap<String, f64>,
    #[serde(default)]
    standardization: BTreeMap<String, Standardization>,
}

impl LogisticModel {
    pub fn new(intercept: f64, coefficients: BTreeMap<String, f64>) -> Self {
        Self {
            version: None,
            intercept,
            coefficients,
            standardization: BTreeMap::new(),
        }
    }

    pub fn with_standardization(mut self, feature: impl Into<String>, mean: f64, scale: f64) -> Self {
        self.standardization
            .insert(feature.into(), Standardization { mean, scale });
        self
    }

    /// Read the model from `path` and check it against the loaded schema.
    pub fn from_path(
        path: impl AsRef<Path>,
        schema: &FeatureSchema,
    ) -> Result<Self, ArtifactLoadError> {
        let path = path.as_ref();
        let file = open(path)?;
        let model: LogisticModel =
            serde_json::from_reader(BufReader::new(file)).map_err(|source| {
                ArtifactLoadError::Json {
                    path: path.to_path_buf(),
                    source,
                }
            })?;
        model.check_against(schema)?;

        info!(
            path = %path.display(),
            coefficients = model.coefficients.len(),
            version = model.version.as_deref().unwrap_or("unversioned"),
            "classifier model loaded"
        );
        Ok(model)
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Ensure every parameter is usable and refers to a schema feature.
    pub fn check_against(&self, schema: &FeatureSchema) -> Result<(), ArtifactLoadError> {
        if let (Some(model), Some(schema)) = (self.version(), schema.version()) {
            if model != schema {
                return Err(ArtifactLoadError::VersionMismatch {
                    model: model.to_string(),
                    schema: schema.to_string(),
                });
            }
        }

        if !self.intercept.is_finite() {
            return Err(ArtifactLoadError::NonFiniteParameter {
                name: "intercept".to_string(),
            });
        }

        for (feature, weight) in &self.coefficients {
            if !schema.contains(feature) {
                return Err(ArtifactLoadError::UnknownFeature {
                    feature: feature.clone(),
                });
            }
            if !weight.is_finite() {
                return Err(ArtifactLoadError::NonFiniteParameter {
                    name: feature.clone(),
                });
            }
        }

        for (feature, standardization) in &self.standardization {
            if !schema.contains(feature) {
                return Err(ArtifactLoadError::UnknownFeature {
                    feature: feature.clone(),
                });
            }
            if !standardization.mean.is_finite() {
                return Err(ArtifactLoadError::NonFiniteParameter {
                    name: format!("{feature}.mean"),
                });
            }
            if !(standardization.scale.is_finite() && standardization.scale > 0.0) {
                return Err(ArtifactLoadError::InvalidScale {
                    feature: feature.clone(),
                    scale: standardization.scale,
                });
            }
        }

        Ok(())
    }

    fn margin(&self, features: &FeatureVector) -> f64 {
        features
            .iter()
            .filter_map(|(name, value)| {
                let weight = self.coefficients.get(name)?;
                let value = match self.standardization.get(name) {
                    Some(standardization) => (value - standardization.mean) / standardization.scale,
                    None => value,
                };
                Some(weight * value)
            })
            .fold(self.intercept, |acc, term| acc + term)
    }
}

impl Classifier for LogisticModel {
    fn predict_probabilities(&self, features: &FeatureVector) -> Result<Vec<f64>, ClassifierError> {
        let margin = self.margin(features);
        if !margin.is_finite() {
            return Err(ClassifierError::Unavailable(format!(
                "logistic margin is not finite ({margin})"
            )));
        }

        let approve = 1.0 / (1.0 + (-margin).exp());
        Ok(vec![1.0 - approve, approve])
    }

    fn name(&self) -> &str {
        "logistic_regression"
    }
}

fn open(path: &Path) -> Result<File, ArtifactLoadError> {
    File::open(path).map_err(|source| ArtifactLoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}
