use loan_decision::config::AppConfig;
use loan_decision::config::ConfigError;
use loan_decision::decision::{DecisionContext, DecisionEngine, LoanDecisionService, ProfileGuard};
use loan_decision::error::AppError;
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Artifact locations, optionally overridden from the command line.
#[derive(Debug, Default)]
pub(crate) struct ArtifactOverrides {
    pub(crate) model: Option<PathBuf>,
    pub(crate) schema: Option<PathBuf>,
}

/// Load the model and schema once and wrap them in a ready-to-use service.
pub(crate) fn build_service(
    config: &AppConfig,
    overrides: ArtifactOverrides,
) -> Result<LoanDecisionService, AppError> {
    let model_path = overrides
        .model
        .unwrap_or_else(|| config.artifacts.model_path.clone());
    let schema_path = overrides
        .schema
        .unwrap_or_else(|| config.artifacts.schema_path.clone());

    let engine = DecisionEngine::new(config.decision)
        .map_err(ConfigError::from)?
        .with_schema_mode(config.artifacts.schema_mode);
    let context = DecisionContext::load(&model_path, &schema_path)?;

    Ok(LoanDecisionService::new(
        ProfileGuard::default(),
        engine,
        Arc::new(context),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use loan_decision::config::{AppEnvironment, ArtifactConfig, ServerConfig, TelemetryConfig};
    use loan_decision::decision::{
        ApplicantSubmission, DecisionError, DecisionKind, DecisionReason, DecisionThresholds,
        SchemaMode,
    };
    use std::fs;
    use tempfile::TempDir;

    const SCHEMA: &str = r#"{
        "version": "2024-01",
        "features": ["income_annum", "loan_amount", "cibil_score", "residential_assets_value"]
    }"#;

    // Intercept only, so every applicant scores an even [0.5, 0.5].
    const MODEL: &str = r#"{"version": "2024-01", "intercept": 0.0, "coefficients": {}}"#;

    fn write_artifacts() -> TempDir {
        let dir = tempfile::tempdir().expect("temp dir");
        fs::write(dir.path().join("schema.json"), SCHEMA).expect("write schema");
        fs::write(dir.path().join("model.json"), MODEL).expect("write model");
        dir
    }

    fn config(dir: &TempDir, schema_mode: SchemaMode, decision: DecisionThresholds) -> AppConfig {
        AppConfig {
            environment: AppEnvironment::Test,
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            telemetry: TelemetryConfig {
                log_level: "info".to_string(),
            },
            artifacts: ArtifactConfig {
                model_path: dir.path().join("model.json"),
                schema_path: dir.path().join("schema.json"),
                schema_mode,
            },
            decision,
        }
    }

    fn submission() -> ApplicantSubmission {
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

    #[test]
    fn strict_schema_mode_reaches_the_engine() {
        let dir = write_artifacts();
        let config = config(&dir, SchemaMode::Strict, DecisionThresholds::default());

        let service =
            build_service(&config, ArtifactOverrides::default()).expect("service builds");
        assert_eq!(service.engine().schema_mode(), SchemaMode::Strict);

        match service.evaluate(&submission()) {
            Err(DecisionError::SchemaMismatch(mismatch)) => {
                assert!(mismatch
                    .not_derivable
                    .contains(&"residential_assets_value".to_string()));
            }
            other => panic!("expected schema mismatch, got {other:?}"),
        }
    }

    #[test]
    fn threshold_overrides_reach_the_engine() {
        let dir = write_artifacts();
        let lenient = build_service(
            &config(&dir, SchemaMode::Lenient, DecisionThresholds::default()),
            ArtifactOverrides::default(),
        )
        .expect("service builds");
        let outcome = lenient.evaluate(&submission()).expect("evaluates");
        assert_eq!(outcome.reason, DecisionReason::LowModelConfidence);

        let relaxed = DecisionThresholds {
            low_confidence: 0.4,
            high_confidence: 0.45,
            ..DecisionThresholds::default()
        };
        let service = build_service(
            &config(&dir, SchemaMode::Lenient, relaxed),
            ArtifactOverrides::default(),
        )
        .expect("service builds");
        assert_eq!(service.engine().thresholds(), &relaxed);

        let outcome = service.evaluate(&submission()).expect("evaluates");
        assert_eq!(outcome.kind, DecisionKind::ModelReject);
        assert_eq!(outcome.reason, DecisionReason::ModelPredictsRejection);
    }

    #[test]
    fn inconsistent_thresholds_fail_before_loading_artifacts() {
        let dir = tempfile::tempdir().expect("temp dir");
        let broken = DecisionThresholds {
            low_confidence: f64::NAN,
            ..DecisionThresholds::default()
        };

        let config = config(&dir, SchemaMode::Lenient, broken);

        match build_service(&config, ArtifactOverrides::default()) {
            Err(AppError::Config(ConfigError::InconsistentThresholds(detail))) => {
                assert!(detail.contains("low_confidence"));
            }
            Err(other) => panic!("expected inconsistent thresholds, got {other}"),
            Ok(_) => panic!("expected inconsistent thresholds"),
        }
    }
}
