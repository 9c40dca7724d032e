use crate::infra::{build_service, ArtifactOverrides};
use chrono::Utc;
use clap::Args;
use loan_decision::config::AppConfig;
use loan_decision::decision::router::DecisionView;
use loan_decision::decision::{ApplicantSubmission, DecisionOutcome};
use loan_decision::error::AppError;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// Annual income
    #[arg(long)]
    pub(crate) income: f64,
    /// Requested loan amount
    #[arg(long)]
    pub(crate) loan_amount: f64,
    /// Loan term in months (12-360)
    #[arg(long, default_value_t = 180)]
    pub(crate) loan_term: i64,
    /// Credit (CIBIL) score (300-900)
    #[arg(long, default_value_t = 650)]
    pub(crate) credit_score: i64,
    /// Number of dependents
    #[arg(long, default_value_t = 0)]
    pub(crate) dependents: i64,
    /// Education level ("Graduate" or "Not Graduate")
    #[arg(long, default_value = "Graduate")]
    pub(crate) education: String,
    /// Self employed ("Yes" or "No")
    #[arg(long, default_value = "No")]
    pub(crate) self_employed: String,
    /// Model artifact path (defaults to LOAN_MODEL_PATH)
    #[arg(long)]
    pub(crate) model: Option<PathBuf>,
    /// Feature schema artifact path (defaults to LOAN_SCHEMA_PATH)
    #[arg(long)]
    pub(crate) schema: Option<PathBuf>,
    /// Print the decision as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

impl EvaluateArgs {
    fn submission(&self) -> ApplicantSubmission {
        ApplicantSubmission {
            income_annum: self.income,
            loan_amount: self.loan_amount,
            loan_term_months: self.loan_term,
            credit_score: self.credit_score,
            dependents: self.dependents,
            education: self.education.clone(),
            employment: self.self_employed.clone(),
        }
    }
}

pub(crate) fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let submission = args.submission();
    let overrides = ArtifactOverrides {
        model: args.model,
        schema: args.schema,
    };

    let service = build_service(&config, overrides)?;
    let outcome = service.evaluate(&submission)?;

    if args.json {
        let view = DecisionView::from_outcome(&outcome, Utc::now());
        println!("{}", render_json(&view)?);
    } else {
        render_decision(&outcome);
    }

    Ok(())
}

fn render_json(view: &DecisionView) -> Result<String, AppError> {
    serde_json::to_string_pretty(view).map_err(|err| AppError::Io(std::io::Error::other(err)))
}

fn render_decision(outcome: &DecisionOutcome) {
    println!("{}", outcome.category().headline());
    println!("- Decision: {}", outcome.kind.label());
    println!("- Reason: {}", outcome.reason.describe());
    println!("- Model confidence: {}", outcome.confidence_display());
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use loan_decision::decision::{DecisionKind, DecisionReason};

    #[derive(Parser, Debug)]
    struct Harness {
        #[command(flatten)]
        args: EvaluateArgs,
    }

    #[test]
    fn evaluate_args_map_onto_a_submission() {
        let harness = Harness::parse_from([
            "evaluate",
            "--income",
            "600000",
            "--loan-amount",
            "800000",
            "--credit-score",
            "710",
            "--education",
            "Not Graduate",
            "--self-employed",
            "Yes",
        ]);

        let submission = harness.args.submission();
        assert_eq!(submission.income_annum, 600_000.0);
        assert_eq!(submission.loan_amount, 800_000.0);
        assert_eq!(submission.loan_term_months, 180);
        assert_eq!(submission.credit_score, 710);
        assert_eq!(submission.education, "Not Graduate");
        assert_eq!(submission.employment, "Yes");
        assert!(!harness.args.json);
    }

    #[test]
    fn json_rendering_returns_the_decision_payload() {
        let outcome = DecisionOutcome {
            kind: DecisionKind::ManualReview,
            reason: DecisionReason::BorderlineModelConfidence,
            confidence: Some(0.734),
        };
        let view = DecisionView::from_outcome(&outcome, Utc::now());

        let rendered = render_json(&view).expect("decision view serializes");
        let payload: serde_json::Value = serde_json::from_str(&rendered).expect("valid json");
        assert_eq!(payload["decision"], "manual_review");
        assert_eq!(payload["confidence_display"], "0.73");
    }
}
