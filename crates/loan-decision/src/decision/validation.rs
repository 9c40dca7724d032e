use super::config::ProfileBounds;
use super::domain::{ApplicantProfile, ApplicantSubmission, EducationLevel, EmploymentType};

/// Reasons a submission cannot become an [`ApplicantProfile`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidInput {
    #[error("{field} must be a finite number")]
    NonFinite { field: &'static str },
    #[error("{field} must not be negative (found {value})")]
    NegativeAmount { field: &'static str, value: f64 },
    #[error("{field} must not be negative (found {value})")]
    NegativeCount { field: &'static str, value: i64 },
    #[error("{field} must lie within {min}..={max} (found {value})")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },
    #[error("{field} has unrecognized value '{value}'")]
    UnrecognizedLabel { field: &'static str, value: String },
}

/// Guard responsible for producing `ApplicantProfile` instances.
#[derive(Debug, Clone, Default)]
pub struct ProfileGuard {
    bounds: ProfileBounds,
}

impl ProfileGuard {
    pub fn with_bounds(bounds: ProfileBounds) -> Self {
        Self { bounds }
    }

    pub fn bounds(&self) -> &ProfileBounds {
        &self.bounds
    }

    /// Convert an inbound submission into a validated applicant profile.
    pub fn profile_from_submission(
        &self,
        submission: &ApplicantSubmission,
    ) -> Result<ApplicantProfile, InvalidInput> {
        let income_annum = non_negative_amount("income_annum", submission.income_annum)?;
        let loan_amount = non_negative_amount("loan_amount", submission.loan_amount)?;

        let loan_term_months = bounded(
            "loan_term_months",
            submission.loan_term_months,
            self.bounds.min_loan_term_months,
            self.bounds.max_loan_term_months,
        )?;
        let credit_score = bounded(
            "credit_score",
            submission.credit_score,
            self.bounds.min_credit_score,
            self.bounds.max_credit_score,
        )?;

        if submission.dependents < 0 {
            return Err(InvalidInput::NegativeCount {
                field: "dependents",
                value: submission.dependents,
            });
        }
        let dependents =
            u32::try_from(submission.dependents).map_err(|_| InvalidInput::OutOfRange {
                field: "dependents",
                value: submission.dependents,
                min: 0,
                max: i64::from(u32::MAX),
            })?;

        let education = EducationLevel::parse(&submission.education).ok_or_else(|| {
            InvalidInput::UnrecognizedLabel {
                field: "education",
                value: submission.education.clone(),
            }
        })?;
        let employment = EmploymentType::parse(&submission.employment).ok_or_else(|| {
            InvalidInput::UnrecognizedLabel {
                field: "employment",
                value: submission.employment.clone(),
            }
        })?;

        Ok(ApplicantProfile::from_parts(
            income_annum,
            loan_amount,
            loan_term_months,
            credit_score,
            dependents,
            education,
            employment,
        ))
    }
}

fn non_negative_amount(field: &'static str, value: f64) -> Result<f64, InvalidInput> {
    if !value.is_finite() {
        return Err(InvalidInput::NonFinite { field });
    }
    if value < 0.0 {
        return Err(InvalidInput::NegativeAmount { field, value });
    }
    Ok(value)
}

fn bounded(field: &'static str, value: i64, min: u16, max: u16) -> Result<u16, InvalidInput> {
    let out_of_range = || InvalidInput::OutOfRange {
        field,
        value,
        min: i64::from(min),
        max: i64::from(max),
    };
    if value < i64::from(min) || value > i64::from(max) {
        return Err(out_of_range());
    }
    u16::try_from(value).map_err(|_| out_of_range())
}
