use serde::{Deserialize, Serialize};

use super::validation::{InvalidInput, ProfileGuard};

/// Highest completed education level as captured on the intake form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EducationLevel {
    Graduate,
    NotGraduate,
}

impl EducationLevel {
    /// Accepts the form labels ("Graduate", "Not Graduate") and their snake/camel spellings.
    pub fn parse(raw: &str) -> Option<Self> {
        match normalize_label(raw).as_str() {
            "graduate" => Some(Self::Graduate),
            "notgraduate" => Some(Self::NotGraduate),
            _ => None,
        }
    }
}

/// Whether the applicant runs their own business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentType {
    SelfEmployed,
    NotSelfEmployed,
}

impl EmploymentType {
    /// Accepts the form's "Yes"/"No" answers as well as the variant names.
    pub fn parse(raw: &str) -> Option<Self> {
        match normalize_label(raw).as_str() {
            "yes" | "selfemployed" => Some(Self::SelfEmployed),
            "no" | "notselfemployed" => Some(Self::NotSelfEmployed),
            _ => None,
        }
    }
}

fn normalize_label(raw: &str) -> String {
    raw.chars()
        .filter(|ch| !matches!(ch, ' ' | '_' | '-'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Untrusted applicant attributes exactly as received from a caller.
///
/// Numbers are signed and enums are free text so that out-of-domain values
/// reach [`ProfileGuard`] and are reported as invalid input rather than as a
/// deserialization failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicantSubmission {
    pub income_annum: f64,
    pub loan_amount: f64,
    pub loan_term_months: i64,
    pub credit_score: i64,
    pub dependents: i64,
    pub education: String,
    pub employment: String,
}

/// Validated applicant attributes for a single evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicantProfile {
    income_annum: f64,
    loan_amount: f64,
    loan_term_months: u16,
    credit_score: u16,
    dependents: u32,
    education: EducationLevel,
    employment: EmploymentType,
}

impl ApplicantProfile {
    /// Callers outside the crate go through [`ProfileGuard`] or `TryFrom`.
    pub(crate) fn from_parts(
        income_annum: f64,
        loan_amount: f64,
        loan_term_months: u16,
        credit_score: u16,
        dependents: u32,
        education: EducationLevel,
        employment: EmploymentType,
    ) -> Self {
        Self {
            income_annum,
            loan_amount,
            loan_term_months,
            credit_score,
            dependents,
            education,
            employment,
        }
    }

    pub fn income_annum(&self) -> f64 {
        self.income_annum
    }

    pub fn loan_amount(&self) -> f64 {
        self.loan_amount
    }

    pub fn loan_term_months(&self) -> u16 {
        self.loan_term_months
    }

    pub fn credit_score(&self) -> u16 {
        self.credit_score
    }

    pub fn dependents(&self) -> u32 {
        self.dependents
    }

    pub fn education(&self) -> EducationLevel {
        self.education
    }

    pub fn employment(&self) -> EmploymentType {
        self.employment
    }

    /// Whether the requested amount exceeds `ratio` times the declared income.
    ///
    /// Always false when income is zero, so leverage rules never fire for
    /// applicants without declared income.
    pub fn loan_exceeds_income_multiple(&self, ratio: f64) -> bool {
        self.income_annum > 0.0 && self.loan_amount > ratio * self.income_annum
    }
}

impl TryFrom<ApplicantSubmission> for ApplicantProfile {
    type Error = InvalidInput;

    fn try_from(submission: ApplicantSubmission) -> Result<Self, Self::Error> {
        ProfileGuard::default().profile_from_submission(&submission)
    }
}
