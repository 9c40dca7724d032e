use super::common::*;
use crate::decision::config::ProfileBounds;
use crate::decision::domain::{ApplicantProfile, EducationLevel, EmploymentType};
use crate::decision::validation::{InvalidInput, ProfileGuard};

#[test]
fn accepts_form_labels() {
    let profile = ProfileGuard::default()
        .profile_from_submission(&submission())
        .expect("valid submission");

    assert_eq!(profile.income_annum(), 600_000.0);
    assert_eq!(profile.loan_term_months(), 180);
    assert_eq!(profile.credit_score(), 700);
    assert_eq!(profile.dependents(), 1);
    assert_eq!(profile.education(), EducationLevel::Graduate);
    assert_eq!(profile.employment(), EmploymentType::NotSelfEmployed);
}

#[test]
fn accepts_variant_spellings() {
    let mut submission = submission();
    submission.education = "not_graduate".to_string();
    submission.employment = "SelfEmployed".to_string();

    let profile = ApplicantProfile::try_from(submission).expect("valid submission");
    assert_eq!(profile.education(), EducationLevel::NotGraduate);
    assert_eq!(profile.employment(), EmploymentType::SelfEmployed);
}

#[test]
fn rejects_negative_income() {
    let mut submission = submission();
    submission.income_annum = -1.0;

    let err = ProfileGuard::default()
        .profile_from_submission(&submission)
        .expect_err("negative income rejected");
    assert_eq!(
        err,
        InvalidInput::NegativeAmount {
            field: "income_annum",
            value: -1.0
        }
    );
}

#[test]
fn rejects_non_finite_loan_amount() {
    let mut submission = submission();
    submission.loan_amount = f64::INFINITY;

    let err = ProfileGuard::default()
        .profile_from_submission(&submission)
        .expect_err("infinite amount rejected");
    assert_eq!(err, InvalidInput::NonFinite { field: "loan_amount" });
}

#[test]
fn rejects_credit_score_outside_bounds() {
    for score in [299, 901, -5] {
        let mut submission = submission();
        submission.credit_score = score;
        let err = ProfileGuard::default()
            .profile_from_submission(&submission)
            .expect_err("out of range score rejected");
        assert!(matches!(
            err,
            InvalidInput::OutOfRange {
                field: "credit_score",
                ..
            }
        ));
    }
}

#[test]
fn rejects_loan_term_outside_bounds() {
    let mut submission = submission();
    submission.loan_term_months = 6;
    let err = ProfileGuard::default()
        .profile_from_submission(&submission)
        .expect_err("short term rejected");
    assert_eq!(
        err,
        InvalidInput::OutOfRange {
            field: "loan_term_months",
            value: 6,
            min: 12,
            max: 360
        }
    );
}

#[test]
fn custom_bounds_are_honored() {
    let guard = ProfileGuard::with_bounds(ProfileBounds {
        max_loan_term_months: 480,
        ..ProfileBounds::default()
    });
    let mut submission = submission();
    submission.loan_term_months = 480;

    let profile = guard
        .profile_from_submission(&submission)
        .expect("extended term allowed");
    assert_eq!(profile.loan_term_months(), 480);
}

#[test]
fn rejects_negative_dependents() {
    let mut submission = submission();
    submission.dependents = -2;
    let err = ProfileGuard::default()
        .profile_from_submission(&submission)
        .expect_err("negative dependents rejected");
    assert_eq!(
        err,
        InvalidInput::NegativeCount {
            field: "dependents",
            value: -2
        }
    );
}

#[test]
fn rejects_unrecognized_enum_labels() {
    let mut submission = submission();
    submission.employment = "Contractor".to_string();
    let err = ProfileGuard::default()
        .profile_from_submission(&submission)
        .expect_err("unknown employment rejected");
    assert_eq!(
        err,
        InvalidInput::UnrecognizedLabel {
            field: "employment",
            value: "Contractor".to_string()
        }
    );
}
