// Unit tests for client-side field validation.

use crate::api::validation::{validate_email, validate_password, validate_phone};
use crate::error::{FieldValidationFailure, ValidationError};

fn reason(error: ValidationError) -> FieldValidationFailure {
    match error {
        ValidationError::Field { reason, .. } => reason,
    }
}

#[test]
fn given_well_formed_email_when_validated_then_accepted() {
    assert!(validate_email("amina@example.com").is_ok());
    assert!(validate_email("a.b+c@sub.domain.gov.ng").is_ok());
}

#[test]
fn given_malformed_email_when_validated_then_invalid_email() {
    for bad in ["", "   ", "plainaddress", "@no-local.com", "no-at.com", "two@@ats.com"] {
        let error = validate_email(bad).unwrap_err();
        assert!(
            matches!(
                reason(error),
                FieldValidationFailure::Empty | FieldValidationFailure::InvalidEmail
            ),
            "'{bad}' should be rejected"
        );
    }
}

#[test]
fn given_short_password_when_validated_then_too_short_with_lengths() {
    let error = validate_password("secret").unwrap_err();
    assert_eq!(
        reason(error),
        FieldValidationFailure::TooShort { min: 8, actual: 6 }
    );
}

#[test]
fn given_empty_password_when_validated_then_empty_not_too_short() {
    assert_eq!(
        reason(validate_password("").unwrap_err()),
        FieldValidationFailure::Empty
    );
}

#[test]
fn given_exactly_minimum_password_when_validated_then_accepted() {
    assert!(validate_password("12345678").is_ok());
}

#[test]
fn given_nigerian_phone_formats_when_validated_then_accepted() {
    assert!(validate_phone("+2348012345678").is_ok());
    assert!(validate_phone("08012345678").is_ok());
    assert!(validate_phone("0801 234 5678").is_ok());
}

#[test]
fn given_non_numeric_phone_when_validated_then_invalid_phone() {
    assert_eq!(
        reason(validate_phone("CALL-ME-MAYBE").unwrap_err()),
        FieldValidationFailure::InvalidPhone
    );
}
