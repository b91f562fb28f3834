//! Client-side field validation.
//!
//! Runs before any network call; a payload that fails here is surfaced
//! inline by the embedder and never sent to the server.

use crate::error::{FieldValidationFailure, ValidationError};

use once_cell::sync::Lazy;
use regex::Regex;

const PASSWORD_MIN_LENGTH: usize = 8;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex is valid")
});

static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    // Optional leading +, then 7-15 digits, spaces and dashes tolerated.
    Regex::new(r"^\+?[0-9][0-9 \-]{5,18}[0-9]$").expect("phone regex is valid")
});

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.trim().is_empty() {
        return Err(ValidationError::field(
            "email",
            FieldValidationFailure::Empty,
        ));
    }
    if !EMAIL_RE.is_match(email) {
        return Err(ValidationError::field(
            "email",
            FieldValidationFailure::InvalidEmail,
        ));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::field(
            "password",
            FieldValidationFailure::Empty,
        ));
    }
    if password.len() < PASSWORD_MIN_LENGTH {
        return Err(ValidationError::field(
            "password",
            FieldValidationFailure::TooShort {
                min: PASSWORD_MIN_LENGTH,
                actual: password.len(),
            },
        ));
    }
    Ok(())
}

pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if phone.trim().is_empty() {
        return Err(ValidationError::field(
            "phone",
            FieldValidationFailure::Empty,
        ));
    }
    if !PHONE_RE.is_match(phone) {
        return Err(ValidationError::field(
            "phone",
            FieldValidationFailure::InvalidPhone,
        ));
    }
    Ok(())
}
