//! Client-side form validation errors.
//!
//! Validation failures never reach the server; they are surfaced inline
//! next to the offending field by the embedding application.

use common::ErrorLocation;

use std::panic::Location;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum ValidationError {
    #[error("Validation failed for '{field}': {reason} {location}")]
    Field {
        field: &'static str,
        reason: FieldValidationFailure,
        location: ErrorLocation,
    },
}

impl ValidationError {
    #[track_caller]
    pub fn field(field: &'static str, reason: FieldValidationFailure) -> Self {
        ValidationError::Field {
            field,
            reason,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    pub fn field_name(&self) -> &'static str {
        match self {
            ValidationError::Field { field, .. } => field,
        }
    }
}

/// Specific reasons for field validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValidationFailure {
    Empty,
    TooShort { min: usize, actual: usize },
    InvalidEmail,
    InvalidPhone,
}

impl std::fmt::Display for FieldValidationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "value is required"),
            Self::TooShort { min, actual } => {
                write!(f, "too short ({} chars, minimum {})", actual, min)
            }
            Self::InvalidEmail => write!(f, "not a valid email address"),
            Self::InvalidPhone => write!(f, "not a valid phone number"),
        }
    }
}
