use crate::wizard::WizardStep;

use common::ErrorLocation;

use std::panic::Location;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum WizardError {
    /// Advancing past the upload step was refused because required
    /// document categories are still empty. No navigation occurred.
    #[error("Missing required documents: {} {location}", missing.join(", "))]
    MissingDocuments {
        missing: Vec<String>,
        location: ErrorLocation,
    },

    #[error("No land selected {location}")]
    NoLandSelected { location: ErrorLocation },

    #[error("Operation not allowed at step {step:?} {location}")]
    StepOrder {
        step: WizardStep,
        location: ErrorLocation,
    },

    #[error("Unknown document category '{category}' {location}")]
    UnknownCategory {
        category: String,
        location: ErrorLocation,
    },

    #[error("No payment session - initialize payment before completing {location}")]
    NoPaymentSession { location: ErrorLocation },
}

impl WizardError {
    #[track_caller]
    pub fn missing_documents(missing: Vec<String>) -> Self {
        WizardError::MissingDocuments {
            missing,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn no_land_selected() -> Self {
        WizardError::NoLandSelected {
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn step_order(step: WizardStep) -> Self {
        WizardError::StepOrder {
            step,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn unknown_category(category: impl Into<String>) -> Self {
        WizardError::UnknownCategory {
            category: category.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn no_payment_session() -> Self {
        WizardError::NoPaymentSession {
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
