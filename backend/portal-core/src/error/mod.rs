pub mod api;
pub mod config;
pub mod session;
pub mod validation;
pub mod wizard;

pub use api::ApiError;
pub use session::{RefreshFailure, SessionError};
pub use validation::{FieldValidationFailure, ValidationError};
pub use wizard::WizardError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Api(#[from] api::ApiError),

    #[error(transparent)]
    Session(#[from] session::SessionError),

    #[error(transparent)]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Validation(#[from] validation::ValidationError),

    #[error(transparent)]
    Wizard(#[from] wizard::WizardError),
}
