use common::ErrorLocation;

use thiserror::Error;

/// Errors surfaced by the portal CLI itself.
///
/// Portal-core errors are rendered into `Core` at the boundary so the
/// binary has a single exit path with location tracking intact.
#[derive(Debug, Error)]
pub enum CofoError {
    /// Error from this app (directories, logging, environment)
    #[error("Cofo Error: {message} {location}")]
    Cofo {
        message: String,
        location: ErrorLocation,
    },

    /// Error from portal-core operations (auth, dashboard, wizard)
    #[error("Core Error: {message} {location}")]
    Core {
        message: String,
        location: ErrorLocation,
    },

    /// No usable session and no credentials to establish one
    #[error("No Session Error: {message} {location}")]
    NoSession {
        message: String,
        location: ErrorLocation,
    },
}

impl CofoError {
    #[track_caller]
    pub fn app(message: impl Into<String>) -> Self {
        Self::Cofo {
            message: message.into(),
            location: ErrorLocation::from(std::panic::Location::caller()),
        }
    }

    #[track_caller]
    pub fn no_session(message: impl Into<String>) -> Self {
        Self::NoSession {
            message: message.into(),
            location: ErrorLocation::from(std::panic::Location::caller()),
        }
    }
}

impl From<portal_core::error::CoreError> for CofoError {
    #[track_caller]
    fn from(error: portal_core::error::CoreError) -> Self {
        Self::Core {
            message: error.to_string(),
            location: ErrorLocation::from(std::panic::Location::caller()),
        }
    }
}

impl From<portal_core::error::config::ConfigError> for CofoError {
    #[track_caller]
    fn from(error: portal_core::error::config::ConfigError) -> Self {
        Self::Core {
            message: error.to_string(),
            location: ErrorLocation::from(std::panic::Location::caller()),
        }
    }
}

impl From<portal_core::error::ApiError> for CofoError {
    #[track_caller]
    fn from(error: portal_core::error::ApiError) -> Self {
        Self::Core {
            message: error.to_string(),
            location: ErrorLocation::from(std::panic::Location::caller()),
        }
    }
}
