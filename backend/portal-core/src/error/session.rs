use common::{ErrorLocation, HttpStatusCode};

use std::panic::Location;
use std::path::PathBuf;

use thiserror::Error;

/// Errors from the persisted authentication slice.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session Write Error: {path}: {source} {location}")]
    WriteError {
        location: ErrorLocation,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Session Serialization Error: {reason} {location}")]
    SerializeError {
        location: ErrorLocation,
        reason: String,
    },
}

impl SessionError {
    #[track_caller]
    pub fn write(path: PathBuf, source: std::io::Error) -> Self {
        SessionError::WriteError {
            location: ErrorLocation::from(Location::caller()),
            path,
            source,
        }
    }

    #[track_caller]
    pub fn serialize(reason: impl Into<String>) -> Self {
        SessionError::SerializeError {
            location: ErrorLocation::from(Location::caller()),
            reason: reason.into(),
        }
    }
}

/// Outcome delivered to every parked waiter when a shared refresh fails.
///
/// `Clone` so one failure can fan out to N waiters.
#[derive(Debug, Clone)]
pub struct RefreshFailure {
    pub message: String,
    pub status_code: Option<HttpStatusCode>,
}

impl std::fmt::Display for RefreshFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status_code {
            Some(code) => write!(f, "refresh failed with HTTP {}: {}", code, self.message),
            None => write!(f, "refresh failed: {}", self.message),
        }
    }
}

impl From<&crate::error::ApiError> for RefreshFailure {
    fn from(error: &crate::error::ApiError) -> Self {
        RefreshFailure {
            message: error.to_string(),
            status_code: error.status_code().map(HttpStatusCode),
        }
    }
}
