//! Error types for portal API calls.
//!
//! Key design decisions:
//! - HTTP status codes stored directly (not parsed from strings)
//! - Server-provided `{message, errors?}` bodies normalized into `Api`
//! - A failed refresh surfaces as `SessionExpired` carrying the login route
//! - `#[track_caller]` for automatic location capture

use crate::error::session::RefreshFailure;

use common::{ErrorLocation, HttpStatusCode};

use std::panic::Location;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum ApiError {
    /// Transport-level failure (DNS, connect, timeout, TLS).
    #[error("HTTP Error: {message} {location}")]
    Http {
        message: String,
        is_timeout: bool,
        is_connection: bool,
        location: ErrorLocation,
    },

    #[error("JSON Error: {message} {location}")]
    Json {
        message: String,
        location: ErrorLocation,
    },

    #[error("URL Parse Error: {message} {location}")]
    UrlParse {
        message: String,
        location: ErrorLocation,
    },

    /// Business error: the server answered with a non-2xx status and a
    /// normalized `{message, errors?}` body.
    #[error("API Error: HTTP {status_code} - {message} {location}")]
    Api {
        message: String,
        errors: Option<serde_json::Value>,
        status_code: HttpStatusCode,
        location: ErrorLocation,
    },

    /// A request that was already replayed once failed with 401 again.
    /// Rejected immediately so a single bad request cannot loop refreshes.
    #[error("Unauthorized: request rejected after one replay {location}")]
    Unauthorized { location: ErrorLocation },

    /// The refresh handshake itself failed. The session has been cleared;
    /// the embedder must navigate to `redirect`.
    #[error("Session Expired: {message} - redirect to {redirect} {location}")]
    SessionExpired {
        message: String,
        redirect: &'static str,
        location: ErrorLocation,
    },
}

impl From<url::ParseError> for ApiError {
    #[track_caller]
    fn from(error: url::ParseError) -> Self {
        ApiError::UrlParse {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    #[track_caller]
    fn from(error: reqwest::Error) -> Self {
        ApiError::Http {
            message: error.to_string(),
            is_timeout: error.is_timeout(),
            is_connection: error.is_connect(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    #[track_caller]
    fn from(error: serde_json::Error) -> Self {
        ApiError::Json {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl ApiError {
    #[track_caller]
    pub fn unauthorized() -> Self {
        ApiError::Unauthorized {
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn session_expired(failure: RefreshFailure) -> Self {
        ApiError::SessionExpired {
            message: failure.message,
            redirect: crate::LOGIN_ROUTE,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Create from an HTTP response body with explicit status code.
    #[track_caller]
    pub fn from_http_response(
        status_code: u16,
        message: impl Into<String>,
        errors: Option<serde_json::Value>,
    ) -> Self {
        ApiError::Api {
            message: message.into(),
            errors,
            status_code: HttpStatusCode(status_code),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Whether the refresh coordinator may retry this failure.
    ///
    /// Transport problems and transient 5xx codes qualify; a 4xx refusal
    /// of the refresh cookie never does.
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Http {
                is_timeout,
                is_connection,
                ..
            } => *is_timeout || *is_connection,
            ApiError::Api { status_code, .. } => status_code.is_retryable(),
            _ => false,
        }
    }

    /// Get HTTP status code if applicable.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Api { status_code, .. } => Some(status_code.0),
            ApiError::Unauthorized { .. } => Some(401),
            _ => None,
        }
    }

    /// Get error category for logging.
    pub fn error_category(&self) -> &'static str {
        match self {
            ApiError::Http { is_timeout: true, .. } => "timeout",
            ApiError::Http { is_connection: true, .. } => "connection",
            ApiError::Http { .. } => "network",
            ApiError::Json { .. } => "decode",
            ApiError::UrlParse { .. } => "url",
            ApiError::Api { status_code, .. } if status_code.is_client_error() => "client_error",
            ApiError::Api { status_code, .. } if status_code.is_server_error() => "server_error",
            ApiError::Api { .. } => "api",
            ApiError::Unauthorized { .. } => "unauthorized",
            ApiError::SessionExpired { .. } => "session_expired",
        }
    }
}
