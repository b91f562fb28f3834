//! Shared primitives for the C of O citizen portal client.
//!
//! This crate contains pure data types with no business logic:
//! error locations, HTTP status categorization, and the redacted
//! access-token wrapper. Everything that talks to the network or
//! holds session state lives in `portal-core`.

pub mod error;
pub mod http_status;
pub mod redacted_token;

pub use error::error_location::ErrorLocation;
pub use error::redact_error::RedactError;
pub use http_status::HttpStatusCode;
pub use redacted_token::RedactedAccessToken;
