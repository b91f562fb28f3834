// Unit tests for error module
// Tests boundary conversion and rendering

use crate::error::CofoError;

use common::ErrorLocation;

use std::panic::Location;

/// **VALUE**: Tests that the rendered error names its variant and keeps
/// the message.
///
/// **WHY THIS MATTERS**: The binary's single exit path prints this
/// rendering; losing the message would leave the operator with nothing
/// to act on.
///
/// **BUG THIS CATCHES**: Would catch a `#[error(...)]` format string
/// that drops the message or the location.
#[test]
fn given_no_session_error_when_displayed_then_contains_message_and_location() {
    let err = CofoError::NoSession {
        message: String::from("Set PORTAL_EMAIL and PORTAL_PASSWORD to log in"),
        location: ErrorLocation::from(Location::caller()),
    };

    let rendered = err.to_string();

    assert!(rendered.contains("No Session Error"));
    assert!(rendered.contains("PORTAL_EMAIL"));
    assert!(rendered.contains("error.rs"));
}

/// **VALUE**: Verifies portal-core errors convert at the boundary with
/// their message intact.
///
/// **BUG THIS CATCHES**: Would catch a From impl that discards the
/// source error's rendering.
#[test]
fn given_core_error_when_converted_then_message_preserved() {
    let source = portal_core::error::ApiError::unauthorized();

    let err = CofoError::from(source);

    match err {
        CofoError::Core { message, .. } => {
            assert!(!message.is_empty(), "converted message should be kept");
        }
        other => panic!("expected Core variant, got {other:?}"),
    }
}
