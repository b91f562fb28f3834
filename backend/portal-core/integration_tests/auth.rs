//! Authentication flow integration tests.

use crate::helpers::{client_for, login_body, overview_body};

use portal_core::api::auth::RegisterPayload;
use portal_core::error::{ApiError, CoreError};
use portal_core::session::SessionStatus;

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Scenario: valid credentials authenticate the session and the
/// returned token rides on every subsequent call.
#[tokio::test]
async fn given_valid_credentials_when_login_then_session_authenticated_and_bearer_attached() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({
            "email": "amina@example.com",
            "password": "correct-horse"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(login_body("abc")))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/user/dashboard-overview"))
        .and(header("authorization", "Bearer abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(overview_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);

    let user = client.login("amina@example.com", "correct-horse").await.unwrap();

    assert_eq!(user.email, "amina@example.com");
    assert_eq!(client.session().status().await, SessionStatus::Authenticated);
    assert_eq!(client.session().bearer().await.unwrap().as_str(), "abc");

    // Token propagation: the very next outbound call carries "abc".
    client.dashboard_overview().await.unwrap();
}

#[tokio::test]
async fn given_rejected_credentials_when_login_then_api_error_and_unauthenticated() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Invalid credentials" })),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);

    let error = client.login("amina@example.com", "wrong").await.unwrap_err();

    // A 401 from login is a refusal, not an expired token: no refresh
    // recovery, the normalized message propagates.
    match error {
        ApiError::Api {
            message,
            status_code,
            ..
        } => {
            assert_eq!(message, "Invalid credentials");
            assert_eq!(status_code.0, 401);
        }
        other => panic!("expected Api error, got {other:?}"),
    }
    assert_eq!(
        client.session().status().await,
        SessionStatus::Unauthenticated
    );
    let snapshot = client.session().snapshot().await;
    assert!(snapshot.error.is_some());
    assert!(snapshot.access_token.is_none());
}

#[tokio::test]
async fn given_invalid_email_when_register_then_rejected_before_any_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "ok" })))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let payload = RegisterPayload {
        full_name: "Amina Bello".to_string(),
        email: "not-an-email".to_string(),
        password: "long-enough".to_string(),
        phone: None,
    };

    let error = client.register(&payload).await.unwrap_err();

    assert!(matches!(error, CoreError::Validation(_)));
}

#[tokio::test]
async fn given_valid_payload_when_register_then_message_returned() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .and(body_json(json!({
            "fullName": "Amina Bello",
            "email": "amina@example.com",
            "password": "long-enough",
            "phone": "+2348012345678"
        })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({ "message": "Verification sent" })),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let payload = RegisterPayload {
        full_name: "Amina Bello".to_string(),
        email: "amina@example.com".to_string(),
        password: "long-enough".to_string(),
        phone: Some("+2348012345678".to_string()),
    };

    let ack = client.register(&payload).await.unwrap();
    assert_eq!(ack.message.as_deref(), Some("Verification sent"));
}

#[tokio::test]
async fn given_authenticated_session_when_logout_then_local_session_cleared() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(login_body("abc")))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/logout"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "Bye" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.login("amina@example.com", "correct-horse").await.unwrap();

    client.logout().await.unwrap();

    assert_eq!(
        client.session().status().await,
        SessionStatus::Unauthenticated
    );
    assert!(client.session().bearer().await.is_none());
}

#[tokio::test]
async fn given_unreachable_server_when_logout_then_session_still_cleared_locally() {
    let server = MockServer::start().await;
    let client = client_for(&server);
    client
        .session()
        .set_token(common::RedactedAccessToken::from("abc"))
        .await;

    // No /auth/logout mock: wiremock answers 404, accept_ok errors.
    let result = client.logout().await;

    assert!(result.is_err());
    assert!(client.session().bearer().await.is_none());
}

#[tokio::test]
async fn given_verification_token_when_verify_email_then_acknowledged() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/verify-email"))
        .and(body_json(json!({ "email": "amina@example.com", "token": "verify-token" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "message": "Email verified" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);

    let ack = client
        .verify_email("amina@example.com", "verify-token")
        .await
        .unwrap();

    assert_eq!(ack.message.as_deref(), Some("Email verified"));
}

#[tokio::test]
async fn given_unverified_account_when_resend_requested_then_acknowledged() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/resend-verification"))
        .and(body_json(json!({ "email": "amina@example.com" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "message": "Verification mail re-sent" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);

    let ack = client.resend_verification("amina@example.com").await.unwrap();

    assert_eq!(ack.message.as_deref(), Some("Verification mail re-sent"));
}

#[tokio::test]
async fn given_password_reset_flow_when_requested_then_acknowledged() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/request-password-reset"))
        .and(body_json(json!({ "email": "amina@example.com" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "message": "Reset mail sent" })),
        )
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/reset-password"))
        .and(body_json(json!({ "token": "reset-token", "newPassword": "brand-new-pass" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "message": "Password updated" })),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);

    let requested = client.request_password_reset("amina@example.com").await.unwrap();
    assert_eq!(requested.message.as_deref(), Some("Reset mail sent"));

    let reset = client.reset_password("reset-token", "brand-new-pass").await.unwrap();
    assert_eq!(reset.message.as_deref(), Some("Password updated"));
}
