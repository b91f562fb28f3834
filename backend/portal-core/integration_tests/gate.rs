//! Authorization gate integration tests.

use crate::helpers::{client_for, client_with_session};

use common::RedactedAccessToken;
use portal_core::gate::{AuthGate, GateDecision};
use portal_core::session::{SessionStatus, SessionStore};

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// **VALUE**: a returning citizen with a token in the store gets to
/// protected content without a single network round-trip.
///
/// **WHY THIS MATTERS**: the optimistic path is what keeps navigation
/// instant; a stale token is caught later by the reactive recovery.
///
/// **BUG THIS CATCHES**: a gate that "validates" the token against the
/// server on every navigation.
#[tokio::test]
async fn given_present_token_when_gate_checked_then_authorized_without_network() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh-token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let session = SessionStore::new();
    session.set_token(RedactedAccessToken::from("stale-but-present")).await;
    let client = client_with_session(&server, session);

    let gate = AuthGate::new(client);

    assert_eq!(gate.check().await, GateDecision::Authorized);
}

#[tokio::test]
async fn given_no_token_but_valid_cookie_when_gate_checked_then_refresh_restores_session() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "accessToken": "minted" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let gate = AuthGate::new(client.clone());

    assert_eq!(gate.check().await, GateDecision::Authorized);
    assert_eq!(client.session().bearer().await.unwrap().as_str(), "minted");
    assert_eq!(client.session().status().await, SessionStatus::Authenticated);
}

#[tokio::test]
async fn given_refused_refresh_when_gate_checked_then_redirect_to_login() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh-token"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "No refresh cookie" })),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let gate = AuthGate::new(client.clone());

    assert_eq!(
        gate.check().await,
        GateDecision::Unauthorized {
            redirect: "/auth/login"
        }
    );
    assert_eq!(
        client.session().status().await,
        SessionStatus::Unauthenticated
    );
}

/// Two consecutive checks with no intervening logout agree.
#[tokio::test]
async fn given_authorized_gate_when_checked_twice_then_same_decision() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "accessToken": "minted" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let gate = AuthGate::new(client);

    let first = gate.check().await;
    // Second check takes the optimistic path against the token the
    // first check minted.
    let second = gate.check().await;

    assert_eq!(first, GateDecision::Authorized);
    assert_eq!(second, first);
}
