//! Refresh coordinator integration tests: single-flight, transparent
//! recovery, forced logout, and the no-infinite-retry guard.

use crate::helpers::{client_for, overview_body};

use portal_core::error::ApiError;
use portal_core::session::SessionStatus;

use common::RedactedAccessToken;

use std::time::Duration;

use futures_util::future::join_all;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// **VALUE**: Proves the core invariant: N requests failing inside one
/// refresh window produce exactly one refresh call.
///
/// **WHY THIS MATTERS**: Without single-flight, five views expiring at
/// once would fire five refresh handshakes; servers that rotate the
/// refresh cookie on use would then invalidate four of them and log the
/// user out at random.
///
/// **BUG THIS CATCHES**: The `expect(1)` on the refresh mock fails the
/// test if the coordinator's parked-waiter path ever issues a second
/// call.
#[tokio::test]
async fn given_five_concurrent_401s_when_recovered_then_exactly_one_refresh_call() {
    let server = MockServer::start().await;

    // Deliberately slow refresh so all five failures land inside the
    // same window.
    Mock::given(method("POST"))
        .and(path("/auth/refresh-token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "accessToken": "fresh" }))
                .set_delay(Duration::from_millis(200)),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/user/dashboard-overview"))
        .and(header("authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(overview_body()))
        .mount(&server)
        .await;

    // Any other credential is expired.
    Mock::given(method("GET"))
        .and(path("/user/dashboard-overview"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Token expired" })),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    client
        .session()
        .set_token(RedactedAccessToken::from("stale"))
        .await;

    let tasks = (0..5).map(|_| {
        let client = client.clone();
        tokio::spawn(async move { client.dashboard_overview().await })
    });

    for joined in join_all(tasks).await {
        let result = joined.expect("task must not panic");
        assert!(result.is_ok(), "every caller resolves after the shared refresh");
    }

    assert_eq!(client.session().bearer().await.unwrap().as_str(), "fresh");
    // expect(1) is verified when the server drops.
}

/// Scenario from the contract: a protected call 401s, the refresh
/// returns `xyz`, and the original call is replayed with no error
/// visible to the caller.
#[tokio::test]
async fn given_expired_token_when_protected_call_fails_then_transparently_replayed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "accessToken": "xyz" })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/user/dashboard-overview"))
        .and(header("authorization", "Bearer xyz"))
        .respond_with(ResponseTemplate::new(200).set_body_json(overview_body()))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/user/dashboard-overview"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Token expired" })),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    client
        .session()
        .set_token(RedactedAccessToken::from("expired"))
        .await;

    let overview = client.dashboard_overview().await.unwrap();

    assert_eq!(overview.stats.total_lands, 3);
    assert_eq!(client.session().bearer().await.unwrap().as_str(), "xyz");
    assert_eq!(client.session().status().await, SessionStatus::Authenticated);
}

/// Scenario: the refresh handshake itself is refused. The session is
/// cleared and the error tells the embedder to navigate to login.
#[tokio::test]
async fn given_refresh_refused_when_protected_call_fails_then_session_cleared_and_redirect() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh-token"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!({ "message": "Session expired" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/user/dashboard-overview"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Token expired" })),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    client
        .session()
        .set_token(RedactedAccessToken::from("stale"))
        .await;

    let error = client.dashboard_overview().await.unwrap_err();

    match error {
        ApiError::SessionExpired { redirect, .. } => assert_eq!(redirect, "/auth/login"),
        other => panic!("expected SessionExpired, got {other:?}"),
    }
    assert_eq!(
        client.session().status().await,
        SessionStatus::Unauthenticated
    );
    assert!(client.session().bearer().await.is_none());
}

/// **VALUE**: Verifies the no-infinite-retry guard: a request that 401s
/// again after its one replay is rejected without a second refresh.
///
/// **BUG THIS CATCHES**: Dropping the single-replay limit would loop
/// 401 -> refresh -> 401 forever against a server that rejects the
/// account rather than the token.
#[tokio::test]
async fn given_replay_also_401_when_recovering_then_rejected_without_second_refresh() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "accessToken": "fresh" })))
        .expect(1)
        .mount(&server)
        .await;

    // The account is blocked: every credential is refused.
    Mock::given(method("GET"))
        .and(path("/user/dashboard-overview"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Account suspended" })),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    client
        .session()
        .set_token(RedactedAccessToken::from("stale"))
        .await;

    let error = client.dashboard_overview().await.unwrap_err();

    assert!(matches!(error, ApiError::Unauthorized { .. }));
}

/// **VALUE**: A leader task cancelled mid-refresh (timeout, `select!`)
/// must not leave the coordinator stuck in its refreshing state.
///
/// **WHY THIS MATTERS**: Without the abandonment guard, every 401 after
/// the cancellation parks behind a refresh that will never settle, and
/// token recovery is dead for the client's lifetime.
///
/// **BUG THIS CATCHES**: Dropping the guard (or its drain-on-drop) wedges
/// the second `refresh()` here until the outer timeout fires.
#[tokio::test]
async fn given_leader_cancelled_mid_refresh_when_retried_then_fresh_cycle_opens() {
    let server = MockServer::start().await;

    // Slow enough that the leader can be aborted mid-handshake.
    Mock::given(method("POST"))
        .and(path("/auth/refresh-token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "accessToken": "fresh" }))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);

    let leader = tokio::spawn({
        let client = client.clone();
        async move { client.refresh().await }
    });
    tokio::time::sleep(Duration::from_millis(100)).await;
    leader.abort();
    assert!(leader.await.unwrap_err().is_cancelled());

    // A later expiry must be able to open a fresh cycle.
    let second = tokio::time::timeout(Duration::from_secs(3), client.refresh())
        .await
        .expect("second refresh must settle after the leader was cancelled");

    assert!(second.is_ok());
    assert_eq!(client.session().bearer().await.unwrap().as_str(), "fresh");
}

/// A waiter parked behind a cancelled leader is rejected, not hung.
#[tokio::test]
async fn given_leader_cancelled_when_waiter_parked_then_waiter_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh-token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "accessToken": "fresh" }))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);

    let leader = tokio::spawn({
        let client = client.clone();
        async move { client.refresh().await }
    });
    tokio::time::sleep(Duration::from_millis(100)).await;

    let waiter = tokio::spawn({
        let client = client.clone();
        async move { client.refresh().await }
    });
    tokio::time::sleep(Duration::from_millis(100)).await;

    leader.abort();
    let _ = leader.await;

    let outcome = tokio::time::timeout(Duration::from_secs(3), waiter)
        .await
        .expect("parked waiter must settle after the leader was cancelled")
        .expect("waiter task must not panic");

    match outcome.unwrap_err() {
        ApiError::SessionExpired { message, .. } => {
            assert!(message.contains("abandoned"));
        }
        other => panic!("expected SessionExpired, got {other:?}"),
    }
}

/// Two cycles are independent: after one settles, a later 401 opens a
/// fresh one.
#[tokio::test]
async fn given_two_separate_expiries_when_recovered_then_two_refresh_cycles() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "accessToken": "fresh" })))
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/user/dashboard-overview"))
        .and(header("authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(overview_body()))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/user/dashboard-overview"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Token expired" })),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);

    client
        .session()
        .set_token(RedactedAccessToken::from("stale-1"))
        .await;
    client.dashboard_overview().await.unwrap();

    // Simulate a second expiry later in the session's life.
    client
        .session()
        .set_token(RedactedAccessToken::from("stale-2"))
        .await;
    client.dashboard_overview().await.unwrap();
}
