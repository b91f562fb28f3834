// Unit tests for the session store and its persisted slice.

use crate::session::{SessionStatus, SessionStore, UserProfile, persist};

use common::RedactedAccessToken;

fn citizen() -> UserProfile {
    UserProfile {
        id: Some("usr-1".to_string()),
        name: Some("Amina Bello".to_string()),
        email: "amina@example.com".to_string(),
        role: Some("CITIZEN".to_string()),
    }
}

/// **VALUE**: Verifies the core session invariant: Authenticated implies
/// a token is present.
///
/// **WHY THIS MATTERS**: The gate's optimistic fast path and the facade's
/// bearer attachment both assume an authenticated session can always
/// produce a credential.
///
/// **BUG THIS CATCHES**: Would catch a write path that flips status to
/// Authenticated without storing a token.
#[tokio::test]
async fn given_fresh_store_when_set_token_then_status_authenticated_with_token() {
    let store = SessionStore::new();
    assert_eq!(store.status().await, SessionStatus::Idle);

    store.set_token(RedactedAccessToken::from("abc")).await;

    assert_eq!(store.status().await, SessionStatus::Authenticated);
    let bearer = store.bearer().await.expect("token must be present");
    assert_eq!(bearer.as_str(), "abc");
}

#[tokio::test]
async fn given_authenticated_store_when_clear_then_unauthenticated_and_empty() {
    let store = SessionStore::new();
    store
        .set_authenticated(citizen(), RedactedAccessToken::from("abc"))
        .await;

    store.clear().await;

    assert_eq!(store.status().await, SessionStatus::Unauthenticated);
    assert!(store.bearer().await.is_none());
    assert!(store.user().await.is_none());
}

#[tokio::test]
async fn given_loading_store_when_fail_then_unauthenticated_with_error() {
    let store = SessionStore::new();
    store.set_loading().await;
    assert_eq!(store.status().await, SessionStatus::Loading);

    store.fail("Invalid credentials").await;

    let snapshot = store.snapshot().await;
    assert_eq!(snapshot.status, SessionStatus::Unauthenticated);
    assert_eq!(snapshot.error.as_deref(), Some("Invalid credentials"));
    assert!(snapshot.access_token.is_none());
}

/// **VALUE**: Verifies the authentication slice round-trips through
/// durable storage.
///
/// **WHY THIS MATTERS**: The persisted slice is what lets a session
/// survive a restart; without it every start forces a refresh.
#[tokio::test]
async fn given_authenticated_session_when_saved_and_hydrated_then_slice_restored() {
    let dir = tempfile::tempdir().unwrap();

    let store = SessionStore::new();
    store
        .set_authenticated(citizen(), RedactedAccessToken::from("abc"))
        .await;
    persist::save(&store, dir.path()).await.unwrap();

    let restored = SessionStore::new();
    let hydrated = persist::hydrate(&restored, dir.path()).await;

    assert!(hydrated);
    assert_eq!(restored.status().await, SessionStatus::Authenticated);
    assert_eq!(restored.bearer().await.unwrap().as_str(), "abc");
    assert_eq!(restored.user().await.unwrap().email, "amina@example.com");
}

/// Transient flags must never reach disk: a failed session saved and
/// restored comes back without its error message.
#[tokio::test]
async fn given_failed_session_when_saved_then_error_flag_not_persisted() {
    let dir = tempfile::tempdir().unwrap();

    let store = SessionStore::new();
    store.fail("boom").await;
    persist::save(&store, dir.path()).await.unwrap();

    let restored = SessionStore::new();
    let hydrated = persist::hydrate(&restored, dir.path()).await;

    assert!(!hydrated);
    assert!(restored.snapshot().await.error.is_none());
}

#[tokio::test]
async fn given_corrupt_session_file_when_hydrate_then_clean_logged_out_start() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("session.json"), "{not json").unwrap();

    let store = SessionStore::new();
    let hydrated = persist::hydrate(&store, dir.path()).await;

    assert!(!hydrated);
    assert_eq!(store.status().await, SessionStatus::Idle);
}

#[tokio::test]
async fn given_missing_session_file_when_hydrate_then_returns_false() {
    let dir = tempfile::tempdir().unwrap();

    let store = SessionStore::new();
    assert!(!persist::hydrate(&store, dir.path()).await);
}

#[tokio::test]
async fn given_persisted_session_when_discarded_then_hydrate_finds_nothing() {
    let dir = tempfile::tempdir().unwrap();

    let store = SessionStore::new();
    store.set_token(RedactedAccessToken::from("abc")).await;
    persist::save(&store, dir.path()).await.unwrap();

    persist::discard(dir.path()).await;

    let restored = SessionStore::new();
    assert!(!persist::hydrate(&restored, dir.path()).await);
}

/// Clones share state: a token set through one handle is visible
/// through every other.
#[tokio::test]
async fn given_cloned_store_when_token_set_then_visible_through_all_handles() {
    let store = SessionStore::new();
    let clone = store.clone();

    store.set_token(RedactedAccessToken::from("shared")).await;

    assert_eq!(clone.bearer().await.unwrap().as_str(), "shared");
}
