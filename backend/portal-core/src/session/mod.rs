//! Session token store: single source of truth for "am I logged in,
//! and with what credentials."
//!
//! The store is an explicit, injectable handle rather than ambient
//! global state: construct one per client (or per test) and clone it
//! wherever session reads are needed. All clones share the same
//! underlying state behind an `Arc<RwLock>`.
//!
//! The store performs no I/O itself; login, refresh, and logout are the
//! only writers, the HTTP facade and the authorization gate the readers.

pub mod persist;
pub mod refresh;

use common::RedactedAccessToken;

use std::sync::Arc;

use log::debug;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// Authenticated user profile, opaque to the client beyond display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Idle,
    Loading,
    Authenticated,
    Unauthenticated,
}

/// Current session snapshot.
///
/// Invariant: `status == Authenticated` implies `access_token` is
/// present. The store's write API is the only way to mutate a session,
/// and every path to `Authenticated` goes through a token.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: Option<UserProfile>,
    pub access_token: Option<RedactedAccessToken>,
    pub status: SessionStatus,
    pub error: Option<String>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            user: None,
            access_token: None,
            status: SessionStatus::Idle,
            error: None,
        }
    }
}

/// Shared session handle.
///
/// # Thread Safety
///
/// This type is `Clone` and can be shared across tasks. All clones share
/// the same underlying state.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the in-memory access token.
    ///
    /// Subsequent outbound calls pick the new token up immediately since
    /// the facade reads the store at send time. Cannot fail.
    pub async fn set_token(&self, token: RedactedAccessToken) {
        let mut session = self.inner.write().await;
        session.access_token = Some(token);
        session.status = SessionStatus::Authenticated;
        session.error = None;
    }

    /// Record a successful login: profile plus fresh token.
    pub async fn set_authenticated(&self, user: UserProfile, token: RedactedAccessToken) {
        let mut session = self.inner.write().await;
        session.user = Some(user);
        session.access_token = Some(token);
        session.status = SessionStatus::Authenticated;
        session.error = None;
    }

    /// Mark the session as mid-login or mid-refresh.
    pub async fn set_loading(&self) {
        let mut session = self.inner.write().await;
        session.status = SessionStatus::Loading;
        session.error = None;
    }

    /// Record a failed login or refresh.
    pub async fn fail(&self, message: impl Into<String>) {
        let mut session = self.inner.write().await;
        session.access_token = None;
        session.status = SessionStatus::Unauthenticated;
        session.error = Some(message.into());
    }

    /// Null the token and user; the session becomes unauthenticated.
    pub async fn clear(&self) {
        debug!("Clearing session");
        let mut session = self.inner.write().await;
        session.user = None;
        session.access_token = None;
        session.status = SessionStatus::Unauthenticated;
        session.error = None;
    }

    pub async fn status(&self) -> SessionStatus {
        self.inner.read().await.status
    }

    /// Current access token, if any.
    pub async fn bearer(&self) -> Option<RedactedAccessToken> {
        self.inner.read().await.access_token.clone()
    }

    pub async fn user(&self) -> Option<UserProfile> {
        self.inner.read().await.user.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.inner.read().await.status == SessionStatus::Authenticated
    }

    pub async fn snapshot(&self) -> Session {
        self.inner.read().await.clone()
    }
}
