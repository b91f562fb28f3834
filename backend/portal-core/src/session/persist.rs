//! Durable storage for the authentication slice of the session.
//!
//! Only the persisted subset (user profile + token string) survives a
//! restart; transient `status`/`error` flags never touch disk. A corrupt
//! or missing file yields a clean unauthenticated start rather than an
//! error: losing a cached session is recoverable, refusing to start over
//! it is not.

use crate::error::SessionError;
use crate::session::{SessionStore, UserProfile};

use common::RedactedAccessToken;

use std::io::ErrorKind;
use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};
use tokio::fs;

const SESSION_FILE_NAME: &str = "session.json";

/// The authentication slice as written to disk.
#[derive(Debug, Serialize, Deserialize)]
struct PersistedAuth {
    #[serde(default)]
    user: Option<UserProfile>,
    #[serde(default)]
    access_token: Option<String>,
}

/// Rehydrate the store from `{storage_dir}/session.json`.
///
/// Returns `true` when a usable session (user or token) was restored.
/// Must run before any gate check so the optimistic fast path can see
/// the restored token.
pub async fn hydrate(store: &SessionStore, storage_dir: &Path) -> bool {
    let session_path = storage_dir.join(SESSION_FILE_NAME);

    let contents = match fs::read_to_string(&session_path).await {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!("No persisted session at {}", session_path.display());
            return false;
        }
        Err(e) => {
            warn!("Failed to read persisted session, starting logged out: {e}");
            return false;
        }
    };

    let persisted: PersistedAuth = match serde_json::from_str(&contents) {
        Ok(persisted) => persisted,
        Err(e) => {
            warn!("Persisted session is corrupt, starting logged out: {e}");
            return false;
        }
    };

    match persisted.access_token {
        Some(token) => {
            if let Some(user) = persisted.user {
                store
                    .set_authenticated(user, RedactedAccessToken::new(token))
                    .await;
            } else {
                store.set_token(RedactedAccessToken::new(token)).await;
            }
            info!("Restored persisted session from {}", session_path.display());
            true
        }
        None => {
            // A profile without a token is not a usable session; the gate
            // will attempt a cookie refresh instead.
            false
        }
    }
}

/// Persist the authentication slice to `{storage_dir}/session.json`.
///
/// Uses temp file + rename for atomicity.
pub async fn save(store: &SessionStore, storage_dir: &Path) -> Result<(), SessionError> {
    let snapshot = store.snapshot().await;

    let persisted = PersistedAuth {
        user: snapshot.user,
        access_token: snapshot
            .access_token
            .as_ref()
            .map(|token| token.as_str().to_string()),
    };

    fs::create_dir_all(storage_dir)
        .await
        .map_err(|e| SessionError::write(storage_dir.to_path_buf(), e))?;

    let session_path = storage_dir.join(SESSION_FILE_NAME);
    let temp_path = storage_dir.join(format!("{SESSION_FILE_NAME}.tmp"));

    let json = serde_json::to_string_pretty(&persisted)
        .map_err(|e| SessionError::serialize(e.to_string()))?;

    fs::write(&temp_path, json)
        .await
        .map_err(|e| SessionError::write(temp_path.clone(), e))?;

    fs::rename(&temp_path, &session_path)
        .await
        .map_err(|e| SessionError::write(session_path.clone(), e))?;

    info!("Session persisted to {}", session_path.display());
    Ok(())
}

/// Remove the persisted slice (logout).
pub async fn discard(storage_dir: &Path) {
    let session_path = storage_dir.join(SESSION_FILE_NAME);
    match fs::remove_file(&session_path).await {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => warn!("Failed to remove persisted session: {e}"),
    }
}
