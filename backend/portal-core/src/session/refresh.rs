//! Single-flight access-token refresh.
//!
//! When several requests fail with 401 inside the same window, exactly
//! one refresh call goes out; every other failure parks as a waiter on
//! the in-flight attempt and resumes once it settles. The state machine
//! is explicit (`Idle | Refreshing{waiters}`) and the single-flight
//! invariant holds across tasks and threads, not just on one event loop.
//! The lock is a plain `std` mutex: it is only ever held for a state
//! flip, never across I/O, and that lets the abandonment guard restore
//! the state from a non-async `Drop`.
//!
//! Ordering guarantee: the shared refresh strictly happens-before every
//! queued resolution. The state flips back to `Idle` before any waiter
//! is resolved, so an independent later failure can start a fresh cycle.
//!
//! Cancellation: if the leader future is dropped mid-refresh (timeout,
//! `select!`), its guard restores `Idle` and rejects every parked
//! waiter, so the next 401 can open a fresh cycle instead of parking
//! behind a refresh that will never settle.

use crate::api::PortalClient;
use crate::error::{ApiError, RefreshFailure};

use common::RedactedAccessToken;

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use backoff::{ExponentialBackoff, backoff::Backoff};
use log::{debug, info, trace, warn};
use tokio::sync::oneshot;
use tokio::time::sleep as TokioSleep;

/// Upper bound on the whole refresh attempt, retries included.
const REFRESH_MAX_ELAPSED: Duration = Duration::from_secs(8);

const ABANDONED_MESSAGE: &str = "refresh attempt was abandoned";

/// A parked continuation: one request suspended awaiting the shared refresh.
type Waiter = oneshot::Sender<Result<RedactedAccessToken, RefreshFailure>>;

enum RefreshState {
    Idle,
    Refreshing { waiters: Vec<Waiter> },
}

/// Serializes token refresh to at most one concurrent attempt.
pub struct RefreshCoordinator {
    state: Mutex<RefreshState>,
}

impl Default for RefreshCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl RefreshCoordinator {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(RefreshState::Idle),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, RefreshState> {
        // A panic while holding the lock leaves the state itself valid,
        // so a poisoned lock is still usable.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Flip back to `Idle` and hand the parked waiters to the caller.
    fn take_waiters(&self) -> Vec<Waiter> {
        let mut state = self.lock_state();
        match std::mem::replace(&mut *state, RefreshState::Idle) {
            RefreshState::Refreshing { waiters } => waiters,
            RefreshState::Idle => Vec::new(),
        }
    }

    /// Obtain a fresh access token, joining an in-flight refresh when one
    /// exists.
    ///
    /// On success the new token has already been written to the session
    /// store. On failure the session has been cleared and the error tells
    /// the embedder where to redirect.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::SessionExpired`] when the refresh handshake is
    /// refused or exhausts its retry budget.
    pub async fn refresh_token(
        &self,
        client: &PortalClient,
    ) -> Result<RedactedAccessToken, ApiError> {
        // Decide leader vs. waiter under the lock, then release it before
        // any network I/O.
        let parked = {
            let mut state = self.lock_state();
            match &mut *state {
                RefreshState::Refreshing { waiters } => {
                    let (tx, rx) = oneshot::channel();
                    waiters.push(tx);
                    debug!("Refresh in flight, parking request ({} waiting)", waiters.len());
                    Some(rx)
                }
                RefreshState::Idle => {
                    *state = RefreshState::Refreshing {
                        waiters: Vec::new(),
                    };
                    None
                }
            }
        };

        if let Some(rx) = parked {
            return match rx.await {
                Ok(Ok(token)) => Ok(token),
                Ok(Err(failure)) => Err(ApiError::session_expired(failure)),
                // Channel closed without a value. The abandonment guard
                // rejects parked waiters explicitly, so this arm only
                // covers a sender lost outside that path.
                Err(_) => Err(ApiError::session_expired(RefreshFailure {
                    message: ABANDONED_MESSAGE.to_string(),
                    status_code: None,
                })),
            };
        }

        // From here on this future owes the parked waiters an outcome:
        // should it be dropped mid-refresh, the guard restores Idle and
        // rejects them instead of leaving them parked forever.
        let mut guard = AbandonGuard {
            coordinator: self,
            settled: false,
        };

        let outcome = call_refresh_with_backoff(client).await;

        // Flip back to Idle and drain waiters BEFORE resolving anyone, so a
        // subsequent independent 401 can open a new cycle.
        guard.settled = true;
        let waiters = self.take_waiters();

        match outcome {
            Ok(token) => {
                info!(
                    "Access token refreshed ({} chars), releasing {} waiter(s)",
                    token.len(),
                    waiters.len()
                );
                client.session().set_token(token.clone()).await;
                for waiter in waiters {
                    let _ = waiter.send(Ok(token.clone()));
                }
                Ok(token)
            }
            Err(error) => {
                warn!(
                    "Token refresh failed ({}), rejecting {} waiter(s) and clearing session",
                    error.error_category(),
                    waiters.len()
                );
                let failure = RefreshFailure::from(&error);
                client.session().clear().await;
                for waiter in waiters {
                    let _ = waiter.send(Err(failure.clone()));
                }
                Err(ApiError::session_expired(failure))
            }
        }
    }
}

/// Restores the coordinator when the leader is dropped before settling.
///
/// `settled` is flipped the moment the leader drains the state itself;
/// after that this drop is a no-op and cannot steal a later cycle's
/// waiters.
struct AbandonGuard<'a> {
    coordinator: &'a RefreshCoordinator,
    settled: bool,
}

impl Drop for AbandonGuard<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let waiters = self.coordinator.take_waiters();
        if !waiters.is_empty() {
            warn!(
                "Refresh leader dropped mid-flight, rejecting {} parked waiter(s)",
                waiters.len()
            );
        }
        for waiter in waiters {
            let _ = waiter.send(Err(RefreshFailure {
                message: ABANDONED_MESSAGE.to_string(),
                status_code: None,
            }));
        }
    }
}

/// Issue the cookie-authenticated refresh call with a bounded retry
/// budget.
///
/// Only transport failures and transient 5xx responses are retried; a
/// 4xx refusal of the refresh cookie never is.
async fn call_refresh_with_backoff(client: &PortalClient) -> Result<RedactedAccessToken, ApiError> {
    let mut backoff = ExponentialBackoff {
        max_elapsed_time: Some(REFRESH_MAX_ELAPSED),
        ..Default::default()
    };

    loop {
        match client.refresh_call().await {
            Ok(response) => {
                return Ok(RedactedAccessToken::new(response.access_token));
            }
            Err(error) if error.is_transient() => match backoff.next_backoff() {
                Some(duration) => {
                    trace!("Refresh not reachable, retrying after {duration:?}");
                    TokioSleep(duration).await;
                }
                None => {
                    warn!("Refresh retry budget exhausted after {REFRESH_MAX_ELAPSED:?}");
                    return Err(error);
                }
            },
            Err(error) => return Err(error),
        }
    }
}
