//! Route-level authorization gate.
//!
//! Decides, before protected content renders, whether the caller has a
//! usable session. One-shot per navigation: it never polls, and token
//! expiry during active use is caught reactively by the refresh
//! recovery on the next failing call instead.

use crate::LOGIN_ROUTE;
use crate::api::PortalClient;

use log::{debug, info};

/// Terminal outcome of a gate check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Render the protected content.
    Authorized,
    /// Redirect; the session is cleared.
    Unauthorized { redirect: &'static str },
}

pub struct AuthGate {
    client: PortalClient,
}

impl AuthGate {
    pub fn new(client: PortalClient) -> Self {
        Self { client }
    }

    /// Check the session once.
    ///
    /// A token already in the store authorizes immediately with no
    /// network call (optimistic path: a stale-but-present token grants
    /// access until the first failing call triggers recovery).
    /// Otherwise a single refresh attempt decides the outcome.
    ///
    /// Idempotent absent an intervening logout: two consecutive checks
    /// yield the same decision.
    pub async fn check(&self) -> GateDecision {
        if self.client.session().bearer().await.is_some() {
            debug!("Gate: access token present, authorizing optimistically");
            return GateDecision::Authorized;
        }

        match self.client.refresh().await {
            Ok(()) => {
                info!("Gate: session restored via refresh");
                GateDecision::Authorized
            }
            Err(error) => {
                // Session already cleared by the coordinator.
                info!("Gate: refresh failed ({}), redirecting", error.error_category());
                GateDecision::Unauthorized {
                    redirect: LOGIN_ROUTE,
                }
            }
        }
    }
}
