//! Test helpers for portal API integration tests.
//!
//! Every test runs against a local wiremock server; the client is built
//! with a short timeout so transport-level failures surface quickly.

use portal_core::api::PortalClient;
use portal_core::session::SessionStore;

use std::time::Duration;

use serde_json::json;
use wiremock::MockServer;

pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Client with a fresh session pointed at the mock server.
pub fn client_for(server: &MockServer) -> PortalClient {
    client_with_session(server, SessionStore::new())
}

/// Client sharing a pre-built (possibly pre-seeded) session store.
pub fn client_with_session(server: &MockServer, session: SessionStore) -> PortalClient {
    // Url::join needs the trailing slash to treat the base as a directory.
    let base_url = format!("{}/", server.uri());
    PortalClient::with_session(&base_url, session, TEST_TIMEOUT)
        .expect("mock server URI must be a valid base URL")
}

/// Minimal dashboard overview body matching the server shape.
pub fn overview_body() -> serde_json::Value {
    json!({
        "stats": {
            "totalLands": 3,
            "totalApplications": 2,
            "approvedCofO": 1,
            "pendingCofO": 1,
            "rejectedCofO": 0
        },
        "recentApplications": [{
            "id": "app-1",
            "applicationNumber": "CofO/2025/0001",
            "status": "IN_REVIEW",
            "submittedAt": "2025-11-02T09:30:00Z",
            "paymentStatus": "SUCCESS"
        }],
        "recentPayments": [{
            "reference": "PSK-REF-1",
            "amount": 5000.0,
            "status": "SUCCESS",
            "date": "2025-11-02T09:28:00Z"
        }]
    })
}

/// Login response body for a known citizen.
pub fn login_body(token: &str) -> serde_json::Value {
    json!({
        "user": {
            "id": "usr-1",
            "name": "Amina Bello",
            "email": "amina@example.com",
            "role": "CITIZEN"
        },
        "accessToken": token
    })
}
