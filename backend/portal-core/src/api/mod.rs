//! The sole egress point for all portal server calls.
//!
//! `PortalClient` owns the base address, the underlying HTTP client
//! (cookie jar included - the refresh handshake is cookie-authenticated),
//! the shared session store, and the refresh coordinator. Callers never
//! see a raw 401 when recovery is possible: `execute` intercepts it,
//! funnels the request through the coordinator, and replays once with
//! the fresh token.

pub mod auth;
pub mod cofo;
pub mod dashboard;
pub mod lands;
pub mod payments;
pub mod validation;

use crate::error::ApiError;
use crate::session::SessionStore;
use crate::session::refresh::RefreshCoordinator;

use common::HttpStatusCode;

use std::sync::Arc;
use std::time::Duration;

use log::debug;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

const DEFAULT_TIMEOUT_DURATION: Duration = Duration::from_secs(30);

/// Generic `{message}` acknowledgement returned by several endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiMessage {
    #[serde(default)]
    pub message: Option<String>,
}

/// An in-memory file pending upload.
///
/// Uploads hold owned bytes so a request can be rebuilt for the one
/// permitted replay after token recovery.
#[derive(Debug, Clone)]
pub struct FilePart {
    pub file_name: String,
    pub content: Vec<u8>,
}

impl FilePart {
    pub fn new(file_name: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content,
        }
    }

    pub(crate) fn to_part(&self) -> reqwest::multipart::Part {
        reqwest::multipart::Part::bytes(self.content.clone()).file_name(self.file_name.clone())
    }
}

/// Normalized error body shape: `{message, errors?}`.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    errors: Option<serde_json::Value>,
}

#[derive(Clone)]
pub struct PortalClient {
    base_url: Url,
    client: Client,
    session: SessionStore,
    refresh: Arc<RefreshCoordinator>,
}

impl PortalClient {
    /// Build a client against `base_url_str` with a fresh session.
    pub fn new(base_url_str: &str) -> Result<Self, ApiError> {
        Self::with_session(base_url_str, SessionStore::new(), DEFAULT_TIMEOUT_DURATION)
    }

    /// Build a client sharing an existing session store (tests inject a
    /// pre-seeded store this way).
    pub fn with_session(
        base_url_str: &str,
        session: SessionStore,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url_str)?;
        let client = Client::builder()
            .timeout(timeout)
            .cookie_store(true)
            .build()?;

        Ok(Self {
            base_url,
            client,
            session,
            refresh: Arc::new(RefreshCoordinator::new()),
        })
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Run one refresh cycle through the coordinator (used by the gate).
    pub async fn refresh(&self) -> Result<(), ApiError> {
        self.refresh.refresh_token(self).await.map(|_| ())
    }

    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base_url.join(path)?)
    }

    pub(crate) fn http(&self) -> &Client {
        &self.client
    }

    /// Attach the current bearer token (if any) and send.
    async fn send_with_bearer(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        // The token is read at send time, so a `set_token` elsewhere is
        // visible to the very next call.
        let request = match self.session.bearer().await {
            Some(token) => request.bearer_auth(token.as_str()),
            None => request,
        };
        Ok(request.send().await?)
    }

    /// Send an authorized request with transparent 401 recovery.
    ///
    /// `build` is invoked again for the replay: request bodies (including
    /// multipart forms) cannot be cloned once consumed, so the request is
    /// reconstructed from owned data instead.
    ///
    /// A request is replayed at most once; a second 401 on the same
    /// request is rejected immediately.
    pub(crate) async fn execute<F>(&self, build: F) -> Result<Response, ApiError>
    where
        F: Fn() -> Result<RequestBuilder, ApiError>,
    {
        let response = self.send_with_bearer(build()?).await?;
        if !HttpStatusCode(response.status().as_u16()).is_unauthorized() {
            return Ok(response);
        }

        debug!("Request answered 401, attempting transparent recovery");
        self.refresh.refresh_token(self).await?;

        let replay = self.send_with_bearer(build()?).await?;
        if HttpStatusCode(replay.status().as_u16()).is_unauthorized() {
            return Err(ApiError::unauthorized());
        }
        Ok(replay)
    }

    /// Send without 401 interception (login, register, refresh itself):
    /// a 401 from these endpoints is a refusal, not an expired token.
    pub(crate) async fn send_plain(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        Ok(request.send().await?)
    }

    /// Decode a successful JSON body, or normalize the error response.
    pub(crate) async fn json_ok<T: DeserializeOwned>(
        &self,
        response: Response,
    ) -> Result<T, ApiError> {
        if !response.status().is_success() {
            return Err(normalize_error(response).await);
        }
        let value: T = response.json().await?;
        Ok(value)
    }

    /// Accept any successful response, or normalize the error.
    pub(crate) async fn accept_ok(&self, response: Response) -> Result<(), ApiError> {
        if !response.status().is_success() {
            return Err(normalize_error(response).await);
        }
        Ok(())
    }
}

/// Normalize a non-2xx response into `ApiError::Api`.
///
/// Servers answer business errors with `{message, errors?}`; anything
/// else (proxies, crashes) degrades to the raw body or bare status.
pub(crate) async fn normalize_error(response: Response) -> ApiError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();

    match serde_json::from_str::<ApiErrorBody>(&body) {
        Ok(parsed) => ApiError::from_http_response(
            status,
            parsed
                .message
                .unwrap_or_else(|| format!("Request failed with HTTP {status}")),
            parsed.errors,
        ),
        Err(_) if body.is_empty() => {
            ApiError::from_http_response(status, format!("HTTP {status}"), None)
        }
        Err(_) => ApiError::from_http_response(status, body, None),
    }
}
