//! Authentication endpoints.
//!
//! Login, register, and the password/email flows go out without 401
//! interception: an authorization failure from these endpoints is a
//! refusal of the submitted credentials, not an expired token. The
//! refresh call itself lives here too (cookie-authenticated, no body)
//! and is only ever invoked by the refresh coordinator.

use crate::api::{ApiMessage, PortalClient};
use crate::api::validation::{validate_email, validate_password, validate_phone};
use crate::error::{ApiError, CoreError};
use crate::session::UserProfile;

use common::RedactedAccessToken;

use log::{debug, info};
use serde::{Deserialize, Serialize};

const LOGIN_ENDPOINT: &str = "auth/login";
const REGISTER_ENDPOINT: &str = "auth/register";
const LOGOUT_ENDPOINT: &str = "auth/logout";
const REFRESH_ENDPOINT: &str = "auth/refresh-token";
const VERIFY_EMAIL_ENDPOINT: &str = "auth/verify-email";
const RESEND_VERIFICATION_ENDPOINT: &str = "auth/resend-verification";
const REQUEST_PASSWORD_RESET_ENDPOINT: &str = "auth/request-password-reset";
const RESET_PASSWORD_ENDPOINT: &str = "auth/reset-password";

#[derive(Debug, Clone, Serialize)]
pub struct RegisterPayload {
    #[serde(rename = "fullName")]
    pub full_name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: UserProfile,
    pub access_token: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RefreshResponse {
    pub access_token: String,
}

impl PortalClient {
    /// `POST /auth/login` - on success the session becomes authenticated
    /// and every subsequent call carries the returned bearer token.
    pub async fn login(&self, email: &str, password: &str) -> Result<UserProfile, ApiError> {
        let url = self.endpoint(LOGIN_ENDPOINT)?;

        self.session().set_loading().await;

        let body = serde_json::json!({ "email": email, "password": password });
        let response = self.send_plain(self.http().post(url).json(&body)).await;

        let response = match response {
            Ok(response) => response,
            Err(error) => {
                self.session().fail(error.to_string()).await;
                return Err(error);
            }
        };

        match self.json_ok::<LoginResponse>(response).await {
            Ok(login) => {
                info!("Login succeeded for {}", login.user.email);
                self.session()
                    .set_authenticated(
                        login.user.clone(),
                        RedactedAccessToken::new(login.access_token),
                    )
                    .await;
                Ok(login.user)
            }
            Err(error) => {
                self.session().fail(error.to_string()).await;
                Err(error)
            }
        }
    }

    /// `POST /auth/register`.
    ///
    /// # Errors
    ///
    /// Field validation runs client-side first; an invalid payload is
    /// never sent to the server.
    pub async fn register(&self, payload: &RegisterPayload) -> Result<ApiMessage, CoreError> {
        validate_email(&payload.email)?;
        validate_password(&payload.password)?;
        if let Some(phone) = &payload.phone {
            validate_phone(phone)?;
        }

        let url = self.endpoint(REGISTER_ENDPOINT)?;
        let response = self.send_plain(self.http().post(url).json(payload)).await?;
        Ok(self.json_ok(response).await?)
    }

    /// `POST /auth/logout` - best-effort server call, then the local
    /// session is cleared regardless.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let url = self.endpoint(LOGOUT_ENDPOINT)?;
        let result = self.send_plain(self.http().post(url)).await;

        self.session().clear().await;

        match result {
            Ok(response) => self.accept_ok(response).await,
            Err(error) => {
                debug!("Logout call failed after local clear: {error}");
                Err(error)
            }
        }
    }

    /// `POST /auth/verify-email`.
    pub async fn verify_email(&self, email: &str, token: &str) -> Result<ApiMessage, ApiError> {
        let url = self.endpoint(VERIFY_EMAIL_ENDPOINT)?;
        let body = serde_json::json!({ "email": email, "token": token });
        let response = self.send_plain(self.http().post(url).json(&body)).await?;
        self.json_ok(response).await
    }

    /// `POST /auth/resend-verification`.
    pub async fn resend_verification(&self, email: &str) -> Result<ApiMessage, ApiError> {
        let url = self.endpoint(RESEND_VERIFICATION_ENDPOINT)?;
        let body = serde_json::json!({ "email": email });
        let response = self.send_plain(self.http().post(url).json(&body)).await?;
        self.json_ok(response).await
    }

    /// `POST /auth/request-password-reset`.
    pub async fn request_password_reset(&self, email: &str) -> Result<ApiMessage, ApiError> {
        let url = self.endpoint(REQUEST_PASSWORD_RESET_ENDPOINT)?;
        let body = serde_json::json!({ "email": email });
        let response = self.send_plain(self.http().post(url).json(&body)).await?;
        self.json_ok(response).await
    }

    /// `POST /auth/reset-password`.
    pub async fn reset_password(
        &self,
        token: &str,
        new_password: &str,
    ) -> Result<ApiMessage, CoreError> {
        validate_password(new_password)?;

        let url = self.endpoint(RESET_PASSWORD_ENDPOINT)?;
        let body = serde_json::json!({ "token": token, "newPassword": new_password });
        let response = self.send_plain(self.http().post(url).json(&body)).await?;
        Ok(self.json_ok(response).await?)
    }

    /// The raw cookie-authenticated refresh handshake.
    ///
    /// No bearer header, no body, no 401 interception: recovery policy
    /// belongs to the coordinator, not to this call.
    pub(crate) async fn refresh_call(&self) -> Result<RefreshResponse, ApiError> {
        let url = self.endpoint(REFRESH_ENDPOINT)?;
        let response = self.send_plain(self.http().post(url)).await?;
        self.json_ok(response).await
    }
}
