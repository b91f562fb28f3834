//! Payment initialization and verification.
//!
//! The checkout itself happens in the external payment provider's
//! widget; this client only opens a payment session and verifies the
//! reference the widget's success callback hands back.

use crate::api::{ApiMessage, PortalClient};
use crate::error::ApiError;

use serde::Deserialize;

const INITIALIZE_PAYMENT_ENDPOINT: &str = "payments/initialize";
const VERIFY_PAYMENT_ENDPOINT: &str = "payments/verify";

/// Everything the external checkout widget needs, as returned by
/// `POST /payments/initialize`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSession {
    pub public_key: String,
    pub email: String,
    /// Amount in naira; the widget multiplies into kobo itself.
    pub amount: u64,
    pub reference: String,
    pub cof_o_application_id: String,
}

impl PortalClient {
    /// `POST /payments/initialize`.
    pub async fn initialize_payment(
        &self,
        land_id: &str,
        amount: u64,
    ) -> Result<PaymentSession, ApiError> {
        let url = self.endpoint(INITIALIZE_PAYMENT_ENDPOINT)?;
        let body = serde_json::json!({ "landID": land_id, "amount": amount });
        let response = self
            .execute(|| Ok(self.http().post(url.clone()).json(&body)))
            .await?;
        self.json_ok(response).await
    }

    /// `GET /payments/verify?reference=` - confirms the provider settled
    /// the reference before any documents are submitted.
    pub async fn verify_payment(&self, reference: &str) -> Result<ApiMessage, ApiError> {
        let mut url = self.endpoint(VERIFY_PAYMENT_ENDPOINT)?;
        url.query_pairs_mut().append_pair("reference", reference);
        let response = self.execute(|| Ok(self.http().get(url.clone()))).await?;
        self.json_ok(response).await
    }
}
