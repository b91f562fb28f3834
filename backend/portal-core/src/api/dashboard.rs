//! User dashboard overview.

use crate::api::PortalClient;
use crate::error::ApiError;

use serde::Deserialize;

const DASHBOARD_OVERVIEW_ENDPOINT: &str = "user/dashboard-overview";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    Approved,
    Draft,
    NeedsCorrection,
    InReview,
    Resubmitted,
    Rejected,
    Submitted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Success,
    Failed,
    Pending,
    Unpaid,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_lands: u64,
    pub total_applications: u64,
    pub approved_cof_o: u64,
    pub pending_cof_o: u64,
    pub rejected_cof_o: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentApplication {
    pub id: String,
    pub application_number: String,
    pub status: ApplicationStatus,
    pub submitted_at: String,
    pub payment_status: PaymentStatus,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentPayment {
    pub reference: String,
    pub amount: f64,
    pub status: PaymentStatus,
    pub date: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardOverview {
    pub stats: DashboardStats,
    #[serde(default)]
    pub recent_applications: Vec<RecentApplication>,
    #[serde(default)]
    pub recent_payments: Vec<RecentPayment>,
}

impl PortalClient {
    /// `GET /user/dashboard-overview`.
    pub async fn dashboard_overview(&self) -> Result<DashboardOverview, ApiError> {
        let url = self.endpoint(DASHBOARD_OVERVIEW_ENDPOINT)?;
        let response = self.execute(|| Ok(self.http().get(url.clone()))).await?;
        self.json_ok(response).await
    }
}
