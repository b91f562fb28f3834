//! Certificate of Occupancy application submission.

use crate::api::{FilePart, PortalClient};
use crate::error::ApiError;

use reqwest::multipart::Form;
use serde::Deserialize;

/// One document in a C of O submission: the file plus the metadata the
/// server records about it.
#[derive(Debug, Clone)]
pub struct CofoDocument {
    /// Category key, e.g. `SURVEY_PLAN`.
    pub document_type: String,
    pub title: String,
    pub file: FilePart,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CofoReceipt {
    pub application_number: String,
}

/// Build the multipart payload: one `documents` part per file plus a
/// `documentsMeta` JSON field describing per-file type/title in the
/// same order.
fn submission_form(application_id: &str, documents: &[CofoDocument]) -> Result<Form, ApiError> {
    let meta: Vec<serde_json::Value> = documents
        .iter()
        .map(|doc| serde_json::json!({ "type": doc.document_type, "title": doc.title }))
        .collect();

    let mut form = Form::new()
        .text("cofOApplicationId", application_id.to_string())
        .text("documentsMeta", serde_json::to_string(&meta)?);

    for document in documents {
        form = form.part("documents", document.file.to_part());
    }
    Ok(form)
}

impl PortalClient {
    /// `POST /cofo/apply/{applicationId}` (multipart).
    pub async fn apply_for_cofo(
        &self,
        application_id: &str,
        documents: &[CofoDocument],
    ) -> Result<CofoReceipt, ApiError> {
        let url = self.endpoint(&format!("cofo/apply/{application_id}"))?;
        let response = self
            .execute(|| {
                Ok(self
                    .http()
                    .post(url.clone())
                    .multipart(submission_form(application_id, documents)?))
            })
            .await?;
        self.json_ok(response).await
    }

    /// `POST /cofo/re-submit/{id}` (multipart) - corrected documents for
    /// an application sent back as NEEDS_CORRECTION.
    pub async fn resubmit_cofo(
        &self,
        application_id: &str,
        documents: &[CofoDocument],
    ) -> Result<CofoReceipt, ApiError> {
        let url = self.endpoint(&format!("cofo/re-submit/{application_id}"))?;
        let response = self
            .execute(|| {
                Ok(self
                    .http()
                    .post(url.clone())
                    .multipart(submission_form(application_id, documents)?))
            })
            .await?;
        self.json_ok(response).await
    }
}
