//! Multi-step C of O application wizard.
//!
//! A linear, resumable sequence: select land, upload documents, review
//! and pay, confirmation. State lives only in this controller and is
//! discarded when it goes out of scope; nothing here is persisted.
//! Going back never discards data already entered, and the terminal
//! step is the only point at which accumulated state reaches the
//! server.

pub mod documents;

pub use documents::{DocumentSet, PendingDocument};

use crate::api::PortalClient;
use crate::api::payments::PaymentSession;
use crate::config::DocumentRequirements;
use crate::error::{CoreError, WizardError};

use log::{info, warn};
use uuid::Uuid;

/// Processing fee in naira for a C of O application.
pub const COFO_PROCESSING_FEE: u64 = 5_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WizardStep {
    SelectLand,
    UploadDocuments,
    ReviewAndPay,
    Completed,
}

pub struct CofoWizard {
    step: WizardStep,
    requirements: DocumentRequirements,
    land_id: Option<String>,
    documents: DocumentSet,
    payment: Option<PaymentSession>,
    application_number: Option<String>,
}

impl CofoWizard {
    pub fn new(requirements: DocumentRequirements) -> Self {
        Self {
            step: WizardStep::SelectLand,
            requirements,
            land_id: None,
            documents: DocumentSet::new(),
            payment: None,
            application_number: None,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn land_id(&self) -> Option<&str> {
        self.land_id.as_deref()
    }

    pub fn documents(&self) -> &DocumentSet {
        &self.documents
    }

    pub fn requirements(&self) -> &DocumentRequirements {
        &self.requirements
    }

    /// Confirmation reference, present once the wizard completes.
    pub fn application_number(&self) -> Option<&str> {
        self.application_number.as_deref()
    }

    /// Step 1: choose the land and advance to document upload.
    ///
    /// Re-selecting from a later (non-terminal) step rewinds to upload
    /// with documents intact.
    pub fn select_land(&mut self, land_id: impl Into<String>) -> Result<(), WizardError> {
        if self.step == WizardStep::Completed {
            return Err(WizardError::step_order(self.step));
        }
        self.land_id = Some(land_id.into());
        self.step = WizardStep::UploadDocuments;
        Ok(())
    }

    /// Attach a file to a category at the upload step.
    pub fn attach_document(&mut self, document: PendingDocument) -> Result<(), WizardError> {
        if self.step != WizardStep::UploadDocuments {
            return Err(WizardError::step_order(self.step));
        }
        if !self.requirements.is_known(&document.category) {
            return Err(WizardError::unknown_category(&document.category));
        }
        self.documents.attach(document);
        Ok(())
    }

    pub fn remove_document(&mut self, category: &str, id: Uuid) -> bool {
        self.documents.remove(category, id)
    }

    /// Required categories that still have no file attached.
    pub fn missing_required(&self) -> Vec<String> {
        self.requirements
            .required_keys()
            .filter(|key| !self.documents.has_any(key))
            .map(str::to_string)
            .collect()
    }

    /// Advance from upload to review.
    ///
    /// # Errors
    ///
    /// Refused (no navigation occurs) while any required category is
    /// empty.
    pub fn advance_to_review(&mut self) -> Result<(), WizardError> {
        if self.step != WizardStep::UploadDocuments {
            return Err(WizardError::step_order(self.step));
        }

        let missing = self.missing_required();
        if !missing.is_empty() {
            return Err(WizardError::missing_documents(missing));
        }

        self.step = WizardStep::ReviewAndPay;
        Ok(())
    }

    /// Navigate one step back. Data entered at any visited step is
    /// retained.
    pub fn back(&mut self) {
        self.step = match self.step {
            WizardStep::SelectLand | WizardStep::UploadDocuments => WizardStep::SelectLand,
            WizardStep::ReviewAndPay => WizardStep::UploadDocuments,
            // Terminal; no back navigation out of a submitted application.
            WizardStep::Completed => WizardStep::Completed,
        };
    }

    /// Open a payment session for the processing fee.
    ///
    /// The returned session feeds the external checkout widget; its
    /// success callback hands the settled reference to [`complete`].
    ///
    /// [`complete`]: CofoWizard::complete
    pub async fn begin_payment(
        &mut self,
        client: &PortalClient,
    ) -> Result<PaymentSession, CoreError> {
        if self.step != WizardStep::ReviewAndPay {
            return Err(WizardError::step_order(self.step).into());
        }
        let land_id = self
            .land_id
            .clone()
            .ok_or_else(WizardError::no_land_selected)?;

        let session = client
            .initialize_payment(&land_id, COFO_PROCESSING_FEE)
            .await?;
        info!(
            "Payment session opened: reference {} for application {}",
            session.reference, session.cof_o_application_id
        );
        self.payment = Some(session.clone());
        Ok(session)
    }

    /// Terminal submission: verify the settled payment, then send every
    /// collected document in a single multipart payload.
    ///
    /// Any failure (cancelled payment, rejected upload) returns the
    /// wizard to the review step with the collected documents intact.
    pub async fn complete(&mut self, client: &PortalClient) -> Result<String, CoreError> {
        if self.step != WizardStep::ReviewAndPay {
            return Err(WizardError::step_order(self.step).into());
        }
        let payment = self
            .payment
            .clone()
            .ok_or_else(WizardError::no_payment_session)?;

        match self.submit(client, &payment).await {
            Ok(application_number) => {
                self.step = WizardStep::Completed;
                self.application_number = Some(application_number.clone());
                Ok(application_number)
            }
            Err(error) => {
                // Stay on review; documents and payment session are kept
                // so the applicant can retry.
                warn!("C of O submission failed, returning to review: {error}");
                self.step = WizardStep::ReviewAndPay;
                Err(error)
            }
        }
    }

    async fn submit(
        &self,
        client: &PortalClient,
        payment: &PaymentSession,
    ) -> Result<String, CoreError> {
        client.verify_payment(&payment.reference).await?;

        let submission = self.documents.to_submission();
        let receipt = client
            .apply_for_cofo(&payment.cof_o_application_id, &submission)
            .await?;

        info!(
            "C of O application submitted: {} ({} documents)",
            receipt.application_number,
            submission.len()
        );
        Ok(receipt.application_number)
    }
}
