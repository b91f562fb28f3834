//! End-to-end wizard flow against a mocked portal backend.

use crate::helpers::client_with_session;

use common::RedactedAccessToken;
use portal_core::api::FilePart;
use portal_core::api::cofo::CofoDocument;
use portal_core::config::DocumentRequirements;
use portal_core::session::SessionStore;
use portal_core::wizard::{COFO_PROCESSING_FEE, CofoWizard, PendingDocument, WizardStep};

use serde_json::json;
use wiremock::matchers::{body_json, body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn file(name: &str) -> FilePart {
    FilePart::new(name, b"%PDF-1.4 stub".to_vec())
}

/// Attach one file to every required category.
fn attach_required(wizard: &mut CofoWizard) {
    let required: Vec<String> = wizard
        .requirements()
        .required_keys()
        .map(str::to_string)
        .collect();
    for key in required {
        let title = format!("{key} upload");
        wizard
            .attach_document(PendingDocument::new(&key, title, file("doc.pdf")))
            .unwrap();
    }
}

fn payment_body() -> serde_json::Value {
    json!({
        "publicKey": "pk_test_123",
        "email": "amina@example.com",
        "amount": COFO_PROCESSING_FEE,
        "reference": "PSK-REF-42",
        "cofOApplicationId": "cofo-app-9"
    })
}

async fn authed_client(server: &MockServer) -> portal_core::api::PortalClient {
    let session = SessionStore::new();
    session.set_token(RedactedAccessToken::from("abc")).await;
    client_with_session(server, session)
}

#[tokio::test]
async fn given_complete_wizard_when_payment_settles_then_application_submitted() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/payments/initialize"))
        .and(body_json(json!({ "landID": "land-7", "amount": COFO_PROCESSING_FEE })))
        .respond_with(ResponseTemplate::new(200).set_body_json(payment_body()))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/payments/verify"))
        .and(query_param("reference", "PSK-REF-42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "settled" })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/cofo/apply/cofo-app-9"))
        .and(body_string_contains("documentsMeta"))
        .and(body_string_contains("SURVEY_PLAN"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "applicationNumber": "CofO/2025/0042" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = authed_client(&server).await;
    let mut wizard = CofoWizard::new(DocumentRequirements::default());

    wizard.select_land("land-7").unwrap();
    attach_required(&mut wizard);
    wizard.advance_to_review().unwrap();

    let session = wizard.begin_payment(&client).await.unwrap();
    assert_eq!(session.reference, "PSK-REF-42");

    let application_number = wizard.complete(&client).await.unwrap();

    assert_eq!(application_number, "CofO/2025/0042");
    assert_eq!(wizard.step(), WizardStep::Completed);
    assert_eq!(wizard.application_number(), Some("CofO/2025/0042"));
}

/// A failed verification returns the wizard to review with every
/// document intact; a retry with the same payment session succeeds.
#[tokio::test]
async fn given_unsettled_payment_when_completing_then_review_retained_and_retry_succeeds() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/payments/initialize"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payment_body()))
        .mount(&server)
        .await;

    // First verification attempt fails, subsequent ones settle.
    Mock::given(method("GET"))
        .and(path("/payments/verify"))
        .respond_with(
            ResponseTemplate::new(402).set_body_json(json!({ "message": "Payment not settled" })),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/payments/verify"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "settled" })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/cofo/apply/cofo-app-9"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "applicationNumber": "CofO/2025/0042" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = authed_client(&server).await;
    let mut wizard = CofoWizard::new(DocumentRequirements::default());

    wizard.select_land("land-7").unwrap();
    attach_required(&mut wizard);
    let attached = wizard.documents().total_files();
    wizard.advance_to_review().unwrap();
    wizard.begin_payment(&client).await.unwrap();

    let failure = wizard.complete(&client).await;

    assert!(failure.is_err());
    assert_eq!(wizard.step(), WizardStep::ReviewAndPay);
    assert_eq!(wizard.documents().total_files(), attached);

    let application_number = wizard.complete(&client).await.unwrap();
    assert_eq!(application_number, "CofO/2025/0042");
    assert_eq!(wizard.step(), WizardStep::Completed);
}

/// A rejected upload after a settled payment behaves the same way: no
/// state is lost and the submission can be retried.
#[tokio::test]
async fn given_rejected_submission_when_completing_then_documents_survive_for_retry() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/payments/initialize"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payment_body()))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/payments/verify"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "settled" })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/cofo/apply/cofo-app-9"))
        .respond_with(
            ResponseTemplate::new(422)
                .set_body_json(json!({ "message": "Corrupt document upload" })),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/cofo/apply/cofo-app-9"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "applicationNumber": "CofO/2025/0043" })),
        )
        .mount(&server)
        .await;

    let client = authed_client(&server).await;
    let mut wizard = CofoWizard::new(DocumentRequirements::default());

    wizard.select_land("land-7").unwrap();
    attach_required(&mut wizard);
    wizard.advance_to_review().unwrap();
    wizard.begin_payment(&client).await.unwrap();

    assert!(wizard.complete(&client).await.is_err());
    assert_eq!(wizard.step(), WizardStep::ReviewAndPay);
    assert!(!wizard.documents().is_empty());

    let application_number = wizard.complete(&client).await.unwrap();
    assert_eq!(application_number, "CofO/2025/0043");
}

/// Corrected documents for an application sent back for correction go
/// through the re-submit endpoint with the same multipart shape as the
/// original submission.
#[tokio::test]
async fn given_corrected_documents_when_resubmitted_then_multipart_shape_pinned() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/cofo/re-submit/cofo-app-9"))
        .and(body_string_contains("cofOApplicationId"))
        .and(body_string_contains("documentsMeta"))
        .and(body_string_contains("SURVEY_PLAN"))
        .and(body_string_contains("Corrected survey plan"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "applicationNumber": "CofO/2025/0042" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = authed_client(&server).await;
    let documents = vec![CofoDocument {
        document_type: "SURVEY_PLAN".to_string(),
        title: "Corrected survey plan".to_string(),
        file: file("survey-corrected.pdf"),
    }];

    let receipt = client.resubmit_cofo("cofo-app-9", &documents).await.unwrap();

    assert_eq!(receipt.application_number, "CofO/2025/0042");
}
