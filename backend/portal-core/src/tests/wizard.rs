// Unit tests for the wizard step machine — local behavior only, the
// terminal submission flow is covered by integration tests.

use crate::api::FilePart;
use crate::config::DocumentRequirements;
use crate::error::WizardError;
use crate::wizard::{CofoWizard, PendingDocument, WizardStep};

fn wizard() -> CofoWizard {
    CofoWizard::new(DocumentRequirements::default())
}

fn pdf(category: &str) -> PendingDocument {
    PendingDocument::new(
        category,
        format!("{category} scan"),
        FilePart::new("scan.pdf", b"%PDF-1.4 test".to_vec()),
    )
}

/// Attach one file to every required category.
fn fill_required(wizard: &mut CofoWizard) {
    let required: Vec<String> = wizard
        .requirements()
        .required_keys()
        .map(str::to_string)
        .collect();
    for key in required {
        wizard.attach_document(pdf(&key)).unwrap();
    }
}

#[test]
fn given_new_wizard_when_land_selected_then_advances_to_upload() {
    let mut wizard = wizard();
    assert_eq!(wizard.step(), WizardStep::SelectLand);

    wizard.select_land("land-1").unwrap();

    assert_eq!(wizard.step(), WizardStep::UploadDocuments);
    assert_eq!(wizard.land_id(), Some("land-1"));
}

/// **VALUE**: Verifies the required-document gate refuses advancement
/// while a required category is empty, and that no navigation occurs.
///
/// **WHY THIS MATTERS**: This is the wizard's only validation barrier;
/// if it leaks, incomplete applications reach payment.
#[test]
fn given_missing_required_category_when_advancing_then_refused_without_navigation() {
    let mut wizard = wizard();
    wizard.select_land("land-1").unwrap();
    fill_required(&mut wizard);

    // Empty one required category again.
    let survey = wizard.documents().in_category("SURVEY_PLAN")[0].id;
    assert!(wizard.remove_document("SURVEY_PLAN", survey));

    let error = wizard.advance_to_review().unwrap_err();
    match error {
        WizardError::MissingDocuments { missing, .. } => {
            assert_eq!(missing, vec!["SURVEY_PLAN".to_string()]);
        }
        other => panic!("expected MissingDocuments, got {other:?}"),
    }
    assert_eq!(wizard.step(), WizardStep::UploadDocuments);

    // Re-attach and the gate opens.
    wizard.attach_document(pdf("SURVEY_PLAN")).unwrap();
    wizard.advance_to_review().unwrap();
    assert_eq!(wizard.step(), WizardStep::ReviewAndPay);
}

/// **VALUE**: Verifies back-navigation never discards entered data.
///
/// **WHY THIS MATTERS**: An applicant stepping back to double-check
/// uploads must find every attached file still there.
#[test]
fn given_documents_attached_when_navigating_back_and_forth_then_documents_survive() {
    let mut wizard = wizard();
    wizard.select_land("land-1").unwrap();
    fill_required(&mut wizard);
    let attached = wizard.documents().total_files();

    wizard.advance_to_review().unwrap();
    wizard.back();

    assert_eq!(wizard.step(), WizardStep::UploadDocuments);
    assert_eq!(wizard.documents().total_files(), attached);

    wizard.advance_to_review().unwrap();
    assert_eq!(wizard.documents().total_files(), attached);
}

#[test]
fn given_upload_step_when_attaching_unknown_category_then_rejected() {
    let mut wizard = wizard();
    wizard.select_land("land-1").unwrap();

    let error = wizard.attach_document(pdf("CHARTER_OF_NOBILITY")).unwrap_err();
    assert!(matches!(error, WizardError::UnknownCategory { .. }));
}

#[test]
fn given_select_step_when_attaching_document_then_step_order_error() {
    let mut wizard = wizard();

    let error = wizard.attach_document(pdf("SURVEY_PLAN")).unwrap_err();
    assert!(matches!(error, WizardError::StepOrder { .. }));
}

#[test]
fn given_optional_categories_empty_when_required_filled_then_advance_allowed() {
    let mut wizard = wizard();
    wizard.select_land("land-1").unwrap();
    fill_required(&mut wizard);

    // SITE_PLAN and APPLICATION_LETTER deliberately left empty.
    assert!(wizard.missing_required().is_empty());
    wizard.advance_to_review().unwrap();
}

#[test]
fn given_first_step_when_back_then_stays_on_first_step() {
    let mut wizard = wizard();
    wizard.back();
    assert_eq!(wizard.step(), WizardStep::SelectLand);
}

#[test]
fn given_multiple_files_one_category_when_one_removed_then_category_still_satisfied() {
    let mut wizard = wizard();
    wizard.select_land("land-1").unwrap();
    fill_required(&mut wizard);
    wizard.attach_document(pdf("SURVEY_PLAN")).unwrap();

    let first = wizard.documents().in_category("SURVEY_PLAN")[0].id;
    wizard.remove_document("SURVEY_PLAN", first);

    assert!(wizard.missing_required().is_empty());
}
