// Unit tests for the document requirement catalogue.

use crate::config::DocumentRequirements;

#[test]
fn given_embedded_defaults_then_seven_required_two_optional() {
    let requirements = DocumentRequirements::default();

    assert_eq!(requirements.required_keys().count(), 7);
    assert_eq!(requirements.documents.len(), 9);
    assert!(requirements.get("SITE_PLAN").is_some_and(|req| !req.required));
    assert!(requirements.get("SURVEY_PLAN").is_some_and(|req| req.required));
}

#[test]
fn given_missing_requirements_file_when_loaded_then_embedded_catalogue_used() {
    let dir = tempfile::tempdir().unwrap();

    let requirements = DocumentRequirements::load(dir.path()).unwrap();

    assert!(requirements.is_known("TAX_CLEARANCE"));
}

#[test]
fn given_custom_requirements_toml_when_loaded_then_overrides_defaults() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("requirements.toml"),
        r#"
[[documents]]
key = "SURVEY_PLAN"
label = "Survey Plan"
required = true

[[documents]]
key = "COURT_AFFIDAVIT"
label = "Court Affidavit"
required = false
"#,
    )
    .unwrap();

    let requirements = DocumentRequirements::load(dir.path()).unwrap();

    assert_eq!(requirements.documents.len(), 2);
    assert!(requirements.is_known("COURT_AFFIDAVIT"));
    assert!(!requirements.is_known("TAX_CLEARANCE"));
}

#[test]
fn given_duplicate_keys_when_loaded_then_validation_error() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("requirements.toml"),
        r#"
[[documents]]
key = "SURVEY_PLAN"
label = "Survey Plan"
required = true

[[documents]]
key = "SURVEY_PLAN"
label = "Survey Plan (again)"
required = false
"#,
    )
    .unwrap();

    assert!(DocumentRequirements::load(dir.path()).is_err());
}

#[test]
fn given_empty_catalogue_when_loaded_then_validation_error() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("requirements.toml"), "documents = []").unwrap();

    assert!(DocumentRequirements::load(dir.path()).is_err());
}
