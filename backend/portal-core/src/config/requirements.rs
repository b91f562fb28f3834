//! Document requirement catalogue for C of O applications.
//!
//! Loaded from `requirements.toml` so a deployment can adjust the
//! catalogue without a rebuild; the embedded defaults mirror the
//! published federal checklist.

use crate::error::config::ConfigError;

use common::ErrorLocation;

use std::collections::HashSet;
use std::panic::Location;
use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};

const REQUIREMENTS_FILE_NAME: &str = "requirements.toml";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentRequirement {
    /// Stable category key, e.g. `SURVEY_PLAN`.
    pub key: String,
    /// Human-readable label.
    pub label: String,
    #[serde(default)]
    pub required: bool,
}

impl DocumentRequirement {
    fn new(key: &str, label: &str, required: bool) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            required,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRequirements {
    #[serde(default)]
    pub documents: Vec<DocumentRequirement>,
}

impl Default for DocumentRequirements {
    fn default() -> Self {
        Self {
            documents: vec![
                DocumentRequirement::new("SURVEY_PLAN", "Survey Plan", true),
                DocumentRequirement::new("DEED_OF_ASSIGNMENT", "Deed of Assignment", true),
                DocumentRequirement::new("PURCHASE_RECEIPT", "Purchase Receipt", true),
                DocumentRequirement::new("LAND_AGREEMENT", "Land Purchase Agreement", true),
                DocumentRequirement::new("PASSPORT_PHOTO", "Passport Photograph", true),
                DocumentRequirement::new("MEANS_OF_ID", "Means of Identification", true),
                DocumentRequirement::new("TAX_CLEARANCE", "Tax Clearance Certificate", true),
                DocumentRequirement::new("SITE_PLAN", "Site Plan", false),
                DocumentRequirement::new("APPLICATION_LETTER", "Application Letter", false),
            ],
        }
    }
}

impl DocumentRequirements {
    /// Load from `{config_dir}/requirements.toml`, falling back to the
    /// embedded defaults when the file is missing.
    pub fn load(config_dir: &Path) -> Result<Self, ConfigError> {
        let requirements_path = config_dir.join(REQUIREMENTS_FILE_NAME);

        if !requirements_path.exists() {
            info!(
                "No requirements file at {}, using embedded catalogue",
                requirements_path.display()
            );
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&requirements_path).map_err(|e| {
            ConfigError::ReadError {
                location: ErrorLocation::from(Location::caller()),
                path: requirements_path.clone(),
                source: e,
            }
        })?;

        let requirements: DocumentRequirements = toml::from_str(&contents).map_err(|e| {
            warn!("Failed to parse requirements TOML: {e}");
            ConfigError::ParseError {
                location: ErrorLocation::from(Location::caller()),
                path: requirements_path.clone(),
                reason: e.to_string(),
            }
        })?;

        requirements.validate(&requirements_path)?;

        info!(
            "Loaded {} document requirements from {}",
            requirements.documents.len(),
            requirements_path.display()
        );
        Ok(requirements)
    }

    fn validate(&self, path: &Path) -> Result<(), ConfigError> {
        if self.documents.is_empty() {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: format!("{}: requirement catalogue is empty", path.display()),
            });
        }

        let mut seen = HashSet::new();
        for requirement in &self.documents {
            if requirement.key.is_empty() {
                return Err(ConfigError::ValidationError {
                    location: ErrorLocation::from(Location::caller()),
                    reason: format!("{}: requirement with empty key", path.display()),
                });
            }
            if !seen.insert(requirement.key.as_str()) {
                return Err(ConfigError::ValidationError {
                    location: ErrorLocation::from(Location::caller()),
                    reason: format!(
                        "{}: duplicate requirement key '{}'",
                        path.display(),
                        requirement.key
                    ),
                });
            }
        }
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&DocumentRequirement> {
        self.documents.iter().find(|req| req.key == key)
    }

    pub fn is_known(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Keys of every required category, in catalogue order.
    pub fn required_keys(&self) -> impl Iterator<Item = &str> {
        self.documents
            .iter()
            .filter(|req| req.required)
            .map(|req| req.key.as_str())
    }
}
