//! Land registration endpoints.
//!
//! Register and update carry their supporting documents as multipart
//! uploads; search is a radius query around a coordinate.

use crate::api::{ApiMessage, FilePart, PortalClient};
use crate::error::ApiError;

use reqwest::multipart::Form;
use serde::Deserialize;

const USER_LANDS_ENDPOINT: &str = "lands/get-user-lands";
const LAND_REGISTER_ENDPOINT: &str = "lands/land-register";
const SEARCH_LANDS_ENDPOINT: &str = "lands/search-lands";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LandDocument {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub document_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Land {
    pub id: String,
    #[serde(default)]
    pub owner_name: Option<String>,
    #[serde(default)]
    pub ownership_type: Option<String>,
    #[serde(default)]
    pub purpose: Option<String>,
    #[serde(default)]
    pub title_type: Option<String>,
    #[serde(default)]
    pub land_status: Option<String>,
    #[serde(default)]
    pub square_meters: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub documents: Vec<LandDocument>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LandsEnvelope {
    #[serde(default)]
    pub lands: Vec<Land>,
}

/// Fields submitted when registering a new land parcel.
#[derive(Debug, Clone)]
pub struct LandRegistrationForm {
    pub owner_name: String,
    pub longitude: f64,
    pub latitude: f64,
    pub total_square_meters: f64,
    pub ownership_type: String,
    pub purpose: String,
    pub title_type: String,
    pub documents: Vec<FilePart>,
}

impl LandRegistrationForm {
    fn to_form(&self) -> Form {
        let mut form = Form::new()
            .text("ownerName", self.owner_name.clone())
            .text("longitude", self.longitude.to_string())
            .text("latitude", self.latitude.to_string())
            .text("totalSquareMeters", self.total_square_meters.to_string())
            .text("ownershipType", self.ownership_type.clone())
            .text("purpose", self.purpose.clone())
            .text("titleType", self.title_type.clone());
        for document in &self.documents {
            form = form.part("documents", document.to_part());
        }
        form
    }
}

/// Fields accepted by the land update endpoint.
#[derive(Debug, Clone)]
pub struct LandUpdateForm {
    pub owner_name: String,
    pub ownership_type: String,
    pub purpose: String,
    pub title_type: String,
    /// New files only; existing documents stay on the server.
    pub documents: Vec<FilePart>,
}

impl LandUpdateForm {
    fn to_form(&self) -> Form {
        let mut form = Form::new()
            .text("ownerName", self.owner_name.clone())
            .text("ownershipType", self.ownership_type.clone())
            .text("purpose", self.purpose.clone())
            .text("titleType", self.title_type.clone());
        for document in &self.documents {
            form = form.part("documents", document.to_part());
        }
        form
    }
}

impl PortalClient {
    /// `GET /lands/get-user-lands`.
    pub async fn user_lands(&self) -> Result<LandsEnvelope, ApiError> {
        let url = self.endpoint(USER_LANDS_ENDPOINT)?;
        let response = self.execute(|| Ok(self.http().get(url.clone()))).await?;
        self.json_ok(response).await
    }

    /// `POST /lands/land-register` (multipart).
    pub async fn register_land(
        &self,
        form: &LandRegistrationForm,
    ) -> Result<ApiMessage, ApiError> {
        let url = self.endpoint(LAND_REGISTER_ENDPOINT)?;
        let response = self
            .execute(|| Ok(self.http().post(url.clone()).multipart(form.to_form())))
            .await?;
        self.json_ok(response).await
    }

    /// `PUT /lands/{id}` (multipart).
    pub async fn update_land(
        &self,
        land_id: &str,
        form: &LandUpdateForm,
    ) -> Result<ApiMessage, ApiError> {
        let url = self.endpoint(&format!("lands/{land_id}"))?;
        let response = self
            .execute(|| Ok(self.http().put(url.clone()).multipart(form.to_form())))
            .await?;
        self.json_ok(response).await
    }

    /// `DELETE /lands/{id}`.
    pub async fn delete_land(&self, land_id: &str) -> Result<ApiMessage, ApiError> {
        let url = self.endpoint(&format!("lands/{land_id}"))?;
        let response = self.execute(|| Ok(self.http().delete(url.clone()))).await?;
        self.json_ok(response).await
    }

    /// `GET /lands/search-lands?lat&lng&radius` - radius in kilometres,
    /// defaulting to 50 when `None`.
    pub async fn search_lands(
        &self,
        latitude: f64,
        longitude: f64,
        radius: Option<u32>,
    ) -> Result<LandsEnvelope, ApiError> {
        let radius = radius.unwrap_or(50);
        let mut url = self.endpoint(SEARCH_LANDS_ENDPOINT)?;
        url.query_pairs_mut()
            .append_pair("lat", &latitude.to_string())
            .append_pair("lng", &longitude.to_string())
            .append_pair("radius", &radius.to_string());

        let response = self.execute(|| Ok(self.http().get(url.clone()))).await?;
        self.json_ok(response).await
    }
}
