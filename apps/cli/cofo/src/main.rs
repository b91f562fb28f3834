use cofo::error::CofoError;
use cofo::logger::initialize as LoggerInitialize;

use portal_core::api::PortalClient;
use portal_core::config::{PortalConfig, config_dir};
use portal_core::gate::{AuthGate, GateDecision};
use portal_core::session::{SessionStore, persist};

use common::ErrorLocation;

use std::env;
use std::fs::create_dir_all;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::info;

const EMAIL_ENV_VAR: &str = "PORTAL_EMAIL";
const PASSWORD_ENV_VAR: &str = "PORTAL_PASSWORD";
const BASE_URL_ENV_VAR: &str = "PORTAL_API_BASE_URL";

#[tokio::main]
async fn main() -> Result<(), CofoError> {
    // Optional .env for local credentials; absence is not an error.
    dotenvy::dotenv().ok();

    let app_dir = config_dir().ok_or_else(|| CofoError::app("No config directory available"))?;

    create_dir_all(&app_dir).map_err(|e| CofoError::Cofo {
        message: format!("Failed to create app directory: {e}"),
        location: ErrorLocation::from(Location::caller()),
    })?;

    // Initialize logger FIRST
    LoggerInitialize(&app_dir)?;

    info!("C of O portal client starting");
    info!("App directory: {}", app_dir.display());

    let mut config = PortalConfig::load(&app_dir)?;
    if let Ok(base_url) = env::var(BASE_URL_ENV_VAR) {
        info!("API base URL overridden by {BASE_URL_ENV_VAR}");
        config.api.base_url = base_url;
        config.validate()?;
    }
    let session_dir = session_dir(&config, &app_dir);

    let session = SessionStore::new();
    if persist::hydrate(&session, &session_dir).await {
        info!("Session hydrated from {}", session_dir.display());
    }

    let client = PortalClient::with_session(
        &config.api.base_url,
        session,
        Duration::from_secs(config.api.timeout_secs),
    )?;

    ensure_authenticated(&client).await?;

    let overview = client.dashboard_overview().await?;
    info!(
        "Dashboard: {} lands, {} applications ({} approved, {} pending, {} rejected)",
        overview.stats.total_lands,
        overview.stats.total_applications,
        overview.stats.approved_cof_o,
        overview.stats.pending_cof_o,
        overview.stats.rejected_cof_o,
    );
    for application in &overview.recent_applications {
        info!(
            "Recent application {}: {:?}",
            application.application_number, application.status
        );
    }

    persist::save(client.session(), &session_dir)
        .await
        .map_err(|e| CofoError::app(format!("Failed to persist session: {e}")))?;
    info!("Session persisted to {}", session_dir.display());

    Ok(())
}

fn session_dir(config: &PortalConfig, app_dir: &Path) -> PathBuf {
    config
        .storage
        .session_dir
        .clone()
        .unwrap_or_else(|| app_dir.to_path_buf())
}

/// Run the gate; on redirect, fall back to environment credentials.
async fn ensure_authenticated(client: &PortalClient) -> Result<(), CofoError> {
    let gate = AuthGate::new(client.clone());

    match gate.check().await {
        GateDecision::Authorized => {
            info!("Session authorized");
            Ok(())
        }
        GateDecision::Unauthorized { redirect } => {
            info!("No usable session (would redirect to {redirect}), trying credentials");
            let (email, password) = credentials_from_env()?;
            let user = client.login(&email, &password).await?;
            info!("Logged in as {}", user.email);
            Ok(())
        }
    }
}

fn credentials_from_env() -> Result<(String, String), CofoError> {
    let email = env::var(EMAIL_ENV_VAR);
    let password = env::var(PASSWORD_ENV_VAR);
    match (email, password) {
        (Ok(email), Ok(password)) => Ok((email, password)),
        _ => Err(CofoError::no_session(format!(
            "Set {EMAIL_ENV_VAR} and {PASSWORD_ENV_VAR} to log in"
        ))),
    }
}
