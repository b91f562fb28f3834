pub mod api;
pub mod config;
pub mod error;
pub mod gate;
pub mod session;
pub mod wizard;

#[cfg(test)]
mod tests;

/// Route the embedding application must navigate to after a forced logout.
pub const LOGIN_ROUTE: &str = "/auth/login";

pub const PORTAL_API_HOSTNAME: &str = "geo-tech-backend.onrender.com";
pub const DEFAULT_API_BASE_URL: &str =
    const_format::concatcp!("https://", PORTAL_API_HOSTNAME, "/api/");
