//! Environment API Handler
//!
//! Reports the ODBC-related environment of the running process.

use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct EnvReport {
    #[serde(rename = "ODBCINI")]
    pub odbcini: Option<String>,
    #[serde(rename = "ODBCSYSINI")]
    pub odbcsysini: Option<String>,
    #[serde(rename = "DYLD_LIBRARY_PATH")]
    pub dyld_library_path: Option<String>,
}

impl EnvReport {
    pub fn capture() -> Self {
        Self {
            odbcini: std::env::var("ODBCINI").ok(),
            odbcsysini: std::env::var("ODBCSYSINI").ok(),
            dyld_library_path: std::env::var("DYLD_LIBRARY_PATH").ok(),
        }
    }
}

/// GET /env
pub async fn read_env() -> Json<EnvReport> {
    Json(EnvReport::capture())
}
