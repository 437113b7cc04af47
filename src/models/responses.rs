use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub roster: RosterStatus,
}

/// Roster cache state, as seen without triggering a fetch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterStatus {
    pub loaded: bool,
    pub entries: usize,
    #[serde(rename = "fetchedAt")]
    pub fetched_at: Option<chrono::DateTime<chrono::Utc>>,
    pub stale: bool,
}

/// Error response; `error` is shown to users as is, `code` is for clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    pub status_code: u16,
}
