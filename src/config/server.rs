//! Scheduler server connection settings

use serde::{Deserialize, Serialize};

/// Where the job scheduler's HTTP API lives and how long to wait for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL the `/api/*` endpoints are resolved against
    pub base_url: String,
    /// Per-request timeout
    pub timeout_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_seconds: 10,
        }
    }
}
