//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::StatusLine;

/// Response to a toggle request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToggleResponse {
    pub running: bool,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ToggleResponse {
    pub fn new(running: bool) -> Self {
        let message = if running {
            "Auto-redeem started"
        } else {
            "Auto-redeem stopped"
        };

        Self {
            running,
            message: message.to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// What the display renders, plus server metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub running: bool,
    /// `Status: Running` / `Status: Stopped`
    pub label: String,
    pub label_color: String,
    /// `Start` / `Stop`
    pub toggle_label: String,
    pub status: Option<StatusLine>,
    pub countdown: String,
    pub next_check_timestamp: i64,
    pub uptime: String,
    pub port: u16,
    pub host: String,
}

/// Error body for rejected requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
