//! Pipeline command DTOs

use serde::{Deserialize, Serialize};

/// Response body of the start/stop/clear-logs commands
///
/// Success responses carry a human-readable message; rejections carry `error`
/// alongside a non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}
