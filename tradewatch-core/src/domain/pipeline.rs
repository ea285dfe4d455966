//! Pipeline domain types

use serde::{Deserialize, Serialize};

use crate::domain::log::LogEntry;

/// Snapshot of the server-side pipeline run
///
/// The run itself is owned by the API; this is a read-only, possibly stale copy
/// replaced wholesale on every status fetch. No field here is authoritative and
/// the client never mutates one directly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineStatus {
    /// True while the job is active
    pub is_running: bool,
    /// Name of the step currently executing, if the server reports one
    #[serde(default)]
    pub current_step: Option<String>,
    #[serde(default)]
    pub total_steps: u32,
    #[serde(default)]
    pub completed_steps: u32,
    /// Percentage in [0, 100]; the server rounds it, expected (not guaranteed)
    /// to track completed_steps/total_steps
    #[serde(default)]
    pub progress: f64,
    #[serde(default)]
    pub start_time: Option<chrono::DateTime<chrono::Utc>>,
    /// Set only after a run has ended
    #[serde(default)]
    pub end_time: Option<chrono::DateTime<chrono::Utc>>,
    /// Elapsed seconds; the server reports running time while active and the
    /// final duration once the run ends
    #[serde(default)]
    pub duration: Option<i64>,
    /// Non-null means the most recent run failed
    #[serde(default)]
    pub error: Option<String>,
    /// Opaque per-step results document, rendered verbatim
    #[serde(default)]
    pub results: serde_json::Value,
    /// Append-only until cleared; the server truncates to the most recent entries
    #[serde(default)]
    pub logs: Vec<LogEntry>,
}

/// Parameters for a pipeline run
///
/// Flat, user-editable set passed verbatim as the body of the start command.
/// Defaults mirror the server's own; no domain validation happens client-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    // News ingestion
    pub skip_ingest: bool,
    pub max_news: u32,
    pub allow_langs: String,

    // Processing
    pub since_hours: u32,
    pub model: String,
    pub half_life: u32,
    pub lookback_hours: u32,
    pub apply_overall_when_missing: bool,

    // Recommendation generation
    pub skip_recommendations: bool,
    pub benchmark: String,
    pub min_cap: f64,
    pub universe_limit: u32,
    pub rs_threshold: f64,
    pub alpha: f64,
    pub k: f64,
    pub save_top: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            skip_ingest: false,
            max_news: 40,
            allow_langs: "en,zh".to_string(),
            since_hours: 24,
            model: "deepseek-reasoner".to_string(),
            half_life: 72,
            lookback_hours: 168,
            apply_overall_when_missing: false,
            skip_recommendations: false,
            benchmark: "SPY".to_string(),
            min_cap: 20_000_000_000.0,
            universe_limit: 800,
            rs_threshold: 70.0,
            alpha: 0.2,
            k: 1.0,
            save_top: 200,
        }
    }
}
