//! Run state types
//!
//! Client-local view of the pipeline run lifecycle. The server only exposes a
//! boolean `is_running` plus an error field; these types give the client an
//! explicit state machine over that, including the optimistic labels the server
//! never sees (`Starting`, `StoppingRequested`).

use serde::{Deserialize, Serialize};

use crate::domain::pipeline::PipelineStatus;

/// Lifecycle state of the mirrored pipeline run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunState {
    /// No run active and none observed to finish yet
    Idle,
    /// Start command issued, `is_running = true` not yet observed
    Starting,
    /// Last snapshot showed the run active
    Running,
    /// Stop command issued; authoritative only once a poll confirms
    StoppingRequested,
    /// A run was observed to transition active -> inactive
    Finished(RunOutcome),
}

impl RunState {
    /// True for states in which a start command must be suppressed client-side
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            RunState::Starting | RunState::Running | RunState::StoppingRequested
        )
    }
}

/// Terminal classification of a finished run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    Success,
    /// Server-provided error text, passed through unchanged
    Error(String),
}

impl RunOutcome {
    /// Classify a snapshot observed after a `true -> false` transition of
    /// `is_running`: an error string means the run failed, otherwise success.
    pub fn classify(status: &PipelineStatus) -> Self {
        match &status.error {
            Some(message) => RunOutcome::Error(message.clone()),
            None => RunOutcome::Success,
        }
    }
}

/// Result of a one-shot command (start/stop/clear-logs)
///
/// Commands mutate server-side state; their effect is only observable through a
/// subsequent poll. A rejection carries the server's error text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Accepted,
    Rejected(String),
}

impl CommandOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, CommandOutcome::Accepted)
    }
}
