//! Pipeline lifecycle endpoints

use crate::PipelineClient;
use crate::error::{ClientError, Result};
use tradewatch_core::domain::pipeline::{PipelineConfig, PipelineStatus};
use tradewatch_core::domain::run::CommandOutcome;
use tradewatch_core::dto::pipeline::CommandResponse;

impl PipelineClient {
    // =============================================================================
    // Pipeline Lifecycle
    // =============================================================================

    /// Fetch the current run snapshot
    ///
    /// # Returns
    /// The server's status document; always a point-in-time snapshot that may be
    /// stale by the time it is applied.
    pub async fn pipeline_status(&self) -> Result<PipelineStatus> {
        let url = format!("{}/api/pipeline/status/", self.base_url);
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    /// Issue the start command with the given configuration
    ///
    /// The config is passed verbatim as the request body. A non-2xx response with
    /// a server-provided error message maps to `Rejected` rather than an `Err`,
    /// so callers can surface the rejection without treating it as a transport
    /// failure. There is no retry.
    ///
    /// # Example
    /// ```no_run
    /// # use tradewatch_client::PipelineClient;
    /// # use tradewatch_core::domain::pipeline::PipelineConfig;
    /// # use tradewatch_core::domain::run::CommandOutcome;
    /// # async fn example() -> anyhow::Result<()> {
    /// let client = PipelineClient::new("http://127.0.0.1:8001");
    /// match client.start_pipeline(&PipelineConfig::default()).await? {
    ///     CommandOutcome::Accepted => println!("started"),
    ///     CommandOutcome::Rejected(reason) => eprintln!("啟動失敗: {}", reason),
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn start_pipeline(&self, config: &PipelineConfig) -> Result<CommandOutcome> {
        let url = format!("{}/api/pipeline/start/", self.base_url);
        let response = self.client.post(&url).json(config).send().await?;

        self.handle_command_response(response).await
    }

    /// Issue the stop command
    ///
    /// Fire-and-forget from the caller's perspective: the authoritative state
    /// change is only observable on a subsequent status poll.
    pub async fn stop_pipeline(&self) -> Result<CommandOutcome> {
        let url = format!("{}/api/pipeline/stop/", self.base_url);
        let response = self.client.post(&url).send().await?;

        self.handle_command_response(response).await
    }

    /// Issue the clear-logs command
    ///
    /// Empties the server-side log buffer; callers should re-fetch status
    /// afterwards to confirm (the controller does this automatically).
    pub async fn clear_pipeline_logs(&self) -> Result<CommandOutcome> {
        let url = format!("{}/api/pipeline/clear-logs/", self.base_url);
        let response = self.client.post(&url).send().await?;

        self.handle_command_response(response).await
    }

    /// Map a command response to an explicit outcome
    ///
    /// 2xx means accepted; the body is not inspected. Non-2xx with a parseable
    /// `{"error": ...}` body means the command was rejected and the reason is
    /// surfaced; any other failure body (a proxy's HTML error page, say) becomes
    /// an API error carrying the raw text.
    async fn handle_command_response(
        &self,
        response: reqwest::Response,
    ) -> Result<CommandOutcome> {
        let status = response.status();
        if status.is_success() {
            return Ok(CommandOutcome::Accepted);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        match serde_json::from_str::<CommandResponse>(&body) {
            Ok(CommandResponse {
                error: Some(reason),
                ..
            }) => Ok(CommandOutcome::Rejected(reason)),
            _ => Err(ClientError::api_error(status.as_u16(), body)),
        }
    }
}
