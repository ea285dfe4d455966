//! Tradewatch HTTP Client
//!
//! A type-safe HTTP client for the news-analysis pipeline API, plus the
//! [`controller::RunController`] that mirrors the server-side run via polling.
//!
//! # Example
//!
//! ```no_run
//! use tradewatch_client::PipelineClient;
//! use tradewatch_core::domain::pipeline::PipelineConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = PipelineClient::new("http://127.0.0.1:8001");
//!
//!     let outcome = client.start_pipeline(&PipelineConfig::default()).await?;
//!     println!("start: {:?}", outcome);
//!
//!     let status = client.pipeline_status().await?;
//!     println!("running: {}", status.is_running);
//!     Ok(())
//! }
//! ```

pub mod controller;
pub mod error;
mod pipeline;
mod signals;

// Re-export commonly used types
pub use controller::{ControllerSnapshot, PipelineApi, RunController};
pub use error::{ClientError, Result};

use reqwest::Client;
use serde::de::DeserializeOwned;

/// HTTP client for the pipeline and analytics APIs
///
/// Methods are organized into two groups:
/// - Pipeline lifecycle (status, start, stop, clear-logs)
/// - Read-only analytics (signal summaries, news matches, recommendations, evals)
#[derive(Debug, Clone)]
pub struct PipelineClient {
    /// Base URL of the API host (e.g., "http://127.0.0.1:8001")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl PipelineClient {
    /// Create a new pipeline API client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the API host (e.g., "http://127.0.0.1:8001")
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    /// Create a client with a custom HTTP client
    ///
    /// This allows configuring timeouts, proxies, TLS settings, etc.
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the API host
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// Checks the status code and returns an appropriate error if the request
    /// failed, or deserializes the response body if successful. Error responses
    /// carry a JSON body of the form `{"error": "..."}`; the message is extracted
    /// when present, falling back to the raw body.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let message = Self::extract_error_message(response).await;
            return Err(ClientError::api_error(status.as_u16(), message));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    /// Pull the server's error text out of a non-success response body
    async fn extract_error_message(response: reqwest::Response) -> String {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
            .unwrap_or(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = PipelineClient::new("http://127.0.0.1:8001");
        assert_eq!(client.base_url(), "http://127.0.0.1:8001");
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = PipelineClient::new("http://127.0.0.1:8001/");
        assert_eq!(client.base_url(), "http://127.0.0.1:8001");
    }

    #[test]
    fn test_client_with_custom_client() {
        let http_client = Client::new();
        let client = PipelineClient::with_client("http://127.0.0.1:8001", http_client);
        assert_eq!(client.base_url(), "http://127.0.0.1:8001");
    }
}
