//! Configuration module
//!
//! Handles CLI configuration including the API host URL.

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// URL of the pipeline API host
    pub api_url: String,
}
