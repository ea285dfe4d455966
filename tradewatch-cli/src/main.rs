//! Tradewatch CLI
//!
//! Command-line interface for the news-analysis pipeline API: run control,
//! signal summaries, news matches, recommendations and embedding evals.

mod commands;
mod config;
mod render;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;

#[derive(Parser)]
#[command(name = "tradewatch")]
#[command(about = "Tradewatch news-analysis pipeline CLI", long_about = None)]
struct Cli {
    /// API host URL
    #[arg(
        long,
        env = "TRADEWATCH_API_URL",
        default_value = "http://127.0.0.1:8001"
    )]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config {
        api_url: cli.api_url,
    };

    handle_command(cli.command, &config).await
}
