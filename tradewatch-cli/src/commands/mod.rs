//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod evals;
mod news;
mod pipeline;
mod recommend;
mod signals;

pub use evals::EvalsCommands;
pub use news::NewsCommands;
pub use pipeline::PipelineCommands;
pub use recommend::RecommendCommands;
pub use signals::SignalsCommands;

use anyhow::Result;
use clap::Subcommand;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Pipeline run control
    Pipeline {
        #[command(subcommand)]
        command: PipelineCommands,
    },
    /// Signal summaries and per-entity signals
    Signals {
        #[command(subcommand)]
        command: SignalsCommands,
    },
    /// News matches and URL analysis
    News {
        #[command(subcommand)]
        command: NewsCommands,
    },
    /// Investment recommendations
    Recommend {
        #[command(subcommand)]
        command: RecommendCommands,
    },
    /// Embedding evaluations
    Evals {
        #[command(subcommand)]
        command: EvalsCommands,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Pipeline { command } => pipeline::handle_pipeline_command(command, config).await,
        Commands::Signals { command } => signals::handle_signals_command(command, config).await,
        Commands::News { command } => news::handle_news_command(command, config).await,
        Commands::Recommend { command } => {
            recommend::handle_recommend_command(command, config).await
        }
        Commands::Evals { command } => evals::handle_evals_command(command, config).await,
    }
}
