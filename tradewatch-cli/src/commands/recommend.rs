//! Recommendation command handlers

use anyhow::Result;
use clap::Subcommand;
use colored::*;
use tradewatch_client::PipelineClient;

use crate::config::Config;

/// Recommendation subcommands
#[derive(Subcommand)]
pub enum RecommendCommands {
    /// Top recommendations for a trading date
    Top {
        /// Trading date (YYYY-MM-DD; server default: today)
        #[arg(long)]
        date: Option<String>,

        /// How many recommendations to fetch
        #[arg(long, default_value_t = 50)]
        n: u32,
    },
}

/// Handle recommendation commands
pub async fn handle_recommend_command(command: RecommendCommands, config: &Config) -> Result<()> {
    let client = PipelineClient::new(&config.api_url);

    match command {
        RecommendCommands::Top { date, n } => show_top(&client, date.as_deref(), n).await,
    }
}

/// Display the ranked recommendation list
async fn show_top(client: &PipelineClient, date: Option<&str>, n: u32) -> Result<()> {
    let data = client.recommendations(date, n).await?;

    if data.items.is_empty() {
        println!("{}", format!("{} 暫無投資建議", data.date).yellow());
        return Ok(());
    }

    println!(
        "{}",
        format!("{} 共 {} 條建議:", data.date, data.count).bold()
    );
    println!("{}", "─".repeat(60).dimmed());
    for item in &data.items {
        let stage2 = if item.stage2 {
            "✓".green()
        } else {
            "✗".red()
        };
        println!(
            "  {:>3}. {:<6} final {:.4}  rs {:>5.1}  stage2 {}  news_w {:.2}",
            item.rank,
            item.ticker.bold(),
            item.final_score,
            item.rs,
            stage2,
            item.news_w
        );
    }
    println!("{}", "─".repeat(60).dimmed());

    Ok(())
}
