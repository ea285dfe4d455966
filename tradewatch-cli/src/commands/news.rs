//! News command handlers
//!
//! Handles research-match lookups for news items and ad-hoc URL analysis.

use anyhow::Result;
use clap::Subcommand;
use colored::*;
use tradewatch_client::PipelineClient;

use crate::config::Config;

/// News subcommands
#[derive(Subcommand)]
pub enum NewsCommands {
    /// Research matches for a news item
    Matches {
        /// News item id
        id: i64,

        /// How many matches to return
        #[arg(long, default_value_t = 10)]
        topk: u32,
    },
    /// Analyze a news URL
    AnalyzeUrl {
        /// URL to analyze
        url: String,
    },
}

/// Handle news commands
pub async fn handle_news_command(command: NewsCommands, config: &Config) -> Result<()> {
    let client = PipelineClient::new(&config.api_url);

    match command {
        NewsCommands::Matches { id, topk } => show_matches(&client, id, topk).await,
        NewsCommands::AnalyzeUrl { url } => analyze_url(&client, &url).await,
    }
}

/// Display research matches for a news item
async fn show_matches(client: &PipelineClient, id: i64, topk: u32) -> Result<()> {
    let data = client.news_matches(id, topk).await?;

    println!("{}", data.title.bold());

    if data.matches.is_empty() {
        println!(
            "{}",
            data.message
                .unwrap_or_else(|| "暫無匹配".to_string())
                .yellow()
        );
        return Ok(());
    }

    println!("{}", "─".repeat(80).dimmed());
    for m in &data.matches {
        let entity = if !m.ticker.is_empty() {
            m.ticker.clone()
        } else if !m.industry.is_empty() {
            m.industry.clone()
        } else {
            format!("#{}", m.object_id)
        };

        println!(
            "  {} {} {}  {:.4}",
            "▸".cyan(),
            entity.bold(),
            m.object_type.dimmed(),
            m.score
        );
        if !m.preview.is_empty() {
            println!("    {}", truncate(&m.preview, 100).dimmed());
        }
    }
    println!("{}", "─".repeat(80).dimmed());

    Ok(())
}

/// Analyze a URL; the response document is service-defined, printed verbatim
async fn analyze_url(client: &PipelineClient, url: &str) -> Result<()> {
    let result = client.analyze_url(url).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

/// Truncate a preview to at most `max` characters on a char boundary
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max).collect();
        format!("{}…", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("新聞分數信號摘要", 4), "新聞分數…");
    }
}
