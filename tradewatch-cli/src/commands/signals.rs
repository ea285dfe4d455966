//! Signal command handlers
//!
//! Handles signal summaries (research-match and news-score) and per-entity
//! signal lookups. Payloads are rendered as-is; no aggregation happens here.

use anyhow::Result;
use clap::Subcommand;
use colored::*;
use tradewatch_client::PipelineClient;
use tradewatch_core::dto::signals::{
    CompanySignalRank, CompanyWindowRank, IndustrySignalRank, IndustryWindowRank, ScoreStats,
    SignalWindow, WindowScoreStats,
};

use crate::config::Config;
use crate::render::{format_signed, format_timestamp};

/// Signal subcommands
#[derive(Subcommand)]
pub enum SignalsCommands {
    /// Research-match signal summary with rankings
    Summary {
        /// Max entries per ranking list
        #[arg(long, default_value_t = 10)]
        limit: u32,

        /// Aggregation window in days
        #[arg(long, default_value_t = 7)]
        days_back: u32,
    },
    /// News-score signal summary with rankings
    NewsScores {
        /// Max entries per ranking list
        #[arg(long, default_value_t = 10)]
        limit: u32,

        /// Aggregation window in hours
        #[arg(long, default_value_t = 168)]
        lookback_hours: u32,
    },
    /// Latest-window signal for a company
    Company {
        /// Company ticker
        ticker: String,

        /// Max detail entries to fetch
        #[arg(long, default_value_t = 100)]
        max_details: u32,
    },
    /// Latest-window signal for an industry
    Industry {
        /// Industry id
        id: i64,

        /// Max detail entries to fetch
        #[arg(long, default_value_t = 100)]
        max_details: u32,
    },
}

/// Handle signal commands
pub async fn handle_signals_command(command: SignalsCommands, config: &Config) -> Result<()> {
    let client = PipelineClient::new(&config.api_url);

    match command {
        SignalsCommands::Summary { limit, days_back } => {
            show_summary(&client, limit, days_back).await
        }
        SignalsCommands::NewsScores {
            limit,
            lookback_hours,
        } => show_news_scores(&client, limit, lookback_hours).await,
        SignalsCommands::Company {
            ticker,
            max_details,
        } => show_company(&client, &ticker, max_details).await,
        SignalsCommands::Industry { id, max_details } => {
            show_industry(&client, id, max_details).await
        }
    }
}

/// Display the research-match signal summary
async fn show_summary(client: &PipelineClient, limit: u32, days_back: u32) -> Result<()> {
    let data = client.signals_summary(limit, days_back).await?;

    println!("{}", "公司信號統計:".bold());
    print_score_stats(&data.summary.company_stats);
    println!();
    println!("{}", "行業信號統計:".bold());
    print_score_stats(&data.summary.industry_stats);

    print_company_ranking("頂級正面公司", &data.rankings.top_positive_companies);
    print_company_ranking("頂級負面公司", &data.rankings.top_negative_companies);
    print_industry_ranking("頂級正面行業", &data.rankings.top_positive_industries);
    print_industry_ranking("頂級負面行業", &data.rankings.top_negative_industries);

    Ok(())
}

/// Display the news-score signal summary
async fn show_news_scores(client: &PipelineClient, limit: u32, lookback_hours: u32) -> Result<()> {
    let data = client.news_score_summary(limit, lookback_hours).await?;

    println!(
        "{} {}  {} {}",
        "活躍公司:".bold(),
        data.summary.active_companies,
        "活躍行業:".bold(),
        data.summary.active_industries
    );
    println!();
    println!("{}", "公司新聞分數統計:".bold());
    print_window_stats(&data.summary.company_stats);
    println!();
    println!("{}", "行業新聞分數統計:".bold());
    print_window_stats(&data.summary.industry_stats);

    print_company_window_ranking("新聞正面公司", &data.rankings.top_positive_companies);
    print_company_window_ranking("新聞負面公司", &data.rankings.top_negative_companies);
    print_industry_window_ranking("新聞正面行業", &data.rankings.top_positive_industries);
    print_industry_window_ranking("新聞負面行業", &data.rankings.top_negative_industries);

    Ok(())
}

/// Display the latest-window signal for a company
async fn show_company(client: &PipelineClient, ticker: &str, max_details: u32) -> Result<()> {
    let data = client.company_signals(ticker, max_details).await?;

    println!("{}", format!("{} ({})", data.ticker, data.name).bold());
    match data.signal {
        Some(signal) => print_signal_window(&signal),
        None => println!(
            "{}",
            data.message
                .unwrap_or_else(|| "暫無數據".to_string())
                .yellow()
        ),
    }

    Ok(())
}

/// Display the latest-window signal for an industry
async fn show_industry(client: &PipelineClient, id: i64, max_details: u32) -> Result<()> {
    let data = client.industry_signals(id, max_details).await?;

    println!("{}", format!("{} (#{})", data.industry, data.industry_id).bold());
    match data.signal {
        Some(signal) => print_signal_window(&signal),
        None => println!(
            "{}",
            data.message
                .unwrap_or_else(|| "暫無數據".to_string())
                .yellow()
        ),
    }

    Ok(())
}

fn print_score_stats(stats: &ScoreStats) {
    println!("  信號總數: {}", stats.total_signals);
    println!(
        "  正面: {}  負面: {}",
        stats.positive_signals.to_string().green(),
        stats.negative_signals.to_string().red()
    );
    println!("  平均分數: {:.4}", stats.avg_score);
    println!(
        "  最高: {}  最低: {}",
        format_signed(stats.max_positive_score, 4).green(),
        format!("{:.4}", stats.max_negative_score).red()
    );
}

fn print_window_stats(stats: &WindowScoreStats) {
    println!("  信號總數: {}", stats.total_signals);
    println!(
        "  正面: {}  負面: {}",
        stats.positive_signals.to_string().green(),
        stats.negative_signals.to_string().red()
    );
    println!("  平均窗口分數: {:.6}", stats.avg_window_score);
    println!(
        "  最高: {}  最低: {}",
        format_signed(stats.max_positive_score, 6).green(),
        format!("{:.6}", stats.max_negative_score).red()
    );
    println!("  平均新聞數: {:.1}", stats.avg_news_count);
}

fn print_company_ranking(title: &str, items: &[CompanySignalRank]) {
    if items.is_empty() {
        return;
    }
    println!();
    println!("{}", format!("{}:", title).bold());
    for (i, item) in items.iter().enumerate() {
        println!(
            "  {} {} {}  {} ({} 條相關新聞)",
            format!("#{}", i + 1).dimmed(),
            item.ticker.bold(),
            item.company_name.as_deref().unwrap_or("").dimmed(),
            format_signed(item.score, 4),
            item.top_news_count
        );
    }
}

fn print_industry_ranking(title: &str, items: &[IndustrySignalRank]) {
    if items.is_empty() {
        return;
    }
    println!();
    println!("{}", format!("{}:", title).bold());
    for (i, item) in items.iter().enumerate() {
        println!(
            "  {} {}  {} ({} 條相關新聞)",
            format!("#{}", i + 1).dimmed(),
            item.industry_name.bold(),
            format_signed(item.score, 4),
            item.top_news_count
        );
    }
}

fn print_company_window_ranking(title: &str, items: &[CompanyWindowRank]) {
    if items.is_empty() {
        return;
    }
    println!();
    println!("{}", format!("{}:", title).bold());
    for (i, item) in items.iter().enumerate() {
        println!(
            "  {} {} {}  {} ({} 條新聞, 平均每條 {:.4})",
            format!("#{}", i + 1).dimmed(),
            item.ticker.bold(),
            item.company_name.as_deref().unwrap_or("").dimmed(),
            format_signed(item.window_score, 4),
            item.window_count,
            item.avg_score_per_news.unwrap_or(0.0)
        );
    }
}

fn print_industry_window_ranking(title: &str, items: &[IndustryWindowRank]) {
    if items.is_empty() {
        return;
    }
    println!();
    println!("{}", format!("{}:", title).bold());
    for (i, item) in items.iter().enumerate() {
        println!(
            "  {} {}  {} ({} 條新聞, 平均每條 {:.4})",
            format!("#{}", i + 1).dimmed(),
            item.industry_name.bold(),
            format_signed(item.window_score, 4),
            item.window_count,
            item.avg_score_per_news.unwrap_or(0.0)
        );
    }
}

fn print_signal_window(signal: &SignalWindow) {
    println!("  分數:     {}", format_signed(signal.score, 4).bold());
    println!(
        "  窗口:     {} ~ {}",
        format_timestamp(Some(signal.window_start)).dimmed(),
        format_timestamp(Some(signal.window_end)).dimmed()
    );
    println!("  更新時間: {}", format_timestamp(Some(signal.updated_at)).dimmed());

    if !signal.top_news.is_empty() {
        println!();
        println!("{}", "相關新聞:".bold());
        for news in &signal.top_news {
            println!(
                "  {} {}",
                "▸".cyan(),
                news.title.bold()
            );
            println!("    {}", news.url.dimmed());
            println!(
                "    {}",
                format_timestamp(Some(news.published_at)).dimmed()
            );
        }
    }

    if !signal.details.is_empty() {
        println!();
        println!("  {} 條貢獻明細", signal.details.len());
    }
}
