//! Pipeline command handlers
//!
//! Handles run control: starting and stopping the pipeline, viewing and
//! following its status, and clearing the server-side log buffer.

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::*;
use tradewatch_client::{PipelineClient, RunController};
use tradewatch_core::domain::pipeline::PipelineConfig;
use tradewatch_core::domain::run::{CommandOutcome, RunOutcome, RunState};

use crate::config::Config;
use crate::render::{format_duration, print_progress_line, print_status, start_failure_alert};

/// Pipeline subcommands
#[derive(Subcommand)]
pub enum PipelineCommands {
    /// Start a pipeline run
    Start {
        #[command(flatten)]
        params: StartParams,

        /// Follow the run until it finishes
        #[arg(long)]
        watch: bool,
    },
    /// Stop the active run
    Stop,
    /// Show the current run status
    Status,
    /// Follow the current run until it finishes
    Watch,
    /// Clear the server-side execution logs
    ClearLogs,
}

/// Run parameters, passed verbatim as the start request body
#[derive(Args)]
pub struct StartParams {
    /// Skip news ingestion
    #[arg(long)]
    skip_ingest: bool,

    /// Max news items to ingest
    #[arg(long, default_value_t = 40)]
    max_news: u32,

    /// Allowed news languages (comma-separated)
    #[arg(long, default_value = "en,zh")]
    allow_langs: String,

    /// Processing window in hours
    #[arg(long, default_value_t = 24)]
    since_hours: u32,

    /// Scoring model
    #[arg(long, default_value = "deepseek-reasoner")]
    model: String,

    /// Score decay half-life in hours
    #[arg(long, default_value_t = 72)]
    half_life: u32,

    /// Signal aggregation lookback in hours
    #[arg(long, default_value_t = 168)]
    lookback_hours: u32,

    /// Fall back to the overall score when a per-entity score is missing
    #[arg(long)]
    apply_overall_when_missing: bool,

    /// Skip recommendation generation
    #[arg(long)]
    skip_recommendations: bool,

    /// Benchmark ticker for relative strength
    #[arg(long, default_value = "SPY")]
    benchmark: String,

    /// Minimum market cap filter
    #[arg(long, default_value_t = 20_000_000_000.0)]
    min_cap: f64,

    /// Max universe size
    #[arg(long, default_value_t = 800)]
    universe_limit: u32,

    /// Relative-strength threshold
    #[arg(long, default_value_t = 70.0)]
    rs_threshold: f64,

    /// News blending alpha
    #[arg(long, default_value_t = 0.2)]
    alpha: f64,

    /// News weighting steepness
    #[arg(long, default_value_t = 1.0)]
    k: f64,

    /// How many recommendations to persist
    #[arg(long, default_value_t = 200)]
    save_top: u32,
}

impl From<StartParams> for PipelineConfig {
    fn from(p: StartParams) -> Self {
        Self {
            skip_ingest: p.skip_ingest,
            max_news: p.max_news,
            allow_langs: p.allow_langs,
            since_hours: p.since_hours,
            model: p.model,
            half_life: p.half_life,
            lookback_hours: p.lookback_hours,
            apply_overall_when_missing: p.apply_overall_when_missing,
            skip_recommendations: p.skip_recommendations,
            benchmark: p.benchmark,
            min_cap: p.min_cap,
            universe_limit: p.universe_limit,
            rs_threshold: p.rs_threshold,
            alpha: p.alpha,
            k: p.k,
            save_top: p.save_top,
        }
    }
}

/// Handle pipeline commands
pub async fn handle_pipeline_command(command: PipelineCommands, config: &Config) -> Result<()> {
    let client = PipelineClient::new(&config.api_url);

    match command {
        PipelineCommands::Start { params, watch } => {
            start_run(client, params.into(), watch).await
        }
        PipelineCommands::Stop => stop_run(&client).await,
        PipelineCommands::Status => show_status(&client).await,
        PipelineCommands::Watch => watch_run(client).await,
        PipelineCommands::ClearLogs => clear_logs(client).await,
    }
}

/// Start a run, optionally following it to completion
async fn start_run(client: PipelineClient, config: PipelineConfig, watch: bool) -> Result<()> {
    let controller = RunController::new(client);

    match controller.start(&config).await? {
        CommandOutcome::Accepted => {
            println!("{}", "✓ 流水線已啟動".green().bold());
            if watch {
                follow(&controller).await?;
            } else {
                controller.shutdown();
            }
            Ok(())
        }
        CommandOutcome::Rejected(reason) => {
            println!("{}", start_failure_alert(&reason).red().bold());
            Ok(())
        }
    }
}

/// Stop the active run
///
/// Fire-and-forget: the server marks the run stopped, and the change shows up
/// on the next status fetch.
async fn stop_run(client: &PipelineClient) -> Result<()> {
    match client.stop_pipeline().await? {
        CommandOutcome::Accepted => {
            println!("{}", "✓ 流水線已停止".green().bold());
        }
        CommandOutcome::Rejected(reason) => {
            println!("{}", format!("停止失敗: {}", reason).red().bold());
        }
    }
    Ok(())
}

/// Fetch and print one status snapshot
async fn show_status(client: &PipelineClient) -> Result<()> {
    let status = client.pipeline_status().await?;
    print_status(&status);
    Ok(())
}

/// Follow the current run until it finishes
async fn watch_run(client: PipelineClient) -> Result<()> {
    let controller = RunController::new(client);
    let snapshot = controller.refresh().await?;

    if !snapshot.status.is_running {
        print_status(&snapshot.status);
        return Ok(());
    }

    print_progress_line(&snapshot.status);
    follow(&controller).await
}

/// Print progress lines for each applied snapshot until the run finishes
async fn follow<A: tradewatch_client::PipelineApi>(controller: &RunController<A>) -> Result<()> {
    let mut rx = controller.subscribe();

    loop {
        rx.changed().await?;
        let snapshot = rx.borrow_and_update().clone();
        print_progress_line(&snapshot.status);

        if let RunState::Finished(outcome) = &snapshot.state {
            println!();
            match outcome {
                RunOutcome::Success => {
                    println!(
                        "{} 耗時 {}",
                        "✓ 流水線執行完成".green().bold(),
                        format_duration(snapshot.status.duration)
                    );
                }
                RunOutcome::Error(message) => {
                    println!("{}", "執行錯誤:".red().bold());
                    println!("  {}", message.red());
                }
            }
            return Ok(());
        }
    }
}

/// Clear logs, then re-fetch status to confirm
async fn clear_logs(client: PipelineClient) -> Result<()> {
    let controller = RunController::new(client);

    match controller.clear_logs().await? {
        CommandOutcome::Accepted => {
            println!("{}", "✓ 日誌已清除".green().bold());
        }
        CommandOutcome::Rejected(reason) => {
            println!("{}", format!("清除失敗: {}", reason).red().bold());
        }
    }
    controller.shutdown();
    Ok(())
}
