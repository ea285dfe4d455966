//! Terminal rendering helpers
//!
//! Formatting matches the web dashboard strings: durations as
//! `{mins}分{secs}秒`, `--` placeholders for absent values, and log lines
//! colored by level.

use colored::*;
use tradewatch_core::domain::log::{LogEntry, LogLevel};
use tradewatch_core::domain::pipeline::PipelineStatus;

/// Format an elapsed duration in seconds as `{mins}分{secs}秒`
///
/// Absent and zero durations render as `--`, matching the dashboard.
pub fn format_duration(seconds: Option<i64>) -> String {
    match seconds {
        Some(s) if s > 0 => format!("{}分{}秒", s / 60, s % 60),
        _ => "--".to_string(),
    }
}

/// Format a progress percentage as the server reports it
pub fn format_progress(progress: f64) -> String {
    format!("{}%", progress)
}

/// Format completed/total steps
pub fn format_steps(completed: u32, total: u32) -> String {
    format!("{}/{}", completed, total)
}

/// Format an optional timestamp, `--` when absent
pub fn format_timestamp(ts: Option<chrono::DateTime<chrono::Utc>>) -> String {
    match ts {
        Some(t) => t.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => "--".to_string(),
    }
}

/// Alert text for a rejected start command
pub fn start_failure_alert(reason: &str) -> String {
    format!("啟動失敗: {}", reason)
}

/// Format a signed score with an explicit `+` for positive values
pub fn format_signed(score: f64, precision: usize) -> String {
    if score > 0.0 {
        format!("+{:.*}", precision, score)
    } else {
        format!("{:.*}", precision, score)
    }
}

/// Print the full status card for a run snapshot
pub fn print_status(status: &PipelineStatus) {
    println!("{}", "流水線狀態:".bold());
    println!(
        "  狀態:     {}",
        if status.is_running {
            "運行中".cyan().bold()
        } else {
            "空閒".dimmed()
        }
    );
    println!("  進度:     {}", format_progress(status.progress).bold());
    println!(
        "  步驟:     {}",
        format_steps(status.completed_steps, status.total_steps)
    );
    println!("  耗時:     {}", format_duration(status.duration));
    if let Some(step) = &status.current_step {
        println!("  當前步驟: {}", step);
    }
    println!("  開始時間: {}", format_timestamp(status.start_time).dimmed());
    println!("  結束時間: {}", format_timestamp(status.end_time).dimmed());

    if let Some(error) = &status.error {
        println!();
        println!("{}", "執行錯誤:".red().bold());
        println!("  {}", error.red());
    }

    if !status.logs.is_empty() {
        println!();
        println!("{}", "執行日誌:".bold());
        println!("{}", "─".repeat(80).dimmed());
        for log in &status.logs {
            print_log_entry(log);
        }
        println!("{}", "─".repeat(80).dimmed());
    }

    if !status.results.is_null() && status.results != serde_json::json!({}) {
        println!();
        println!("{}", "結果:".bold());
        if let Ok(pretty) = serde_json::to_string_pretty(&status.results) {
            println!("{}", pretty);
        }
    }
}

/// Print one compact progress line for a poll tick
pub fn print_progress_line(status: &PipelineStatus) {
    println!(
        "  {} {} ({}) 耗時 {}",
        if status.is_running {
            "運行中".cyan()
        } else {
            "已結束".dimmed()
        },
        format_progress(status.progress).bold(),
        format_steps(status.completed_steps, status.total_steps),
        format_duration(status.duration)
    );
}

/// Print a log entry colored by level
pub fn print_log_entry(log: &LogEntry) {
    let level_str = match log.level {
        LogLevel::Info => "INFO",
        LogLevel::Warning => "WARNING",
        LogLevel::Error => "ERROR",
        LogLevel::Success => "SUCCESS",
    };
    let level_colored = match log.level {
        LogLevel::Info => level_str.cyan(),
        LogLevel::Warning => level_str.yellow(),
        LogLevel::Error => level_str.red(),
        LogLevel::Success => level_str.green(),
    };

    println!(
        "{} [{}] {}",
        log.timestamp.format("%H:%M:%S").to_string().dimmed(),
        level_colored,
        log.message
    );
}
