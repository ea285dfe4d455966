//! Embedding evaluation command handlers

use anyhow::Result;
use clap::Subcommand;
use colored::*;
use tradewatch_client::PipelineClient;
use tradewatch_core::dto::evals::QuickEvalRequest;

use crate::config::Config;

/// Eval subcommands
#[derive(Subcommand)]
pub enum EvalsCommands {
    /// Current embedding quality overview
    Quality,
    /// Quick ad-hoc retrieval evaluation
    Quick {
        /// Query text
        #[arg(long)]
        query: String,

        /// Candidate document texts (repeatable)
        #[arg(long = "doc", required = true)]
        docs: Vec<String>,

        /// Indices of the relevant documents (repeatable)
        #[arg(long = "relevant")]
        relevant: Vec<usize>,
    },
}

/// Handle eval commands
pub async fn handle_evals_command(command: EvalsCommands, config: &Config) -> Result<()> {
    let client = PipelineClient::new(&config.api_url);

    match command {
        EvalsCommands::Quality => show_quality(&client).await,
        EvalsCommands::Quick {
            query,
            docs,
            relevant,
        } => run_quick_eval(&client, query, docs, relevant).await,
    }
}

/// Display the embedding quality overview
async fn show_quality(client: &PipelineClient) -> Result<()> {
    let data = client.embedding_quality().await?;

    let grade = match data.overall_quality.grade.as_str() {
        "Excellent" | "Good" => data.overall_quality.grade.green().bold(),
        "Fair" => data.overall_quality.grade.yellow().bold(),
        _ => data.overall_quality.grade.red().bold(),
    };
    println!(
        "{} {} ({:.2})",
        "整體質量:".bold(),
        grade,
        data.overall_quality.score
    );
    if let Some(last) = data.last_evaluation {
        println!("上次評估: {}", last.format("%Y-%m-%d %H:%M:%S").to_string().dimmed());
    }

    println!();
    println!("{}", "檢索指標:".bold());
    let m = &data.metrics;
    println!(
        "  recall@1 {:.2}  recall@3 {:.2}  recall@5 {:.2}  recall@10 {:.2}",
        m.recall_at_1, m.recall_at_3, m.recall_at_5, m.recall_at_10
    );
    println!(
        "  ndcg@1   {:.2}  ndcg@3   {:.2}  ndcg@5   {:.2}  ndcg@10   {:.2}",
        m.ndcg_at_1, m.ndcg_at_3, m.ndcg_at_5, m.ndcg_at_10
    );

    println!();
    println!("{}", "統計:".bold());
    println!("  文檔數: {}  查詢數: {}", data.stats.total_docs, data.stats.total_queries);
    println!(
        "  平均首個相關排名: {:.1}  評估次數: {}",
        data.stats.avg_first_relevant_rank, data.stats.evaluation_count
    );

    Ok(())
}

/// Run a quick evaluation and print the service's result document
async fn run_quick_eval(
    client: &PipelineClient,
    query: String,
    docs: Vec<String>,
    relevant: Vec<usize>,
) -> Result<()> {
    let req = QuickEvalRequest {
        query_text: query,
        doc_texts: docs,
        relevant_doc_indices: relevant,
    };
    let result = client.quick_eval(&req).await?;

    println!("{}", serde_json::to_string_pretty(&serde_json::json!({
        "quality_metrics": result.quality_metrics,
        "summary": result.summary,
        "query_result": result.query_result,
        "timestamp": result.timestamp,
    }))?);

    Ok(())
}
