//! Embedding evaluation DTOs

use serde::{Deserialize, Serialize};

/// Response of `GET /api/evals/quality`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingQuality {
    #[serde(default)]
    pub last_evaluation: Option<chrono::DateTime<chrono::Utc>>,
    pub overall_quality: QualityGrade,
    pub metrics: RetrievalMetrics,
    pub stats: EvalStats,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityGrade {
    pub grade: String,
    #[serde(default)]
    pub color: String,
    pub score: f64,
}

/// Recall / NDCG at the standard cutoffs
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RetrievalMetrics {
    #[serde(default)]
    pub recall_at_1: f64,
    #[serde(default)]
    pub recall_at_3: f64,
    #[serde(default)]
    pub recall_at_5: f64,
    #[serde(default)]
    pub recall_at_10: f64,
    #[serde(default)]
    pub ndcg_at_1: f64,
    #[serde(default)]
    pub ndcg_at_3: f64,
    #[serde(default)]
    pub ndcg_at_5: f64,
    #[serde(default)]
    pub ndcg_at_10: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvalStats {
    #[serde(default)]
    pub total_docs: u64,
    #[serde(default)]
    pub total_queries: u64,
    #[serde(default)]
    pub avg_first_relevant_rank: f64,
    #[serde(default)]
    pub evaluation_count: u64,
}

/// Request body of `POST /api/evals/quick`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuickEvalRequest {
    pub query_text: String,
    pub doc_texts: Vec<String>,
    #[serde(default)]
    pub relevant_doc_indices: Vec<usize>,
}

/// Response of `POST /api/evals/quick`
///
/// The service returns a simplified evaluation document; the client renders it
/// without interpreting the inner structures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuickEvalResult {
    #[serde(default)]
    pub quality_metrics: serde_json::Value,
    #[serde(default)]
    pub summary: serde_json::Value,
    #[serde(default)]
    pub query_result: serde_json::Value,
    #[serde(default)]
    pub timestamp: Option<String>,
}
