//! News match DTOs

use serde::{Deserialize, Serialize};

/// Response of `GET /api/news/{id}/matches`
///
/// Research-embedding neighbours of one news item, merged across its chunks and
/// ranked by best similarity. `message` is set when the item has no vectors yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsMatches {
    pub news_id: i64,
    pub title: String,
    #[serde(default)]
    pub topk: u32,
    #[serde(default)]
    pub matches: Vec<ResearchMatch>,
    #[serde(default)]
    pub message: Option<String>,
}

/// One matched research object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchMatch {
    pub object_type: String,
    pub object_id: i64,
    pub score: f64,
    #[serde(default)]
    pub preview: String,
    #[serde(default)]
    pub ticker: String,
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub ref_chunk_id: Option<i64>,
}

/// Request body of `POST /api/news/analyze-url`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeUrlRequest {
    pub url: String,
}
