//! Recommendation DTOs

use serde::{Deserialize, Serialize};

/// Response of `GET /api/recommendations/`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationList {
    pub date: String,
    pub count: u64,
    #[serde(default)]
    pub items: Vec<Recommendation>,
}

/// One ranked recommendation as of a trading date
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub ticker: String,
    pub as_of: String,
    pub rank: u32,
    /// Final blended score ("final" on the wire)
    #[serde(rename = "final")]
    pub final_score: f64,
    /// Relative-strength score
    pub rs: f64,
    /// Stage-2 trend filter pass
    pub stage2: bool,
    /// News weighting factor applied to the final score
    pub news_w: f64,
}
