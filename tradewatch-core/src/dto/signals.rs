//! Signal summary and per-entity signal DTOs

use serde::{Deserialize, Serialize};

/// Response of `GET /api/signals/summary/`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalsSummary {
    pub summary: SignalsStats,
    #[serde(default)]
    pub rankings: SignalsRankings,
}

/// Aggregate statistics for research-match signals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalsStats {
    pub company_stats: ScoreStats,
    pub industry_stats: ScoreStats,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreStats {
    #[serde(default)]
    pub total_signals: u64,
    #[serde(default)]
    pub positive_signals: u64,
    #[serde(default)]
    pub negative_signals: u64,
    #[serde(default)]
    pub avg_score: f64,
    #[serde(default)]
    pub max_positive_score: f64,
    #[serde(default)]
    pub max_negative_score: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignalsRankings {
    #[serde(default)]
    pub top_positive_companies: Vec<CompanySignalRank>,
    #[serde(default)]
    pub top_negative_companies: Vec<CompanySignalRank>,
    #[serde(default)]
    pub top_positive_industries: Vec<IndustrySignalRank>,
    #[serde(default)]
    pub top_negative_industries: Vec<IndustrySignalRank>,
}

/// Ranked company entry in a signals summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanySignalRank {
    pub ticker: String,
    #[serde(default)]
    pub company_name: Option<String>,
    pub score: f64,
    #[serde(default)]
    pub top_news_count: u64,
    #[serde(default)]
    pub window_end: Option<chrono::DateTime<chrono::Utc>>,
}

/// Ranked industry entry in a signals summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndustrySignalRank {
    pub industry_id: i64,
    pub industry_name: String,
    pub score: f64,
    #[serde(default)]
    pub top_news_count: u64,
    #[serde(default)]
    pub window_end: Option<chrono::DateTime<chrono::Utc>>,
}

/// Response of `GET /api/signals/news-score-summary/`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsScoreSummary {
    pub summary: NewsScoreStatsBlock,
    #[serde(default)]
    pub rankings: NewsScoreRankings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsScoreStatsBlock {
    #[serde(default)]
    pub active_companies: u64,
    #[serde(default)]
    pub active_industries: u64,
    pub company_stats: WindowScoreStats,
    pub industry_stats: WindowScoreStats,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WindowScoreStats {
    #[serde(default)]
    pub total_signals: u64,
    #[serde(default)]
    pub positive_signals: u64,
    #[serde(default)]
    pub negative_signals: u64,
    #[serde(default)]
    pub avg_window_score: f64,
    #[serde(default)]
    pub max_positive_score: f64,
    #[serde(default)]
    pub max_negative_score: f64,
    #[serde(default)]
    pub avg_news_count: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewsScoreRankings {
    #[serde(default)]
    pub top_positive_companies: Vec<CompanyWindowRank>,
    #[serde(default)]
    pub top_negative_companies: Vec<CompanyWindowRank>,
    #[serde(default)]
    pub top_positive_industries: Vec<IndustryWindowRank>,
    #[serde(default)]
    pub top_negative_industries: Vec<IndustryWindowRank>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyWindowRank {
    pub ticker: String,
    #[serde(default)]
    pub company_name: Option<String>,
    pub window_score: f64,
    #[serde(default)]
    pub window_count: u64,
    #[serde(default)]
    pub avg_score_per_news: Option<f64>,
    #[serde(default)]
    pub last_aggregated_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndustryWindowRank {
    pub industry_id: i64,
    pub industry_name: String,
    pub window_score: f64,
    #[serde(default)]
    pub window_count: u64,
    #[serde(default)]
    pub avg_score_per_news: Option<f64>,
    #[serde(default)]
    pub last_aggregated_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Response of `GET /api/companies/{ticker}/signals`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanySignals {
    pub ticker: String,
    pub company_id: i64,
    pub name: String,
    /// None when the company has no aggregated signal yet
    pub signal: Option<SignalWindow>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Response of `GET /api/industries/{id}/signals`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndustrySignals {
    pub industry_id: i64,
    pub industry: String,
    pub signal: Option<SignalWindow>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Latest-window signal for a single company or industry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalWindow {
    pub score: f64,
    pub window_start: chrono::DateTime<chrono::Utc>,
    pub window_end: chrono::DateTime<chrono::Utc>,
    #[serde(default)]
    pub top_news_ids: Vec<i64>,
    #[serde(default)]
    pub top_news: Vec<NewsRef>,
    /// Per-contribution breakdown, opaque to the client
    #[serde(default)]
    pub details: Vec<serde_json::Value>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// News item reference embedded in signal payloads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsRef {
    pub id: i64,
    pub title: String,
    pub url: String,
    pub published_at: chrono::DateTime<chrono::Utc>,
}
