//! Read-only analytics endpoints
//!
//! These payloads are black-box data sources: the client deserializes and
//! displays them, performing no logic beyond direct field access.

use crate::PipelineClient;
use crate::error::Result;
use tradewatch_core::dto::evals::{EmbeddingQuality, QuickEvalRequest, QuickEvalResult};
use tradewatch_core::dto::news::{AnalyzeUrlRequest, NewsMatches};
use tradewatch_core::dto::recommendation::RecommendationList;
use tradewatch_core::dto::signals::{
    CompanySignals, IndustrySignals, NewsScoreSummary, SignalsSummary,
};

impl PipelineClient {
    // =============================================================================
    // Analytics (read-only)
    // =============================================================================

    /// Research-match signal summary with rankings
    ///
    /// # Arguments
    /// * `limit` - Max entries per ranking list
    /// * `days_back` - Aggregation window in days
    pub async fn signals_summary(&self, limit: u32, days_back: u32) -> Result<SignalsSummary> {
        let url = format!(
            "{}/api/signals/summary/?limit={}&days_back={}",
            self.base_url, limit, days_back
        );
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    /// News-score signal summary with rankings
    ///
    /// # Arguments
    /// * `limit` - Max entries per ranking list
    /// * `lookback_hours` - Aggregation window in hours
    pub async fn news_score_summary(
        &self,
        limit: u32,
        lookback_hours: u32,
    ) -> Result<NewsScoreSummary> {
        let url = format!(
            "{}/api/signals/news-score-summary/?limit={}&lookback_hours={}",
            self.base_url, limit, lookback_hours
        );
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    /// Research matches for a single news item
    pub async fn news_matches(&self, news_id: i64, topk: u32) -> Result<NewsMatches> {
        let url = format!(
            "{}/api/news/{}/matches?topk={}",
            self.base_url, news_id, topk
        );
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    /// Latest-window signal for a company
    pub async fn company_signals(&self, ticker: &str, max_details: u32) -> Result<CompanySignals> {
        let url = format!(
            "{}/api/companies/{}/signals?max_details={}",
            self.base_url, ticker, max_details
        );
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    /// Latest-window signal for an industry
    pub async fn industry_signals(&self, id: i64, max_details: u32) -> Result<IndustrySignals> {
        let url = format!(
            "{}/api/industries/{}/signals?max_details={}",
            self.base_url, id, max_details
        );
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    /// Top recommendations for a trading date (server default: today)
    pub async fn recommendations(
        &self,
        date: Option<&str>,
        n: u32,
    ) -> Result<RecommendationList> {
        let url = match date {
            Some(d) => format!("{}/api/recommendations/?date={}&n={}", self.base_url, d, n),
            None => format!("{}/api/recommendations/?n={}", self.base_url, n),
        };
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    /// Current embedding quality overview
    pub async fn embedding_quality(&self) -> Result<EmbeddingQuality> {
        let url = format!("{}/api/evals/quality", self.base_url);
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    /// Quick ad-hoc embedding evaluation
    pub async fn quick_eval(&self, req: &QuickEvalRequest) -> Result<QuickEvalResult> {
        let url = format!("{}/api/evals/quick", self.base_url);
        let response = self.client.post(&url).json(req).send().await?;

        self.handle_response(response).await
    }

    /// Analyze a news URL; the response document is service-defined
    pub async fn analyze_url(&self, url_to_analyze: &str) -> Result<serde_json::Value> {
        let url = format!("{}/api/news/analyze-url", self.base_url);
        let req = AnalyzeUrlRequest {
            url: url_to_analyze.to_string(),
        };
        let response = self.client.post(&url).json(&req).send().await?;

        self.handle_response(response).await
    }
}
