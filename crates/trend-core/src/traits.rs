use async_trait::async_trait;
use crate::{MetricBundle, Post, SentimentReport, TrendError};

/// Trait for the external per-ticker metrics provider
#[async_trait]
pub trait MetricProvider: Send + Sync {
    async fn metric_bundle(&self, ticker: &str) -> Result<MetricBundle, TrendError>;
}

/// Trait for sentiment engines scoring a ticker's posts
pub trait SentimentScorer: Send + Sync {
    fn score_posts(&self, ticker: &str, posts: &[Post]) -> SentimentReport;
}
