use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrendError {
    #[error("Feed error: {0}")]
    FeedError(String),

    #[error("Rate limited by upstream: {0}")]
    RateLimited(String),

    #[error("Metric provider error: {0}")]
    ProviderError(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("No trending tickers: {0}")]
    NoTrendingTickers(String),

    #[error("Job not found: {0}")]
    JobNotFound(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl TrendError {
    /// Whether the caller may reasonably retry the whole operation later.
    /// Transport-level failures are retryable; bad input and missing jobs are not.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            TrendError::FeedError(_) | TrendError::RateLimited(_) | TrendError::ProviderError(_)
        )
    }
}
