use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One post from the subreddit feed
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Post {
    #[serde(default)]
    pub post_id: String,
    pub title: String,
    #[serde(default)]
    pub selftext: String,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub num_comments: i64,
    #[serde(default)]
    pub upvote_ratio: f64,
    #[serde(default)]
    pub created_utc: f64,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub flair: Option<String>,
    /// Pinned/sticky posts are mod announcements, not trading chatter
    #[serde(default)]
    pub stickied: bool,
}

impl Post {
    /// Title and body concatenated, the text the extractor scans
    pub fn full_text(&self) -> String {
        format!("{} {}", self.title, self.selftext)
    }
}

/// Per-ticker mention statistics accumulated over one feed pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickerMention {
    pub ticker: String,
    pub mention_count: u32,
    pub total_score: i64,
    pub total_comments: i64,
    pub weighted_score: f64,
    /// Up to 5 posts kept for downstream sentiment scoring
    #[serde(default)]
    pub sample_posts: Vec<Post>,
}

/// Fundamental metrics for one ticker, as returned by the metrics provider.
/// Every field is optional; the provider returns null for anything it
/// could not compute.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FundamentalMetrics {
    pub trailing_pe: Option<f64>,
    pub forward_pe: Option<f64>,
    pub price_to_book: Option<f64>,
    pub revenue_growth_yoy: Option<f64>,
    pub earnings_growth_yoy: Option<f64>,
    pub debt_to_equity: Option<f64>,
    pub free_cash_flow: Option<f64>,
    pub profit_margin: Option<f64>,
    pub operating_margin: Option<f64>,
    pub dcf_fair_value: Option<f64>,
    pub current_price: Option<f64>,
    pub dcf_upside_pct: Option<f64>,
    /// 0-100 sub-score
    pub score: Option<f64>,
    #[serde(default)]
    pub summary: String,
}

/// Technical metrics for one ticker
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TechnicalMetrics {
    pub sma_20: Option<f64>,
    pub sma_50: Option<f64>,
    pub sma_200: Option<f64>,
    pub rsi_14: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub volume_ratio: Option<f64>,
    pub current_price: Option<f64>,
    /// "bullish", "bearish" or "neutral"
    pub trend_signal: Option<String>,
    /// 0-100 sub-score
    pub score: Option<f64>,
    #[serde(default)]
    pub summary: String,
}

/// Risk metrics for one ticker
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RiskMetrics {
    pub beta: Option<f64>,
    pub sharpe_ratio: Option<f64>,
    pub sortino_ratio: Option<f64>,
    pub max_drawdown: Option<f64>,
    pub volatility_annual: Option<f64>,
    pub var_95_1day: Option<f64>,
    /// 0-100 sub-score (higher = lower risk)
    pub score: Option<f64>,
    #[serde(default)]
    pub summary: String,
}

/// The three metric bundles the provider returns per ticker
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricBundle {
    #[serde(default)]
    pub fundamental: FundamentalMetrics,
    #[serde(default)]
    pub technical: TechnicalMetrics,
    #[serde(default)]
    pub risk: RiskMetrics,
}

/// Crowd sentiment classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Bullish,
    Bearish,
    Mixed,
    Neutral,
}

/// Keyword sentiment derived from a ticker's WSB posts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentReport {
    pub ticker: String,
    pub sentiment: Sentiment,
    pub confidence: f64,
    pub is_meme_hype: bool,
    pub is_genuine_dd: bool,
    pub post_count_analyzed: usize,
    pub summary: String,
}

/// Buy/sell signal derived from the composite score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    StrongBuy,
    Buy,
    Hold,
    Sell,
    StrongSell,
}

impl Signal {
    /// Classify a 0-100 composite score. Evaluated in order, first match wins.
    pub fn from_composite(score: u8) -> Self {
        match score {
            s if s >= 75 => Signal::StrongBuy,
            s if s >= 60 => Signal::Buy,
            s if s <= 25 => Signal::StrongSell,
            s if s <= 40 => Signal::Sell,
            _ => Signal::Hold,
        }
    }

    pub fn to_label(&self) -> &'static str {
        match self {
            Signal::StrongBuy => "Strong Buy",
            Signal::Buy => "Buy",
            Signal::Hold => "Hold",
            Signal::Sell => "Sell",
            Signal::StrongSell => "Strong Sell",
        }
    }
}

/// Final investment recommendation for one ticker. Built once by the
/// synthesizer, never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub ticker: String,
    pub signal: Signal,
    /// Composite score, integer clamped to [0, 100]
    pub composite_score: u8,
    pub investment_thesis: String,
    pub bull_case: String,
    pub bear_case: String,
    pub risk_flags: Vec<String>,
    /// Position in the WSB mention ranking (1-based)
    pub wsb_mention_rank: u32,
}

/// A ticker dropped mid-run, recorded for observability
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedTicker {
    pub ticker: String,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
    Error,
}

/// Result of one full pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRun {
    pub job_id: String,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub trending_tickers: Vec<TickerMention>,
    /// Sorted by composite score descending
    pub recommendations: Vec<Recommendation>,
    #[serde(default)]
    pub skipped: Vec<SkippedTicker>,
    pub market_summary: String,
    pub error: Option<String>,
}

impl AnalysisRun {
    pub fn new(job_id: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            status: JobStatus::Pending,
            created_at: Utc::now(),
            completed_at: None,
            trending_tickers: Vec::new(),
            recommendations: Vec::new(),
            skipped: Vec::new(),
            market_summary: String::new(),
            error: None,
        }
    }
}
