//! Drives the full pipeline: feed fetch, mention ranking, per-ticker metric
//! fetch and recommendation synthesis.
//!
//! Tickers are processed strictly one at a time in ranked order so a caller
//! can display incremental progress; a per-ticker failure is recorded and
//! skipped, never fatal to the run. Each run rebuilds all state from scratch.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use mention_rank::rank_mentions;
use recommendation::synthesize;
use reddit_client::RedditClient;
use serde::Serialize;
use std::sync::Arc;
use trend_core::{
    AnalysisRun, JobStatus, MetricBundle, MetricProvider, Post, Recommendation, SentimentReport,
    SkippedTicker, TickerMention, TrendError,
};
use wsb_sentiment::WsbSentimentEngine;

/// Ranked tickers taken forward into metric fetch + synthesis
pub const MAX_ANALYZED: usize = 8;

const DEFAULT_SUBREDDIT: &str = "wallstreetbets";
const DEFAULT_FEED_LIMIT: u32 = 25;

const CACHE_TTL_SECS: i64 = 300; // 5 minutes

/// Emitted after each per-ticker step, successful or skipped
#[derive(Debug, Clone, Serialize)]
pub struct ProgressEvent {
    pub ticker: String,
    /// 1-based position within this run
    pub index: usize,
    pub total: usize,
}

/// Internal cache entry with timestamp
struct CacheEntry<T> {
    data: T,
    cached_at: DateTime<Utc>,
}

pub struct TrendOrchestrator {
    reddit_client: RedditClient,
    metric_provider: Arc<dyn MetricProvider>,
    sentiment_engine: WsbSentimentEngine,
    subreddit: String,
    feed_limit: u32,
    /// Cache metric bundles per ticker (5-min TTL)
    bundle_cache: DashMap<String, CacheEntry<MetricBundle>>,
}

impl TrendOrchestrator {
    pub fn new(metric_provider: Arc<dyn MetricProvider>) -> Self {
        let subreddit =
            std::env::var("WSB_SUBREDDIT").unwrap_or_else(|_| DEFAULT_SUBREDDIT.to_string());
        let feed_limit = std::env::var("WSB_FEED_LIMIT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_FEED_LIMIT);

        Self {
            reddit_client: RedditClient::new(),
            metric_provider,
            sentiment_engine: WsbSentimentEngine::new(),
            subreddit,
            feed_limit,
            bundle_cache: DashMap::new(),
        }
    }

    pub fn with_reddit_client(mut self, client: RedditClient) -> Self {
        self.reddit_client = client;
        self
    }

    pub fn subreddit(&self) -> &str {
        &self.subreddit
    }

    /// Fetch the feed and return the ranked mention list (capped at 20)
    pub async fn trending(&self) -> Result<Vec<TickerMention>, TrendError> {
        let posts = self
            .reddit_client
            .fetch_hot(&self.subreddit, self.feed_limit)
            .await?;
        Ok(rank_mentions(&posts))
    }

    /// Run the full pipeline end to end, emitting a progress event after
    /// each per-ticker step.
    pub async fn run(
        &self,
        job_id: &str,
        on_progress: impl FnMut(ProgressEvent),
    ) -> AnalysisRun {
        let mut run = AnalysisRun::new(job_id);
        run.status = JobStatus::Running;

        tracing::info!("Step 1: fetching trending tickers from r/{}", self.subreddit);
        let posts = match self
            .reddit_client
            .fetch_hot(&self.subreddit, self.feed_limit)
            .await
        {
            Ok(posts) => posts,
            Err(e) => {
                tracing::warn!("Feed fetch failed: {}", e);
                run.status = JobStatus::Error;
                run.error = Some(format!("Could not fetch the r/{} feed: {}", self.subreddit, e));
                run.completed_at = Some(Utc::now());
                return run;
            }
        };

        self.analyze_posts(run, &posts, on_progress).await
    }

    /// Aggregate an already-fetched feed and synthesize recommendations.
    /// Separated from [`run`] so the pipeline can be driven without network
    /// access to Reddit.
    pub async fn analyze_posts(
        &self,
        mut run: AnalysisRun,
        posts: &[Post],
        mut on_progress: impl FnMut(ProgressEvent),
    ) -> AnalysisRun {
        run.status = JobStatus::Running;

        // Pinned posts are mod announcements; never count them
        let feed: Vec<Post> = posts.iter().filter(|p| !p.stickied).cloned().collect();

        let trending = rank_mentions(&feed);
        if trending.is_empty() {
            tracing::info!("No trending tickers found in {} posts", feed.len());
            run.status = JobStatus::Completed;
            run.market_summary = format!(
                "No trending tickers found on r/{}; the feed may be empty or Reddit may be rate limiting requests.",
                self.subreddit
            );
            run.completed_at = Some(Utc::now());
            return run;
        }

        run.trending_tickers = trending.clone();

        let top: Vec<TickerMention> = trending.into_iter().take(MAX_ANALYZED).collect();
        let total = top.len();
        tracing::info!(
            "Step 2: analyzing top {} tickers: {:?}",
            total,
            top.iter().map(|m| m.ticker.as_str()).collect::<Vec<_>>()
        );

        let mut recommendations: Vec<Recommendation> = Vec::new();
        for (i, mention) in top.iter().enumerate() {
            let rank = (i + 1) as u32;
            let ticker = mention.ticker.as_str();
            tracing::info!("Analyzing {} (rank #{})", ticker, rank);

            match self.analyze_one(ticker, &mention.sample_posts, rank).await {
                Ok(rec) => {
                    tracing::info!(
                        "{}: score={}, signal={:?}",
                        ticker,
                        rec.composite_score,
                        rec.signal
                    );
                    recommendations.push(rec);
                }
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", ticker, e);
                    run.skipped.push(SkippedTicker {
                        ticker: ticker.to_string(),
                        reason: e.to_string(),
                    });
                }
            }

            on_progress(ProgressEvent {
                ticker: ticker.to_string(),
                index: rank as usize,
                total,
            });
        }

        // Presentation order is by conviction, not by WSB popularity
        recommendations.sort_by(|a, b| b.composite_score.cmp(&a.composite_score));

        run.market_summary = format!(
            "Analyzed {} WSB trending stocks using quantitative analysis. Top mentions: {}.",
            recommendations.len(),
            run.trending_tickers
                .iter()
                .take(5)
                .map(|m| m.ticker.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
        run.recommendations = recommendations;
        run.status = JobStatus::Completed;
        run.completed_at = Some(Utc::now());
        run
    }

    /// Analyze a single ticker outside a ranked run (detail endpoint)
    pub async fn analyze_ticker(&self, ticker: &str) -> Result<Recommendation, TrendError> {
        let posts = self
            .reddit_client
            .search_ticker(&self.subreddit, ticker, 15)
            .await
            .unwrap_or_default();
        self.analyze_one(ticker, &posts, 0).await
    }

    async fn analyze_one(
        &self,
        ticker: &str,
        sample_posts: &[Post],
        rank: u32,
    ) -> Result<Recommendation, TrendError> {
        let bundle = self.get_bundle(ticker).await?;
        let sentiment = self.post_sentiment(ticker, sample_posts);
        Ok(synthesize(ticker, &bundle, sentiment.as_ref(), rank))
    }

    fn post_sentiment(&self, ticker: &str, posts: &[Post]) -> Option<SentimentReport> {
        if posts.is_empty() {
            return None;
        }
        Some(self.sentiment_engine.analyze(ticker, posts))
    }

    /// Get the metric bundle for a ticker (cached, 5-min TTL)
    async fn get_bundle(&self, ticker: &str) -> Result<MetricBundle, TrendError> {
        let cache_key = ticker.to_uppercase();
        if let Some(entry) = self.bundle_cache.get(&cache_key) {
            let age = (Utc::now() - entry.cached_at).num_seconds();
            if age < CACHE_TTL_SECS {
                return Ok(entry.data.clone());
            }
        }

        let bundle = self.metric_provider.metric_bundle(ticker).await?;

        self.bundle_cache.insert(
            cache_key,
            CacheEntry {
                data: bundle.clone(),
                cached_at: Utc::now(),
            },
        );

        Ok(bundle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use trend_core::{FundamentalMetrics, RiskMetrics, TechnicalMetrics};

    /// Stub provider: per-ticker canned scores, listed tickers fail
    struct StubProvider {
        failing: Vec<String>,
        scores: Vec<(String, f64)>,
    }

    #[async_trait]
    impl MetricProvider for StubProvider {
        async fn metric_bundle(&self, ticker: &str) -> Result<MetricBundle, TrendError> {
            if self.failing.iter().any(|t| t == ticker) {
                return Err(TrendError::ProviderError(format!("{}: no price data", ticker)));
            }
            let score = self
                .scores
                .iter()
                .find(|(t, _)| t == ticker)
                .map(|(_, s)| *s)
                .unwrap_or(50.0);
            Ok(MetricBundle {
                fundamental: FundamentalMetrics {
                    score: Some(score),
                    ..FundamentalMetrics::default()
                },
                technical: TechnicalMetrics {
                    score: Some(score),
                    ..TechnicalMetrics::default()
                },
                risk: RiskMetrics {
                    score: Some(score),
                    ..RiskMetrics::default()
                },
            })
        }
    }

    fn orchestrator(provider: StubProvider) -> TrendOrchestrator {
        TrendOrchestrator::new(Arc::new(provider))
    }

    fn post(title: &str, score: i64) -> Post {
        Post {
            title: title.to_string(),
            score,
            ..Post::default()
        }
    }

    #[tokio::test]
    async fn empty_feed_reports_no_trending_tickers() {
        let orch = orchestrator(StubProvider { failing: vec![], scores: vec![] });
        let mut events = 0;
        let run = orch
            .analyze_posts(AnalysisRun::new("job1"), &[], |_| events += 1)
            .await;

        assert_eq!(run.status, JobStatus::Completed);
        assert!(run.recommendations.is_empty());
        assert!(run.market_summary.contains("No trending tickers"));
        // Synthesis never ran, so no progress events either
        assert_eq!(events, 0);
    }

    #[tokio::test]
    async fn stickied_posts_are_ignored() {
        let orch = orchestrator(StubProvider { failing: vec![], scores: vec![] });
        let pinned = Post {
            stickied: true,
            ..post("$GME daily thread", 9000)
        };
        let run = orch
            .analyze_posts(AnalysisRun::new("job1"), &[pinned], |_| {})
            .await;
        assert!(run.trending_tickers.is_empty());
    }

    #[tokio::test]
    async fn failed_ticker_is_skipped_and_run_continues() {
        let orch = orchestrator(StubProvider {
            failing: vec!["GME".to_string()],
            scores: vec![("TSLA".to_string(), 80.0)],
        });
        let posts = vec![
            post("$GME squeeze", 500),
            post("$GME again", 400),
            post("$TSLA earnings", 100),
        ];
        let run = orch
            .analyze_posts(AnalysisRun::new("job1"), &posts, |_| {})
            .await;

        assert_eq!(run.status, JobStatus::Completed);
        assert_eq!(run.recommendations.len(), 1);
        assert_eq!(run.recommendations[0].ticker, "TSLA");
        assert_eq!(run.skipped.len(), 1);
        assert_eq!(run.skipped[0].ticker, "GME");
        assert!(!run.recommendations.iter().any(|r| r.ticker == "GME"));
    }

    #[tokio::test]
    async fn progress_events_cover_every_attempted_ticker() {
        let orch = orchestrator(StubProvider {
            failing: vec!["GME".to_string()],
            scores: vec![],
        });
        let posts = vec![post("$GME to the moon", 500), post("$TSLA dip", 100)];

        let mut events: Vec<ProgressEvent> = Vec::new();
        orch.analyze_posts(AnalysisRun::new("job1"), &posts, |e| events.push(e))
            .await;

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].index, 1);
        assert_eq!(events[1].index, 2);
        assert!(events.iter().all(|e| e.total == 2));
    }

    #[tokio::test]
    async fn results_are_sorted_by_composite_not_mention_rank() {
        // GME dominates mentions but scores poorly; TSLA is the stronger pick
        let orch = orchestrator(StubProvider {
            failing: vec![],
            scores: vec![("GME".to_string(), 20.0), ("TSLA".to_string(), 90.0)],
        });
        let posts = vec![
            post("$GME yolo", 1000),
            post("$GME update", 900),
            post("$GME hands", 800),
            post("$TSLA quiet dd", 10),
        ];
        let run = orch
            .analyze_posts(AnalysisRun::new("job1"), &posts, |_| {})
            .await;

        assert_eq!(run.trending_tickers[0].ticker, "GME");
        assert_eq!(run.recommendations[0].ticker, "TSLA");
        assert_eq!(run.recommendations[1].ticker, "GME");
        assert_eq!(run.recommendations[0].wsb_mention_rank, 2);
    }

    #[tokio::test]
    async fn at_most_eight_tickers_are_analyzed() {
        let orch = orchestrator(StubProvider { failing: vec![], scores: vec![] });
        // Ten distinct tickers with descending engagement
        let posts: Vec<Post> = (0..10)
            .map(|i| {
                let ticker: String = (0..3).map(|j| alpha(i + j)).collect();
                post(&format!("${} breakout", ticker), (10 - i) * 100)
            })
            .collect();

        let mut events = 0;
        let run = orch
            .analyze_posts(AnalysisRun::new("job1"), &posts, |_| events += 1)
            .await;

        assert_eq!(run.trending_tickers.len(), 10);
        assert_eq!(run.recommendations.len(), MAX_ANALYZED);
        assert_eq!(events, MAX_ANALYZED);
    }

    #[tokio::test]
    async fn runs_rebuild_state_from_scratch() {
        let orch = orchestrator(StubProvider { failing: vec![], scores: vec![] });
        let posts = vec![post("$GME", 100)];

        let first = orch.analyze_posts(AnalysisRun::new("a"), &posts, |_| {}).await;
        let second = orch.analyze_posts(AnalysisRun::new("b"), &[], |_| {}).await;

        assert_eq!(first.recommendations.len(), 1);
        // The second run saw an empty feed; nothing leaked over from the first
        assert!(second.recommendations.is_empty());
        assert!(second.trending_tickers.is_empty());
    }

    fn alpha(i: i64) -> char {
        (b'A' + (i % 26) as u8) as char
    }
}
