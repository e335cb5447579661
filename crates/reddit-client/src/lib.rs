//! Client for Reddit's public JSON feed. No API credentials needed.
//!
//! Transport failures are surfaced as retryable errors; the caller decides
//! whether to retry the whole run. Stickied posts are dropped here so the
//! pipeline only ever sees trading chatter.

use serde::Deserialize;
use std::collections::HashSet;
use std::time::Duration;
use trend_core::{Post, TrendError};

const BASE_URL: &str = "https://www.reddit.com";

/// Browser-like user agent to avoid Reddit 429s on the anonymous feed
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const REQUEST_TIMEOUT_SECS: u64 = 5;

/// Feed requests above this are clamped; one page is all a run needs
const MAX_FEED_LIMIT: u32 = 100;

/// Post bodies are truncated to this many chars when sampled
const SELFTEXT_SAMPLE_CHARS: usize = 500;

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<ListingChild>,
}

#[derive(Debug, Deserialize)]
struct ListingChild {
    data: RawPost,
}

#[derive(Debug, Deserialize)]
struct RawPost {
    #[serde(default)]
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    selftext: String,
    #[serde(default)]
    score: i64,
    #[serde(default)]
    num_comments: i64,
    #[serde(default)]
    upvote_ratio: f64,
    #[serde(default)]
    created_utc: f64,
    #[serde(default)]
    permalink: String,
    #[serde(default)]
    link_flair_text: Option<String>,
    #[serde(default)]
    stickied: bool,
}

impl RawPost {
    fn into_post(self) -> Post {
        let mut selftext = self.selftext;
        if selftext.len() > SELFTEXT_SAMPLE_CHARS {
            // Truncate on a char boundary; bodies can carry emoji
            let cut = selftext
                .char_indices()
                .map(|(i, _)| i)
                .take_while(|&i| i <= SELFTEXT_SAMPLE_CHARS)
                .last()
                .unwrap_or(0);
            selftext.truncate(cut);
        }

        Post {
            post_id: self.id,
            title: self.title,
            selftext,
            score: self.score,
            num_comments: self.num_comments,
            upvote_ratio: self.upvote_ratio,
            created_utc: self.created_utc,
            url: format!("https://reddit.com{}", self.permalink),
            flair: self.link_flair_text,
            stickied: self.stickied,
        }
    }
}

#[derive(Clone)]
pub struct RedditClient {
    client: reqwest::Client,
    base_url: String,
}

impl RedditClient {
    pub fn new() -> Self {
        Self::with_base_url(BASE_URL.to_string())
    }

    pub fn with_base_url(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self { client, base_url }
    }

    /// Fetch the hot feed for a subreddit: stickied posts dropped, posts
    /// deduplicated by id, bodies truncated for sampling.
    pub async fn fetch_hot(&self, subreddit: &str, limit: u32) -> Result<Vec<Post>, TrendError> {
        let limit = limit.min(MAX_FEED_LIMIT);
        let url = format!("{}/r/{}/hot.json?limit={}", self.base_url, subreddit, limit);
        self.fetch_listing(&url).await
    }

    /// Search a subreddit for recent posts mentioning a ticker
    pub async fn search_ticker(
        &self,
        subreddit: &str,
        ticker: &str,
        limit: u32,
    ) -> Result<Vec<Post>, TrendError> {
        let url = format!(
            "{}/r/{}/search.json?q={}&restrict_sr=on&sort=relevance&t=week&limit={}",
            self.base_url,
            subreddit,
            ticker,
            limit.min(MAX_FEED_LIMIT)
        );
        self.fetch_listing(&url).await
    }

    async fn fetch_listing(&self, url: &str) -> Result<Vec<Post>, TrendError> {
        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| TrendError::FeedError(format!("request to {} failed: {}", url, e)))?;

        if response.status().as_u16() == 429 {
            tracing::warn!("Reddit rate limited (429) for {}", url);
            return Err(TrendError::RateLimited("Reddit returned 429".to_string()));
        }
        if !response.status().is_success() {
            return Err(TrendError::FeedError(format!(
                "Reddit returned status {} for {}",
                response.status(),
                url
            )));
        }

        let listing = response
            .json::<Listing>()
            .await
            .map_err(|e| TrendError::FeedError(format!("malformed feed JSON: {}", e)))?;

        let mut seen_ids: HashSet<String> = HashSet::new();
        let mut posts = Vec::new();
        for child in listing.data.children {
            let raw = child.data;
            if raw.stickied {
                continue;
            }
            if raw.id.is_empty() || !seen_ids.insert(raw.id.clone()) {
                continue;
            }
            posts.push(raw.into_post());
        }

        tracing::info!("Fetched {} posts from {}", posts.len(), url);
        Ok(posts)
    }
}

impl Default for RedditClient {
    fn default() -> Self {
        Self::new()
    }
}
