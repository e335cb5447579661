//! Keyword sentiment over a ticker's WSB posts.
//!
//! No NLP, no model calls: bullish and bearish word counts with a couple of
//! discussion-quality heuristics (meme hype vs. genuine due diligence). Works
//! offline and feeds the sentiment dimension of the composite score.

use std::collections::HashSet;
use trend_core::{Post, Sentiment, SentimentReport, SentimentScorer};

const BULLISH_WORDS: &[&str] = &[
    "moon", "rocket", "buy", "calls", "bull", "long", "undervalued",
    "squeeze", "green", "tendies", "gain", "up", "rip", "breakout",
    "diamond", "hands", "apes", "strong",
];

const BEARISH_WORDS: &[&str] = &[
    "puts", "short", "bear", "sell", "crash", "dump", "overvalued",
    "red", "loss", "down", "rip", "drill", "dead", "bag", "holding",
    "fucked", "worthless", "scam",
];

const MEME_WORDS: &[&str] = &[
    "moon", "rocket", "apes", "yolo", "diamond", "hands", "tendies", "squeeze",
];

const DD_SIGNALS: &[&str] = &[
    "revenue", "earnings", "p/e", "growth", "margin", "valuation",
    "balance sheet", "cash flow", "dcf", "analysis",
];

const MEME_THRESHOLD: usize = 3;
const DD_THRESHOLD: usize = 2;

pub struct WsbSentimentEngine {
    bullish: HashSet<&'static str>,
    bearish: HashSet<&'static str>,
}

impl WsbSentimentEngine {
    pub fn new() -> Self {
        Self {
            bullish: BULLISH_WORDS.iter().copied().collect(),
            bearish: BEARISH_WORDS.iter().copied().collect(),
        }
    }

    /// Score a ticker's posts into a sentiment report. Empty input yields a
    /// neutral report with zero confidence, never an error.
    pub fn analyze(&self, ticker: &str, posts: &[Post]) -> SentimentReport {
        if posts.is_empty() {
            return SentimentReport {
                ticker: ticker.to_string(),
                sentiment: Sentiment::Neutral,
                confidence: 0.0,
                is_meme_hype: false,
                is_genuine_dd: false,
                post_count_analyzed: 0,
                summary: format!("No recent WSB posts found for {}", ticker),
            };
        }

        let mut bull_count = 0usize;
        let mut bear_count = 0usize;
        let mut total_score = 0i64;

        for post in posts {
            let text = post.full_text().to_lowercase();
            let words: HashSet<&str> = text.split_whitespace().collect();
            bull_count += words.iter().filter(|w| self.bullish.contains(*w)).count();
            bear_count += words.iter().filter(|w| self.bearish.contains(*w)).count();
            total_score += post.score;
        }

        let total = bull_count + bear_count;
        let (sentiment, confidence) = if total == 0 {
            (Sentiment::Neutral, 0.2)
        } else if bull_count as f64 > bear_count as f64 * 1.5 {
            (Sentiment::Bullish, (bull_count as f64 / total as f64).min(0.8))
        } else if bear_count as f64 > bull_count as f64 * 1.5 {
            (Sentiment::Bearish, (bear_count as f64 / total as f64).min(0.8))
        } else {
            (Sentiment::Mixed, 0.4)
        };

        let all_text: String = posts
            .iter()
            .map(|p| p.full_text().to_lowercase())
            .collect::<Vec<_>>()
            .join(" ");
        let meme_count = MEME_WORDS.iter().filter(|w| all_text.contains(**w)).count();
        let dd_count = DD_SIGNALS.iter().filter(|w| all_text.contains(**w)).count();
        let is_meme_hype = meme_count >= MEME_THRESHOLD;
        let is_genuine_dd = dd_count >= DD_THRESHOLD;

        let quality = if is_meme_hype {
            "mostly meme hype"
        } else if is_genuine_dd {
            "some DD present"
        } else {
            "mixed discussion"
        };

        SentimentReport {
            ticker: ticker.to_string(),
            sentiment,
            confidence: (confidence * 100.0).round() / 100.0,
            is_meme_hype,
            is_genuine_dd,
            post_count_analyzed: posts.len(),
            summary: format!(
                "WSB mentions: {} posts, avg score {}. Keyword sentiment: {:?} ({}).",
                posts.len(),
                total_score / posts.len().max(1) as i64,
                sentiment,
                quality
            ),
        }
    }
}

impl Default for WsbSentimentEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentScorer for WsbSentimentEngine {
    fn score_posts(&self, ticker: &str, posts: &[Post]) -> SentimentReport {
        self.analyze(ticker, posts)
    }
}

/// Map a sentiment report onto the 0-100 scale the composite score expects.
/// Pure meme hype without any DD gets docked 10 points.
pub fn sentiment_score(report: &SentimentReport) -> f64 {
    let mut score = match report.sentiment {
        Sentiment::Bullish => 70.0,
        Sentiment::Bearish => 30.0,
        Sentiment::Mixed | Sentiment::Neutral => 50.0,
    };
    if report.is_meme_hype && !report.is_genuine_dd {
        score -= 10.0;
    }
    score
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(title: &str, body: &str, score: i64) -> Post {
        Post {
            title: title.to_string(),
            selftext: body.to_string(),
            score,
            ..Post::default()
        }
    }

    #[test]
    fn no_posts_is_neutral_with_zero_confidence() {
        let engine = WsbSentimentEngine::new();
        let report = engine.analyze("GME", &[]);
        assert_eq!(report.sentiment, Sentiment::Neutral);
        assert_eq!(report.confidence, 0.0);
        assert_eq!(report.post_count_analyzed, 0);
    }

    #[test]
    fn bullish_words_dominate() {
        let engine = WsbSentimentEngine::new();
        let posts = vec![
            post("GME calls printing", "buy the squeeze, tendies incoming", 100),
            post("bull gang", "going long, diamond hands", 50),
        ];
        let report = engine.analyze("GME", &posts);
        assert_eq!(report.sentiment, Sentiment::Bullish);
        assert!(report.confidence > 0.0 && report.confidence <= 0.8);
    }

    #[test]
    fn bearish_words_dominate() {
        let engine = WsbSentimentEngine::new();
        let posts = vec![post(
            "this stock is dead",
            "puts only, overvalued scam, dump it",
            10,
        )];
        let report = engine.analyze("XYZ", &posts);
        assert_eq!(report.sentiment, Sentiment::Bearish);
    }

    #[test]
    fn no_keywords_is_neutral_low_confidence() {
        let engine = WsbSentimentEngine::new();
        let posts = vec![post("quarterly report discussion", "numbers came out today", 5)];
        let report = engine.analyze("XYZ", &posts);
        assert_eq!(report.sentiment, Sentiment::Neutral);
        assert_eq!(report.confidence, 0.2);
    }

    #[test]
    fn meme_hype_detection() {
        let engine = WsbSentimentEngine::new();
        let posts = vec![post(
            "YOLO",
            "rocket to the moon, apes together, diamond hands",
            1000,
        )];
        let report = engine.analyze("GME", &posts);
        assert!(report.is_meme_hype);
        assert!(!report.is_genuine_dd);
    }

    #[test]
    fn dd_detection() {
        let engine = WsbSentimentEngine::new();
        let posts = vec![post(
            "deep value analysis",
            "revenue up 40%, earnings beat, dcf says undervalued",
            200,
        )];
        let report = engine.analyze("XYZ", &posts);
        assert!(report.is_genuine_dd);
    }

    #[test]
    fn meme_hype_docks_sentiment_score() {
        let report = SentimentReport {
            ticker: "GME".to_string(),
            sentiment: Sentiment::Bullish,
            confidence: 0.8,
            is_meme_hype: true,
            is_genuine_dd: false,
            post_count_analyzed: 3,
            summary: String::new(),
        };
        assert_eq!(sentiment_score(&report), 60.0);

        let with_dd = SentimentReport {
            is_genuine_dd: true,
            ..report
        };
        assert_eq!(sentiment_score(&with_dd), 70.0);
    }

    #[test]
    fn neutral_maps_to_midpoint() {
        let report = SentimentReport {
            ticker: "XYZ".to_string(),
            sentiment: Sentiment::Neutral,
            confidence: 0.2,
            is_meme_hype: false,
            is_genuine_dd: false,
            post_count_analyzed: 1,
            summary: String::new(),
        };
        assert_eq!(sentiment_score(&report), 50.0);
    }
}
