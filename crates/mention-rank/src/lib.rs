//! Mention aggregation and weighted popularity ranking.
//!
//! Folds per-post ticker extraction into per-ticker mention statistics,
//! scores them, and keeps the top of the list. Mention frequency dominates
//! the weighting; upvotes and comment volume contribute smaller continuous
//! adjustments so a less-mentioned but heavily upvoted ticker can still
//! rank competitively.

use ticker_extract::extract_tickers;
use trend_core::{Post, TickerMention};

/// Ranked list cap
pub const MAX_RANKED: usize = 20;

/// Sample posts kept per ticker for downstream sentiment
const MAX_SAMPLE_POSTS: usize = 5;

const MENTION_WEIGHT: f64 = 3.0;
const SCORE_WEIGHT: f64 = 0.01;
const COMMENT_WEIGHT: f64 = 0.05;

struct MentionAccumulator {
    ticker: String,
    count: u32,
    score: i64,
    comments: i64,
    posts: Vec<Post>,
}

/// Weighted popularity score for one ticker's accumulated stats
pub fn weighted_score(mention_count: u32, total_score: i64, total_comments: i64) -> f64 {
    let raw = mention_count as f64 * MENTION_WEIGHT
        + total_score as f64 * SCORE_WEIGHT
        + total_comments as f64 * COMMENT_WEIGHT;
    (raw * 100.0).round() / 100.0
}

/// Aggregate ticker mentions across the feed and return the ranked list,
/// descending by weighted score, capped at [`MAX_RANKED`].
///
/// Ties keep discovery order (stable sort), so two runs over the same feed
/// produce an identical ranking.
pub fn rank_mentions(posts: &[Post]) -> Vec<TickerMention> {
    let mut accumulators: Vec<MentionAccumulator> = Vec::new();
    let mut index: std::collections::HashMap<String, usize> = std::collections::HashMap::new();

    for post in posts {
        // Sorted for a deterministic discovery order within one post
        let mut tickers: Vec<String> = extract_tickers(&post.full_text()).into_iter().collect();
        tickers.sort();

        for ticker in tickers {
            let slot = *index.entry(ticker.clone()).or_insert_with(|| {
                accumulators.push(MentionAccumulator {
                    ticker,
                    count: 0,
                    score: 0,
                    comments: 0,
                    posts: Vec::new(),
                });
                accumulators.len() - 1
            });

            let acc = &mut accumulators[slot];
            acc.count += 1;
            acc.score += post.score;
            acc.comments += post.num_comments;
            if acc.posts.len() < MAX_SAMPLE_POSTS {
                acc.posts.push(post.clone());
            }
        }
    }

    let mut mentions: Vec<TickerMention> = accumulators
        .into_iter()
        .map(|acc| TickerMention {
            weighted_score: weighted_score(acc.count, acc.score, acc.comments),
            ticker: acc.ticker,
            mention_count: acc.count,
            total_score: acc.score,
            total_comments: acc.comments,
            sample_posts: acc.posts,
        })
        .collect();

    mentions.sort_by(|a, b| {
        b.weighted_score
            .partial_cmp(&a.weighted_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    mentions.truncate(MAX_RANKED);

    tracing::debug!("Ranked {} tickers from {} posts", mentions.len(), posts.len());
    mentions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(title: &str, body: &str, score: i64, comments: i64) -> Post {
        Post {
            title: title.to_string(),
            selftext: body.to_string(),
            score,
            num_comments: comments,
            ..Post::default()
        }
    }

    #[test]
    fn weighted_score_formula() {
        // 3*3 + 300*0.01 + 50*0.05 = 9 + 3 + 2.5
        assert_eq!(weighted_score(3, 300, 50), 14.5);
    }

    #[test]
    fn empty_feed_yields_empty_ranking() {
        assert!(rank_mentions(&[]).is_empty());
    }

    #[test]
    fn mentions_accumulate_across_posts() {
        let posts = vec![
            post("$GME to the moon", "", 100, 10),
            post("GME again", "still holding GME", 50, 5),
            post("boring day", "nothing here", 500, 80),
        ];
        let ranked = rank_mentions(&posts);
        assert_eq!(ranked.len(), 1);

        let gme = &ranked[0];
        assert_eq!(gme.ticker, "GME");
        // One mention per post regardless of repeats inside the body
        assert_eq!(gme.mention_count, 2);
        assert_eq!(gme.total_score, 150);
        assert_eq!(gme.total_comments, 15);
        assert_eq!(gme.weighted_score, weighted_score(2, 150, 15));
    }

    #[test]
    fn upvotes_can_outrank_mention_count() {
        let mut posts = vec![post("$AAA", "", 0, 0), post("$AAA", "", 0, 0)];
        // One mention, but 10_000 upvotes: 3 + 100 beats 6
        posts.push(post("$BBB", "", 10_000, 0));
        let ranked = rank_mentions(&posts);
        assert_eq!(ranked[0].ticker, "BBB");
        assert_eq!(ranked[1].ticker, "AAA");
    }

    #[test]
    fn ties_keep_discovery_order() {
        let posts = vec![post("$ZZX and $AAB", "", 10, 10)];
        let ranked = rank_mentions(&posts);
        assert_eq!(ranked.len(), 2);
        // Identical stats; discovery order within a post is alphabetical
        assert_eq!(ranked[0].ticker, "AAB");
        assert_eq!(ranked[1].ticker, "ZZX");
    }

    #[test]
    fn ranking_is_truncated() {
        let posts: Vec<Post> = (0..30)
            .map(|i| {
                let ticker = format!("{}{}{}", alpha(i / 26), alpha(i % 26), "Q");
                post(&format!("${} rocket", ticker), "", (30 - i) * 10, 0)
            })
            .collect();
        let ranked = rank_mentions(&posts);
        assert_eq!(ranked.len(), MAX_RANKED);
    }

    #[test]
    fn ranking_is_deterministic() {
        let posts = vec![
            post("$GME $AMC $BB $NOK all tied", "", 0, 0),
            post("$TSLA $NVDA $PLTR also tied", "", 0, 0),
        ];
        let first: Vec<String> = rank_mentions(&posts).into_iter().map(|m| m.ticker).collect();
        for _ in 0..10 {
            let again: Vec<String> =
                rank_mentions(&posts).into_iter().map(|m| m.ticker).collect();
            assert_eq!(first, again);
        }
    }

    #[test]
    fn sample_posts_are_capped() {
        let posts: Vec<Post> = (0..8).map(|i| post("$GME", "", i, 0)).collect();
        let ranked = rank_mentions(&posts);
        assert_eq!(ranked[0].mention_count, 8);
        assert_eq!(ranked[0].sample_posts.len(), 5);
    }

    fn alpha(i: i64) -> char {
        (b'A' + (i % 26) as u8) as char
    }
}
