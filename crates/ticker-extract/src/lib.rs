//! Ticker symbol extraction from free-form WSB text.
//!
//! Two lexical forms are recognized: the `$TICKER` cashtag (high confidence)
//! and bare all-caps words of 2-5 letters (noisy, filtered through the
//! false-positive lexicon).

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

pub mod lexicon;
pub use lexicon::is_false_positive;

static CASHTAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$([A-Z]{1,5})\b").expect("valid cashtag regex"));

static BARE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b([A-Z]{2,5})\b").expect("valid bare ticker regex"));

/// Extract likely stock tickers from one document's text.
///
/// Returns a set, so each ticker appears at most once per document no matter
/// how often it occurred. Empty or non-matching text yields an empty set,
/// never an error.
pub fn extract_tickers(text: &str) -> HashSet<String> {
    let mut tickers = HashSet::new();

    // $TICKER mentions (high confidence)
    for cap in CASHTAG_PATTERN.captures_iter(text) {
        let symbol = &cap[1];
        if !is_false_positive(symbol) {
            tickers.insert(symbol.to_string());
        }
    }

    // Bare uppercase words (lower confidence, 2+ chars required)
    for cap in BARE_PATTERN.captures_iter(text) {
        let symbol = &cap[1];
        if !is_false_positive(symbol) {
            tickers.insert(symbol.to_string());
        }
    }

    tickers
}
