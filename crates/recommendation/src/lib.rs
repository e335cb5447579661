//! Recommendation synthesis from per-ticker metric bundles.
//!
//! Pure threshold rules over the fundamental/technical/risk bundles plus an
//! optional WSB sentiment report: composite score, buy/sell signal, a
//! one-sentence thesis, bull/bear cases and risk flags. Every metric field is
//! optional and every access is null-safe; missing data degrades to the
//! documented fallback strings, never to a panic.

use trend_core::{MetricBundle, Recommendation, Sentiment, SentimentReport, Signal};
use wsb_sentiment::sentiment_score;


/// Neutral default used for any absent sub-score
const NEUTRAL_SCORE: f64 = 50.0;

const FUNDAMENTAL_WEIGHT: f64 = 0.35;
const TECHNICAL_WEIGHT: f64 = 0.25;
const RISK_WEIGHT: f64 = 0.20;
const SENTIMENT_WEIGHT: f64 = 0.20;

/// Weighted composite of the three sub-scores and the sentiment dimension,
/// rounded and clamped to [0, 100]. An absent sentiment input contributes the
/// neutral 50.
pub fn composite_score(bundle: &MetricBundle, sentiment: Option<f64>) -> u8 {
    let composite = bundle.fundamental.score.unwrap_or(NEUTRAL_SCORE) * FUNDAMENTAL_WEIGHT
        + bundle.technical.score.unwrap_or(NEUTRAL_SCORE) * TECHNICAL_WEIGHT
        + bundle.risk.score.unwrap_or(NEUTRAL_SCORE) * RISK_WEIGHT
        + sentiment.unwrap_or(NEUTRAL_SCORE) * SENTIMENT_WEIGHT;
    composite.round().clamp(0.0, 100.0) as u8
}

fn build_thesis(ticker: &str, bundle: &MetricBundle) -> String {
    let f = &bundle.fundamental;
    let t = &bundle.technical;
    let r = &bundle.risk;

    let mut parts: Vec<String> = Vec::new();

    if let Some(pe) = f.trailing_pe {
        parts.push(format!("P/E of {:.1}", pe));
    }
    if let Some(growth) = f.revenue_growth_yoy {
        // "declining" only when strictly negative; flat revenue reads as growing 0.0%
        let direction = if growth < 0.0 { "declining" } else { "growing" };
        parts.push(format!("revenue {} {:.1}% YoY", direction, growth.abs() * 100.0));
    }
    if let Some(trend) = &t.trend_signal {
        parts.push(format!("technical trend is {}", trend));
    }
    if let Some(sharpe) = r.sharpe_ratio {
        parts.push(format!("Sharpe ratio of {:.2}", sharpe));
    }

    if parts.is_empty() {
        format!("{}: Limited data available.", ticker)
    } else {
        format!("{}: {}.", ticker, parts.join(", "))
    }
}

fn build_bull_case(bundle: &MetricBundle, sentiment: Option<&SentimentReport>) -> String {
    let f = &bundle.fundamental;
    let t = &bundle.technical;

    let mut parts: Vec<String> = Vec::new();

    if let Some(upside) = f.dcf_upside_pct {
        if upside > 0.0 {
            parts.push(format!("DCF suggests {:.0}% upside", upside * 100.0));
        }
    }
    if let Some(growth) = f.revenue_growth_yoy {
        if growth > 0.10 {
            parts.push(format!("strong revenue growth ({:.1}%)", growth * 100.0));
        }
    }
    if t.trend_signal.as_deref() == Some("bullish") {
        parts.push("bullish technical trend".to_string());
    }
    if sentiment.map(|s| s.sentiment) == Some(Sentiment::Bullish) {
        parts.push("strong WSB bullish sentiment".to_string());
    }

    if parts.is_empty() {
        "Limited bullish signals.".to_string()
    } else {
        parts.join(". ")
    }
}

fn build_bear_case(bundle: &MetricBundle, sentiment: Option<&SentimentReport>) -> String {
    let f = &bundle.fundamental;
    let t = &bundle.technical;
    let r = &bundle.risk;

    let mut parts: Vec<String> = Vec::new();

    if let Some(pe) = f.trailing_pe {
        if pe > 40.0 {
            parts.push(format!("expensive valuation (P/E {:.0})", pe));
        }
    }
    if t.trend_signal.as_deref() == Some("bearish") {
        parts.push("bearish technical trend".to_string());
    }
    if let Some(vol) = r.volatility_annual {
        if vol > 0.5 {
            parts.push(format!("very volatile ({:.0}% annual)", vol * 100.0));
        }
    }
    if sentiment.is_some_and(|s| s.is_meme_hype) {
        parts.push("WSB hype may be meme-driven".to_string());
    }

    if parts.is_empty() {
        "Limited bearish signals.".to_string()
    } else {
        parts.join(". ")
    }
}

fn build_risk_flags(bundle: &MetricBundle, sentiment: Option<&SentimentReport>) -> Vec<String> {
    let f = &bundle.fundamental;
    let r = &bundle.risk;

    let mut flags: Vec<String> = Vec::new();

    if f.trailing_pe.is_some_and(|pe| pe > 50.0) {
        flags.push("Extreme valuation".to_string());
    }
    if f.debt_to_equity.is_some_and(|de| de > 3.0) {
        flags.push("Heavy debt load".to_string());
    }
    if r.volatility_annual.is_some_and(|vol| vol > 0.5) {
        flags.push("High volatility".to_string());
    }
    if let Some(drawdown) = r.max_drawdown {
        if drawdown < -0.30 {
            flags.push(format!("Large recent drawdown ({:.0}%)", drawdown * 100.0));
        }
    }
    if sentiment.is_some_and(|s| s.is_meme_hype) {
        flags.push("Meme stock hype".to_string());
    }

    flags
}

/// Synthesize one ticker's recommendation from its metric bundles.
///
/// `sentiment` is optional; without it the sentiment dimension contributes
/// the neutral 50 and no sentiment clauses are appended, so the output is a
/// pure function of the three bundles.
pub fn synthesize(
    ticker: &str,
    bundle: &MetricBundle,
    sentiment: Option<&SentimentReport>,
    rank: u32,
) -> Recommendation {
    let composite = composite_score(bundle, sentiment.map(sentiment_score));
    let signal = Signal::from_composite(composite);

    tracing::debug!("{}: composite={}, signal={:?}", ticker, composite, signal);

    Recommendation {
        ticker: ticker.to_string(),
        signal,
        composite_score: composite,
        investment_thesis: build_thesis(ticker, bundle),
        bull_case: build_bull_case(bundle, sentiment),
        bear_case: build_bear_case(bundle, sentiment),
        risk_flags: build_risk_flags(bundle, sentiment),
        wsb_mention_rank: rank,
    }
}
