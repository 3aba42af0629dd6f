//! Sentiment and keyword aggregation.
//!
//! This module turns an [`AnalysisResult`] into the three chart-ready views of
//! an [`InsightView`]: comment counts per sentiment label, the globally most
//! frequent keywords, and the most frequent keywords per label.
//!
//! Everything here is a pure function over borrowed input. Grouping keeps the
//! order in which keys are first seen, and rankings use a stable sort so that
//! keys with equal counts stay in first-appearance order.

use crate::models::{AnalysisResult, InsightView, KeywordCount, SentimentCount, SentimentKeywordGroup};
use std::cmp::Reverse;
use std::collections::HashMap;
use tracing::debug;

/// Default number of entries in the overall keyword ranking.
pub const DEFAULT_TOP_KEYWORDS: usize = 10;

/// Default number of entries in each per-sentiment keyword ranking.
pub const DEFAULT_TOP_PER_SENTIMENT: usize = 5;

/// Truncation limits applied to keyword rankings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankingLimits {
    /// Maximum entries in [`InsightView::top_keywords`].
    pub top_keywords: usize,
    /// Maximum entries in each [`SentimentKeywordGroup::top`].
    pub top_per_sentiment: usize,
}

impl Default for RankingLimits {
    fn default() -> Self {
        Self {
            top_keywords: DEFAULT_TOP_KEYWORDS,
            top_per_sentiment: DEFAULT_TOP_PER_SENTIMENT,
        }
    }
}

/// Aggregate an analysis result with the default limits (10 overall, 5 per label).
#[allow(dead_code)]
pub fn aggregate(result: &AnalysisResult) -> InsightView {
    aggregate_with_limits(result, &RankingLimits::default())
}

/// Aggregate an analysis result with custom ranking limits.
pub fn aggregate_with_limits(result: &AnalysisResult, limits: &RankingLimits) -> InsightView {
    let sentiment_counts = count_sentiments(&result.sentiment);
    // Only comments with a sentiment label count, same as the per-label buckets
    let top_keywords = rank_keywords(
        (0..result.len())
            .flat_map(|i| result.keywords_at(i))
            .map(String::as_str),
        limits.top_keywords,
    );
    let by_sentiment = keywords_by_sentiment(result, limits.top_per_sentiment);

    debug!(
        "Aggregated {} comments into {} sentiment labels and {} top keywords",
        result.len(),
        sentiment_counts.len(),
        top_keywords.len()
    );

    InsightView {
        sentiment_counts,
        top_keywords,
        by_sentiment,
    }
}

/// Count comments per sentiment label, in first-occurrence order.
pub fn count_sentiments(labels: &[String]) -> Vec<SentimentCount> {
    tally(labels.iter().map(String::as_str))
        .into_iter()
        .map(|(label, count)| SentimentCount {
            label: label.to_string(),
            count,
        })
        .collect()
}

/// Rank terms by frequency, highest first, keeping at most `limit` entries.
///
/// Terms with equal counts keep the order of their first appearance.
pub fn rank_keywords<'a, I>(terms: I, limit: usize) -> Vec<KeywordCount>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut ranked = tally(terms);
    // sort_by_key is stable, so ties stay in first-appearance order
    ranked.sort_by_key(|(_, count)| Reverse(*count));
    ranked.truncate(limit);

    ranked
        .into_iter()
        .map(|(term, count)| KeywordCount {
            term: term.to_string(),
            count,
        })
        .collect()
}

/// Rank keywords separately for each sentiment label.
///
/// Comment `i` contributes its keywords to the bucket of `sentiment[i]`. A
/// missing keyword entry counts as an empty list, so every label that occurs
/// gets a group even when none of its comments carry keywords.
pub fn keywords_by_sentiment(result: &AnalysisResult, limit: usize) -> Vec<SentimentKeywordGroup> {
    let mut slots: HashMap<&str, usize> = HashMap::new();
    let mut buckets: Vec<(&str, Vec<&str>)> = Vec::new();

    for (i, label) in result.sentiment.iter().enumerate() {
        let slot = *slots.entry(label.as_str()).or_insert_with(|| {
            buckets.push((label.as_str(), Vec::new()));
            buckets.len() - 1
        });
        buckets[slot]
            .1
            .extend(result.keywords_at(i).iter().map(String::as_str));
    }

    buckets
        .into_iter()
        .map(|(label, terms)| SentimentKeywordGroup {
            label: label.to_string(),
            top: rank_keywords(terms, limit),
        })
        .collect()
}

/// Count occurrences of each distinct key, in first-occurrence order.
fn tally<'a, I>(items: I) -> Vec<(&'a str, usize)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut slots: HashMap<&'a str, usize> = HashMap::new();
    let mut counts: Vec<(&'a str, usize)> = Vec::new();

    for item in items {
        match slots.get(item) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                slots.insert(item, counts.len());
                counts.push((item, 1));
            }
        }
    }

    counts
}
