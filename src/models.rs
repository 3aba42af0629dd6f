//! Data models for comment insights.
//!
//! This module contains the analysis input received from the upstream
//! service, the aggregated views derived from it, and the report wrapper
//! handed to the renderers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-video analysis produced by the upstream service.
///
/// The three sequences are index-aligned by comment, but the producer does
/// not guarantee equal lengths. Consumers must tolerate `keywords` (or
/// `comments`) being shorter than `sentiment`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Raw comment text, in the order the service returned them.
    #[serde(default)]
    pub comments: Vec<String>,
    /// One sentiment label per comment.
    #[serde(default)]
    pub sentiment: Vec<String>,
    /// Extracted keywords per comment.
    #[serde(default)]
    pub keywords: Vec<Vec<String>>,
}

impl AnalysisResult {
    /// Number of comments that carry a sentiment label.
    pub fn len(&self) -> usize {
        self.sentiment.len()
    }

    /// Returns true when no comment has been labelled.
    pub fn is_empty(&self) -> bool {
        self.sentiment.is_empty()
    }

    /// Keywords attributed to comment `index`, empty when the entry is missing.
    pub fn keywords_at(&self, index: usize) -> &[String] {
        self.keywords.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns true when all three sequences have the same length.
    pub fn is_aligned(&self) -> bool {
        self.comments.len() == self.sentiment.len() && self.keywords.len() == self.sentiment.len()
    }
}

/// Number of comments carrying one sentiment label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentCount {
    pub label: String,
    pub count: usize,
}

/// Number of occurrences of one keyword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordCount {
    pub term: String,
    pub count: usize,
}

impl fmt::Display for KeywordCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.term, self.count)
    }
}

/// Most frequent keywords among the comments of one sentiment label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentKeywordGroup {
    pub label: String,
    pub top: Vec<KeywordCount>,
}

/// The three chart-ready views derived from an [`AnalysisResult`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightView {
    /// Comment count per label, in first-occurrence order.
    pub sentiment_counts: Vec<SentimentCount>,
    /// Globally most frequent keywords, highest count first.
    pub top_keywords: Vec<KeywordCount>,
    /// Most frequent keywords per label, in first-occurrence order of labels.
    pub by_sentiment: Vec<SentimentKeywordGroup>,
}

impl InsightView {
    /// Total number of comments counted across all sentiment labels.
    pub fn total_comments(&self) -> usize {
        self.sentiment_counts.iter().map(|s| s.count).sum()
    }

    /// Returns true when no comment was aggregated.
    pub fn is_empty(&self) -> bool {
        self.sentiment_counts.is_empty()
            && self.top_keywords.is_empty()
            && self.by_sentiment.is_empty()
    }
}

/// Where the analysis came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "location")]
pub enum AnalysisSource {
    /// Fetched from the analysis service at this base URL.
    Service(String),
    /// Loaded from a saved response on disk.
    File(String),
}

impl fmt::Display for AnalysisSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisSource::Service(url) => write!(f, "service {}", url),
            AnalysisSource::File(path) => write!(f, "file {}", path),
        }
    }
}

/// Metadata about an insight report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Video the comments belong to, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,
    /// Origin of the analysis.
    pub source: AnalysisSource,
    /// Date and time the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Number of comments that carried a sentiment label.
    pub comments_analyzed: usize,
}

/// A complete insight report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightReport {
    pub metadata: ReportMetadata,
    pub insights: InsightView,
}
