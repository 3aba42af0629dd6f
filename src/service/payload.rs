//! Analysis payload decoding.
//!
//! Accepts both the analysis service response
//! (`{"comments", "sentiment", "keywords", "error"?}`) and the raw model output
//! it is built from (`{"sentiments", "keywords"}`), optionally wrapped in a
//! Markdown code fence.

use crate::models::AnalysisResult;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Errors raised while decoding an analysis payload.
#[derive(Debug, Error)]
pub enum PayloadError {
    /// The payload carries an error marker instead of data.
    #[error("{0}")]
    Service(String),

    /// The payload is not valid analysis JSON.
    #[error("invalid analysis payload: {0}")]
    Json(#[from] serde_json::Error),
}

/// Wire shape of an analysis response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyzeResponse {
    #[serde(default)]
    pub comments: Vec<String>,
    #[serde(default, alias = "sentiments")]
    pub sentiment: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<Vec<String>>,
    #[serde(default)]
    pub error: Option<String>,
}

impl AnalyzeResponse {
    /// Convert into an [`AnalysisResult`], failing when the error marker is set.
    pub fn into_result(self) -> Result<AnalysisResult, PayloadError> {
        if let Some(message) = self.error {
            return Err(PayloadError::Service(message));
        }

        Ok(AnalysisResult {
            comments: self.comments,
            sentiment: self.sentiment,
            keywords: self.keywords,
        })
    }
}

/// Remove a surrounding ```` ``` ```` or ```` ```json ```` fence, if any.
pub fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix("```") {
        text = rest.strip_prefix("json").unwrap_or(rest).trim_start();
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest.trim_end();
    }

    text
}

/// Decode an analysis payload from text.
pub fn parse_payload(text: &str) -> Result<AnalysisResult, PayloadError> {
    let cleaned = strip_code_fences(text);
    let response: AnalyzeResponse = serde_json::from_str(cleaned)?;
    response.into_result()
}

/// Load a saved analysis payload from disk.
pub fn load_result(path: &Path) -> Result<AnalysisResult> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read analysis file: {}", path.display()))?;

    let result = parse_payload(&content)
        .with_context(|| format!("Failed to load analysis from {}", path.display()))?;

    debug!(
        "Loaded {} comments from {}",
        result.comments.len(),
        path.display()
    );

    Ok(result)
}
