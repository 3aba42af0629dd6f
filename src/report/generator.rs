//! Markdown and JSON report generation.
//!
//! This module renders an [`InsightReport`] as a Markdown document with
//! the three insight views (sentiment distribution, top keywords, top
//! keywords by sentiment) or as pretty-printed JSON.

use crate::models::{InsightReport, InsightView, KeywordCount, ReportMetadata, SentimentKeywordGroup};
use anyhow::Result;

/// Width in characters of the longest text bar.
const BAR_WIDTH: usize = 20;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &InsightReport) -> String {
    let mut output = String::new();

    output.push_str("# YTInsight Report\n\n");
    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_sentiment_section(&report.insights));
    output.push_str(&generate_keywords_section(&report.insights.top_keywords));
    output.push_str(&generate_by_sentiment_section(&report.insights.by_sentiment));
    output.push_str(&generate_footer());

    output
}

/// Generate a JSON report.
pub fn generate_json_report(report: &InsightReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

/// Capitalize the first character of a label for display.
///
/// Only affects rendering; aggregated data keeps the raw label.
pub fn display_label(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    if let Some(ref video_id) = metadata.video_id {
        section.push_str(&format!("- **Video:** `{}`\n", video_id));
    }
    section.push_str(&format!("- **Source:** {}\n", metadata.source));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!(
        "- **Comments Analyzed:** {}\n\n",
        metadata.comments_analyzed
    ));

    section
}

/// Generate the sentiment distribution section.
fn generate_sentiment_section(view: &InsightView) -> String {
    let mut section = String::new();

    section.push_str("## Sentiment Distribution\n\n");

    if view.sentiment_counts.is_empty() {
        section.push_str("No comments were analyzed.\n\n");
        return section;
    }

    let total = view.total_comments();
    let max = view.sentiment_counts.iter().map(|s| s.count).max().unwrap_or(0);

    section.push_str("| Sentiment | Comments | Share | |\n");
    section.push_str("|:---|:---:|:---:|:---|\n");

    for entry in &view.sentiment_counts {
        let share = entry.count as f64 / total as f64 * 100.0;
        section.push_str(&format!(
            "| {} | {} | {:.1}% | `{}` |\n",
            escape_cell(&display_label(&entry.label)),
            entry.count,
            share,
            bar(entry.count, max)
        ));
    }
    section.push('\n');

    section
}

/// Generate the overall keyword ranking section.
fn generate_keywords_section(keywords: &[KeywordCount]) -> String {
    let mut section = String::new();

    section.push_str("## Top Keywords\n\n");

    if keywords.is_empty() {
        section.push_str("No keywords were extracted.\n\n");
        return section;
    }

    let max = keywords.first().map(|k| k.count).unwrap_or(0);

    section.push_str("| # | Keyword | Count | |\n");
    section.push_str("|:---:|:---|:---:|:---|\n");

    for (i, kw) in keywords.iter().enumerate() {
        section.push_str(&format!(
            "| {} | {} | {} | `{}` |\n",
            i + 1,
            escape_cell(&kw.term),
            kw.count,
            bar(kw.count, max)
        ));
    }
    section.push('\n');

    section
}

/// Generate the per-sentiment keyword section.
fn generate_by_sentiment_section(groups: &[SentimentKeywordGroup]) -> String {
    let mut section = String::new();

    section.push_str("## Top Keywords by Sentiment\n\n");

    if groups.is_empty() {
        section.push_str("No sentiment labels were found.\n\n");
        return section;
    }

    for group in groups {
        section.push_str(&format!("### {}\n\n", display_label(&group.label)));

        if group.top.is_empty() {
            section.push_str("*No keywords*\n\n");
            continue;
        }

        for (i, kw) in group.top.iter().enumerate() {
            section.push_str(&format!("{}. {}\n", i + 1, kw));
        }
        section.push('\n');
    }

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    "---\n\n*Report generated by YTInsight*\n".to_string()
}

/// Text bar scaled against the largest value, at least one cell wide.
fn bar(value: usize, max: usize) -> String {
    if max == 0 || value == 0 {
        return String::new();
    }
    let width = (value * BAR_WIDTH).div_ceil(max).max(1);
    "█".repeat(width)
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnalysisSource, SentimentCount};
    use chrono::Utc;

    fn kw(term: &str, count: usize) -> KeywordCount {
        KeywordCount {
            term: term.to_string(),
            count,
        }
    }

    fn create_test_report() -> InsightReport {
        InsightReport {
            metadata: ReportMetadata {
                video_id: Some("abc123".to_string()),
                source: AnalysisSource::Service("http://localhost:8000".to_string()),
                generated_at: Utc::now(),
                comments_analyzed: 4,
            },
            insights: InsightView {
                sentiment_counts: vec![
                    SentimentCount {
                        label: "positive".to_string(),
                        count: 3,
                    },
                    SentimentCount {
                        label: "negative".to_string(),
                        count: 1,
                    },
                ],
                top_keywords: vec![kw("music", 3), kw("sound|mix", 1)],
                by_sentiment: vec![
                    SentimentKeywordGroup {
                        label: "positive".to_string(),
                        top: vec![kw("music", 3)],
                    },
                    SentimentKeywordGroup {
                        label: "negative".to_string(),
                        top: vec![],
                    },
                ],
            },
        }
    }

    #[test]
    fn test_generate_markdown_report() {
        let markdown = generate_markdown_report(&create_test_report());

        assert!(markdown.contains("# YTInsight Report"));
        assert!(markdown.contains("- **Video:** `abc123`"));
        assert!(markdown.contains("## Sentiment Distribution"));
        assert!(markdown.contains("| Positive | 3 | 75.0% |"));
        assert!(markdown.contains("## Top Keywords"));
        assert!(markdown.contains("| 1 | music | 3 |"));
        assert!(markdown.contains("sound\\|mix"));
        assert!(markdown.contains("### Negative\n\n*No keywords*"));
        assert!(markdown.contains("1. music (3)"));
    }

    #[test]
    fn test_sentiment_order_preserved() {
        let markdown = generate_markdown_report(&create_test_report());

        let positive = markdown.find("### Positive").unwrap();
        let negative = markdown.find("### Negative").unwrap();
        assert!(positive < negative);
    }

    #[test]
    fn test_empty_report_placeholders() {
        let mut report = create_test_report();
        report.insights = InsightView::default();

        let markdown = generate_markdown_report(&report);
        assert!(markdown.contains("No comments were analyzed."));
        assert!(markdown.contains("No keywords were extracted."));
        assert!(markdown.contains("No sentiment labels were found."));
    }

    #[test]
    fn test_display_label() {
        assert_eq!(display_label("positive"), "Positive");
        assert_eq!(display_label("Pos"), "Pos");
        assert_eq!(display_label("ünsure"), "Ünsure");
        assert_eq!(display_label(""), "");
    }

    #[test]
    fn test_bar_scaling() {
        assert_eq!(bar(10, 10).chars().count(), BAR_WIDTH);
        assert_eq!(bar(5, 10).chars().count(), BAR_WIDTH / 2);
        assert_eq!(bar(1, 1000).chars().count(), 1);
        assert!(bar(0, 10).is_empty());
    }

    #[test]
    fn test_generate_json_report() {
        let json = generate_json_report(&create_test_report()).unwrap();

        assert!(json.contains("\"sentiment_counts\""));
        assert!(json.contains("\"top_keywords\""));
        assert!(json.contains("\"by_sentiment\""));
        assert!(json.contains("\"label\": \"positive\""));
    }
}
