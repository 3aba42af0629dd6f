//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// YTInsight - sentiment and keyword insights for YouTube comments
///
/// Fetches the comment analysis for a video from the analysis service (or
/// loads a saved one) and reports the sentiment distribution, the most
/// frequent keywords, and the top keywords per sentiment.
///
/// Examples:
///   ytinsight --video dQw4w9WgXcQ
///   ytinsight --video dQw4w9WgXcQ --api-url http://localhost:8000 --format json
///   ytinsight --input saved_analysis.json -o insights.md
///   ytinsight --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// YouTube video ID to analyze
    #[arg(
        long,
        value_name = "ID",
        env = "YTINSIGHT_VIDEO",
        conflicts_with = "input",
        required_unless_present_any = ["input", "init_config"]
    )]
    pub video: Option<String>,

    /// Load a saved analysis response instead of calling the service
    ///
    /// Accepts the service response JSON or raw model output, optionally
    /// wrapped in a ```json fence.
    #[arg(long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Base URL of the analysis service
    ///
    /// Can also be set via YTINSIGHT_API_URL env var or .ytinsight.toml config.
    #[arg(long, value_name = "URL", env = "YTINSIGHT_API_URL")]
    pub api_url: Option<String>,

    /// Output file path for the report
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (markdown, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .ytinsight.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Number of keywords in the overall ranking (default: 10)
    #[arg(long, value_name = "COUNT")]
    pub top_keywords: Option<usize>,

    /// Number of keywords per sentiment label (default: 5)
    #[arg(long, value_name = "COUNT")]
    pub top_per_sentiment: Option<usize>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .ytinsight.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        match (&self.video, &self.input) {
            (None, None) => {
                return Err("Either --video or --input must be provided".to_string());
            }
            (Some(video), _) if video.trim().is_empty() => {
                return Err("Video ID must not be empty".to_string());
            }
            _ => {}
        }

        // Validate service URL format
        if let Some(ref api_url) = self.api_url {
            if !api_url.starts_with("http://") && !api_url.starts_with("https://") {
                return Err("API URL must start with 'http://' or 'https://'".to_string());
            }
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        if let Some(ref input) = self.input {
            if !input.is_file() {
                return Err(format!("Input file does not exist: {}", input.display()));
            }
        }

        Ok(())
    }

    /// Video ID with surrounding whitespace removed.
    pub fn video_id(&self) -> Option<&str> {
        self.video.as_deref().map(str::trim)
    }

    /// Returns the log level based on verbosity settings.
    ///
    /// `--quiet` wins over `verbose = true` from the config file.
    pub fn log_level(&self, config_verbose: bool) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose || config_verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn make_args() -> Args {
        Args {
            video: Some("dQw4w9WgXcQ".to_string()),
            input: None,
            api_url: None,
            output: None,
            format: None,
            config: None,
            top_keywords: None,
            top_per_sentiment: None,
            timeout: None,
            verbose: false,
            quiet: false,
            init_config: false,
        }
    }

    #[test]
    fn test_valid_args() {
        assert!(make_args().validate().is_ok());
    }

    #[test]
    fn test_validation_missing_source() {
        let mut args = make_args();
        args.video = None;
        assert!(args.validate().is_err());

        args.init_config = true;
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_blank_video_id() {
        let mut args = make_args();
        args.video = Some("   ".to_string());
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_invalid_api_url() {
        let mut args = make_args();
        args.api_url = Some("localhost:8000".to_string());
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_zero_timeout() {
        let mut args = make_args();
        args.timeout = Some(0);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_missing_input_file() {
        let mut args = make_args();
        args.video = None;
        args.input = Some(PathBuf::from("/nonexistent/analysis.json"));
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_video_id_trimmed() {
        let mut args = make_args();
        args.video = Some("  abc123 ".to_string());
        assert_eq!(args.video_id(), Some("abc123"));
    }

    #[test]
    fn test_parse_from_command_line() {
        let args = Args::try_parse_from([
            "ytinsight",
            "--video",
            "abc123",
            "--format",
            "json",
            "--top-keywords",
            "3",
        ])
        .unwrap();

        assert_eq!(args.video.as_deref(), Some("abc123"));
        assert_eq!(args.format, Some(OutputFormat::Json));
        assert_eq!(args.top_keywords, Some(3));
    }

    #[test]
    fn test_video_and_input_conflict() {
        let parsed = Args::try_parse_from([
            "ytinsight",
            "--video",
            "abc123",
            "--input",
            "saved.json",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(false), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(false), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(false), tracing::Level::ERROR);
    }

    #[test]
    fn test_log_level_from_config_verbose() {
        let mut args = make_args();
        assert_eq!(args.log_level(true), tracing::Level::DEBUG);

        args.quiet = true;
        assert_eq!(args.log_level(true), tracing::Level::ERROR);
    }
}
