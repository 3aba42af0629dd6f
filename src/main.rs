//! YTInsight - sentiment and keyword insights for YouTube comments
//!
//! A CLI tool that fetches a per-video comment analysis (sentiment label and
//! keywords per comment) and aggregates it into a sentiment distribution, a
//! ranking of the most frequent keywords, and the top keywords per sentiment.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Error (invalid arguments, config, service failure, I/O)

mod analysis;
mod cli;
mod config;
mod models;
mod report;
mod service;

use anyhow::{Context, Result};
use chrono::Utc;
use cli::{Args, OutputFormat};
use config::{Config, CONFIG_FILE_NAME};
use indicatif::{ProgressBar, ProgressStyle};
use models::{AnalysisResult, AnalysisSource, InsightReport, InsightView, ReportMetadata};
use service::AnalysisClient;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Load configuration before logging so `verbose` from the file applies
    let (mut config, origin) = match load_config(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };
    config.merge_with_args(&args);

    init_logging(&args, &config);

    info!("YTInsight v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    origin.log();

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(args, config).await {
        error!("Insight generation failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .ytinsight.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to customize the service URL, report format, and rankings.");
    Ok(())
}

/// Initialize logging based on CLI flags and the merged config.
fn init_logging(args: &Args, config: &Config) {
    let level = args.log_level(config.general.verbose);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Fetch or load the analysis, aggregate it, and write the report.
async fn run(args: Args, config: Config) -> Result<()> {
    let (result, source) = obtain_analysis(&args, &config).await?;
    check_alignment(&result);
    if result.is_empty() {
        warn!("The analysis contains no labelled comments");
    }

    let insights = analysis::aggregate_with_limits(&result, &config.report.limits());

    let report = InsightReport {
        metadata: ReportMetadata {
            video_id: args.video_id().map(String::from),
            source,
            generated_at: Utc::now(),
            comments_analyzed: result.len(),
        },
        insights,
    };

    let output = match config.report.format {
        OutputFormat::Json => report::generate_json_report(&report)?,
        OutputFormat::Markdown => report::generate_markdown_report(&report),
    };

    std::fs::write(&config.general.output, &output)
        .with_context(|| format!("Failed to write report to {}", config.general.output))?;

    if !args.quiet {
        print_summary(&report.insights);
        println!("\n✅ Report saved to: {}", config.general.output);
    }

    Ok(())
}

/// Load the analysis from a file or from the analysis service.
async fn obtain_analysis(args: &Args, config: &Config) -> Result<(AnalysisResult, AnalysisSource)> {
    if let Some(ref input) = args.input {
        info!("Loading analysis from: {}", input.display());
        let result = service::load_result(input)?;
        return Ok((result, AnalysisSource::File(input.display().to_string())));
    }

    let video_id = args.video_id().unwrap_or_default();
    let client = AnalysisClient::new(&config.service)?;
    info!("Analysis service: {}", client.base_url());

    let spinner = analyzing_spinner(args.quiet, video_id);
    let fetched = client.analyze(video_id).await;
    spinner.finish_and_clear();

    let result = fetched.with_context(|| format!("Analysis failed for video {}", video_id))?;
    info!("Received {} comments", result.comments.len());

    Ok((result, AnalysisSource::Service(client.base_url().to_string())))
}

/// Spinner shown while the service analyzes comments.
fn analyzing_spinner(quiet: bool, video_id: &str) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.green} [{elapsed}] {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(format!("Analyzing comments for {}…", video_id));
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}

/// Warn about length mismatches between the index-aligned sequences.
fn check_alignment(result: &AnalysisResult) {
    if result.is_aligned() {
        return;
    }

    warn!(
        "Analysis sequences differ in length: {} comments, {} sentiment labels, {} keyword lists",
        result.comments.len(),
        result.sentiment.len(),
        result.keywords.len()
    );
    if result.keywords.len() < result.sentiment.len() {
        warn!(
            "{} comments have no keyword list; treating them as empty",
            result.sentiment.len() - result.keywords.len()
        );
    }
}

/// Print a short console summary of the insights.
fn print_summary(insights: &InsightView) {
    println!("\n📊 Insight Summary:");
    if insights.is_empty() {
        println!("   No comments to summarize.");
        return;
    }
    println!("   Comments: {}", insights.total_comments());

    for entry in &insights.sentiment_counts {
        println!(
            "   - {}: {}",
            report::generator::display_label(&entry.label),
            entry.count
        );
    }

    if !insights.top_keywords.is_empty() {
        let top: Vec<String> = insights
            .top_keywords
            .iter()
            .take(5)
            .map(ToString::to_string)
            .collect();
        println!("   Top keywords: {}", top.join(", "));
    }
}

/// Where the configuration came from, reported once logging is up.
enum ConfigOrigin {
    File(PathBuf),
    Defaults,
    Unreadable(String),
}

impl ConfigOrigin {
    fn log(&self) {
        match self {
            ConfigOrigin::File(path) => info!("Loaded config from: {}", path.display()),
            ConfigOrigin::Defaults => debug!("No config file found, using defaults"),
            ConfigOrigin::Unreadable(e) => warn!("Failed to load config: {}", e),
        }
    }
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<(Config, ConfigOrigin)> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        let config = Config::load(config_path)?;
        return Ok((config, ConfigOrigin::File(config_path.clone())));
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => Ok((config, ConfigOrigin::File(PathBuf::from(CONFIG_FILE_NAME)))),
        Ok(None) => Ok((Config::default(), ConfigOrigin::Defaults)),
        Err(e) => Ok((Config::default(), ConfigOrigin::Unreadable(format!("{:#}", e)))),
    }
}
