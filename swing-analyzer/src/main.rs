//! swing-analyzer - Golf swing phase analysis
//!
//! Replays a recorded keypoint trace through the analysis pipeline and prints
//! the detected phase boundaries.
//!
//! ```text
//! swing-analyzer analyze --trace swing.json
//! swing-analyzer analyze --trace swing.json --samples 24 --hand left-then-right --json
//! ```

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use swing_analyzer::build_info;
use swing_analyzer::config::{AnalyzerToml, HandPreference, CONFIG_ENV_VAR, MODULE_NAME};
use swing_analyzer::sources::{RecordedTrace, TraceFrameSource, TracePoseEstimator};
use swing_analyzer::{AnalysisReport, SwingAnalyzer};
use swing_common::config::{resolve_config_path, LoggingConfig};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for swing-analyzer
#[derive(Parser, Debug)]
#[command(name = "swing-analyzer")]
#[command(about = "Golf swing phase analysis from pose keypoints")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze a recorded keypoint trace
    Analyze(AnalyzeArgs),
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    /// Recorded keypoint trace (JSON)
    #[arg(long, value_name = "FILE")]
    trace: PathBuf,

    /// Config file (falls back to the platform default)
    #[arg(long, value_name = "FILE", env = "SWING_ANALYZER_CONFIG")]
    config: Option<PathBuf>,

    /// Number of frames to sample (default from config / SWING_SAMPLE_COUNT)
    #[arg(long)]
    samples: Option<usize>,

    /// Which wrist stands in for the club hand
    #[arg(long, value_enum)]
    hand: Option<HandPreference>,

    /// Minimum keypoint confidence (0-1)
    #[arg(long)]
    min_confidence: Option<f64>,

    /// Print the full report as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Analyze(args) => run_analyze(args).await,
    }
}

async fn run_analyze(args: AnalyzeArgs) -> Result<()> {
    let config_path = resolve_config_path(args.config.as_deref(), CONFIG_ENV_VAR, MODULE_NAME);
    let toml = AnalyzerToml::load(config_path.as_deref()).context("Failed to load configuration")?;

    init_tracing(&toml.logging)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        git = build_info::GIT_HASH,
        built = build_info::BUILD_TIMESTAMP,
        profile = build_info::BUILD_PROFILE,
        "Starting swing-analyzer"
    );
    if let Some(path) = &config_path {
        info!(path = %path.display(), "Config file");
    }

    let mut config = toml.analysis;
    if let Some(hand) = args.hand {
        config.features.hand_preference = hand;
    }
    if let Some(min_confidence) = args.min_confidence {
        config.features.min_confidence = min_confidence;
    }
    config.validate().context("Invalid analysis options")?;
    let sample_count = args.samples.unwrap_or(config.sampling.sample_count);

    let trace = Arc::new(
        RecordedTrace::load(&args.trace)
            .with_context(|| format!("Failed to load trace {}", args.trace.display()))?,
    );
    let source = TraceFrameSource::new(Arc::clone(&trace));
    let estimator = TracePoseEstimator::new(Arc::clone(&trace));

    let analyzer = SwingAnalyzer::new(config);
    let report = match analyzer
        .analyze(trace.duration, sample_count, &source, &estimator)
        .await
    {
        Ok(report) => report,
        Err(e) => {
            error!(
                stage = %e.stage,
                sampled = e.partial.sample_times.len(),
                features = e.partial.features.len(),
                "Analysis aborted"
            );
            return Err(e).context("Swing analysis failed");
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

/// Install the tracing subscriber
///
/// RUST_LOG wins over the configured level. Logs go to stderr, and also to
/// `log_file` when one is configured, so stdout carries only the report.
fn init_tracing(logging: &LoggingConfig) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(&logging.level))
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let file_layer = match &logging.log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    Ok(())
}

fn print_report(report: &AnalysisReport) {
    if report.segmentation.is_empty() {
        println!("No frames sampled");
        return;
    }

    println!("Swing phases:");
    for marker in report.segmentation.markers() {
        println!("  {}", marker);
    }

    println!();
    println!(
        "{:>8}  {:<13}  {:>8}  {:>8}  {:>6}",
        "time", "phase", "shoulder", "hip", "handY"
    );
    for frame in &report.labeled_frames {
        let f = &frame.features;
        println!(
            "{:>7.2}s  {:<13}  {:>8}  {:>8}  {:>6}",
            f.time,
            frame.phase,
            format_optional(f.shoulder_angle, 1),
            format_optional(f.hip_angle, 1),
            format_optional(f.hand_y, 3)
        );
    }

    if !report.session.warnings.is_empty() {
        println!();
        println!("Warnings:");
        for warning in &report.session.warnings {
            println!("  [{}] {}", warning.code, warning.message);
        }
    }
}

fn format_optional(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", precision, v),
        None => "-".to_string(),
    }
}
