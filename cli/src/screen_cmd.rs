//! `irb-prescreen` commands
//!
//! ## Commands
//!
//! - `irb-prescreen classify <FILE>` - Classify a protocol snapshot
//! - `irb-prescreen documents <FILE>` - List the submission documents to prepare
//!
//! ## Exit Codes
//!
//! - 0: Classified (any review level other than insufficient information)
//! - 1: Insufficient information to classify
//! - 2: Input error (unreadable, unparsable, or unsupported snapshot file)
//! - 3: Configuration error

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use irb_classifier::config::{ConfigLoader, OutputFormat, ScreenConfig};
use irb_classifier::{
    DocumentKind, Priority, ProtocolSnapshot, RecommendationKind, ReviewResult, ReviewType,
    ScreenError, Severity, classify_review, load_snapshot, plan_documents,
};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Exit codes for pre-screening commands
pub mod exit_codes {
    pub const CLASSIFIED: i32 = 0;
    pub const INSUFFICIENT_INFO: i32 = 1;
    pub const INPUT_ERROR: i32 = 2;
    pub const CONFIG_ERROR: i32 = 3;
}

/// IRB review-level pre-screening (45 CFR 46). Results are advisory only.
#[derive(Debug, Parser)]
#[command(name = "irb-prescreen", version = irb_classifier::VERSION, about)]
pub struct ScreenCli {
    #[command(subcommand)]
    pub command: ScreenSubcommand,
}

impl ScreenCli {
    pub fn run(self) -> i32 {
        match self.command {
            ScreenSubcommand::Classify(args) => run_classify(args),
            ScreenSubcommand::Documents(args) => run_documents(args),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum ScreenSubcommand {
    /// Classify a protocol snapshot into a review level
    ///
    /// Reads a `.json` or `.toml` snapshot and prints the determination with
    /// its reasons, flags, and recommendations.
    Classify(CommonArgs),

    /// List the documents to prepare for the determined review level
    Documents(CommonArgs),
}

#[derive(Debug, Args)]
pub struct CommonArgs {
    /// Protocol snapshot file (.json or .toml)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Output as JSON for automation
    #[arg(long)]
    pub json: bool,

    /// Configuration file (default: ./irb-prescreen.toml or the user config dir)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// JSON body of the `documents` command
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DocumentPlan {
    review_type: ReviewType,
    category: Option<u8>,
    documents: Vec<DocumentKind>,
}

/// Filter used until the configured one is known.
const BOOTSTRAP_LOG_FILTER: &str = "warn";

fn env_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new(BOOTSTRAP_LOG_FILTER))
}

/// Install the stderr subscriber. `RUST_LOG` overrides the configured filter.
pub fn init_logging(default_filter: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_filter))
        .with_writer(std::io::stderr)
        .try_init();
}

/// Load configuration under a scoped stderr subscriber so loader events
/// are not lost before [`init_logging`] runs.
fn load_config_logged(path: Option<&Path>) -> anyhow::Result<ScreenConfig> {
    let bootstrap = tracing_subscriber::fmt()
        .with_env_filter(env_filter(BOOTSTRAP_LOG_FILTER))
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::with_default(bootstrap, || load_config(path))
}

fn load_config(path: Option<&Path>) -> anyhow::Result<ScreenConfig> {
    let config = match path {
        Some(path) => ConfigLoader::new()
            .with_file(path)
            .load()
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => ConfigLoader::load_default().context("failed to load configuration")?,
    };
    Ok(config)
}

fn read_snapshot(path: &Path) -> anyhow::Result<ProtocolSnapshot> {
    load_snapshot(path)
        .with_context(|| format!("failed to load protocol snapshot {}", path.display()))
}

/// Shared setup: configuration, logging, snapshot. Errors are reported and
/// mapped to an exit code.
fn prepare(args: &CommonArgs) -> Result<(ScreenConfig, ProtocolSnapshot), i32> {
    let config = load_config_logged(args.config.as_deref()).map_err(|e| {
        eprintln!("Configuration error: {e:#}");
        exit_codes::CONFIG_ERROR
    })?;
    init_logging(&config.logging.filter);

    let snapshot = read_snapshot(&args.file).map_err(|e| {
        eprintln!("{}: {e:#}", input_error_heading(&e));
        exit_codes::INPUT_ERROR
    })?;
    Ok((config, snapshot))
}

/// Tell unparsable snapshots apart from unreadable or unsupported files.
fn input_error_heading(err: &anyhow::Error) -> &'static str {
    if err
        .downcast_ref::<ScreenError>()
        .is_some_and(ScreenError::is_parse_error)
    {
        "Input error (unparsable snapshot)"
    } else {
        "Input error"
    }
}

fn exit_code_for(result: &ReviewResult) -> i32 {
    if result.review_type == ReviewType::InsufficientInfo {
        exit_codes::INSUFFICIENT_INFO
    } else {
        exit_codes::CLASSIFIED
    }
}

fn output_format(args: &CommonArgs, config: &ScreenConfig) -> OutputFormat {
    if args.json {
        OutputFormat::Json
    } else {
        config.output.format
    }
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> String {
    if pretty {
        serde_json::to_string_pretty(value).unwrap_or_default()
    } else {
        serde_json::to_string(value).unwrap_or_default()
    }
}

fn run_classify(args: CommonArgs) -> i32 {
    let (config, snapshot) = match prepare(&args) {
        Ok(prepared) => prepared,
        Err(code) => return code,
    };

    let result = classify_review(&snapshot);
    tracing::info!(
        file = %args.file.display(),
        review_type = ?result.review_type,
        "Classification complete"
    );

    match output_format(&args, &config) {
        OutputFormat::Json => println!("{}", to_json(&result, config.output.pretty)),
        OutputFormat::Text => print!("{}", render_result_text(&result, &config)),
    }

    exit_code_for(&result)
}

fn run_documents(args: CommonArgs) -> i32 {
    let (config, snapshot) = match prepare(&args) {
        Ok(prepared) => prepared,
        Err(code) => return code,
    };

    let result = classify_review(&snapshot);
    let documents = plan_documents(&snapshot, &result);

    match output_format(&args, &config) {
        OutputFormat::Json => {
            let plan = DocumentPlan {
                review_type: result.review_type,
                category: result.category,
                documents,
            };
            println!("{}", to_json(&plan, config.output.pretty));
        }
        OutputFormat::Text => print!("{}", render_documents_text(&result, &documents)),
    }

    exit_code_for(&result)
}

fn severity_label(severity: Severity) -> &'static str {
    match severity {
        Severity::High => "high",
        Severity::Medium => "medium",
        Severity::Low => "low",
    }
}

fn recommendation_label(kind: RecommendationKind, priority: Priority) -> String {
    let kind = match kind {
        RecommendationKind::Expedite => "expedite",
        RecommendationKind::Compliance => "compliance",
        RecommendationKind::Protection => "protection",
        RecommendationKind::Consistency => "consistency",
    };
    let priority = match priority {
        Priority::High => "high",
        Priority::Medium => "medium",
        Priority::Low => "low",
    };
    format!("{kind}/{priority}")
}

/// Human-readable rendering of a classification.
pub fn render_result_text(result: &ReviewResult, config: &ScreenConfig) -> String {
    let mut out = String::new();
    let threshold = config.review.confidence_threshold;

    let _ = writeln!(out, "{}", result.headline());
    let _ = writeln!(out, "Confidence: {:.0}%", result.confidence * 100.0);
    if result.review_type.is_reviewable() && !result.meets_threshold(threshold) {
        let _ = writeln!(
            out,
            "Note: confidence is below {:.0}%; consult IRB staff before relying on this result.",
            threshold * 100.0
        );
    }

    let _ = writeln!(out, "\nReasons:");
    for reason in &result.reasons {
        let _ = writeln!(out, "  - {reason}");
    }

    if config.output.show_flags && !result.flags.is_empty() {
        let _ = writeln!(out, "\nFlags:");
        for flag in &result.flags {
            let _ = writeln!(out, "  [{}] {}", severity_label(flag.severity), flag.message);
        }
    }

    if config.output.show_recommendations && !result.recommendations.is_empty() {
        let _ = writeln!(out, "\nRecommendations:");
        for rec in &result.recommendations {
            let _ = writeln!(
                out,
                "  [{}] {}",
                recommendation_label(rec.kind, rec.priority),
                rec.title
            );
            let _ = writeln!(out, "      {}", rec.body);
        }
    }

    let _ = writeln!(out, "\n{}", result.disclaimer);
    out
}

/// Human-readable rendering of a document plan.
pub fn render_documents_text(result: &ReviewResult, documents: &[DocumentKind]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", result.headline());

    if documents.is_empty() {
        let _ = writeln!(
            out,
            "No documents can be planned until the prescreening questions are answered."
        );
        return out;
    }

    let _ = writeln!(out, "\nDocuments to prepare:");
    for (index, kind) in documents.iter().enumerate() {
        let _ = writeln!(out, "  {}. {kind}", index + 1);
    }
    out
}
