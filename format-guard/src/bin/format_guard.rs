//! format-guard
//!
//! Validates every CSV file under the year folders of a data repository and
//! exits non-zero if any file breaks a formatting rule.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use format_guard::core::{FormatSuite, RunConfig, DEFAULT_MAX_EXAMPLES};
use format_guard::formatters::{FormatterConfig, HumanFormatter, JsonFormatter, ResultFormatter};
use format_guard::logging::setup::{init_logging, LoggingConfig};
use format_guard::logging::LogConfig;
use std::path::PathBuf;
use std::process;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Human,
    Json,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Root of the repository containing the year folders to validate
    root: PathBuf,

    /// Examples shown per failed rule on the console (negative for all)
    #[arg(long, default_value_t = DEFAULT_MAX_EXAMPLES, allow_negative_numbers = true)]
    max_examples: i32,

    /// Fold failures into ::group:: blocks per year folder
    #[arg(long)]
    group: bool,

    /// Append the full, untruncated report to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Header name every file must contain (repeatable)
    #[arg(long = "require", value_name = "NAME")]
    required: Vec<String>,

    /// Console output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    format: OutputFormat,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// Log per-rule and per-row details
    #[arg(long)]
    verbose: bool,
}

impl Args {
    fn run_config(&self) -> RunConfig {
        let mut config = RunConfig::new(&self.root)
            .with_max_examples(self.max_examples)
            .with_group_output(self.group)
            .with_required_fields(self.required.iter().cloned());
        if let Some(log_file) = &self.log_file {
            config = config.with_log_file(log_file);
        }
        if self.verbose {
            config = config.with_log_config(LogConfig::verbose());
        }
        config
    }

    fn logging_config(&self) -> LoggingConfig {
        let config = if self.verbose {
            LoggingConfig::development()
        } else {
            LoggingConfig::default()
        };
        config.with_json_format(self.json_logs)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.logging_config())
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))?;

    let suite = FormatSuite::new(args.run_config());
    let report = suite
        .run()
        .with_context(|| format!("failed to validate {}", args.root.display()))?;

    suite
        .write_log(&report)
        .context("failed to write the log file")?;

    let formatter_config = FormatterConfig::default().with_group_output(args.group);
    let output = match args.format {
        OutputFormat::Human => HumanFormatter::with_config(formatter_config).format(&report)?,
        OutputFormat::Json => JsonFormatter::with_config(formatter_config).format(&report)?,
    };
    println!("{output}");

    process::exit(if report.is_success() { 0 } else { 1 });
}
