//! Result formatting for format-guard runs.
//!
//! A [`RunReport`] can be rendered for a person reading a console or CI log
//! ([`HumanFormatter`]) or for another program ([`JsonFormatter`]).
//!
//! # Examples
//!
//! ```rust
//! use format_guard::core::{RunReport, RunSummary};
//! use format_guard::formatters::{FormatterConfig, HumanFormatter, ResultFormatter};
//!
//! let report = RunReport { summary: RunSummary::new(), files: Vec::new() };
//! let output = HumanFormatter::with_config(FormatterConfig::ci())
//!     .format(&report)
//!     .unwrap();
//! assert!(output.contains("PASSED"));
//! ```

use crate::core::{render_reports, RunReport, Verbosity};
use crate::prelude::*;

/// Configuration options for formatting run reports.
#[derive(Debug, Clone)]
pub struct FormatterConfig {
    /// Which rendering of each failed rule to show
    pub verbosity: Verbosity,
    /// Whether failures are folded into `::group::` blocks
    pub group_output: bool,
    /// Whether to append the run totals
    pub include_summary: bool,
    /// Whether passing files are kept in structured output
    pub include_passed: bool,
    /// Whether to include timestamps in output
    pub include_timestamps: bool,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            verbosity: Verbosity::Short,
            group_output: false,
            include_summary: true,
            include_passed: true,
            include_timestamps: true,
        }
    }
}

impl FormatterConfig {
    /// Creates a configuration showing only failures.
    pub fn minimal() -> Self {
        Self {
            verbosity: Verbosity::Short,
            group_output: false,
            include_summary: false,
            include_passed: false,
            include_timestamps: false,
        }
    }

    /// Creates a configuration for the persistent log: every example, with totals.
    pub fn detailed() -> Self {
        Self {
            verbosity: Verbosity::Full,
            ..Self::default()
        }
    }

    /// Creates a configuration suitable for CI logs, with folded groups.
    pub fn ci() -> Self {
        Self {
            group_output: true,
            ..Self::default()
        }
    }

    /// Sets whether failures are grouped by tag.
    pub fn with_group_output(mut self, enabled: bool) -> Self {
        self.group_output = enabled;
        self
    }

    /// Sets whether to append the run totals.
    pub fn with_summary(mut self, include: bool) -> Self {
        self.include_summary = include;
        self
    }
}

/// Trait for formatting run reports into different output formats.
///
/// # Examples
///
/// ```rust
/// use format_guard::core::RunReport;
/// use format_guard::formatters::ResultFormatter;
///
/// struct VerdictOnly;
///
/// impl ResultFormatter for VerdictOnly {
///     fn format(&self, report: &RunReport) -> format_guard::prelude::Result<String> {
///         Ok(format!("success: {}", report.is_success()))
///     }
/// }
/// ```
pub trait ResultFormatter {
    /// Formats a run report into a string representation.
    fn format(&self, report: &RunReport) -> Result<String>;

    /// Formats a run report with custom configuration.
    fn format_with_config(&self, report: &RunReport, _config: &FormatterConfig) -> Result<String> {
        self.format(report)
    }
}

/// Formats run reports as structured JSON.
#[derive(Debug, Clone)]
pub struct JsonFormatter {
    config: FormatterConfig,
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter with default configuration.
    pub fn new() -> Self {
        Self {
            config: FormatterConfig::default(),
            pretty: true,
        }
    }

    /// Creates a new JSON formatter with the specified configuration.
    pub fn with_config(config: FormatterConfig) -> Self {
        Self {
            config,
            pretty: true,
        }
    }

    /// Sets whether to use pretty-printed JSON.
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultFormatter for JsonFormatter {
    fn format(&self, report: &RunReport) -> Result<String> {
        self.format_with_config(report, &self.config)
    }

    fn format_with_config(&self, report: &RunReport, config: &FormatterConfig) -> Result<String> {
        let filtered = filter_report(report, config);

        let json = if self.pretty {
            serde_json::to_string_pretty(&filtered)
        } else {
            serde_json::to_string(&filtered)
        };
        json.map_err(|e| FormatError::Serialization(format!("Failed to serialize report: {e}")))
    }
}

/// Formats run reports the way they appear on a console or in a CI log.
///
/// Failed files are listed with their rule reports, optionally folded into
/// `::group::` blocks, followed by a one-line verdict.
#[derive(Debug, Clone)]
pub struct HumanFormatter {
    config: FormatterConfig,
}

impl HumanFormatter {
    /// Creates a new human formatter with default configuration.
    pub fn new() -> Self {
        Self {
            config: FormatterConfig::default(),
        }
    }

    /// Creates a new human formatter with the specified configuration.
    pub fn with_config(config: FormatterConfig) -> Self {
        Self { config }
    }
}

impl Default for HumanFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultFormatter for HumanFormatter {
    fn format(&self, report: &RunReport) -> Result<String> {
        self.format_with_config(report, &self.config)
    }

    fn format_with_config(&self, report: &RunReport, config: &FormatterConfig) -> Result<String> {
        let mut output = render_reports(&report.files, config.verbosity, config.group_output);

        if config.include_summary {
            if !output.is_empty() {
                output.push_str("\n\n");
            }
            output.push_str(&summary_line(report, config));
        }
        Ok(output)
    }
}

fn summary_line(report: &RunReport, config: &FormatterConfig) -> String {
    let summary = &report.summary;
    let mut line = if summary.is_success() {
        format!(
            "✅ Validation PASSED: {} files checked, {} rows",
            summary.files_checked, summary.rows_checked
        )
    } else {
        format!(
            "❌ Validation FAILED: {} of {} files failed, {} rows checked",
            summary.files_failed, summary.files_checked, summary.rows_checked
        )
    };
    if config.include_timestamps {
        line.push_str(&format!(" ({} ms, {})", summary.execution_time_ms, summary.timestamp));
    }
    line
}

fn filter_report(report: &RunReport, config: &FormatterConfig) -> RunReport {
    let mut filtered = report.clone();
    if !config.include_passed {
        filtered.files.retain(|file| !file.passed());
    }
    if !config.include_timestamps {
        filtered.summary.timestamp = String::new();
    }
    filtered
}
