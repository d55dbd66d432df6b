//! Per-file and per-run result types.

use super::{Rule, RuleKind, RuleSetOutcome, RunConfig};
use crate::prelude::*;
use serde::{Deserialize, Serialize};

/// The rendered report of one failed rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleFailure {
    /// Machine name of the rule
    pub rule: String,
    /// Which part of the file the rule consumed
    pub kind: RuleKind,
    /// Report rendered with the console example limit
    pub summary: String,
    /// Report rendered with the log example limit
    pub details: String,
}

impl RuleFailure {
    /// Renders both report variants of `rule`.
    pub fn from_rule(rule: &dyn Rule, config: &RunConfig) -> Result<Self> {
        Ok(Self {
            rule: rule.name().to_string(),
            kind: rule.kind(),
            summary: rule.render_report(config.max_examples())?,
            details: rule.render_report(config.log_limit())?,
        })
    }
}

/// Verbosity of a rendered message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    /// Console-facing, examples capped by the configured limit
    Short,
    /// Log-facing, examples capped by the log limit
    Full,
}

/// Outcome of validating one file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReport {
    /// Path relative to the run root
    pub path: String,
    /// Optional label used to cluster output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// Number of data rows validated
    pub rows_checked: usize,
    /// Reports of the rules that failed, in rule-set order
    pub failures: Vec<RuleFailure>,
    /// Set when the file could not be read or tokenized
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Records skipped because they could not be decoded
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unreadable_rows: Vec<String>,
}

impl FileReport {
    /// Builds the report for a file whose rule set ran to completion.
    pub fn from_outcome(
        path: impl Into<String>,
        tag: Option<String>,
        outcome: &RuleSetOutcome,
        config: &RunConfig,
    ) -> Result<Self> {
        let failures = outcome
            .failed_rules()
            .iter()
            .map(|rule| RuleFailure::from_rule(&**rule, config))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            path: path.into(),
            tag,
            rows_checked: outcome.rows_evaluated(),
            failures,
            error: None,
            unreadable_rows: Vec::new(),
        })
    }

    /// Builds the report for a file that could not be validated.
    pub fn from_error(path: impl Into<String>, tag: Option<String>, error: &FormatError) -> Self {
        Self {
            path: path.into(),
            tag,
            rows_checked: 0,
            failures: Vec::new(),
            error: Some(error.to_string()),
            unreadable_rows: Vec::new(),
        }
    }

    /// Records the errors of records that were skipped while reading.
    pub fn with_unreadable_rows(mut self, errors: Vec<String>) -> Self {
        self.unreadable_rows = errors;
        self
    }

    /// Returns true if every rule passed and every record was readable.
    pub fn passed(&self) -> bool {
        self.failures.is_empty() && self.error.is_none() && self.unreadable_rows.is_empty()
    }

    /// Renders the file path followed by one section per failed rule and one
    /// per unreadable record.
    ///
    /// Passing files render as an empty string.
    pub fn message(&self, verbosity: Verbosity) -> String {
        if self.passed() {
            return String::new();
        }

        let mut message = self.path.clone();
        if let Some(error) = &self.error {
            message.push_str("\n\n* Could not be validated: ");
            message.push_str(error);
        }
        for failure in &self.failures {
            let report = match verbosity {
                Verbosity::Short => &failure.summary,
                Verbosity::Full => &failure.details,
            };
            message.push_str("\n\n* ");
            message.push_str(report);
        }
        for error in &self.unreadable_rows {
            message.push_str("\n\n* Could not read a row: ");
            message.push_str(error);
        }
        message
    }
}

/// Totals for one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Number of files validated
    pub files_checked: usize,
    /// Number of files with at least one failed rule or a read error
    pub files_failed: usize,
    /// Number of data rows validated across all files
    pub rows_checked: usize,
    /// Timestamp when the run finished (RFC 3339)
    pub timestamp: String,
    /// Wall-clock duration of the run in milliseconds
    pub execution_time_ms: u64,
}

impl RunSummary {
    /// Creates an empty summary stamped with the current time.
    pub fn new() -> Self {
        Self {
            files_checked: 0,
            files_failed: 0,
            rows_checked: 0,
            timestamp: chrono::Utc::now().to_rfc3339(),
            execution_time_ms: 0,
        }
    }

    /// Returns true if no file failed.
    pub fn is_success(&self) -> bool {
        self.files_failed == 0
    }
}

impl Default for RunSummary {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything a run produced: totals plus every file report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Overall totals
    pub summary: RunSummary,
    /// One report per validated file, in validation order
    pub files: Vec<FileReport>,
}

impl RunReport {
    /// Returns true if every file passed.
    pub fn is_success(&self) -> bool {
        self.summary.is_success()
    }

    /// Iterates over the files that failed.
    pub fn failed_files(&self) -> impl Iterator<Item = &FileReport> {
        self.files.iter().filter(|file| !file.passed())
    }

    /// Formats the report as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        use crate::formatters::{JsonFormatter, ResultFormatter};
        JsonFormatter::new().format(self)
    }

    /// Formats the report for console display.
    pub fn to_human(&self) -> Result<String> {
        use crate::formatters::{HumanFormatter, ResultFormatter};
        HumanFormatter::new().format(self)
    }
}
