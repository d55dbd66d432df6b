//! Run configuration.

use crate::error::{FormatError, Result};
use crate::logging::LogConfig;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Default number of examples shown per rule on the console.
pub const DEFAULT_MAX_EXAMPLES: i32 = 10;

/// Immutable settings for one validation run.
///
/// The configuration is built up front and handed to the rule set, the
/// aggregator and the suite; nothing changes it while files are validated.
///
/// # Examples
///
/// ```rust
/// use format_guard::core::RunConfig;
///
/// let config = RunConfig::new("/data/openelections")
///     .with_max_examples(5)
///     .with_group_output(true)
///     .with_required_fields(["county", "votes"]);
///
/// assert_eq!(config.max_examples(), 5);
/// assert_eq!(config.log_limit(), -1);
/// ```
#[derive(Debug, Clone)]
pub struct RunConfig {
    root: PathBuf,
    max_examples: i32,
    log_unlimited: bool,
    group_output: bool,
    required_fields: BTreeSet<String>,
    log_file: Option<PathBuf>,
    log: LogConfig,
}

impl RunConfig {
    /// Creates a configuration rooted at `root` with default settings.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            max_examples: DEFAULT_MAX_EXAMPLES,
            log_unlimited: true,
            group_output: false,
            required_fields: BTreeSet::new(),
            log_file: None,
            log: LogConfig::default(),
        }
    }

    /// Creates a configuration suitable for CI logs, with folded groups.
    pub fn ci(root: impl Into<PathBuf>) -> Self {
        Self::new(root).with_group_output(true)
    }

    /// Creates a configuration that shows every example and logs rule details.
    pub fn verbose(root: impl Into<PathBuf>) -> Self {
        Self::new(root)
            .with_max_examples(-1)
            .with_log_config(LogConfig::verbose())
    }

    /// Sets the console example limit (negative for unlimited).
    pub fn with_max_examples(mut self, max_examples: i32) -> Self {
        self.max_examples = max_examples;
        self
    }

    /// Sets whether the log-facing report shows every example.
    pub fn with_log_unlimited(mut self, unlimited: bool) -> Self {
        self.log_unlimited = unlimited;
        self
    }

    /// Sets whether output is folded into `::group::` blocks.
    pub fn with_group_output(mut self, enabled: bool) -> Self {
        self.group_output = enabled;
        self
    }

    /// Sets the header names every file must contain.
    pub fn with_required_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the file receiving the full report.
    pub fn with_log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = Some(path.into());
        self
    }

    /// Sets the engine logging configuration.
    pub fn with_log_config(mut self, log: LogConfig) -> Self {
        self.log = log;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn max_examples(&self) -> i32 {
        self.max_examples
    }

    /// Example limit for the log-facing report.
    pub fn log_limit(&self) -> i32 {
        if self.log_unlimited {
            -1
        } else {
            self.max_examples
        }
    }

    pub fn group_output(&self) -> bool {
        self.group_output
    }

    pub fn required_fields(&self) -> &BTreeSet<String> {
        &self.required_fields
    }

    pub fn log_file(&self) -> Option<&Path> {
        self.log_file.as_deref()
    }

    pub fn log(&self) -> &LogConfig {
        &self.log
    }


    /// Checks that the configuration can drive a run.
    pub fn validate(&self) -> Result<()> {
        if !self.root.is_dir() {
            return Err(FormatError::Configuration(format!(
                "root '{}' is not a directory",
                self.root.display()
            )));
        }
        Ok(())
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::new(".")
    }
}
