//! Validation of every data file under a root.

use super::{FileReport, ReportAggregator, RuleSet, RunConfig, RunReport, RunSummary};
use crate::formatters::{FormatterConfig, HumanFormatter, ResultFormatter};
use crate::log_file_op;
use crate::prelude::*;
use crate::sources::{discover, CsvOptions, CsvRows, DiscoveredFile};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::time::Instant;
use tracing::{info, instrument, warn};

/// Runs a fresh rule set over every discovered file and collects the reports.
///
/// Files are validated one at a time and independently. A file that cannot be
/// read becomes a failing report; it never stops the run.
///
/// # Examples
///
/// ```rust,no_run
/// use format_guard::core::{FormatSuite, RunConfig};
///
/// # fn example() -> format_guard::prelude::Result<()> {
/// let suite = FormatSuite::new(RunConfig::ci("/data/openelections-data-xx"));
/// let report = suite.run()?;
/// suite.write_log(&report)?;
///
/// if !report.is_success() {
///     println!("{}", report.to_human()?);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct FormatSuite {
    config: RunConfig,
    csv: CsvOptions,
}

impl FormatSuite {
    /// Creates a suite for the given configuration.
    pub fn new(config: RunConfig) -> Self {
        Self {
            config,
            csv: CsvOptions::default(),
        }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Validates every CSV file under the year folders of the root.
    #[instrument(skip(self), fields(root = %self.config.root().display()))]
    pub fn run(&self) -> Result<RunReport> {
        self.config.validate()?;
        let files = discover(self.config.root())?;
        info!(files = files.len(), "Starting format validation");
        Ok(self.run_files(&files))
    }

    /// Validates the given files in order.
    pub fn run_files(&self, files: &[DiscoveredFile]) -> RunReport {
        let start_time = Instant::now();
        let mut aggregator = ReportAggregator::new(self.config.group_output());
        let mut rows_checked = 0;

        for file in files {
            let report = self.validate_discovered(file);
            rows_checked += report.rows_checked;
            aggregator.add(report);
        }

        let mut summary = RunSummary::new();
        summary.files_checked = files.len();
        summary.files_failed = aggregator.failed_count();
        summary.rows_checked = rows_checked;
        summary.execution_time_ms = start_time.elapsed().as_millis() as u64;

        info!(
            files.checked = summary.files_checked,
            files.failed = summary.files_failed,
            rows.checked = summary.rows_checked,
            duration_ms = summary.execution_time_ms,
            "Format validation completed"
        );

        aggregator.finish(summary)
    }

    /// Validates one discovered file, turning read errors into a failing report.
    pub fn validate_discovered(&self, file: &DiscoveredFile) -> FileReport {
        let tag = Some(file.tag.clone());
        match self.validate_file(&file.path, &file.relative_path, tag.clone()) {
            Ok(report) => report,
            Err(err) => {
                warn!(file = %file.relative_path, error = %err, "Could not validate file");
                FileReport::from_error(&file.relative_path, tag, &err)
            }
        }
    }

    /// Validates one file.
    ///
    /// The first record is the header; every later record is a data row
    /// numbered by the line it ends on. A record that cannot be decoded is
    /// skipped and listed in the report, and the remaining rows are still
    /// validated.
    pub fn validate_file(
        &self,
        path: &Path,
        relative_path: &str,
        tag: Option<String>,
    ) -> Result<FileReport> {
        log_file_op!(self.config.log(), file = %relative_path, "Validating file");

        let mut records = CsvRows::from_path(path, &self.csv)?;
        let (_, header) = records.next().ok_or_else(|| FormatError::EmptyFile {
            path: relative_path.to_string(),
        })??;

        let mut rules = RuleSet::new(&self.config);
        rules.accept_header(&header)?;
        let mut unreadable_rows = Vec::new();
        for record in records {
            match record {
                Ok((row_number, fields)) => rules.accept_row(row_number, &fields)?,
                Err(err) => {
                    warn!(file = %relative_path, error = %err, "Skipping unreadable row");
                    unreadable_rows.push(err.to_string());
                }
            }
        }

        let outcome = rules.finish();
        log_file_op!(
            self.config.log(),
            file = %relative_path,
            rows = outcome.rows_evaluated(),
            failed_rules = outcome.failed_rules().len(),
            unreadable_rows = unreadable_rows.len(),
            passed = outcome.is_success(),
            "File validated"
        );

        Ok(FileReport::from_outcome(relative_path, tag, &outcome, &self.config)?
            .with_unreadable_rows(unreadable_rows))
    }

    /// Appends the full rendering of `report` to the configured log file.
    ///
    /// Does nothing when no log file is configured.
    pub fn write_log(&self, report: &RunReport) -> Result<()> {
        let Some(path) = self.config.log_file() else {
            return Ok(());
        };

        let formatter = HumanFormatter::with_config(
            FormatterConfig::detailed()
                .with_group_output(self.config.group_output())
                .with_summary(true),
        );
        let body = formatter.format(report)?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Could not open log file {}", path.display()))?;
        writeln!(file, "=== format-guard run at {} ===", report.summary.timestamp)?;
        writeln!(file, "{body}")?;
        writeln!(file)?;

        info!(log_file = %path.display(), "Wrote full report");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Verbosity;
    use crate::test_helpers::write_file;
    use tempfile::TempDir;

    #[test]
    fn test_validate_clean_file() {
        let dir = TempDir::new().unwrap();
        let path = write_file(dir.path(), "2020/a.csv", "county,votes\nAdams,12\nBrown,3\n");

        let suite = FormatSuite::new(RunConfig::new(dir.path()));
        let report = suite.validate_file(&path, "2020/a.csv", None).unwrap();
        assert!(report.passed());
        assert_eq!(report.rows_checked, 2);
    }

    #[test]
    fn test_empty_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = write_file(dir.path(), "2020/empty.csv", "");

        let suite = FormatSuite::new(RunConfig::new(dir.path()));
        let err = suite.validate_file(&path, "2020/empty.csv", None).unwrap_err();
        assert!(matches!(err, FormatError::EmptyFile { .. }));
    }

    #[test]
    fn test_row_numbers_follow_lines() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            dir.path(),
            "2020/a.csv",
            "county,votes\n\"Ad\nams\",1\nBrown,1.5\n",
        );

        let suite = FormatSuite::new(RunConfig::new(dir.path()));
        let report = suite.validate_file(&path, "2020/a.csv", None).unwrap();
        let names: Vec<&str> = report.failures.iter().map(|f| f.rule.as_str()).collect();
        assert_eq!(names, vec!["non_integer_votes", "line_breaks"]);
        assert!(report.failures[0].details.contains("Row 4:"));
        assert!(report.failures[1].details.contains("Row 3:"));
    }

    #[test]
    fn test_empty_line_is_a_blank_row() {
        let dir = TempDir::new().unwrap();
        let path = write_file(dir.path(), "2020/a.csv", "county,votes\nAdams,1\n\nBrown,2\n");

        let suite = FormatSuite::new(RunConfig::new(dir.path()));
        let report = suite.validate_file(&path, "2020/a.csv", None).unwrap();
        assert_eq!(report.rows_checked, 3);

        let names: Vec<&str> = report.failures.iter().map(|f| f.rule.as_str()).collect();
        assert_eq!(names, vec!["inconsistent_column_count", "blank_rows"]);
        assert!(report.failures[0].details.contains("Row 3 (0 entries): []"));
        assert_eq!(report.failures[1].details, "Has 1 empty rows.");
    }

    #[test]
    fn test_unreadable_row_keeps_other_failures() {
        let dir = TempDir::new().unwrap();
        let mut data = b"county,votes\nAd\tams,1\n".to_vec();
        data.extend_from_slice(&[0xff, 0xfe, b',', b'2', b'\n']);
        data.extend_from_slice(b"Brown,2.5\n");
        let path = write_file(dir.path(), "2020/a.csv", "");
        std::fs::write(&path, data).unwrap();

        let suite = FormatSuite::new(RunConfig::new(dir.path()));
        let report = suite.validate_file(&path, "2020/a.csv", None).unwrap();
        assert!(!report.passed());
        assert!(report.error.is_none());
        assert_eq!(report.rows_checked, 2);
        assert_eq!(report.unreadable_rows.len(), 1);

        let names: Vec<&str> = report.failures.iter().map(|f| f.rule.as_str()).collect();
        assert_eq!(names, vec!["non_integer_votes", "tab_characters"]);

        let message = report.message(Verbosity::Short);
        assert!(message.contains("Row 2: [\"Ad\\tams\", \"1\"]"));
        assert!(message.contains("* Could not read a row: "));
    }

    #[test]
    fn test_missing_root_stops_the_run() {
        let suite = FormatSuite::new(RunConfig::new("/definitely/not/a/data/repository"));
        assert!(matches!(
            suite.run().unwrap_err(),
            FormatError::Configuration(_)
        ));
    }

    #[test]
    fn test_log_file_that_cannot_be_opened() {
        let dir = TempDir::new().unwrap();
        let log_path = dir.path().join("missing").join("format.log");
        let suite = FormatSuite::new(RunConfig::new(dir.path()).with_log_file(&log_path));
        let report = suite.run_files(&[]);

        let err = suite.write_log(&report).unwrap_err();
        assert!(matches!(err, FormatError::Internal(_)));
        assert!(err.to_string().contains("Could not open log file"));
        assert!(err.to_string().contains("format.log"));
    }

    #[test]
    fn test_run_counts_files() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "2020/good.csv", "county,votes\nAdams,1\n");
        write_file(dir.path(), "2020/bad.csv", "County,votes\nAdams,1\n");
        write_file(dir.path(), "misc/ignored.csv", "County\n");

        let report = FormatSuite::new(RunConfig::new(dir.path())).run().unwrap();
        assert_eq!(report.summary.files_checked, 2);
        assert_eq!(report.summary.files_failed, 1);
        assert_eq!(report.summary.rows_checked, 2);
        assert!(!report.is_success());
    }

    #[test]
    fn test_write_log_without_destination_is_noop() {
        let suite = FormatSuite::new(RunConfig::default());
        let report = suite.run_files(&[]);
        assert!(suite.write_log(&report).is_ok());
    }
}
