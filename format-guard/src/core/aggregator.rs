//! Merges per-file reports into the console and log renderings of a run.

use super::{FileReport, RunReport, RunSummary, Verbosity};
use std::collections::BTreeMap;

/// Marker line opening a collapsible block.
pub const GROUP_START: &str = "::group::";
/// Marker line closing a collapsible block.
pub const GROUP_END: &str = "::endgroup::";

/// Collects file reports as they complete and renders them at the end of a
/// run.
///
/// Grouping only changes how failures are laid out; the verdict is the same
/// either way.
///
/// # Examples
///
/// ```rust
/// use format_guard::core::{FileReport, ReportAggregator, Verbosity};
/// use format_guard::error::FormatError;
///
/// let mut aggregator = ReportAggregator::new(true);
/// let err = FormatError::EmptyFile { path: "2020/a.csv".into() };
/// aggregator.add(FileReport::from_error("2020/a.csv", Some("2020".into()), &err));
///
/// assert!(!aggregator.passed());
/// let output = aggregator.render(Verbosity::Short);
/// assert!(output.starts_with("::group::2020\n2020/a.csv"));
/// assert!(output.ends_with("::endgroup::"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ReportAggregator {
    group_output: bool,
    reports: Vec<FileReport>,
}

impl ReportAggregator {
    /// Creates an empty aggregator.
    pub fn new(group_output: bool) -> Self {
        Self {
            group_output,
            reports: Vec::new(),
        }
    }

    /// Adds the report of one finished file.
    pub fn add(&mut self, report: FileReport) {
        self.reports.push(report);
    }

    /// Returns true if every file added so far passed.
    pub fn passed(&self) -> bool {
        self.reports.iter().all(FileReport::passed)
    }

    pub fn reports(&self) -> &[FileReport] {
        &self.reports
    }

    /// Number of files that failed.
    pub fn failed_count(&self) -> usize {
        self.reports.iter().filter(|report| !report.passed()).count()
    }

    /// Renders every failed file at the given verbosity.
    pub fn render(&self, verbosity: Verbosity) -> String {
        render_reports(&self.reports, verbosity, self.group_output)
    }

    /// Consumes the aggregator into the report of the whole run.
    pub fn finish(self, summary: RunSummary) -> RunReport {
        RunReport {
            summary,
            files: self.reports,
        }
    }
}

/// Renders the failed files among `reports`.
///
/// Flat output lists files in the order given. Grouped output wraps each tag's
/// files in a `::group::<tag>` / `::endgroup::` block, blocks sorted by tag,
/// with untagged files after every block. Passing files are omitted.
pub fn render_reports(reports: &[FileReport], verbosity: Verbosity, grouped: bool) -> String {
    let failed = reports.iter().filter(|report| !report.passed());

    if !grouped {
        return failed
            .map(|report| report.message(verbosity))
            .collect::<Vec<_>>()
            .join("\n\n");
    }

    let mut groups: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    let mut ungrouped = Vec::new();
    for report in failed {
        match report.tag.as_deref() {
            Some(tag) => groups
                .entry(tag)
                .or_default()
                .push(report.message(verbosity)),
            None => ungrouped.push(report.message(verbosity)),
        }
    }

    let mut blocks: Vec<String> = groups
        .into_iter()
        .map(|(tag, messages)| {
            format!("{GROUP_START}{tag}\n{}\n{GROUP_END}", messages.join("\n\n"))
        })
        .collect();
    blocks.extend(ungrouped);
    blocks.join("\n\n")
}
