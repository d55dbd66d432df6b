//! Rules evaluated against every data row.

use crate::core::{format_row, Failures, Rule, RuleKind};
use crate::prelude::*;
use std::fmt::Write;
use tracing::trace;

/// Header names whose values are vote counts and must be whole numbers.
pub const VOTE_COLUMNS: [&str; 6] = [
    "absentee",
    "early_voting",
    "election_day",
    "mail",
    "provisional",
    "votes",
];

/// Header name of the column whose text marks percentage rows.
pub const CANDIDATE_COLUMN: &str = "candidate";

/// Candidate substrings that mark a row as a percentage rather than a count.
const PERCENTAGE_MARKERS: [&str; 3] = ["%", "pct", "percent"];

/// Flags every data row whose field count differs from the header's.
///
/// # Examples
///
/// ```rust
/// use format_guard::core::Rule;
/// use format_guard::rules::InconsistentColumnCount;
///
/// let header = vec!["county".to_string(), "votes".to_string()];
/// let mut rule = InconsistentColumnCount::new(&header);
/// rule.accept(2, &["Adams".to_string()]).unwrap();
/// assert!(!rule.has_passed());
/// ```
#[derive(Debug, Clone)]
pub struct InconsistentColumnCount {
    header: Vec<String>,
    failures: Failures,
    rows_seen: usize,
}

impl InconsistentColumnCount {
    /// Creates a rule comparing rows against `header`.
    pub fn new(header: &[String]) -> Self {
        Self {
            header: header.to_vec(),
            failures: Failures::new(),
            rows_seen: 0,
        }
    }

    /// Returns the rows flagged so far.
    pub fn failures(&self) -> &Failures {
        &self.failures
    }
}

impl Rule for InconsistentColumnCount {
    fn name(&self) -> &str {
        "inconsistent_column_count"
    }

    fn kind(&self) -> RuleKind {
        RuleKind::Row
    }

    fn accept(&mut self, row_number: usize, fields: &[String]) -> Result<()> {
        self.rows_seen += 1;
        if fields.len() != self.header.len() {
            self.failures.record(row_number, fields);
        }
        Ok(())
    }

    fn has_passed(&self) -> bool {
        self.failures.is_empty()
    }

    fn render_report(&self, limit: i32) -> Result<String> {
        if self.rows_seen == 0 {
            return Err(FormatError::rule_not_evaluated(self.name()));
        }
        let columns = self.header.len();
        let mut output = format!(
            "Header has {columns} entries, but there are {} rows with an inconsistent number of columns:\n\n\tHeaders ({columns} entries): {}",
            self.failures.len(),
            format_row(&self.header)
        );
        self.failures.write_examples(&mut output, limit, |record| {
            format!(
                "Row {} ({} entries): {}",
                record.row_number,
                record.fields.len(),
                format_row(&record.fields)
            )
        });
        Ok(output)
    }

    fn description(&self) -> Option<&str> {
        Some("an inconsistent number of columns")
    }
}

/// Counts rows in which no field has a non-whitespace character.
///
/// Only the count is kept; blank rows carry nothing worth quoting.
#[derive(Debug, Clone, Default)]
pub struct BlankRows {
    blank_rows: usize,
    rows_seen: usize,
}

impl BlankRows {
    /// Creates a new blank-row rule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of blank rows seen so far.
    pub fn blank_rows(&self) -> usize {
        self.blank_rows
    }
}

/// Returns true if `field` contains at least one non-whitespace character.
fn has_content(field: &str) -> bool {
    field.chars().any(|c| !c.is_whitespace())
}

impl Rule for BlankRows {
    fn name(&self) -> &str {
        "blank_rows"
    }

    fn kind(&self) -> RuleKind {
        RuleKind::Row
    }

    fn accept(&mut self, row_number: usize, fields: &[String]) -> Result<()> {
        self.rows_seen += 1;
        if !fields.iter().any(|field| has_content(field)) {
            trace!(row = row_number, "Blank row");
            self.blank_rows += 1;
        }
        Ok(())
    }

    fn has_passed(&self) -> bool {
        self.blank_rows == 0
    }

    fn render_report(&self, _limit: i32) -> Result<String> {
        if self.rows_seen == 0 {
            return Err(FormatError::rule_not_evaluated(self.name()));
        }
        Ok(format!("Has {} empty rows.", self.blank_rows))
    }

    fn description(&self) -> Option<&str> {
        Some("rows without any content")
    }
}

/// Flags rows whose vote columns hold fractional numbers.
///
/// Values that do not parse as numbers (blank, redacted, `*`) are skipped, as
/// are rows whose candidate text marks them as percentages and rows whose
/// field count does not match the header. A column-count mismatch is reported
/// by [`InconsistentColumnCount`] instead.
#[derive(Debug, Clone)]
pub struct NonIntegerVotes {
    header: Vec<String>,
    vote_indices: Vec<usize>,
    candidate_index: Option<usize>,
    failures: Failures,
    rows_seen: usize,
}

impl NonIntegerVotes {
    /// Creates a rule checking the vote columns found in `header`.
    ///
    /// Column names are matched after trimming and lowercasing.
    pub fn new(header: &[String]) -> Self {
        let normalized: Vec<String> = header
            .iter()
            .map(|name| name.trim().to_lowercase())
            .collect();
        let vote_indices = normalized
            .iter()
            .enumerate()
            .filter(|(_, name)| VOTE_COLUMNS.contains(&name.as_str()))
            .map(|(index, _)| index)
            .collect();
        let candidate_index = normalized.iter().position(|name| name == CANDIDATE_COLUMN);

        Self {
            header: header.to_vec(),
            vote_indices,
            candidate_index,
            failures: Failures::new(),
            rows_seen: 0,
        }
    }

    /// Returns the header positions that are checked.
    pub fn vote_indices(&self) -> &[usize] {
        &self.vote_indices
    }

    /// Returns the rows flagged so far.
    pub fn failures(&self) -> &Failures {
        &self.failures
    }

    fn is_percentage_row(&self, fields: &[String]) -> bool {
        self.candidate_index
            .and_then(|index| fields.get(index))
            .map(|candidate| {
                let candidate = candidate.to_lowercase();
                PERCENTAGE_MARKERS
                    .iter()
                    .any(|marker| candidate.contains(marker))
            })
            .unwrap_or(false)
    }
}

/// Parses `value` as a number and reports whether it is whole.
///
/// Returns `None` for values that are not numbers at all. Non-finite values
/// parse but are never whole.
pub fn is_whole_number(value: &str) -> Option<bool> {
    let number: f64 = value.trim().parse().ok()?;
    Some(number.is_finite() && number.fract() == 0.0)
}

impl Rule for NonIntegerVotes {
    fn name(&self) -> &str {
        "non_integer_votes"
    }

    fn kind(&self) -> RuleKind {
        RuleKind::Row
    }

    fn accept(&mut self, row_number: usize, fields: &[String]) -> Result<()> {
        self.rows_seen += 1;
        if fields.len() != self.header.len() || self.is_percentage_row(fields) {
            return Ok(());
        }

        let fractional = self
            .vote_indices
            .iter()
            .any(|&index| is_whole_number(&fields[index]) == Some(false));
        if fractional {
            self.failures.record(row_number, fields);
        }
        Ok(())
    }

    fn has_passed(&self) -> bool {
        self.failures.is_empty()
    }

    fn render_report(&self, limit: i32) -> Result<String> {
        if self.rows_seen == 0 {
            return Err(FormatError::rule_not_evaluated(self.name()));
        }
        let mut output = String::new();
        let _ = write!(
            output,
            "There are {} rows with votes that aren't integers:\n\n\tHeaders: {}",
            self.failures.len(),
            format_row(&self.header)
        );
        self.failures.write_examples(&mut output, limit, |record| {
            format!(
                "Row {}: {}",
                record.row_number,
                format_row(&record.fields)
            )
        });
        Ok(output)
    }

    fn description(&self) -> Option<&str> {
        Some("votes that aren't integers")
    }
}
