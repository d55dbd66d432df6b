//! Rule trait and the failure bookkeeping shared by every rule.

use crate::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Write};

/// Which part of a file a rule consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    /// Consumes the header row exactly once
    Header,
    /// Consumes every data row
    Row,
    /// A row rule that tests each field of a row independently
    Value,
}

impl RuleKind {
    /// Returns true if rules of this kind are fed data rows.
    pub fn consumes_rows(&self) -> bool {
        matches!(self, RuleKind::Row | RuleKind::Value)
    }
}

/// One flagged row: its 1-based ordinal (the header is row 1) and its fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureRecord {
    /// Row ordinal within the file
    pub row_number: usize,
    /// Snapshot of the offending row
    pub fields: Vec<String>,
}

/// Failure records in discovery order.
///
/// Rows arrive in file order, so insertion order is ascending row order. A row
/// is recorded at most once no matter how many of its fields were flagged.
#[derive(Debug, Clone, Default)]
pub struct Failures {
    records: Vec<FailureRecord>,
}

impl Failures {
    /// Creates an empty failure list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a failing row. A repeated row number is ignored.
    pub fn record(&mut self, row_number: usize, fields: &[String]) {
        if self
            .records
            .last()
            .is_some_and(|last| last.row_number == row_number)
        {
            return;
        }
        self.records.push(FailureRecord {
            row_number,
            fields: fields.to_vec(),
        });
    }

    /// Number of failing rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true when no row has failed.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates over the records in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = &FailureRecord> {
        self.records.iter()
    }

    /// Appends up to `limit` example lines (all of them if `limit` is negative),
    /// followed by a truncation notice when examples were left out.
    pub fn write_examples<F>(&self, output: &mut String, limit: i32, line: F)
    where
        F: Fn(&FailureRecord) -> String,
    {
        let shown = examples_to_show(self.records.len(), limit);
        for record in &self.records[..shown] {
            // Writing to a String cannot fail.
            let _ = write!(output, "\n\t{}", line(record));
        }
        if let Some(notice) = truncation_notice(self.records.len(), shown) {
            let _ = write!(output, "\n\t{notice}");
        }
    }
}

/// Number of examples rendered for `total` failures under `limit`.
///
/// A negative limit means every failure is rendered.
pub fn examples_to_show(total: usize, limit: i32) -> usize {
    match usize::try_from(limit) {
        Ok(limit) => total.min(limit),
        Err(_) => total,
    }
}

/// Notice appended to a report whose examples were cut short.
pub fn truncation_notice(total: usize, shown: usize) -> Option<String> {
    (total > shown).then(|| {
        let hidden = total - shown;
        format!("[Truncated to {shown} examples, {hidden} more not shown]")
    })
}

/// Renders a row the way reports quote it: `["a", "b  c"]`.
///
/// Control characters are escaped, so embedded tabs and line breaks stay
/// visible in a report.
pub fn format_row(fields: &[String]) -> String {
    format!("{fields:?}")
}

/// A stateful formatting rule.
///
/// A rule instance belongs to exactly one validation pass over one file. Header
/// rules are fed the header once, row rules are fed every data row in file
/// order, and after the last row the rule is asked whether it passed and, if
/// not, for its report.
///
/// # Examples
///
/// ```rust
/// use format_guard::core::Rule;
/// use format_guard::rules::{ValueCheck, ValueRule};
///
/// let mut rule = ValueRule::new(ValueCheck::Tab);
/// rule.accept(2, &["a".to_string(), "b\tc".to_string()]).unwrap();
/// assert!(!rule.has_passed());
///
/// let report = rule.render_report(10).unwrap();
/// assert!(report.contains("Row 2"));
/// ```
pub trait Rule: Debug + Send {
    /// Returns the stable machine name of the rule.
    fn name(&self) -> &str;

    /// Returns which part of the file this rule consumes.
    fn kind(&self) -> RuleKind;

    /// Feeds one row to the rule.
    ///
    /// `row_number` is the 1-based ordinal of the row in its file, with the
    /// header counted as row 1.
    fn accept(&mut self, row_number: usize, fields: &[String]) -> Result<()>;

    /// Returns true if nothing has been flagged.
    fn has_passed(&self) -> bool;

    /// Renders the failure report with at most `limit` examples, or all of them
    /// when `limit` is negative.
    ///
    /// Rendering is a pure function of the accumulated state. It is an error to
    /// render a rule that has not received any input.
    fn render_report(&self, limit: i32) -> Result<String>;

    /// Returns a human-readable description of the defect class.
    fn description(&self) -> Option<&str> {
        None
    }
}

/// A boxed rule for use in rule sets.
pub type BoxedRule = Box<dyn Rule>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::row;

    fn failures(count: usize) -> Failures {
        let mut failures = Failures::new();
        for n in 0..count {
            failures.record(n + 2, &row(&["x"]));
        }
        failures
    }

    fn render(failures: &Failures, limit: i32) -> String {
        let mut output = String::new();
        failures.write_examples(&mut output, limit, |r| format!("Row {}", r.row_number));
        output
    }

    #[test]
    fn test_examples_to_show() {
        assert_eq!(examples_to_show(5, 10), 5);
        assert_eq!(examples_to_show(5, 3), 3);
        assert_eq!(examples_to_show(5, 0), 0);
        assert_eq!(examples_to_show(5, -1), 5);
    }

    #[test]
    fn test_duplicate_row_recorded_once() {
        let mut failures = Failures::new();
        failures.record(4, &row(&["a"]));
        failures.record(4, &row(&["a"]));
        failures.record(7, &row(&["b"]));
        assert_eq!(failures.len(), 2);
        let rows: Vec<usize> = failures.iter().map(|r| r.row_number).collect();
        assert_eq!(rows, vec![4, 7]);
    }

    #[test]
    fn test_write_examples_truncates() {
        let output = render(&failures(3), 2);
        assert_eq!(
            output,
            "\n\tRow 2\n\tRow 3\n\t[Truncated to 2 examples, 1 more not shown]"
        );
    }

    #[test]
    fn test_write_examples_exact_limit_has_no_notice() {
        let output = render(&failures(2), 2);
        assert_eq!(output, "\n\tRow 2\n\tRow 3");
    }

    #[test]
    fn test_write_examples_unlimited() {
        let output = render(&failures(12), -1);
        assert_eq!(output.matches("Row ").count(), 12);
        assert!(!output.contains("Truncated"));
    }

    #[test]
    fn test_format_row_escapes_control_characters() {
        assert_eq!(format_row(&row(&["a", "b\tc"])), r#"["a", "b\tc"]"#);
        assert_eq!(format_row(&row(&["x\ny"])), r#"["x\ny"]"#);
    }

    #[test]
    fn test_rule_kind() {
        assert!(!RuleKind::Header.consumes_rows());
        assert!(RuleKind::Row.consumes_rows());
        assert!(RuleKind::Value.consumes_rows());
    }
}
