//! Rules that test every field of a row on its own.
//!
//! A [`ValueRule`] flags a row as soon as one of its fields matches the
//! rule's [`ValueCheck`]. The row is recorded once, with all of its fields,
//! so the report shows the offending value in context.

use crate::core::{format_row, Failures, Rule, RuleKind};
use crate::prelude::*;
use serde::{Deserialize, Serialize};

/// Returns true if `value` contains a run of two or more whitespace characters.
fn has_whitespace_run(value: &str) -> bool {
    let mut previous_was_space = false;
    for c in value.chars() {
        let is_space = c.is_whitespace();
        if is_space && previous_was_space {
            return true;
        }
        previous_was_space = is_space;
    }
    false
}

// Letters, digits and the underscore count as word characters.
fn is_word_character(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// The per-field predicates a value rule can apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueCheck {
    /// Two or more whitespace characters in a row anywhere in the field
    ConsecutiveWhitespace,
    /// Whitespace at either end of the field
    LeadingTrailingWhitespace,
    /// A non-empty field without a single word character
    NonAlphanumeric,
    /// A literal newline inside the field
    LineBreak,
    /// A literal tab inside the field
    Tab,
}

impl ValueCheck {
    /// Every value check, in reporting order.
    pub const ALL: [ValueCheck; 5] = [
        ValueCheck::ConsecutiveWhitespace,
        ValueCheck::LeadingTrailingWhitespace,
        ValueCheck::NonAlphanumeric,
        ValueCheck::LineBreak,
        ValueCheck::Tab,
    ];

    /// Returns the machine name of the check.
    pub fn name(&self) -> &'static str {
        match self {
            ValueCheck::ConsecutiveWhitespace => "consecutive_whitespace",
            ValueCheck::LeadingTrailingWhitespace => "leading_trailing_whitespace",
            ValueCheck::NonAlphanumeric => "non_alphanumeric_entries",
            ValueCheck::LineBreak => "line_breaks",
            ValueCheck::Tab => "tab_characters",
        }
    }

    /// Returns the defect description used in reports.
    pub fn description(&self) -> &'static str {
        match self {
            ValueCheck::ConsecutiveWhitespace => "consecutive whitespace characters",
            ValueCheck::LeadingTrailingWhitespace => "leading or trailing whitespace characters",
            ValueCheck::NonAlphanumeric => "only non-alphanumeric characters",
            ValueCheck::LineBreak => "newline characters",
            ValueCheck::Tab => "tab characters",
        }
    }

    /// Returns true if `value` exhibits the defect.
    pub fn is_bad_value(&self, value: &str) -> bool {
        match self {
            ValueCheck::ConsecutiveWhitespace => has_whitespace_run(value),
            ValueCheck::LeadingTrailingWhitespace => value != value.trim(),
            ValueCheck::NonAlphanumeric => {
                !value.is_empty() && !value.chars().any(is_word_character)
            }
            ValueCheck::LineBreak => value.contains('\n'),
            ValueCheck::Tab => value.contains('\t'),
        }
    }
}

/// A row rule driven by a single [`ValueCheck`].
///
/// # Examples
///
/// ```rust
/// use format_guard::core::Rule;
/// use format_guard::rules::{ValueCheck, ValueRule};
///
/// let mut rule = ValueRule::new(ValueCheck::LeadingTrailingWhitespace);
/// rule.accept(2, &["Adams ".to_string(), "12".to_string()]).unwrap();
/// assert!(!rule.has_passed());
/// assert_eq!(
///     rule.description(),
///     Some("leading or trailing whitespace characters")
/// );
/// ```
#[derive(Debug, Clone)]
pub struct ValueRule {
    check: ValueCheck,
    failures: Failures,
    rows_seen: usize,
}

impl ValueRule {
    /// Creates a rule applying `check` to every field.
    pub fn new(check: ValueCheck) -> Self {
        Self {
            check,
            failures: Failures::new(),
            rows_seen: 0,
        }
    }

    /// Returns the check this rule applies.
    pub fn check(&self) -> ValueCheck {
        self.check
    }

    /// Returns the rows flagged so far.
    pub fn failures(&self) -> &Failures {
        &self.failures
    }
}

impl Rule for ValueRule {
    fn name(&self) -> &str {
        self.check.name()
    }

    fn kind(&self) -> RuleKind {
        RuleKind::Value
    }

    fn accept(&mut self, row_number: usize, fields: &[String]) -> Result<()> {
        self.rows_seen += 1;
        if fields.iter().any(|field| self.check.is_bad_value(field)) {
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
        let mut output = format!(
            "There are {} rows that have entries with {}:\n",
            self.failures.len(),
            self.check.description()
        );
        self.failures.write_examples(&mut output, limit, |record| {
            format!("Row {}: {}", record.row_number, format_row(&record.fields))
        });
        Ok(output)
    }

    fn description(&self) -> Option<&str> {
        Some(self.check.description())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::row;

    #[test]
    fn test_consecutive_whitespace() {
        let check = ValueCheck::ConsecutiveWhitespace;
        assert!(check.is_bad_value("b  c"));
        assert!(check.is_bad_value(" \t"));
        assert!(check.is_bad_value("end  "));
        assert!(!check.is_bad_value("b c"));
        assert!(!check.is_bad_value(""));
    }

    #[test]
    fn test_leading_trailing_whitespace() {
        let check = ValueCheck::LeadingTrailingWhitespace;
        assert!(check.is_bad_value(" Adams"));
        assert!(check.is_bad_value("Adams\n"));
        assert!(!check.is_bad_value("Adams County"));
        assert!(!check.is_bad_value(""));
    }

    #[test]
    fn test_non_alphanumeric() {
        let check = ValueCheck::NonAlphanumeric;
        assert!(check.is_bad_value("*"));
        assert!(check.is_bad_value("-"));
        assert!(check.is_bad_value(" "));
        assert!(!check.is_bad_value(""));
        assert!(!check.is_bad_value("_"));
        assert!(!check.is_bad_value("N/A"));
        assert!(!check.is_bad_value("Peña"));
    }

    #[test]
    fn test_line_break_and_tab() {
        assert!(ValueCheck::LineBreak.is_bad_value("a\nb"));
        assert!(!ValueCheck::LineBreak.is_bad_value("a\tb"));
        assert!(ValueCheck::Tab.is_bad_value("a\tb"));
        assert!(!ValueCheck::Tab.is_bad_value("a b"));
    }

    #[test]
    fn test_value_rule_flags_row_once() {
        let mut rule = ValueRule::new(ValueCheck::Tab);
        rule.accept(2, &row(&["a\t", "\tb"])).unwrap();
        rule.accept(3, &row(&["a", "b"])).unwrap();
        rule.accept(4, &row(&["c", "d\t"])).unwrap();

        let rows: Vec<usize> = rule.failures().iter().map(|r| r.row_number).collect();
        assert_eq!(rows, vec![2, 4]);
    }

    #[test]
    fn test_value_rule_report() {
        let mut rule = ValueRule::new(ValueCheck::ConsecutiveWhitespace);
        rule.accept(2, &row(&["a", "b  c"])).unwrap();

        assert_eq!(
            rule.render_report(10).unwrap(),
            "There are 1 rows that have entries with consecutive whitespace characters:\n\n\tRow 2: [\"a\", \"b  c\"]"
        );
    }

    #[test]
    fn test_value_check_names_are_unique() {
        let mut names: Vec<&str> = ValueCheck::ALL.iter().map(ValueCheck::name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), ValueCheck::ALL.len());
    }
}
