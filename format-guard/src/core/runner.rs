//! The rule set run against a single file.

use super::{BoxedRule, Rule, RunConfig};
use crate::logging::{truncate_field, LogConfig};
use crate::prelude::*;
use crate::rules::{
    BlankRows, EmptyFields, InconsistentColumnCount, LowercaseFields, NonIntegerVotes,
    RequiredFields, ReservedName, ValueCheck, ValueRule,
};
use crate::{log_rule, perf_debug};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Row number of the header; data rows start at 2.
pub const HEADER_ROW: usize = 1;

/// The full rule population for one file.
///
/// Header rules exist from the start. Row and value rules need the header
/// (for its length and column names), so they are created when the header is
/// accepted. A rule set is used for exactly one file and consumed by
/// [`RuleSet::finish`].
///
/// # Examples
///
/// ```rust
/// use format_guard::core::{RuleSet, RunConfig};
///
/// # fn example() -> format_guard::prelude::Result<()> {
/// let config = RunConfig::default();
/// let mut rules = RuleSet::new(&config);
///
/// rules.accept_header(&["county".to_string(), "votes".to_string()])?;
/// rules.accept_row(2, &["Adams".to_string(), "12".to_string()])?;
///
/// let outcome = rules.finish();
/// assert!(outcome.is_success());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct RuleSet {
    header_rules: Vec<BoxedRule>,
    row_rules: Vec<BoxedRule>,
    header_accepted: bool,
    rows_accepted: usize,
    log: LogConfig,
}

impl RuleSet {
    /// Creates a rule set with fresh header rules.
    pub fn new(config: &RunConfig) -> Self {
        Self {
            header_rules: Self::header_rules(config.required_fields()),
            row_rules: Vec::new(),
            header_accepted: false,
            rows_accepted: 0,
            log: config.log().clone(),
        }
    }

    /// Builds one instance of every header rule.
    pub fn header_rules(required_fields: &BTreeSet<String>) -> Vec<BoxedRule> {
        vec![
            Box::new(EmptyFields::new()),
            Box::new(LowercaseFields::new()),
            Box::new(RequiredFields::new(required_fields.iter().cloned())),
            Box::new(ReservedName::new()),
        ]
    }

    /// Builds one instance of every row and value rule for `header`.
    pub fn row_rules(header: &[String]) -> Vec<BoxedRule> {
        let mut rules: Vec<BoxedRule> = vec![
            Box::new(InconsistentColumnCount::new(header)),
            Box::new(BlankRows::new()),
            Box::new(NonIntegerVotes::new(header)),
        ];
        rules.extend(
            ValueCheck::ALL
                .iter()
                .map(|&check| Box::new(ValueRule::new(check)) as BoxedRule),
        );
        rules
    }

    /// Feeds the header to every header rule and builds the row rules.
    pub fn accept_header(&mut self, fields: &[String]) -> Result<()> {
        if self.header_accepted {
            return Err(FormatError::header_already_accepted("rule_set"));
        }
        for rule in &mut self.header_rules {
            rule.accept(HEADER_ROW, fields)?;
        }
        self.row_rules = Self::row_rules(fields);
        self.header_accepted = true;

        debug!(
            header.columns = fields.len(),
            rules.header = self.header_rules.len(),
            rules.row = self.row_rules.len(),
            "Built rule set"
        );
        Ok(())
    }

    /// Feeds one data row to every row and value rule.
    pub fn accept_row(&mut self, row_number: usize, fields: &[String]) -> Result<()> {
        if !self.header_accepted {
            return Err(FormatError::header_not_accepted("rule_set"));
        }
        perf_debug!(
            self.log,
            row = row_number,
            fields = %truncate_field(&format!("{fields:?}"), self.log.max_field_length),
            "Accepting row"
        );
        for rule in &mut self.row_rules {
            rule.accept(row_number, fields)?;
        }
        self.rows_accepted += 1;
        Ok(())
    }

    /// Returns true once the header has been accepted.
    pub fn header_accepted(&self) -> bool {
        self.header_accepted
    }

    /// Number of data rows fed so far.
    pub fn rows_accepted(&self) -> usize {
        self.rows_accepted
    }

    /// Iterates over every rule, header rules first.
    pub fn rules(&self) -> impl Iterator<Item = &dyn Rule> {
        self.header_rules
            .iter()
            .chain(self.row_rules.iter())
            .map(|rule| &**rule)
    }

    /// Ends the pass and keeps only the rules that did not pass.
    pub fn finish(self) -> RuleSetOutcome {
        let rules_evaluated = self.header_rules.len() + self.row_rules.len();
        let mut failed = Vec::new();

        for rule in self.header_rules.into_iter().chain(self.row_rules) {
            if rule.has_passed() {
                log_rule!(self.log, rule.name = %rule.name(), "Rule passed");
            } else {
                warn!(
                    rule.name = %rule.name(),
                    rule.kind = ?rule.kind(),
                    "Rule failed"
                );
                failed.push(rule);
            }
        }

        RuleSetOutcome {
            failed,
            rules_evaluated,
            rows_evaluated: self.rows_accepted,
        }
    }
}

/// The rules that failed for one file.
#[derive(Debug)]
pub struct RuleSetOutcome {
    failed: Vec<BoxedRule>,
    rules_evaluated: usize,
    rows_evaluated: usize,
}

impl RuleSetOutcome {
    /// Returns true if every rule passed.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Returns the failed rules in rule-set order.
    pub fn failed_rules(&self) -> &[BoxedRule] {
        &self.failed
    }

    /// Returns the names of the failed rules.
    pub fn failed_rule_names(&self) -> Vec<&str> {
        self.failed.iter().map(|rule| rule.name()).collect()
    }

    pub fn rules_evaluated(&self) -> usize {
        self.rules_evaluated
    }

    pub fn rows_evaluated(&self) -> usize {
        self.rows_evaluated
    }
}

/// Runs a fresh rule set over a header and its data rows.
///
/// Rows are numbered from 2 in iteration order. Use [`RuleSet`] directly when
/// the source knows the real row numbers.
pub fn validate_rows<I>(config: &RunConfig, header: &[String], rows: I) -> Result<RuleSetOutcome>
where
    I: IntoIterator,
    I::Item: AsRef<[String]>,
{
    let mut rules = RuleSet::new(config);
    rules.accept_header(header)?;
    for (offset, row) in rows.into_iter().enumerate() {
        rules.accept_row(HEADER_ROW + 1 + offset, row.as_ref())?;
    }
    Ok(rules.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{row, rows};

    #[test]
    fn test_rule_population() {
        let config = RunConfig::default();
        let mut rules = RuleSet::new(&config);
        assert_eq!(rules.rules().count(), 4);

        rules.accept_header(&row(&["county", "votes"])).unwrap();
        let names: Vec<&str> = rules.rules().map(|rule| rule.name()).collect();
        assert_eq!(
            names,
            vec![
                "empty_fields",
                "lowercase_fields",
                "required_fields",
                "reserved_name",
                "inconsistent_column_count",
                "blank_rows",
                "non_integer_votes",
                "consecutive_whitespace",
                "leading_trailing_whitespace",
                "non_alphanumeric_entries",
                "line_breaks",
                "tab_characters",
            ]
        );
    }

    #[test]
    fn test_row_before_header_is_an_error() {
        let mut rules = RuleSet::new(&RunConfig::default());
        let err = rules.accept_row(2, &row(&["a"])).unwrap_err();
        assert!(matches!(err, FormatError::HeaderNotAccepted { .. }));
    }

    #[test]
    fn test_second_header_is_an_error() {
        let mut rules = RuleSet::new(&RunConfig::default());
        rules.accept_header(&row(&["a"])).unwrap();
        assert!(rules.accept_header(&row(&["a"])).is_err());
    }

    #[test]
    fn test_well_formed_file_passes() {
        let header = row(&["county", "precinct", "candidate", "votes"]);
        let data = rows(&[
            &["Adams", "1", "Smith", "12"],
            &["Adams", "2", "Jones", "7.0"],
            &["Brown", "1", "Smith", ""],
        ]);
        let outcome = validate_rows(&RunConfig::default(), &header, &data).unwrap();
        assert!(outcome.is_success());
        assert_eq!(outcome.rows_evaluated(), 3);
        assert_eq!(outcome.rules_evaluated(), 12);
    }

    #[test]
    fn test_end_to_end_failures() {
        let header = row(&["County", "unknown", "absentee", "votes", ""]);
        let data = rows(&[&["a", "b  c", "1", "2", "3"]]);
        let outcome = validate_rows(&RunConfig::default(), &header, &data).unwrap();

        let failed = outcome.failed_rule_names();
        for expected in [
            "empty_fields",
            "lowercase_fields",
            "reserved_name",
            "consecutive_whitespace",
        ] {
            assert!(failed.contains(&expected), "{expected} should fail");
        }
        assert!(!failed.contains(&"inconsistent_column_count"));
        assert!(!failed.contains(&"non_integer_votes"));
    }

    #[test]
    fn test_required_fields_from_config() {
        let config = RunConfig::default().with_required_fields(["county", "votes"]);
        let outcome = validate_rows(&config, &row(&["county", "total"]), Vec::<Vec<String>>::new())
            .unwrap();
        assert_eq!(outcome.failed_rule_names(), vec!["required_fields"]);
    }

    #[test]
    fn test_header_only_file_passes_row_rules() {
        let outcome =
            validate_rows(&RunConfig::default(), &row(&["a", "b"]), Vec::<Vec<String>>::new())
                .unwrap();
        assert!(outcome.is_success());
        assert_eq!(outcome.rows_evaluated(), 0);
    }
}
