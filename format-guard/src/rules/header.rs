//! Rules evaluated once against the header row.

use crate::core::{format_row, Rule, RuleKind};
use crate::prelude::*;
use std::collections::BTreeSet;

/// Header snapshot plus the outcome of the single check a header rule makes.
#[derive(Debug, Clone, Default)]
struct HeaderState {
    header: Option<Vec<String>>,
    passed: bool,
}

impl HeaderState {
    fn accept(&mut self, rule: &str, fields: &[String], passed: bool) -> Result<()> {
        if self.header.is_some() {
            return Err(FormatError::header_already_accepted(rule));
        }
        self.header = Some(fields.to_vec());
        self.passed = passed;
        Ok(())
    }

    fn header(&self, rule: &str) -> Result<&[String]> {
        self.header
            .as_deref()
            .ok_or_else(|| FormatError::header_not_accepted(rule))
    }
}

/// Fails if any header field is the empty string.
///
/// # Examples
///
/// ```rust
/// use format_guard::core::Rule;
/// use format_guard::rules::EmptyFields;
///
/// let mut rule = EmptyFields::new();
/// rule.accept(1, &["county".to_string(), String::new()]).unwrap();
/// assert!(!rule.has_passed());
/// ```
#[derive(Debug, Clone, Default)]
pub struct EmptyFields {
    state: HeaderState,
}

impl EmptyFields {
    /// Creates a new empty-fields rule.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Rule for EmptyFields {
    fn name(&self) -> &str {
        "empty_fields"
    }

    fn kind(&self) -> RuleKind {
        RuleKind::Header
    }

    fn accept(&mut self, _row_number: usize, fields: &[String]) -> Result<()> {
        let passed = !fields.iter().any(String::is_empty);
        self.state.accept("empty_fields", fields, passed)
    }

    fn has_passed(&self) -> bool {
        self.state.passed
    }

    fn render_report(&self, _limit: i32) -> Result<String> {
        let header = self.state.header(self.name())?;
        Ok(format!("Header {} has empty entries.", format_row(header)))
    }

    fn description(&self) -> Option<&str> {
        Some("empty header entries")
    }
}

/// Fails unless every header field is already lowercase.
#[derive(Debug, Clone, Default)]
pub struct LowercaseFields {
    state: HeaderState,
}

impl LowercaseFields {
    /// Creates a new lowercase-fields rule.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Rule for LowercaseFields {
    fn name(&self) -> &str {
        "lowercase_fields"
    }

    fn kind(&self) -> RuleKind {
        RuleKind::Header
    }

    fn accept(&mut self, _row_number: usize, fields: &[String]) -> Result<()> {
        let passed = fields.iter().all(|field| *field == field.to_lowercase());
        self.state.accept("lowercase_fields", fields, passed)
    }

    fn has_passed(&self) -> bool {
        self.state.passed
    }

    fn render_report(&self, _limit: i32) -> Result<String> {
        let header = self.state.header(self.name())?;
        Ok(format!(
            "Header {} should only contain lowercase characters.",
            format_row(header)
        ))
    }

    fn description(&self) -> Option<&str> {
        Some("header entries with uppercase characters")
    }
}

/// Fails if the header does not contain every required name.
///
/// Names are compared exactly, so the required set should already be in the
/// normalized form the header is expected to use.
#[derive(Debug, Clone, Default)]
pub struct RequiredFields {
    required: BTreeSet<String>,
    missing: BTreeSet<String>,
    state: HeaderState,
}

impl RequiredFields {
    /// Creates a rule requiring each of `required` to appear in the header.
    pub fn new<I, S>(required: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            required: required.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Returns the required names absent from the accepted header.
    pub fn missing(&self) -> &BTreeSet<String> {
        &self.missing
    }
}

impl Rule for RequiredFields {
    fn name(&self) -> &str {
        "required_fields"
    }

    fn kind(&self) -> RuleKind {
        RuleKind::Header
    }

    fn accept(&mut self, _row_number: usize, fields: &[String]) -> Result<()> {
        let present: BTreeSet<&str> = fields.iter().map(String::as_str).collect();
        let missing: BTreeSet<String> = self
            .required
            .iter()
            .filter(|name| !present.contains(name.as_str()))
            .cloned()
            .collect();
        let passed = missing.is_empty();
        self.state.accept("required_fields", fields, passed)?;
        self.missing = missing;
        Ok(())
    }

    fn has_passed(&self) -> bool {
        self.state.passed
    }

    fn render_report(&self, _limit: i32) -> Result<String> {
        let header = self.state.header(self.name())?;
        let missing: Vec<&str> = self.missing.iter().map(String::as_str).collect();
        Ok(format!(
            "Header {} is missing entries: {missing:?}.",
            format_row(header)
        ))
    }

    fn description(&self) -> Option<&str> {
        Some("missing required header entries")
    }
}

/// Placeholder header name that must never appear.
pub const RESERVED_HEADER_NAME: &str = "unknown";

/// Fails if any header field, trimmed and lowercased, is `unknown`.
#[derive(Debug, Clone, Default)]
pub struct ReservedName {
    state: HeaderState,
}

impl ReservedName {
    /// Creates a new reserved-name rule.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Rule for ReservedName {
    fn name(&self) -> &str {
        "reserved_name"
    }

    fn kind(&self) -> RuleKind {
        RuleKind::Header
    }

    fn accept(&mut self, _row_number: usize, fields: &[String]) -> Result<()> {
        let passed = !fields
            .iter()
            .any(|field| field.trim().to_lowercase() == RESERVED_HEADER_NAME);
        self.state.accept("reserved_name", fields, passed)
    }

    fn has_passed(&self) -> bool {
        self.state.passed
    }

    fn render_report(&self, _limit: i32) -> Result<String> {
        let header = self.state.header(self.name())?;
        Ok(format!("Header {} has unknown entries.", format_row(header)))
    }

    fn description(&self) -> Option<&str> {
        Some("placeholder header entries")
    }
}
