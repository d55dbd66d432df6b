//! Error types for the format-guard library.
//!
//! Formatting problems found in the data are *not* errors: they are recorded by
//! the rules and surfaced through reports. The variants here cover misuse of the
//! rule API and failures of the surrounding plumbing (reading files, walking
//! directories, serializing reports).

use thiserror::Error;

/// The main error type for the format-guard library.
#[derive(Error, Debug)]
pub enum FormatError {
    /// A row was fed, or a report requested, before the header was accepted.
    #[error("Rule '{rule}' has not accepted a header yet")]
    HeaderNotAccepted {
        /// Name of the rule that was misused
        rule: String,
    },

    /// A header rule was fed a second header.
    #[error("Rule '{rule}' already accepted a header")]
    HeaderAlreadyAccepted {
        /// Name of the rule that was misused
        rule: String,
    },

    /// A report was requested from a rule that never received any input.
    #[error("Rule '{rule}' cannot render a report before it has been evaluated")]
    RuleNotEvaluated {
        /// Name of the rule that was misused
        rule: String,
    },

    /// A file had no header row to validate against.
    #[error("File '{path}' is empty")]
    EmptyFile { path: String },

    /// Error from I/O operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from the CSV tokenizer.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Error while discovering candidate files.
    #[error("Discovery error: {0}")]
    Discovery(String),

    /// Error from serialization operations.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The run configuration cannot drive a run, e.g. the root is missing.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// An error wrapped with a context message by [`ErrorContext`].
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A type alias for `Result<T, FormatError>`.
pub type Result<T> = std::result::Result<T, FormatError>;

impl FormatError {
    /// Creates a new error for a rule fed before its header.
    pub fn header_not_accepted(rule: impl Into<String>) -> Self {
        Self::HeaderNotAccepted { rule: rule.into() }
    }

    /// Creates a new error for a header fed twice.
    pub fn header_already_accepted(rule: impl Into<String>) -> Self {
        Self::HeaderAlreadyAccepted { rule: rule.into() }
    }

    /// Creates a new error for a report rendered too early.
    pub fn rule_not_evaluated(rule: impl Into<String>) -> Self {
        Self::RuleNotEvaluated { rule: rule.into() }
    }

    /// Returns true if this error is a misuse of the rule API rather than an
    /// environmental failure.
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            Self::HeaderNotAccepted { .. }
                | Self::HeaderAlreadyAccepted { .. }
                | Self::RuleNotEvaluated { .. }
        )
    }
}

impl From<glob::PatternError> for FormatError {
    fn from(err: glob::PatternError) -> Self {
        Self::Discovery(format!("invalid pattern: {err}"))
    }
}

impl From<walkdir::Error> for FormatError {
    fn from(err: walkdir::Error) -> Self {
        Self::Discovery(err.to_string())
    }
}

impl From<serde_json::Error> for FormatError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Extension trait for adding context to errors.
pub trait ErrorContext<T> {
    /// Adds context to an error.
    fn context(self, msg: &str) -> Result<T>;

    /// Adds context with a lazy message.
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: Into<FormatError>,
{
    fn context(self, msg: &str) -> Result<T> {
        self.with_context(|| msg.to_string())
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let msg = f();
            match e.into() {
                FormatError::Internal(inner) => FormatError::Internal(format!("{msg}: {inner}")),
                other => FormatError::Internal(format!("{msg}: {other}")),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_errors() {
        let err = FormatError::header_not_accepted("empty_fields");
        assert_eq!(
            err.to_string(),
            "Rule 'empty_fields' has not accepted a header yet"
        );
        assert!(err.is_usage_error());

        let err = FormatError::rule_not_evaluated("tab_characters");
        assert!(err.is_usage_error());
        assert!(err.to_string().contains("tab_characters"));
    }

    #[test]
    fn test_io_error_is_not_usage_error() {
        let err: FormatError =
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing").into();
        assert!(!err.is_usage_error());
        assert_eq!(err.to_string(), "IO error: missing");
    }

    #[test]
    fn test_error_context() {
        fn failing_operation() -> Result<()> {
            Err(FormatError::Internal("Something went wrong".to_string()))
        }

        let err = failing_operation()
            .context("While validating 2020/results.csv")
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Internal error: While validating 2020/results.csv: Something went wrong"
        );
    }
}
