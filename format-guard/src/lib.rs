//! # format-guard - Formatting checks for CSV data exports
//!
//! format-guard validates the structural and lexical hygiene of CSV files such
//! as election-results exports. Every file is run through a fixed battery of
//! formatting rules, and every violation is reported with the row number and
//! the offending row so the source data can be fixed.
//!
//! ## Quick Start
//!
//! ```rust
//! use format_guard::core::{validate_rows, RunConfig};
//! use format_guard::core::{FileReport, Verbosity};
//!
//! # fn example() -> format_guard::prelude::Result<()> {
//! let config = RunConfig::default().with_max_examples(5);
//!
//! let header: Vec<String> = vec!["County".into(), "votes".into()];
//! let rows = vec![
//!     vec!["Adams".to_string(), "12".to_string()],
//!     vec!["Brown".to_string(), "12.5".to_string()],
//! ];
//!
//! let outcome = validate_rows(&config, &header, &rows)?;
//! assert!(!outcome.is_success());
//!
//! let report = FileReport::from_outcome("2020/general.csv", None, &outcome, &config)?;
//! println!("{}", report.message(Verbosity::Short));
//! # Ok(())
//! # }
//! ```
//!
//! ## Rules
//!
//! - **Header rules**: no empty names, lowercase names, required names present,
//!   no reserved placeholder name.
//! - **Row rules**: consistent column count, no blank rows, whole-number vote
//!   counts.
//! - **Value rules**: no consecutive whitespace, no leading or trailing
//!   whitespace, no punctuation-only entries, no line breaks, no tabs.
//!
//! ## Running over a repository
//!
//! [`core::FormatSuite`] discovers every CSV file under the year folders of a
//! root directory, validates each one with a fresh rule set and collects the
//! results into a [`core::RunReport`]. Console output is truncated to a few
//! examples per rule; the log file receives every example.
//!
//! ```rust,no_run
//! use format_guard::core::{FormatSuite, RunConfig};
//!
//! # fn example() -> format_guard::prelude::Result<()> {
//! let suite = FormatSuite::new(RunConfig::ci("/data/openelections-data-xx").with_log_file("format.log"));
//! let report = suite.run()?;
//! suite.write_log(&report)?;
//! println!("{}", report.to_human()?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - **`core`**: the [`core::Rule`] trait, the per-file rule set, results and
//!   the report aggregator
//! - **`rules`**: the built-in rules
//! - **`sources`**: CSV tokenizing and data file discovery
//! - **`formatters`**: human and JSON renderings of a run
//! - **`logging`**: `tracing` configuration

pub mod core;
pub mod error;
pub mod formatters;
pub mod logging;
pub mod prelude;
pub mod rules;
pub mod sources;

#[cfg(test)]
pub mod test_helpers;
