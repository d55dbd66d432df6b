//! Core types of the format-guard rule engine.
//!
//! ## Overview
//!
//! - **[`Rule`]**: a stateful check fed a header or a stream of rows
//! - **[`RuleSet`]**: every rule for one file, fed in file order
//! - **[`FileReport`]**: the rendered result of one file
//! - **[`ReportAggregator`]**: merges file reports into short and full output
//! - **[`FormatSuite`]**: discovers files under a root and validates each one
//!
//! ## Architecture
//!
//! ```text
//! FormatSuite
//!     ├── file 1 ── RuleSet ── RuleSetOutcome ── FileReport ─┐
//!     ├── file 2 ── RuleSet ── RuleSetOutcome ── FileReport ─┤
//!     └── ...                                                └── ReportAggregator ── RunReport
//! ```
//!
//! Rule sets are never shared: each file gets fresh rule instances, and they
//! are dropped once the file's report has been rendered.

mod aggregator;
mod config;
mod result;
mod rule;
mod runner;
mod suite;

pub use aggregator::{render_reports, ReportAggregator, GROUP_END, GROUP_START};
pub use config::{RunConfig, DEFAULT_MAX_EXAMPLES};
pub use result::{FileReport, RuleFailure, RunReport, RunSummary, Verbosity};
pub use rule::{
    examples_to_show, format_row, truncation_notice, BoxedRule, FailureRecord, Failures, Rule,
    RuleKind,
};
pub use runner::{validate_rows, RuleSet, RuleSetOutcome, HEADER_ROW};
pub use suite::FormatSuite;
