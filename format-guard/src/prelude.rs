//! Prelude for commonly used types and traits in format-guard.

pub use crate::core::{Rule, RunConfig};
pub use crate::error::{ErrorContext, FormatError, Result};
pub use crate::formatters::{FormatterConfig, ResultFormatter};
pub use crate::logging::LogConfig;
