//! Built-in formatting rules.
//!
//! Every rule implements the [`Rule`](crate::core::Rule) trait and falls in one
//! of three families:
//!
//! - **Header rules** ([`EmptyFields`], [`LowercaseFields`], [`RequiredFields`],
//!   [`ReservedName`]) look at the header row once.
//! - **Row rules** ([`InconsistentColumnCount`], [`BlankRows`],
//!   [`NonIntegerVotes`]) look at each data row as a whole.
//! - **Value rules** ([`ValueRule`] with a [`ValueCheck`]) test each field of a
//!   data row on its own and flag the row if any field matches.
//!
//! ## Example
//!
//! ```rust
//! use format_guard::core::Rule;
//! use format_guard::rules::{EmptyFields, InconsistentColumnCount, ValueCheck, ValueRule};
//!
//! # fn example() -> format_guard::prelude::Result<()> {
//! let header: Vec<String> = vec!["county".into(), "votes".into()];
//!
//! let mut empty = EmptyFields::new();
//! empty.accept(1, &header)?;
//!
//! let mut columns = InconsistentColumnCount::new(&header);
//! let mut tabs = ValueRule::new(ValueCheck::Tab);
//! for (row_number, row) in [(2, vec!["Adams".to_string(), "12".to_string()])] {
//!     columns.accept(row_number, &row)?;
//!     tabs.accept(row_number, &row)?;
//! }
//!
//! assert!(empty.has_passed() && columns.has_passed() && tabs.has_passed());
//! # Ok(())
//! # }
//! ```

mod header;
mod row;
mod value;

pub use header::{EmptyFields, LowercaseFields, RequiredFields, ReservedName, RESERVED_HEADER_NAME};
pub use row::{
    is_whole_number, BlankRows, InconsistentColumnCount, NonIntegerVotes, CANDIDATE_COLUMN,
    VOTE_COLUMNS,
};
pub use value::{ValueCheck, ValueRule};
