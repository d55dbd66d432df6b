//! Where rows come from: CSV tokenizing and data file discovery.
//!
//! The rule engine only sees tokenized rows. This module turns a folder of
//! exports into those rows: [`discover`] finds the CSV files under the year
//! folders of a root, and [`CsvRows`] reads one file into numbered records.

mod csv;
mod discovery;

pub use csv::{CsvOptions, CsvRows};
pub use discovery::{discover, is_csv_file, DiscoveredFile, DATA_FOLDER_PATTERN};
