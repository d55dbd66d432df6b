//! Tokenized CSV rows read through the `csv` crate.

use crate::prelude::*;
use std::collections::VecDeque;
use std::fs;
use std::io::Cursor;
use std::path::Path;

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Configuration options for reading CSV files.
#[derive(Debug, Clone)]
pub struct CsvOptions {
    /// Field delimiter character
    pub delimiter: u8,
    /// Quote character
    pub quote: u8,
    /// Whether rows may have a different number of fields than the header
    pub flexible: bool,
    /// Whether a leading UTF-8 byte order mark is removed from the first field
    pub strip_bom: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
            flexible: true,
            strip_bom: true,
        }
    }
}

impl CsvOptions {
    fn reader_builder(&self) -> csv::ReaderBuilder {
        let mut builder = csv::ReaderBuilder::new();
        builder
            .has_headers(false)
            .flexible(self.flexible)
            .delimiter(self.delimiter)
            .quote(self.quote);
        builder
    }
}

/// Iterator over the records of one CSV file.
///
/// The header is not treated specially: it is simply the first record. Each
/// item carries the 1-based line on which the record ends, so with a header
/// on line 1 the first data row is row 2, and a quoted value spanning lines
/// 2 and 3 belongs to row 3.
///
/// The tokenizer skips lines with no bytes at all. Those lines are still
/// yielded here, as records with no fields, so they can be counted as blank.
///
/// A record that cannot be decoded is yielded as an error and reading
/// continues with the next record.
///
/// # Examples
///
/// ```rust
/// use format_guard::sources::{CsvOptions, CsvRows};
///
/// # fn example() -> format_guard::prelude::Result<()> {
/// let data = "county,votes\nAdams,12\n\nBrown,3\n";
/// let rows = CsvRows::from_bytes(data, &CsvOptions::default())
///     .collect::<Result<Vec<_>, _>>()?;
///
/// assert_eq!(rows[1], (2, vec!["Adams".to_string(), "12".to_string()]));
/// assert_eq!(rows[2], (3, vec![]));
/// assert_eq!(rows[3].0, 4);
/// # Ok(())
/// # }
/// ```
pub struct CsvRows {
    reader: csv::Reader<Cursor<Vec<u8>>>,
    record: csv::StringRecord,
    ready: VecDeque<Result<(usize, Vec<String>)>>,
    line: usize,
    line_offset: usize,
    strip_bom: bool,
    finished: bool,
}

impl CsvRows {
    /// Reads the file at `path`.
    pub fn from_path(path: impl AsRef<Path>, options: &CsvOptions) -> Result<Self> {
        let data = fs::read(path)?;
        Ok(Self::from_bytes(data, options))
    }

    /// Reads records from an in-memory buffer.
    pub fn from_bytes(data: impl Into<Vec<u8>>, options: &CsvOptions) -> Self {
        Self {
            reader: options.reader_builder().from_reader(Cursor::new(data.into())),
            record: csv::StringRecord::new(),
            ready: VecDeque::new(),
            line: 1,
            line_offset: 0,
            strip_bom: options.strip_bom,
            finished: false,
        }
    }

    /// Queues the empty lines ahead of the next record, then the record itself.
    fn fill(&mut self) {
        let start = self.reader.position().byte() as usize;
        let data = self.reader.get_ref().get_ref();

        let mut offset = start;
        // The '\n' of a CRLF terminator can be left behind by the previous record.
        if offset > 0 && data.get(offset) == Some(&b'\n') && data[offset - 1] == b'\r' {
            offset += 1;
        }
        while let Some(len) = terminator_len(&data[offset..]) {
            self.line += count_newlines(&data[self.line_offset..offset]);
            self.line_offset = offset;
            self.ready.push_back(Ok((self.line, Vec::new())));
            offset += len;
        }
        self.line += count_newlines(&data[self.line_offset..offset]);
        self.line_offset = offset;
        let start_line = self.line;

        match self.reader.read_record(&mut self.record) {
            Ok(true) => {
                let mut fields: Vec<String> = self.record.iter().map(str::to_string).collect();
                if self.strip_bom {
                    if let Some(first) = fields.first_mut() {
                        if let Some(stripped) = first.strip_prefix(BYTE_ORDER_MARK) {
                            *first = stripped.to_string();
                        }
                    }
                    self.strip_bom = false;
                }

                let embedded: usize = fields
                    .iter()
                    .map(|field| field.matches('\n').count())
                    .sum();
                self.ready.push_back(Ok((start_line + embedded, fields)));
            }
            Ok(false) => self.finished = true,
            Err(err) => {
                if self.reader.position().byte() as usize == start {
                    self.finished = true;
                }
                self.ready.push_back(Err(err.into()));
            }
        }
    }
}

impl Iterator for CsvRows {
    type Item = Result<(usize, Vec<String>)>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.ready.pop_front() {
                return Some(item);
            }
            if self.finished {
                return None;
            }
            self.fill();
        }
    }
}

impl std::fmt::Debug for CsvRows {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CsvRows")
            .field("line", &self.line)
            .field("strip_bom", &self.strip_bom)
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}

/// Length of the line terminator at the start of `data`, if there is one.
fn terminator_len(data: &[u8]) -> Option<usize> {
    match data {
        [b'\r', b'\n', ..] => Some(2),
        [b'\r', ..] | [b'\n', ..] => Some(1),
        _ => None,
    }
}

fn count_newlines(data: &[u8]) -> usize {
    data.iter().filter(|byte| **byte == b'\n').count()
}
