//! CSV extraction
//!
//! A minimal quote-toggling splitter, not a full RFC 4180 reader. Every `"` flips the in-quotes
//! state and is dropped, so a doubled `""` inside a quoted cell does not produce a literal quote.
//! Inside quotes, commas and newlines are part of the cell.
//!
//! Whole-document extraction reads every cell of every non-blank record, row-major, and keeps
//! the ones that parse permissively. There is no header handling at that level: header cells
//! are words, so they simply do not parse. Column extraction ([`extract_csv_column`]) works line
//! by line and can skip a header row.

use crate::error::FormatError;
use crate::file_type::FileType;
use crate::format::Extractor;
use crate::numeric::{parse_float_prefix, trim_value};

pub struct CsvExtractor;

impl Extractor for CsvExtractor {
    fn name(&self) -> &str {
        "csv"
    }

    fn description(&self) -> &str {
        "comma-separated values, every cell coerced by numeric prefix"
    }

    fn file_types(&self) -> &[FileType] {
        &[FileType::Csv]
    }

    fn collect(&self, source: &str) -> Result<Vec<f64>, FormatError> {
        Ok(parse_csv_records(source)
            .iter()
            .flatten()
            .filter_map(|cell| parse_float_prefix(cell))
            .collect())
    }
}

/// Split a document into records of trimmed cells. Records whose cells are all empty are dropped.
pub fn parse_csv_records(source: &str) -> Vec<Vec<String>> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;

    let mut finish_record = |record: &mut Vec<String>, field: &mut String| {
        record.push(trim_value(field).to_string());
        field.clear();
        let record = std::mem::take(record);
        if record.iter().any(|cell| !cell.is_empty()) {
            records.push(record);
        }
    };

    for c in source.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                record.push(trim_value(&field).to_string());
                field.clear();
            }
            '\n' if !in_quotes => finish_record(&mut record, &mut field),
            _ => field.push(c),
        }
    }
    finish_record(&mut record, &mut field);

    records
}

/// Split a single line into trimmed cells with the same quote toggling as [`parse_csv_records`].
pub fn split_csv_line(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in line.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                cells.push(trim_value(&current).to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    cells.push(trim_value(&current).to_string());
    cells
}

fn non_blank_lines(source: &str) -> impl Iterator<Item = &str> {
    source
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !trim_value(line).is_empty())
}

/// Number of cells in the first non-blank line (0 for a blank document).
pub fn csv_column_count(source: &str) -> usize {
    non_blank_lines(source)
        .next()
        .map_or(0, |line| split_csv_line(line).len())
}

/// Numbers in column `index`, one line per row, optionally skipping the first non-blank line.
///
/// Rows that are too short for `index` contribute nothing.
pub fn extract_csv_column(source: &str, index: usize, has_header: bool) -> Vec<f64> {
    non_blank_lines(source)
        .skip(usize::from(has_header))
        .filter_map(|line| {
            split_csv_line(line)
                .get(index)
                .and_then(|cell| parse_float_prefix(cell))
        })
        .collect()
}
