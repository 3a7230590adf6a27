//! Readers for the two upload formats and the shared normalization pass.
//!
//! Both readers reduce their input to a [`RawTable`] of untyped strings, so
//! cleaning and row filtering behave identically whether the upload was CSV
//! or a workbook.

use std::io::Cursor;
use std::path::Path;

use calamine::{Data, DataType, Range, Reader, Xlsx};
use tracing::info;

use crate::columns::detect_columns;
use crate::errors::IngestError;
use crate::model::BillingRecord;

/// Rows of banner/preamble above the header in the source spreadsheets.
pub const DEFAULT_HEADER_SKIP: usize = 5;

/// Upload format, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Xlsx,
}

impl SourceFormat {
    /// Case-insensitive extension match; anything but `.csv` / `.xlsx` is
    /// rejected up front.
    pub fn from_path(path: &Path) -> Result<Self, IngestError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        match extension.to_ascii_lowercase().as_str() {
            "csv" => Ok(SourceFormat::Csv),
            "xlsx" => Ok(SourceFormat::Xlsx),
            other => Err(IngestError::UnsupportedExtension {
                extension: other.to_string(),
            }),
        }
    }
}

/// Header row plus data rows as raw text, after the preamble skip.
///
/// Rows carry the 1-indexed line of the original file they came from, so
/// cell errors can point back at the source even when blank lines were
/// dropped along the way.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    lines: Vec<usize>,
}

impl RawTable {
    /// Build a table whose rows sat on consecutive lines directly under the
    /// header, with `header_skip` preamble lines above it.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>, header_skip: usize) -> Self {
        let first_data_line = header_skip + 2;
        let lines = (0..rows.len()).map(|i| first_data_line + i).collect();
        Self { headers, rows, lines }
    }

    /// Build a table with an explicit source line per row. `lines` must be
    /// parallel to `rows`.
    pub fn with_lines(headers: Vec<String>, rows: Vec<Vec<String>>, lines: Vec<usize>) -> Self {
        Self { headers, rows, lines }
    }

    /// 1-indexed line in the original file for the data row at `offset`.
    pub fn source_line(&self, offset: usize) -> usize {
        self.lines.get(offset).copied().unwrap_or_default()
    }
}

/// Read and normalize billing records from raw upload bytes.
pub fn read_records(
    bytes: &[u8],
    format: SourceFormat,
    header_skip: usize,
) -> Result<Vec<BillingRecord>, IngestError> {
    let table = match format {
        SourceFormat::Csv => raw_table_from_csv(bytes, header_skip)?,
        SourceFormat::Xlsx => raw_table_from_xlsx(bytes, header_skip)?,
    };
    normalize_table(table)
}

/// The preamble is skipped by physical line, not by parsed record, so banner
/// rows need no particular delimiter structure. Blank lines after the skip
/// are dropped by the CSV reader; the first surviving record is the header.
fn raw_table_from_csv(bytes: &[u8], header_skip: usize) -> Result<RawTable, IngestError> {
    let body = skip_lines(bytes, header_skip).ok_or(IngestError::MissingHeaderRow {
        skipped: header_skip,
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(body);

    let mut record = csv::StringRecord::new();
    if !reader.read_record(&mut record)? {
        return Err(IngestError::MissingHeaderRow {
            skipped: header_skip,
        });
    }
    let headers = record.iter().map(|cell| cell.to_string()).collect();

    let mut rows = Vec::new();
    let mut lines = Vec::new();
    while reader.read_record(&mut record)? {
        lines.push(header_skip + record_start_line(body, &reader, &record));
        rows.push(record.iter().map(|cell| cell.to_string()).collect());
    }

    Ok(RawTable::with_lines(headers, rows, lines))
}

/// 1-indexed line within `body` on which `record` begins.
///
/// A record's own position marks where the parser started scanning, which
/// can be a blank line it then skipped, so the line is taken from the
/// reader's position after the read instead: that sits just past the
/// record's terminator (or at end of input when the final line is
/// unterminated), and quoted fields may span lines, so embedded newlines
/// are subtracted to reach the record's first line.
fn record_start_line(
    body: &[u8],
    reader: &csv::Reader<&[u8]>,
    record: &csv::StringRecord,
) -> usize {
    let after = reader.position();
    let after_line = after.line() as usize;
    let terminated = (after.byte() as usize)
        .checked_sub(1)
        .and_then(|i| body.get(i))
        == Some(&b'\n');
    let last_line = if terminated { after_line - 1 } else { after_line };
    let embedded: usize = record
        .iter()
        .map(|field| field.matches('\n').count())
        .sum();
    last_line - embedded
}

/// Advance past `count` newline-terminated lines. `None` when the input has
/// fewer lines than that.
fn skip_lines(bytes: &[u8], count: usize) -> Option<&[u8]> {
    let mut rest = bytes;
    for _ in 0..count {
        let newline = rest.iter().position(|b| *b == b'\n')?;
        rest = &rest[newline + 1..];
    }
    Some(rest)
}

fn raw_table_from_xlsx(bytes: &[u8], header_skip: usize) -> Result<RawTable, IngestError> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(IngestError::MissingWorksheet)??;
    raw_table_from_range(&range, header_skip)
}

/// Reduce a worksheet range to the shared raw-table shape. Public so tests
/// and embedders can feed ranges from already-open workbooks.
pub fn raw_table_from_range(
    range: &Range<Data>,
    header_skip: usize,
) -> Result<RawTable, IngestError> {
    let mut rows_iter = range.rows().skip(header_skip);
    let headers = match rows_iter.next() {
        Some(row) => row.iter().map(cell_to_string).collect(),
        None => {
            return Err(IngestError::MissingHeaderRow {
                skipped: header_skip,
            })
        }
    };
    let rows = rows_iter
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect();

    Ok(RawTable::new(headers, rows, header_skip))
}

fn cell_to_string(cell: &Data) -> String {
    cell.as_string()
        .map(|s| s.to_string())
        .unwrap_or_else(|| cell.to_string())
}

/// Detect columns, clean every row, then drop rows whose serial-number cell
/// does not read as a number (the trailing "Total" / "Final Sales" lines
/// spreadsheets append).
///
/// Amounts are cleaned for every parsed row, including rows about to be
/// dropped, so a malformed amount anywhere in the table is an error rather
/// than silently vanishing with its row.
pub fn normalize_table(table: RawTable) -> Result<Vec<BillingRecord>, IngestError> {
    let map = detect_columns(&table.headers)?;

    let mut records = Vec::with_capacity(table.rows.len());
    let mut dropped = 0usize;
    for (offset, row) in table.rows.iter().enumerate() {
        let sr_no = cell_at(row, map.sr_no);
        let month = cell_at(row, map.month);
        let amount = clean_amount(cell_at(row, map.amount), table.source_line(offset))?;

        if !reads_as_number(sr_no) {
            dropped += 1;
            continue;
        }

        records.push(BillingRecord::new(sr_no, month, amount));
    }

    info!(kept = records.len(), dropped, "Normalized billing table");
    Ok(records)
}

/// Short rows happen with flexible CSV input; a missing cell reads as empty.
fn cell_at(row: &[String], index: usize) -> &str {
    row.get(index).map(String::as_str).unwrap_or_default()
}

/// Strip thousands separators and parse the remainder. Empty and
/// not-a-number cells read as missing; any other non-numeric text aborts
/// the run with the offending line and value.
fn clean_amount(text: &str, line: usize) -> Result<Option<f64>, IngestError> {
    let cleaned: String = text.chars().filter(|c| *c != ',').collect();
    let trimmed = cleaned.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_nan() => Ok(None),
        Ok(value) => Ok(Some(value)),
        Err(_) => Err(IngestError::AmountParse {
            line,
            value: text.to_string(),
        }),
    }
}

/// Row-keeping predicate for the serial-number cell: `"7"`, `" 7 "` and
/// `"7.0"` qualify, labels and explicit not-a-number text do not.
fn reads_as_number(text: &str) -> bool {
    match text.trim().parse::<f64>() {
        Ok(value) => !value.is_nan(),
        Err(_) => false,
    }
}
