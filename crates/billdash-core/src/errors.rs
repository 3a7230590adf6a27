use thiserror::Error;

use crate::columns::SemanticField;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("unsupported file extension '{extension}': expected .csv or .xlsx")]
    UnsupportedExtension { extension: String },

    #[error("CSV error: {source}")]
    Csv {
        #[from]
        source: csv::Error,
    },

    #[error("workbook error: {source}")]
    Workbook {
        #[from]
        source: calamine::XlsxError,
    },

    #[error("workbook contains no readable worksheet")]
    MissingWorksheet,

    #[error("file ended before the header row (expected {skipped} preamble rows above it)")]
    MissingHeaderRow { skipped: usize },

    #[error(
        "could not detect the {field} column: no header contains '{keyword}' \
         (normalized headers: {headers:?})"
    )]
    ColumnDetection {
        field: SemanticField,
        keyword: &'static str,
        headers: Vec<String>,
    },

    #[error("line {line}: amount '{value}' is not numeric after removing thousands separators")]
    AmountParse { line: usize, value: String },
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV serialization failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to flush CSV buffer: {0}")]
    Io(#[from] std::io::Error),
}
