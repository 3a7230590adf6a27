pub mod columns;
pub mod errors;
pub mod export;
pub mod ingest;
pub mod model;
pub mod view;

pub use columns::{detect_columns, find_column, normalize_header, ColumnMap, SemanticField};
pub use errors::{ExportError, IngestError};
pub use export::{export_csv, EXPORT_FILE_NAME, EXPORT_MIME};
pub use ingest::{
    normalize_table, raw_table_from_range, read_records, RawTable, SourceFormat,
    DEFAULT_HEADER_SKIP,
};
pub use model::BillingRecord;
pub use view::{
    compute_view, month_universe, ChartBar, ColorTier, MonthSelection, SummaryMetrics, TrendPoint,
    ViewModel, DEFAULT_CREDIT_NOTE,
};

/// One-shot pipeline from raw upload bytes to the full view model.
pub fn compute_view_from_bytes(
    bytes: &[u8],
    format: SourceFormat,
    header_skip: usize,
    selection: &MonthSelection,
    credit_note: f64,
) -> Result<ViewModel, IngestError> {
    let records = ingest::read_records(bytes, format, header_skip)?;
    Ok(view::compute_view(&records, selection, credit_note))
}
