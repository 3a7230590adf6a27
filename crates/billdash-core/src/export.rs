//! CSV download artifact for the cleaned, filtered table.

use crate::errors::ExportError;
use crate::model::BillingRecord;

/// File name offered for the download.
pub const EXPORT_FILE_NAME: &str = "cleaned_billing.csv";
/// MIME type of the download.
pub const EXPORT_MIME: &str = "text/csv";

/// Serialize records as UTF-8 CSV with a `SrNo,Month,Amount` header.
///
/// The header is written even for zero records. Missing amounts become
/// empty fields; month labels containing delimiters are quoted by the
/// writer.
pub fn export_csv(records: &[BillingRecord]) -> Result<Vec<u8>, ExportError> {
    let mut buffer = Vec::new();
    {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(&mut buffer);
        writer.write_record(["SrNo", "Month", "Amount"])?;
        for record in records {
            writer.serialize(record)?;
        }
        writer.flush()?;
    }
    Ok(buffer)
}
