use serde::Serialize;

/// One cleaned billing row.
///
/// Field names serialize to the canonical `SrNo` / `Month` / `Amount`
/// columns shared by the CSV export and the JSON view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BillingRecord {
    /// Serial number as it appeared in the sheet. Kept as text; rows only
    /// survive ingestion if this reads as a number, but "2" and "2.0" are
    /// preserved verbatim.
    #[serde(rename = "SrNo")]
    pub sr_no: String,

    /// Month label, verbatim. Labels are opaque; "Apr" and "April" are
    /// distinct months.
    #[serde(rename = "Month")]
    pub month: String,

    /// Cleaned amount. `None` when the cell was empty or explicitly
    /// not-a-number; such rows still count toward the view but contribute
    /// nothing to sums.
    #[serde(rename = "Amount")]
    pub amount: Option<f64>,
}

impl BillingRecord {
    pub fn new(sr_no: impl Into<String>, month: impl Into<String>, amount: Option<f64>) -> Self {
        Self {
            sr_no: sr_no.into(),
            month: month.into(),
            amount,
        }
    }
}
