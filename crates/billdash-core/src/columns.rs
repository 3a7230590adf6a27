//! Header normalization and fuzzy column detection.
//!
//! Real billing spreadsheets never agree on header spelling ("Sr No.",
//! "SR NO", "Srno"), so the three columns the pipeline needs are located by
//! substring match over normalized headers rather than by exact name.

use std::fmt;

use crate::errors::IngestError;

/// The three columns every billing table must provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemanticField {
    SrNo,
    Month,
    Amount,
}

impl SemanticField {
    /// Detection runs in this order and stops at the first field with no
    /// matching header.
    pub const DETECTION_ORDER: [SemanticField; 3] = [
        SemanticField::SrNo,
        SemanticField::Month,
        SemanticField::Amount,
    ];

    /// Substring searched for in normalized headers.
    pub fn keyword(&self) -> &'static str {
        match self {
            SemanticField::SrNo => "sr",
            SemanticField::Month => "month",
            SemanticField::Amount => "amount",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SemanticField::SrNo => "SrNo",
            SemanticField::Month => "Month",
            SemanticField::Amount => "Amount",
        }
    }
}

impl fmt::Display for SemanticField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Resolved zero-based column indices. Two fields may share an index when a
/// single header happens to contain both keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub sr_no: usize,
    pub month: usize,
    pub amount: usize,
}

/// Lowercase a header and strip everything that is not alphanumeric.
/// Idempotent, so already-normalized headers pass through unchanged.
pub fn normalize_header(header: &str) -> String {
    header
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect()
}

/// Index of the first normalized header containing the field's keyword.
pub fn find_column(normalized_headers: &[String], field: SemanticField) -> Option<usize> {
    let keyword = field.keyword();
    normalized_headers
        .iter()
        .position(|header| header.contains(keyword))
}

/// Locate all three billing columns or fail on the first field that has no
/// matching header.
pub fn detect_columns(headers: &[String]) -> Result<ColumnMap, IngestError> {
    let normalized: Vec<String> = headers.iter().map(|h| normalize_header(h)).collect();

    let mut resolved = [0usize; 3];
    for (slot, field) in SemanticField::DETECTION_ORDER.iter().enumerate() {
        match find_column(&normalized, *field) {
            Some(index) => resolved[slot] = index,
            None => {
                return Err(IngestError::ColumnDetection {
                    field: *field,
                    keyword: field.keyword(),
                    headers: normalized,
                })
            }
        }
    }

    Ok(ColumnMap {
        sr_no: resolved[0],
        month: resolved[1],
        amount: resolved[2],
    })
}
