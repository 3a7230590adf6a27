//! Pure derivation of everything the dashboard shows.
//!
//! Filtering, the summary figures and both chart series are recomputed from
//! scratch on every call; nothing here caches or mutates shared state, so a
//! changed month selection or credit note is just another call.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::model::BillingRecord;

/// Credit note applied when the caller does not supply one.
pub const DEFAULT_CREDIT_NOTE: f64 = 2_756_778.0;

/// Months included in the displayed aggregates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MonthSelection {
    /// Every month observed in the normalized table.
    #[default]
    All,
    /// An explicit subset. The empty set is valid and yields an empty view.
    Only(BTreeSet<String>),
}

impl MonthSelection {
    pub fn only<I, S>(months: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        MonthSelection::Only(months.into_iter().map(Into::into).collect())
    }

    pub fn contains(&self, month: &str) -> bool {
        match self {
            MonthSelection::All => true,
            MonthSelection::Only(set) => set.contains(month),
        }
    }
}

/// Distinct month labels in first-occurrence order. Drives the month picker
/// and stays stable across repeated calls on the same records.
pub fn month_universe(records: &[BillingRecord]) -> Vec<String> {
    let mut order: Vec<String> = Vec::new();
    for record in records {
        if !order.iter().any(|month| month == &record.month) {
            order.push(record.month.clone());
        }
    }
    order
}

/// The three headline figures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SummaryMetrics {
    pub total_sales: f64,
    pub credit_note: f64,
    pub final_sales: f64,
}

impl SummaryMetrics {
    /// Missing amounts contribute nothing; an empty slice sums to zero, so
    /// final sales can legitimately go negative.
    pub fn compute(records: &[BillingRecord], credit_note: f64) -> Self {
        let total_sales: f64 = records.iter().filter_map(|record| record.amount).sum();
        Self {
            total_sales,
            credit_note,
            final_sales: total_sales - credit_note,
        }
    }
}

/// Bar color relative to the largest amount in the filtered set: under half
/// the maximum is Low, under 80% is Mid, the rest High.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorTier {
    Low,
    Mid,
    High,
}

impl ColorTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorTier::Low => "low",
            ColorTier::Mid => "mid",
            ColorTier::High => "high",
        }
    }

    /// Classify one bar against the current filtered maximum. A bar equal to
    /// exactly 80% of the maximum already counts as High.
    pub fn classify(amount: f64, max: f64) -> ColorTier {
        if amount < max * 0.5 {
            ColorTier::Low
        } else if amount < max * 0.8 {
            ColorTier::Mid
        } else {
            ColorTier::High
        }
    }
}

impl std::fmt::Display for ColorTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One bar of the month-wise chart. Rows are charted individually; repeated
/// month labels produce repeated bars, never a merged one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartBar {
    pub month: String,
    pub amount: Option<f64>,
    /// `None` when the bar itself has no amount.
    pub tier: Option<ColorTier>,
}

/// One point of the sales trend line, in filtered row order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub month: String,
    pub amount: Option<f64>,
}

/// Everything a rendering surface needs for one state of the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewModel {
    /// Records surviving the month filter, in original order.
    pub records: Vec<BillingRecord>,
    /// Full month universe of the input, independent of the filter.
    pub months: Vec<String>,
    pub metrics: SummaryMetrics,
    pub bars: Vec<ChartBar>,
    pub trend: Vec<TrendPoint>,
}

/// Derive the complete view for one selection and credit note.
///
/// The tier scale follows the filtered maximum, so narrowing the selection
/// re-colors the remaining bars.
pub fn compute_view(
    records: &[BillingRecord],
    selection: &MonthSelection,
    credit_note: f64,
) -> ViewModel {
    let months = month_universe(records);

    let filtered: Vec<BillingRecord> = records
        .iter()
        .filter(|record| selection.contains(&record.month))
        .cloned()
        .collect();

    let metrics = SummaryMetrics::compute(&filtered, credit_note);

    let mut max_amount: Option<f64> = None;
    for value in filtered.iter().filter_map(|record| record.amount) {
        max_amount = Some(match max_amount {
            Some(current) => current.max(value),
            None => value,
        });
    }

    let bars = filtered
        .iter()
        .map(|record| ChartBar {
            month: record.month.clone(),
            amount: record.amount,
            tier: match (record.amount, max_amount) {
                (Some(amount), Some(max)) => Some(ColorTier::classify(amount, max)),
                _ => None,
            },
        })
        .collect();

    let trend = filtered
        .iter()
        .map(|record| TrendPoint {
            month: record.month.clone(),
            amount: record.amount,
        })
        .collect();

    ViewModel {
        records: filtered,
        months,
        metrics,
        bars,
        trend,
    }
}
