//! Terminal rendering of the view model: the cleaned table, the headline
//! figures, a tier-colored bar chart and a trend sparkline.

use billdash_core::{ChartBar, ColorTier, SummaryMetrics, TrendPoint, ViewModel};
use comfy_table::presets::{NOTHING, UTF8_FULL};
use comfy_table::{Cell, Color, ContentArrangement, Table};
use num_format::{Locale, ToFormattedString};

const BAR_WIDTH: f64 = 40.0;
const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

pub fn print_view(view: &ViewModel) {
    println!("Cleaned Data");
    println!("{}", records_table(view));
    println!();
    println!("{}", metrics_table(&view.metrics));
    println!();
    println!("Month-wise Billing");
    println!("{}", bar_chart(&view.bars));
    println!();
    println!("Sales Trend");
    println!("{}", trend_line(&view.trend));
}

fn records_table(view: &ViewModel) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["SrNo", "Month", "Amount"]);
    for record in &view.records {
        table.add_row(vec![
            Cell::new(&record.sr_no),
            Cell::new(&record.month),
            Cell::new(record.amount.map(format_amount).unwrap_or_default()),
        ]);
    }
    table
}

fn metrics_table(metrics: &SummaryMetrics) -> Table {
    let mut table = Table::new();
    table.load_preset(NOTHING);
    table.add_row(vec![
        "Total Sales".to_string(),
        format_metric(metrics.total_sales),
    ]);
    table.add_row(vec![
        "Credit Note".to_string(),
        format_metric(metrics.credit_note),
    ]);
    table.add_row(vec![
        "Final Sales".to_string(),
        format_metric(metrics.final_sales),
    ]);
    table
}

fn bar_chart(bars: &[ChartBar]) -> Table {
    let max = bars
        .iter()
        .filter_map(|bar| bar.amount)
        .fold(f64::NEG_INFINITY, f64::max);

    let mut table = Table::new();
    table.load_preset(NOTHING);
    for bar in bars {
        table.add_row(vec![
            Cell::new(&bar.month),
            Cell::new(bar_blocks(bar.amount, max)).fg(tier_color(bar.tier)),
            Cell::new(bar.amount.map(format_amount).unwrap_or_default()),
        ]);
    }
    table
}

fn bar_blocks(amount: Option<f64>, max: f64) -> String {
    let value = match amount {
        Some(value) => value,
        None => return String::new(),
    };
    if max <= 0.0 || value <= 0.0 {
        return String::new();
    }
    let len = ((value / max) * BAR_WIDTH).round().max(1.0) as usize;
    "█".repeat(len.min(BAR_WIDTH as usize))
}

fn tier_color(tier: Option<ColorTier>) -> Color {
    match tier {
        Some(ColorTier::Low) => Color::Green,
        Some(ColorTier::Mid) => Color::Yellow,
        Some(ColorTier::High) => Color::Red,
        None => Color::Grey,
    }
}

fn trend_line(trend: &[TrendPoint]) -> String {
    let values: Vec<Option<f64>> = trend.iter().map(|point| point.amount).collect();
    let present: Vec<f64> = values.iter().flatten().copied().collect();
    if present.is_empty() {
        return "(no data)".to_string();
    }

    let min = present.iter().copied().fold(f64::INFINITY, f64::min);
    let max = present.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;

    let mut line = String::new();
    for value in &values {
        match value {
            Some(value) => {
                let level = if span <= 0.0 {
                    SPARK_LEVELS.len() / 2
                } else {
                    (((value - min) / span) * (SPARK_LEVELS.len() - 1) as f64).round() as usize
                };
                line.push(SPARK_LEVELS[level.min(SPARK_LEVELS.len() - 1)]);
            }
            None => line.push(' '),
        }
    }
    format!("{line}  ({} to {})", format_metric(min), format_metric(max))
}

/// Cell formatting: thousands separators, decimals kept only when present.
fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 {
        (value as i64).to_formatted_string(&Locale::en)
    } else {
        format!("{value:.2}")
    }
}

/// Headline figures are shown to the nearest whole unit.
fn format_metric(value: f64) -> String {
    (value.round() as i64).to_formatted_string(&Locale::en)
}
