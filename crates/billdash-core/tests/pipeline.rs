use billdash_core::{
    compute_view_from_bytes, ColorTier, IngestError, MonthSelection, SourceFormat,
    DEFAULT_CREDIT_NOTE, DEFAULT_HEADER_SKIP,
};

fn fixture(name: &str) -> String {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/data")
        .join(name);
    std::fs::read_to_string(path).expect("read fixture")
}

fn fixture_bytes(name: &str) -> Vec<u8> {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/data")
        .join(name);
    std::fs::read(path).expect("read fixture")
}

#[test]
fn upload_bytes_flow_straight_through_to_the_view() {
    let bytes = fixture_bytes("billing_2025.csv");
    let view = compute_view_from_bytes(
        &bytes,
        SourceFormat::Csv,
        DEFAULT_HEADER_SKIP,
        &MonthSelection::All,
        500.0,
    )
    .expect("ingest fixture");

    assert_eq!(view.records.len(), 3);
    assert_eq!(view.months, ["Apr", "May"]);
    assert_eq!(view.metrics.total_sales, 3_500.0);
    assert_eq!(view.metrics.final_sales, 3_000.0);

    let tiers: Vec<_> = view.bars.iter().map(|bar| bar.tier).collect();
    assert_eq!(
        tiers,
        [
            Some(ColorTier::Mid),
            Some(ColorTier::High),
            Some(ColorTier::Low)
        ]
    );
    assert_eq!(view.trend.len(), 3);
}

#[test]
fn month_selection_narrows_the_view_from_the_same_bytes() {
    let bytes = fixture_bytes("billing_2025.csv");
    let view = compute_view_from_bytes(
        &bytes,
        SourceFormat::Csv,
        DEFAULT_HEADER_SKIP,
        &MonthSelection::only(["Apr"]),
        0.0,
    )
    .expect("ingest fixture");

    assert_eq!(view.records.len(), 2);
    assert_eq!(view.metrics.total_sales, 1_500.0);
    // The month picker still offers everything the file contains.
    assert_eq!(view.months, ["Apr", "May"]);
}

#[test]
fn csv_and_xlsx_uploads_produce_identical_views() {
    let csv = fixture_bytes("billing_2025.csv");
    let xlsx = fixture_bytes("billing_2025.xlsx");

    let from_csv = compute_view_from_bytes(
        &csv,
        SourceFormat::Csv,
        DEFAULT_HEADER_SKIP,
        &MonthSelection::All,
        DEFAULT_CREDIT_NOTE,
    )
    .expect("ingest csv");
    let from_xlsx = compute_view_from_bytes(
        &xlsx,
        SourceFormat::Xlsx,
        DEFAULT_HEADER_SKIP,
        &MonthSelection::All,
        DEFAULT_CREDIT_NOTE,
    )
    .expect("ingest workbook");

    assert_eq!(from_csv, from_xlsx);
    assert_eq!(from_xlsx.records.len(), 3);
}

#[test]
fn malformed_amounts_surface_through_the_entry_point() {
    let data = fixture("billing_2025.csv").replacen("3,Apr,500", "3,Apr,refer note", 1);
    let err = compute_view_from_bytes(
        data.as_bytes(),
        SourceFormat::Csv,
        DEFAULT_HEADER_SKIP,
        &MonthSelection::All,
        DEFAULT_CREDIT_NOTE,
    )
    .expect_err("malformed amount must fail");

    match err {
        IngestError::AmountParse { line, value } => {
            assert_eq!(line, 9);
            assert_eq!(value, "refer note");
        }
        other => panic!("expected AmountParse, got {other:?}"),
    }
}

#[test]
fn garbage_bytes_with_a_workbook_extension_fail_cleanly() {
    let err = compute_view_from_bytes(
        b"not a zip archive",
        SourceFormat::Xlsx,
        DEFAULT_HEADER_SKIP,
        &MonthSelection::All,
        DEFAULT_CREDIT_NOTE,
    )
    .expect_err("junk workbook must fail");

    assert!(matches!(err, IngestError::Workbook { .. }));
}
