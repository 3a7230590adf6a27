use billdash_core::{detect_columns, find_column, normalize_header, IngestError, SemanticField};

fn headers(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|h| h.to_string()).collect()
}

#[test]
fn normalization_strips_case_and_punctuation() {
    assert_eq!(normalize_header("Sr No."), "srno");
    assert_eq!(normalize_header("BILLING MONTH"), "billingmonth");
    assert_eq!(normalize_header("Net Amount (Rs.)"), "netamountrs");
    assert_eq!(normalize_header("  amount_2025  "), "amount2025");
    assert_eq!(normalize_header(""), "");
}

#[test]
fn normalization_is_idempotent() {
    for raw in ["Sr No.", "Billing_Month", "NET AMOUNT", "remarks!!", ""] {
        let once = normalize_header(raw);
        assert_eq!(normalize_header(&once), once);
    }
}

#[test]
fn detection_picks_first_matching_header_per_field() {
    let headers = headers(&["Sr No.", "Sr Code", "Month", "Gross Amount", "Net Amount"]);
    let map = detect_columns(&headers).expect("all fields present");

    assert_eq!(map.sr_no, 0);
    assert_eq!(map.month, 2);
    assert_eq!(map.amount, 3);
}

#[test]
fn detection_matches_on_substrings_anywhere() {
    let headers = headers(&["Invoice Sr. No", "Month of Billing", "Total Amount Due"]);
    let map = detect_columns(&headers).expect("all fields present");

    assert_eq!(map.sr_no, 0);
    assert_eq!(map.month, 1);
    assert_eq!(map.amount, 2);
}

#[test]
fn one_header_may_satisfy_two_fields() {
    let headers = headers(&["Sr Amount", "Month"]);
    let map = detect_columns(&headers).expect("shared header is allowed");

    assert_eq!(map.sr_no, 0);
    assert_eq!(map.amount, 0);
    assert_eq!(map.month, 1);
}

#[test]
fn missing_field_reports_its_keyword_and_the_headers_searched() {
    let headers = headers(&["Sr No.", "Billing Month", "Value"]);
    let err = detect_columns(&headers).expect_err("amount header is absent");

    match err {
        IngestError::ColumnDetection {
            field,
            keyword,
            headers,
        } => {
            assert_eq!(field, SemanticField::Amount);
            assert_eq!(keyword, "amount");
            assert_eq!(headers, vec!["srno", "billingmonth", "value"]);
        }
        other => panic!("expected ColumnDetection, got {other:?}"),
    }
}

#[test]
fn find_column_returns_none_without_a_match() {
    let normalized = headers(&["id", "period", "amt"]);

    assert_eq!(find_column(&normalized, SemanticField::SrNo), None);
    assert_eq!(find_column(&normalized, SemanticField::Month), None);
    assert_eq!(find_column(&normalized, SemanticField::Amount), None);
}
