//! Spreadsheet loading against real workbook files in `tests/fixtures`.
//!
//! `signals.xlsx` has two sheets. The first holds the signals with shuffled
//! columns, an extra `Note` column, a blank row, a date-formatted time cell,
//! a text time cell and a raw serial time cell. The second sheet would fail
//! the schema if it were ever picked.

use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime};
use signalbars_core::{
    aggregate_to_candles, load_events_from_file, Interval, LoadError, Operation,
};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn at(h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(h, m, 0)
        .unwrap()
}

// ── Cell mapping ─────────────────────────────────────────────────────

#[test]
fn xlsx_first_sheet_maps_to_events() {
    let events = load_events_from_file(fixture("signals.xlsx")).unwrap();
    assert_eq!(events.len(), 3, "blank row must be skipped");

    let first = &events[0];
    assert_eq!(first.time, at(10, 0));
    assert_eq!(first.wallet, "alice");
    assert_eq!(first.operation, Some(Operation::Buy));
    assert_eq!(first.pct, Some(5.0));
    assert_eq!(first.volume, Some(100.0));
    assert_eq!(first.balance, Some(1000.0));
    assert_eq!(first.price, Some(0.02));

    let second = &events[1];
    assert_eq!(second.time, at(10, 5));
    assert_eq!(second.wallet, "42");
    assert_eq!(second.operation, Some(Operation::Sell));
    assert_eq!(second.pct, Some(2.5));
    assert_eq!(second.volume, None);
    assert_eq!(second.balance, None);
    assert_eq!(second.price, Some(0.021));

    let third = &events[2];
    assert_eq!(third.time, at(10, 30));
    assert_eq!(third.wallet, "bob");
    assert_eq!(third.volume, Some(10.5));
    assert_eq!(third.price, None);
}

#[test]
fn xlsx_events_aggregate_like_csv() {
    let events = load_events_from_file(fixture("signals.xlsx")).unwrap();
    let candles = aggregate_to_candles(&events, Interval::M30);

    // 10:30 has no price, so only the 10:00 bucket produces a candle.
    assert_eq!(candles.len(), 1);
    let c = &candles[0];
    assert_eq!(c.time, at(10, 0));
    assert_eq!(c.open, 0.02);
    assert_eq!(c.close, 0.021);
    assert_eq!(c.volume, 100.0);
    assert_eq!(c.wallet_count, 2);
}

// ── Schema ───────────────────────────────────────────────────────────

#[test]
fn xlsx_missing_price_column_is_schema_error() {
    match load_events_from_file(fixture("signals_no_price.xlsx")).unwrap_err() {
        LoadError::Schema(e) => assert_eq!(e.missing, vec!["price".to_string()]),
        other => panic!("expected schema error, got {other:?}"),
    }
}
