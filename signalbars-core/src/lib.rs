//! signalbars core: turn irregular trading signals into regular candles.
//!
//! - Domain types (events, candles, intervals, price points)
//! - Signal parsing from free text and from CSV/spreadsheet files
//! - Price curve synthesis from buy/sell direction when prices are absent
//! - Epoch-aligned OHLCV aggregation with distinct-wallet counts
//! - Bounded random-walk price paths and synthetic trade events
//!
//! Every entry point is a pure function of its inputs; the two random
//! generators take the random source as an argument.

pub mod aggregate;
pub mod curve;
pub mod data;
pub mod domain;
pub mod fingerprint;
pub mod predict;
pub mod rng;
pub mod synth;
pub mod walk;

pub use aggregate::{aggregate_by_token, aggregate_to_candles};
pub use curve::{build_curve, fill_missing_prices, CurveConfig, StepMode};
pub use data::{
    load_events_from_file, load_events_from_file_with, parse_text_events, parse_text_events_with,
    LoadError, ParseConfig, ParseSkip, SchemaError, TimestampError,
};
pub use domain::{Candle, Event, Interval, InvalidIntervalError, Operation, PricePoint};
pub use fingerprint::event_table_hash;
pub use predict::{InputError, PredictRequest};
pub use rng::SeedHierarchy;
pub use synth::{synthesize_events, SynthConfig, SynthError};
pub use walk::{generate_random_walk, WalkConfig, WalkError, WalkParams};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn table_types_are_send_sync() {
        assert_send::<Event>();
        assert_sync::<Event>();
        assert_send::<Candle>();
        assert_sync::<Candle>();
        assert_send::<PricePoint>();
        assert_sync::<PricePoint>();
        assert_send::<Interval>();
        assert_sync::<Interval>();
    }

    #[test]
    fn config_types_are_send_sync() {
        assert_send::<ParseConfig>();
        assert_sync::<ParseConfig>();
        assert_send::<CurveConfig>();
        assert_sync::<CurveConfig>();
        assert_send::<WalkConfig>();
        assert_sync::<WalkConfig>();
        assert_send::<SynthConfig>();
        assert_sync::<SynthConfig>();
        assert_send::<SeedHierarchy>();
        assert_sync::<SeedHierarchy>();
    }

    #[test]
    fn error_types_are_send_sync() {
        assert_send::<LoadError>();
        assert_sync::<LoadError>();
        assert_send::<WalkError>();
        assert_sync::<WalkError>();
        assert_send::<SynthError>();
        assert_sync::<SynthError>();
    }
}
