//! Candle aggregation.
//!
//! Events are bucketed into epoch-aligned, left-closed windows of the chosen
//! interval. Within a bucket:
//! - OHLC comes from the priced events only, in time order.
//! - `volume` sums `volume_$` over every event (absent counts as zero).
//! - `wallet_count` counts distinct wallets over every event.
//!
//! A bucket without a single priced event produces no candle at all, so
//! gaps stay gaps downstream.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDateTime;
use tracing::debug;

use crate::domain::{Candle, Event, Interval, InvalidIntervalError};

#[derive(Default)]
struct Bucket<'a> {
    open: Option<f64>,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
    wallets: HashSet<&'a str>,
}

impl<'a> Bucket<'a> {
    fn push(&mut self, event: &'a Event) {
        self.wallets.insert(event.wallet.as_str());
        if let Some(v) = event.volume.filter(|v| v.is_finite()) {
            self.volume += v;
        }

        let Some(price) = event.price.filter(|p| p.is_finite()) else {
            return;
        };
        match self.open {
            None => {
                self.open = Some(price);
                self.high = price;
                self.low = price;
            }
            Some(_) => {
                self.high = self.high.max(price);
                self.low = self.low.min(price);
            }
        }
        self.close = price;
    }

    fn finish(self, time: NaiveDateTime) -> Option<Candle> {
        let open = self.open?;
        Some(Candle {
            time,
            open,
            high: self.high,
            low: self.low,
            close: self.close,
            volume: self.volume,
            wallet_count: self.wallets.len(),
        })
    }
}

/// Aggregate events into candles, one per populated bucket, ascending.
///
/// Input order does not matter; events are stably sorted by time first so
/// simultaneous events keep their input order for open/close.
pub fn aggregate_to_candles(events: &[Event], interval: Interval) -> Vec<Candle> {
    let mut ordered: Vec<&Event> = events.iter().collect();
    ordered.sort_by_key(|e| e.time);

    let mut buckets: BTreeMap<NaiveDateTime, Bucket<'_>> = BTreeMap::new();
    for event in ordered {
        buckets
            .entry(interval.bucket_start(event.time))
            .or_default()
            .push(event);
    }

    let populated = buckets.len();
    let candles: Vec<Candle> = buckets
        .into_iter()
        .filter_map(|(time, bucket)| bucket.finish(time))
        .collect();

    debug!(
        events = events.len(),
        buckets = populated,
        candles = candles.len(),
        %interval,
        "aggregated events into candles"
    );
    candles
}

/// Aggregate using an interval token such as `"15m"`.
pub fn aggregate_by_token(events: &[Event], token: &str) -> Result<Vec<Candle>, InvalidIntervalError> {
    let interval: Interval = token.parse()?;
    Ok(aggregate_to_candles(events, interval))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::parse_text_events;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn priced(h: u32, m: u32, wallet: &str, price: f64, volume: Option<f64>) -> Event {
        let mut e = Event::new(at(h, m), wallet).with_price(price);
        e.volume = volume;
        e
    }

    #[test]
    fn empty_input_gives_no_candles() {
        assert!(aggregate_to_candles(&[], Interval::M5).is_empty());
    }

    #[test]
    fn ohlc_follows_time_order_not_input_order() {
        let events = vec![
            priced(10, 4, "a", 3.0, None),
            priced(10, 0, "a", 2.0, None),
            priced(10, 2, "b", 5.0, None),
            priced(10, 3, "c", 1.0, None),
        ];
        let candles = aggregate_to_candles(&events, Interval::M5);
        assert_eq!(candles.len(), 1);
        let c = &candles[0];
        assert_eq!(c.time, at(10, 0));
        assert_eq!(c.open, 2.0);
        assert_eq!(c.high, 5.0);
        assert_eq!(c.low, 1.0);
        assert_eq!(c.close, 3.0);
        assert_eq!(c.wallet_count, 3);
    }

    #[test]
    fn volume_treats_absent_as_zero() {
        let events = vec![
            priced(10, 0, "a", 1.0, Some(10.0)),
            priced(10, 1, "a", 1.0, None),
            priced(10, 2, "a", 1.0, Some(2.5)),
        ];
        let candles = aggregate_to_candles(&events, Interval::M15);
        assert_eq!(candles[0].volume, 12.5);
        assert_eq!(candles[0].wallet_count, 1);
    }

    #[test]
    fn unpriced_bucket_is_dropped() {
        let text = "2024-01-01 10:00 buy 5 0.02\n2024-01-01 10:05 sell 3\nGARBAGE LINE\n2024-01-01 10:10 buy 2 0.021";
        let events = parse_text_events(text);
        assert_eq!(events.len(), 3);

        let candles = aggregate_to_candles(&events, Interval::M5);
        assert_eq!(candles.len(), 2);
        assert_eq!(candles[0].time, at(10, 0));
        assert_eq!(candles[0].close, 0.02);
        assert_eq!(candles[1].time, at(10, 10));
        assert_eq!(candles[1].open, 0.021);
    }

    #[test]
    fn unpriced_rows_still_count_in_surviving_bucket() {
        let mut unpriced = Event::new(at(10, 3), "ghost");
        unpriced.volume = Some(7.0);
        let events = vec![priced(10, 1, "a", 4.0, Some(1.0)), unpriced];

        let candles = aggregate_to_candles(&events, Interval::M5);
        assert_eq!(candles.len(), 1);
        assert_eq!(candles[0].volume, 8.0);
        assert_eq!(candles[0].wallet_count, 2);
        assert_eq!(candles[0].open, 4.0);
        assert_eq!(candles[0].close, 4.0);
    }

    #[test]
    fn buckets_are_epoch_aligned_not_data_aligned() {
        let events = vec![priced(10, 7, "a", 1.0, None), priced(10, 31, "a", 2.0, None)];
        let candles = aggregate_to_candles(&events, Interval::M30);
        assert_eq!(candles.len(), 2);
        assert_eq!(candles[0].time, at(10, 0));
        assert_eq!(candles[1].time, at(10, 30));
    }

    #[test]
    fn gaps_are_not_filled() {
        let events = vec![priced(0, 0, "a", 1.0, None), priced(12, 0, "a", 2.0, None)];
        let candles = aggregate_to_candles(&events, Interval::H4);
        assert_eq!(candles.len(), 2);
        assert_eq!(candles[1].time, at(12, 0));
    }

    #[test]
    fn token_entry_point_rejects_unknown_interval() {
        let events = vec![priced(10, 0, "a", 1.0, None)];
        assert_eq!(aggregate_by_token(&events, "15m").unwrap().len(), 1);
        let err = aggregate_by_token(&events, "1d").unwrap_err();
        assert_eq!(err.token, "1d");
    }
}
