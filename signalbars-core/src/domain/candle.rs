//! Candle: OHLCV summary for one fixed time bucket.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One populated aggregation bucket.
///
/// Candles exist only for buckets that held at least one priced event, so
/// OHLC is never NaN. `volume` and `wallet_count` cover every event in the
/// bucket, priced or not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Bucket start (left-closed).
    #[serde(with = "super::time_format")]
    pub time: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub wallet_count: usize,
}

impl Candle {
    /// `low <= open, close <= high`, all finite.
    pub fn is_sane(&self) -> bool {
        let finite = self.open.is_finite()
            && self.high.is_finite()
            && self.low.is_finite()
            && self.close.is_finite();
        finite
            && self.low <= self.open
            && self.open <= self.high
            && self.low <= self.close
            && self.close <= self.high
    }
}
