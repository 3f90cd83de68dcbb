//! Candle interval: the closed set of supported bucket widths.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid interval '{token}' (expected one of 5m, 15m, 30m, 4h)")]
pub struct InvalidIntervalError {
    pub token: String,
}

/// Fixed-width aggregation interval.
///
/// Buckets are aligned to the Unix epoch on the naive clock, so a bucket's
/// boundaries depend only on absolute time, never on the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Interval {
    #[serde(rename = "5m")]
    M5,
    #[serde(rename = "15m")]
    M15,
    #[default]
    #[serde(rename = "30m")]
    M30,
    #[serde(rename = "4h")]
    H4,
}

impl Interval {
    pub const ALL: [Interval; 4] = [Interval::M5, Interval::M15, Interval::M30, Interval::H4];

    pub fn token(&self) -> &'static str {
        match self {
            Interval::M5 => "5m",
            Interval::M15 => "15m",
            Interval::M30 => "30m",
            Interval::H4 => "4h",
        }
    }

    pub fn seconds(&self) -> i64 {
        match self {
            Interval::M5 => 5 * 60,
            Interval::M15 => 15 * 60,
            Interval::M30 => 30 * 60,
            Interval::H4 => 4 * 60 * 60,
        }
    }

    /// Start of the bucket containing `time`.
    pub fn bucket_start(&self, time: NaiveDateTime) -> NaiveDateTime {
        let utc = time.and_utc();
        let offset = utc.timestamp().rem_euclid(self.seconds());
        let nanos = i64::from(utc.timestamp_subsec_nanos());
        time - Duration::seconds(offset) - Duration::nanoseconds(nanos)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Interval {
    type Err = InvalidIntervalError;

    /// Exact tokens only, matching the serde names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Interval::ALL
            .into_iter()
            .find(|i| i.token() == s)
            .ok_or_else(|| InvalidIntervalError {
                token: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn t(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn parses_known_tokens() {
        assert_eq!("5m".parse::<Interval>().unwrap(), Interval::M5);
        assert_eq!("15m".parse::<Interval>().unwrap(), Interval::M15);
        assert_eq!("30m".parse::<Interval>().unwrap(), Interval::M30);
        assert_eq!("4h".parse::<Interval>().unwrap(), Interval::H4);
    }

    #[test]
    fn rejects_unknown_token() {
        let err = "1h".parse::<Interval>().unwrap_err();
        assert_eq!(err.token, "1h");
        assert!("".parse::<Interval>().is_err());
    }

    #[test]
    fn parse_is_exact_like_serde() {
        for token in ["4H", " 4h ", "30M", "5m\n"] {
            let err = token.parse::<Interval>().unwrap_err();
            assert_eq!(err.token, token);
            assert!(serde_json::from_str::<Interval>(&format!("{token:?}")).is_err());
        }
        for interval in Interval::ALL {
            assert_eq!(interval.token().parse::<Interval>().unwrap(), interval);
        }
    }

    #[test]
    fn bucket_start_is_left_closed() {
        assert_eq!(Interval::M5.bucket_start(t(10, 0, 0)), t(10, 0, 0));
        assert_eq!(Interval::M5.bucket_start(t(10, 4, 59)), t(10, 0, 0));
        assert_eq!(Interval::M5.bucket_start(t(10, 5, 0)), t(10, 5, 0));
        assert_eq!(Interval::M30.bucket_start(t(10, 47, 13)), t(10, 30, 0));
    }

    #[test]
    fn four_hour_buckets_align_to_midnight() {
        assert_eq!(Interval::H4.bucket_start(t(3, 59, 0)), t(0, 0, 0));
        assert_eq!(Interval::H4.bucket_start(t(13, 10, 0)), t(12, 0, 0));
        assert_eq!(Interval::H4.bucket_start(t(23, 59, 59)), t(20, 0, 0));
    }

    #[test]
    fn bucket_start_drops_subseconds() {
        let time = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_milli_opt(10, 7, 30, 250)
            .unwrap();
        assert_eq!(Interval::M5.bucket_start(time), t(10, 5, 0));
    }

    #[test]
    fn bucket_start_before_epoch() {
        let time = NaiveDate::from_ymd_opt(1969, 12, 31)
            .unwrap()
            .and_hms_opt(23, 58, 0)
            .unwrap();
        let expected = NaiveDate::from_ymd_opt(1969, 12, 31)
            .unwrap()
            .and_hms_opt(23, 55, 0)
            .unwrap();
        assert_eq!(Interval::M5.bucket_start(time), expected);
    }

    #[test]
    fn serde_uses_tokens() {
        assert_eq!(serde_json::to_string(&Interval::H4).unwrap(), "\"4h\"");
        let i: Interval = serde_json::from_str("\"15m\"").unwrap();
        assert_eq!(i, Interval::M15);
    }
}
