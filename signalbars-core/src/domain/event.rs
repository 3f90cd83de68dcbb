//! Event: one normalized trading signal.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Wallet assigned to events whose origin is not known (e.g. free text).
pub const UNKNOWN_WALLET: &str = "unknown";

/// Trade direction of a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Buy,
    Sell,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Buy => "buy",
            Operation::Sell => "sell",
        }
    }

    /// +1.0 for buy, -1.0 for sell.
    pub fn direction(&self) -> f64 {
        match self {
            Operation::Buy => 1.0,
            Operation::Sell => -1.0,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown operation '{0}' (expected buy or sell)")]
pub struct UnknownOperation(pub String);

impl FromStr for Operation {
    type Err = UnknownOperation;

    /// Case-insensitive, surrounding whitespace ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("buy") {
            Ok(Operation::Buy)
        } else if trimmed.eq_ignore_ascii_case("sell") {
            Ok(Operation::Sell)
        } else {
            Err(UnknownOperation(trimmed.to_string()))
        }
    }
}

/// One row of the canonical event table.
///
/// `time` is always a valid instant: rows that fail timestamp parsing never
/// become events. Every other field except `wallet` may be absent depending
/// on where the event came from (free text has no volume or balance, a
/// synthesized path has no operation).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(with = "super::time_format")]
    pub time: NaiveDateTime,
    pub wallet: String,
    pub operation: Option<Operation>,
    pub pct: Option<f64>,
    #[serde(rename = "volume_$")]
    pub volume: Option<f64>,
    #[serde(rename = "balance_$")]
    pub balance: Option<f64>,
    pub price: Option<f64>,
}

impl Event {
    /// Bare event with every optional field absent.
    pub fn new(time: NaiveDateTime, wallet: impl Into<String>) -> Self {
        Self {
            time,
            wallet: wallet.into(),
            operation: None,
            pct: None,
            volume: None,
            balance: None,
            price: None,
        }
    }

    pub fn with_operation(mut self, operation: Operation) -> Self {
        self.operation = Some(operation);
        self
    }

    pub fn with_pct(mut self, pct: f64) -> Self {
        self.pct = Some(pct);
        self
    }

    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = Some(volume);
        self
    }

    pub fn with_balance(mut self, balance: f64) -> Self {
        self.balance = Some(balance);
        self
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn has_price(&self) -> bool {
        self.price.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn operation_parses_case_insensitively() {
        assert_eq!("BUY".parse::<Operation>().unwrap(), Operation::Buy);
        assert_eq!(" Sell ".parse::<Operation>().unwrap(), Operation::Sell);
        assert!("hold".parse::<Operation>().is_err());
    }

    #[test]
    fn operation_direction_sign() {
        assert_eq!(Operation::Buy.direction(), 1.0);
        assert_eq!(Operation::Sell.direction(), -1.0);
    }

    #[test]
    fn builder_sets_fields() {
        let e = Event::new(at(10, 0), "w1")
            .with_operation(Operation::Sell)
            .with_pct(3.0)
            .with_price(0.02);
        assert_eq!(e.wallet, "w1");
        assert_eq!(e.operation, Some(Operation::Sell));
        assert_eq!(e.pct, Some(3.0));
        assert!(e.has_price());
        assert!(e.volume.is_none());
    }

    #[test]
    fn event_serializes_with_dollar_columns() {
        let e = Event::new(at(10, 5), UNKNOWN_WALLET).with_volume(12.5);
        let json = serde_json::to_string(&e).unwrap();
        assert!(json.contains("\"volume_$\":12.5"));
        assert!(json.contains("\"balance_$\":null"));
        assert!(json.contains("\"time\":\"2024-01-01 10:05:00\""));

        let back: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(back, e);
    }
}
