//! A single (time, price) sample of a line series.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    #[serde(with = "super::time_format")]
    pub time: NaiveDateTime,
    pub price: f64,
}

impl PricePoint {
    pub fn new(time: NaiveDateTime, price: f64) -> Self {
        Self { time, price }
    }
}
