//! Tagged pipeline output.
//!
//! The job that produced the data decides the variant. Renderers switch on
//! the tag and never inspect column shapes.

use serde::{Deserialize, Serialize};

use signalbars_core::{Candle, PricePoint};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "rows", rename_all = "snake_case")]
pub enum Series {
    /// `{time, price}` points, drawn as a line.
    Line(Vec<PricePoint>),
    /// OHLCV rows, drawn as candlesticks.
    Candles(Vec<Candle>),
}

impl Series {
    pub fn kind(&self) -> &'static str {
        match self {
            Series::Line(_) => "line",
            Series::Candles(_) => "candles",
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Series::Line(points) => points.len(),
            Series::Candles(candles) => candles.len(),
        }
    }

    /// An empty series is a valid "no data" outcome, not a failure.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
