//! Lenient parsing of hand-typed prediction inputs.
//!
//! People type prices as `0,01`, `$1.5` or `1.5 usd`; those all mean a plain
//! number. Counts stay strict: points and gap are bare non-negative integers.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::walk::{WalkConfig, WalkParams};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("not a price: {0:?} (expected a number such as 0.01 or 1.5)")]
    Price(String),

    #[error("not a whole number of points: {0:?}")]
    Points(String),

    #[error("at least one point is required")]
    ZeroPoints,

    #[error("not a whole number of minutes: {0:?}")]
    Gap(String),

    #[error("not a volatility percentage: {0:?}")]
    Volatility(String),

    #[error("{points} points every {gap_minutes} minutes runs past the last representable date")]
    SpanTooLarge { points: usize, gap_minutes: u32 },
}

/// Parse a start price: `$` is dropped, `,` becomes `.`, and every character
/// other than digits and dots is discarded before parsing.
pub fn parse_price_input(raw: &str) -> Result<f64, InputError> {
    let cleaned: String = raw
        .trim()
        .replace(',', ".")
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
        .ok_or_else(|| InputError::Price(raw.to_string()))
}

fn parse_whole(raw: &str) -> Option<u32> {
    let t = raw.trim();
    if t.is_empty() || !t.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    t.parse().ok()
}

/// Number of points: digits only, at least 1.
pub fn parse_points_input(raw: &str) -> Result<usize, InputError> {
    match parse_whole(raw) {
        Some(0) => Err(InputError::ZeroPoints),
        Some(n) => Ok(n as usize),
        None => Err(InputError::Points(raw.to_string())),
    }
}

/// Minutes between points: digits only, zero allowed.
pub fn parse_gap_input(raw: &str) -> Result<u32, InputError> {
    parse_whole(raw).ok_or_else(|| InputError::Gap(raw.to_string()))
}

/// Volatility in percent. Blank means `default`; a decimal comma is accepted.
pub fn parse_volatility_input(raw: &str, default: f64) -> Result<f64, InputError> {
    let t = raw.trim();
    if t.is_empty() {
        return Ok(default);
    }
    t.replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|v| *v >= 0.0 && (2.0 * v).is_finite())
        .ok_or_else(|| InputError::Volatility(raw.to_string()))
}

/// A validated prediction request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictRequest {
    pub start_price: f64,
    pub points: usize,
    pub gap_minutes: u32,
    pub vol_pct: f64,
}

impl PredictRequest {
    /// Build a request from the four raw answers, in prompt order.
    pub fn from_inputs(
        price: &str,
        points: &str,
        gap_minutes: &str,
        vol_pct: &str,
    ) -> Result<Self, InputError> {
        Ok(Self {
            start_price: parse_price_input(price)?,
            points: parse_points_input(points)?,
            gap_minutes: parse_gap_input(gap_minutes)?,
            vol_pct: parse_volatility_input(vol_pct, WalkConfig::default().vol_pct)?,
        })
    }

    /// `start_time + gap × (points − 1)`, or [`InputError::SpanTooLarge`]
    /// when that lands outside the calendar.
    pub fn end_time(&self, start_time: NaiveDateTime) -> Result<NaiveDateTime, InputError> {
        i64::try_from(self.points.saturating_sub(1))
            .ok()
            .and_then(|steps| steps.checked_mul(i64::from(self.gap_minutes)))
            .and_then(Duration::try_minutes)
            .and_then(|span| start_time.checked_add_signed(span))
            .ok_or(InputError::SpanTooLarge {
                points: self.points,
                gap_minutes: self.gap_minutes,
            })
    }

    pub fn walk_params(&self, start_time: NaiveDateTime) -> Result<WalkParams, InputError> {
        Ok(WalkParams {
            start_price: self.start_price,
            start_time,
            end_time: self.end_time(start_time)?,
            points: self.points,
        })
    }

    /// `base` with this request's volatility.
    pub fn walk_config(&self, base: &WalkConfig) -> WalkConfig {
        WalkConfig {
            vol_pct: self.vol_pct,
            ..base.clone()
        }
    }
}
