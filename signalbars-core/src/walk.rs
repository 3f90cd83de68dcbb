//! Bounded random-walk price paths.

use chrono::{Duration, NaiveDateTime};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::PricePoint;

/// Most decimal places an `f64` price can meaningfully carry.
pub const MAX_DECIMALS: u32 = 15;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkConfig {
    /// Maximum absolute percentage move per step (default 2.0).
    pub vol_pct: f64,
    /// Strictly positive lower bound applied after every step (default 1e-7).
    pub price_floor: f64,
    /// Decimal places kept in the output (default 6).
    pub decimals: u32,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            vol_pct: 2.0,
            price_floor: 1e-7,
            decimals: 6,
        }
    }
}

/// What to generate: price anchor, time span, and resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct WalkParams {
    pub start_price: f64,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub points: usize,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WalkError {
    #[error("at least one point is required")]
    NoPoints,

    #[error("end time {end} is before start time {start}")]
    InvalidSpan {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    #[error("start price must be positive and finite, got {0}")]
    InvalidStartPrice(f64),

    #[error("volatility must be non-negative and finite, got {0}")]
    InvalidVolatility(f64),

    #[error("decimals must be at most {MAX_DECIMALS}, got {0}")]
    InvalidDecimals(u32),

    #[error("price floor must be positive and finite, got {0}")]
    InvalidFloor(f64),
}

/// Generate `points` samples evenly spaced from `start_time` to `end_time`
/// inclusive.
///
/// The first price is `start_price`; each later price is the previous one
/// moved by a uniform draw in `[-vol_pct, vol_pct]` percent, floored at
/// `price_floor`. The walk runs at full precision and only the output is
/// rounded. Rounding never produces a non-positive price: values below one
/// display unit are clamped to that unit.
pub fn generate_random_walk<R: Rng + ?Sized>(
    params: &WalkParams,
    config: &WalkConfig,
    rng: &mut R,
) -> Result<Vec<PricePoint>, WalkError> {
    validate(params, config)?;

    let times = evenly_spaced(params.start_time, params.end_time, params.points);
    let mut price = params.start_price;
    let mut path = Vec::with_capacity(params.points);

    for (i, time) in times.into_iter().enumerate() {
        if i > 0 {
            let step = rng.gen_range(-config.vol_pct..=config.vol_pct) / 100.0;
            price = (price * (1.0 + step)).clamp(config.price_floor, f64::MAX);
        }
        path.push(PricePoint::new(time, round_positive(price, config.decimals)));
    }

    Ok(path)
}

fn validate(params: &WalkParams, config: &WalkConfig) -> Result<(), WalkError> {
    if params.points == 0 {
        return Err(WalkError::NoPoints);
    }
    if params.end_time < params.start_time {
        return Err(WalkError::InvalidSpan {
            start: params.start_time,
            end: params.end_time,
        });
    }
    if !(params.start_price.is_finite() && params.start_price > 0.0) {
        return Err(WalkError::InvalidStartPrice(params.start_price));
    }
    // The step range is 2 * vol_pct wide and must stay finite.
    if !(config.vol_pct >= 0.0 && (2.0 * config.vol_pct).is_finite()) {
        return Err(WalkError::InvalidVolatility(config.vol_pct));
    }
    if config.decimals > MAX_DECIMALS {
        return Err(WalkError::InvalidDecimals(config.decimals));
    }
    if !(config.price_floor.is_finite() && config.price_floor > 0.0) {
        return Err(WalkError::InvalidFloor(config.price_floor));
    }
    Ok(())
}

/// `points` timestamps from `start` to `end` inclusive, at millisecond
/// resolution. A single point sits at `start`.
pub fn evenly_spaced(start: NaiveDateTime, end: NaiveDateTime, points: usize) -> Vec<NaiveDateTime> {
    if points <= 1 {
        return if points == 1 { vec![start] } else { Vec::new() };
    }
    let span_ms = i128::from((end - start).num_milliseconds());
    let last = (points - 1) as i128;
    (0..points)
        .map(|i| {
            let offset = span_ms * i as i128 / last;
            start + Duration::milliseconds(offset as i64)
        })
        .collect()
}

/// `decimals` is at most [`MAX_DECIMALS`]. Values too large to scale are
/// returned unrounded.
fn round_positive(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    let rounded = (value * scale).round() / scale;
    if !rounded.is_finite() {
        return value;
    }
    rounded.max(1.0 / scale)
}
