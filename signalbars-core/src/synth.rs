//! Synthetic trade events around a price path.
//!
//! Lets a generated path go through the same candle aggregation as real
//! signals: each point becomes a handful of jittered "trades" at the point's
//! price.

use chrono::Duration;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{Event, PricePoint};
use crate::walk::MAX_DECIMALS;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthConfig {
    /// Fewest trades per point (default 3).
    pub trades_min: usize,
    /// Most trades per point, inclusive (default 6).
    pub trades_max: usize,
    pub volume_min: f64,
    pub volume_max: f64,
    pub volume_decimals: u32,
    /// Wallet stamped on every synthetic event (default `"pred"`).
    pub wallet: String,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            trades_min: 3,
            trades_max: 6,
            volume_min: 10.0,
            volume_max: 100.0,
            volume_decimals: 2,
            wallet: "pred".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SynthError {
    #[error("trade count range {min}..={max} is invalid (need 1 <= min <= max)")]
    InvalidTradeRange { min: usize, max: usize },

    #[error("volume range {min}..={max} is invalid (need 0 <= min <= max, finite)")]
    InvalidVolumeRange { min: f64, max: f64 },

    #[error("volume decimals must be at most {MAX_DECIMALS}, got {0}")]
    InvalidVolumeDecimals(u32),
}

/// Expand each path point into `trades_min..=trades_max` events.
///
/// Every event keeps the point's price, sits within `gap_minutes / 2` of the
/// point's time, and carries a random volume rounded to `volume_decimals`.
/// Jitter can reorder neighbouring points, so the result is sorted by time.
pub fn synthesize_events<R: Rng + ?Sized>(
    path: &[PricePoint],
    gap_minutes: u32,
    config: &SynthConfig,
    rng: &mut R,
) -> Result<Vec<Event>, SynthError> {
    if config.trades_min == 0 || config.trades_min > config.trades_max {
        return Err(SynthError::InvalidTradeRange {
            min: config.trades_min,
            max: config.trades_max,
        });
    }
    let volume_ok = config.volume_min.is_finite()
        && config.volume_max.is_finite()
        && config.volume_min >= 0.0
        && config.volume_min <= config.volume_max;
    if !volume_ok {
        return Err(SynthError::InvalidVolumeRange {
            min: config.volume_min,
            max: config.volume_max,
        });
    }

    if config.volume_decimals > MAX_DECIMALS {
        return Err(SynthError::InvalidVolumeDecimals(config.volume_decimals));
    }

    let half_gap_ms = i64::from(gap_minutes) * 60_000 / 2;
    let scale = 10f64.powi(config.volume_decimals as i32);
    let mut events = Vec::with_capacity(path.len() * config.trades_max);

    for point in path {
        let trades = rng.gen_range(config.trades_min..=config.trades_max);
        for _ in 0..trades {
            let jitter = rng.gen_range(-half_gap_ms..=half_gap_ms);
            let volume = rng.gen_range(config.volume_min..=config.volume_max);
            let time = point
                .time
                .checked_add_signed(Duration::milliseconds(jitter))
                .unwrap_or(point.time);
            events.push(
                Event::new(time, config.wallet.clone())
                    .with_price(point.price)
                    .with_volume((volume * scale).round() / scale),
            );
        }
    }

    events.sort_by_key(|e| e.time);
    Ok(events)
}
