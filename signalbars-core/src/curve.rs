//! Price curve construction.
//!
//! Explicit prices always win: if any event carries a price, the curve is the
//! priced events in time order. Otherwise a running price starts at
//! `start_price` and moves one step up per buy and one step down per sell.
//!
//! The step is a flat percentage by default ([`StepMode::Flat`]), which
//! ignores each event's own `pct`. [`StepMode::EventPct`] scales each move by
//! the event's `pct` instead. Which of the two the product wants is still
//! open, so both exist and `Flat` stays the default.

use serde::{Deserialize, Serialize};

use crate::domain::{Event, PricePoint};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepMode {
    /// Every move is `step_pct`.
    #[default]
    Flat,
    /// Every move is the event's `pct`, falling back to `step_pct` when absent.
    EventPct,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveConfig {
    /// Percentage move per signal (default 1.0).
    pub step_pct: f64,
    pub step_mode: StepMode,
}

impl Default for CurveConfig {
    fn default() -> Self {
        Self {
            step_pct: 1.0,
            step_mode: StepMode::Flat,
        }
    }
}

impl CurveConfig {
    pub fn flat(step_pct: f64) -> Self {
        Self {
            step_pct,
            step_mode: StepMode::Flat,
        }
    }

    fn step_for(&self, event: &Event) -> f64 {
        match self.step_mode {
            StepMode::Flat => self.step_pct,
            StepMode::EventPct => event.pct.unwrap_or(self.step_pct),
        }
    }
}

/// Build a `{time, price}` curve from events.
///
/// Events are sorted by time (stable, so ties keep input order). Events
/// without an operation hold the running price.
pub fn build_curve(events: &[Event], start_price: f64, config: &CurveConfig) -> Vec<PricePoint> {
    fill_missing_prices(events, start_price, config)
        .into_iter()
        .filter_map(|e| e.price.map(|p| PricePoint::new(e.time, p)))
        .collect()
}

/// Return the events sorted by time with a price on every row.
///
/// When at least one event already has a price, the table is returned sorted
/// but otherwise untouched (unpriced rows stay unpriced). Otherwise every row
/// gets the synthesized running price. The result feeds the candle
/// aggregator directly, keeping wallets and volumes intact.
pub fn fill_missing_prices(events: &[Event], start_price: f64, config: &CurveConfig) -> Vec<Event> {
    let mut sorted = events.to_vec();
    sorted.sort_by_key(|e| e.time);

    if sorted.iter().any(Event::has_price) {
        return sorted;
    }

    let mut price = start_price;
    for event in &mut sorted {
        if let Some(op) = event.operation {
            price *= 1.0 + op.direction() * config.step_for(event) / 100.0;
        }
        event.price = Some(price);
    }
    sorted
}
