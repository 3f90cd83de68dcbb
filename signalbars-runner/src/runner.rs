//! Job runner: wires sources, the core pipeline and reporting together.
//!
//! Three job kinds:
//! - `run_chart()`: signals → (price fill) → candles at an interval.
//! - `run_curve()`: signals → `{time, price}` line.
//! - `run_predict()`: random walk → line, or → synthetic events → candles.
//!
//! `run_batch()` runs independent chart jobs in parallel.

use chrono::NaiveDateTime;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use signalbars_core::rng::{SYNTH_STREAM, WALK_STREAM};
use signalbars_core::{
    aggregate_to_candles, build_curve, event_table_hash, fill_missing_prices,
    generate_random_walk, synthesize_events, Event, InputError, Interval, LoadError,
    PredictRequest, SeedHierarchy, SynthError, WalkError,
};

use crate::config::PipelineConfig;
use crate::series::Series;
use crate::source::SignalSource;

/// Shown instead of a chart when a run produced no rows.
pub const EMPTY_MESSAGE: &str = "no data in the selected interval";

/// Current schema version for persisted reports.
pub const SCHEMA_VERSION: u32 = 1;

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("load error: {0}")]
    Load(#[from] LoadError),
    #[error("input error: {0}")]
    Input(#[from] InputError),
    #[error("walk error: {0}")]
    Walk(#[from] WalkError),
    #[error("synthesis error: {0}")]
    Synth(#[from] SynthError),
    #[error("start price must be positive and finite, got {0}")]
    InvalidStartPrice(f64),
}

/// Outcome of one job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Schema version for forward-compatible deserialization.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    /// Human-readable origin of the data.
    pub source: String,
    /// Candle interval, for candle series.
    pub interval: Option<Interval>,
    /// Rows in the canonical event table that fed the series.
    pub event_count: usize,
    /// BLAKE3 fingerprint of that event table.
    pub dataset_hash: String,
    /// Master seed, for generated data.
    pub seed: Option<u64>,
    pub series: Series,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

impl RunReport {
    fn new(
        source: String,
        interval: Option<Interval>,
        events: &[Event],
        seed: Option<u64>,
        series: Series,
    ) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            source,
            interval,
            event_count: events.len(),
            dataset_hash: event_table_hash(events),
            seed,
            series,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// Candles from a signal source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartJob {
    pub source: SignalSource,
    /// Falls back to the configured default interval.
    pub interval: Option<Interval>,
    /// When set and no event carries a price, prices are synthesized from
    /// buy/sell steps starting here.
    pub start_price: Option<f64>,
}

/// A price line from a signal source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveJob {
    pub source: SignalSource,
    pub start_price: f64,
}

/// A generated price path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictJob {
    pub request: PredictRequest,
    pub start_time: NaiveDateTime,
    /// Aggregate synthetic trades at this interval instead of returning the
    /// raw line.
    pub candles: Option<Interval>,
}

fn check_start_price(price: f64) -> Result<(), RunError> {
    if price.is_finite() && price > 0.0 {
        Ok(())
    } else {
        Err(RunError::InvalidStartPrice(price))
    }
}

pub fn run_chart(job: &ChartJob, config: &PipelineConfig) -> Result<RunReport, RunError> {
    let interval = job.interval.unwrap_or(config.default_interval);
    let mut events = job.source.load(&config.parse)?;

    if let Some(start_price) = job.start_price {
        check_start_price(start_price)?;
        events = fill_missing_prices(&events, start_price, &config.curve);
    }

    let candles = aggregate_to_candles(&events, interval);
    info!(
        source = %job.source,
        events = events.len(),
        candles = candles.len(),
        %interval,
        "chart job finished"
    );
    Ok(RunReport::new(
        job.source.to_string(),
        Some(interval),
        &events,
        None,
        Series::Candles(candles),
    ))
}

pub fn run_curve(job: &CurveJob, config: &PipelineConfig) -> Result<RunReport, RunError> {
    check_start_price(job.start_price)?;
    let events = job.source.load(&config.parse)?;
    let curve = build_curve(&events, job.start_price, &config.curve);
    info!(source = %job.source, events = events.len(), points = curve.len(), "curve job finished");
    Ok(RunReport::new(
        job.source.to_string(),
        None,
        &events,
        None,
        Series::Line(curve),
    ))
}

/// Generate a path, optionally aggregated into candles.
///
/// Without a configured seed a fresh master seed is drawn and recorded in
/// the report, so any run can be replayed.
pub fn run_predict(job: &PredictJob, config: &PipelineConfig) -> Result<RunReport, RunError> {
    let master_seed = config
        .seed
        .unwrap_or_else(|| StdRng::from_entropy().gen());
    let seeds = SeedHierarchy::new(master_seed);

    let params = job.request.walk_params(job.start_time)?;
    let walk_config = job.request.walk_config(&config.walk);
    let path = generate_random_walk(&params, &walk_config, &mut seeds.rng_for(WALK_STREAM))?;
    let source = format!(
        "random walk ({} points, {} min, {}%)",
        job.request.points, job.request.gap_minutes, job.request.vol_pct
    );

    let report = match job.candles {
        None => RunReport::new(source, None, &[], Some(master_seed), Series::Line(path)),
        Some(interval) => {
            let events = synthesize_events(
                &path,
                job.request.gap_minutes,
                &config.synth,
                &mut seeds.rng_for(SYNTH_STREAM),
            )?;
            let candles = aggregate_to_candles(&events, interval);
            RunReport::new(
                source,
                Some(interval),
                &events,
                Some(master_seed),
                Series::Candles(candles),
            )
        }
    };
    info!(
        seed = master_seed,
        rows = report.series.len(),
        kind = report.series.kind(),
        "predict job finished"
    );
    Ok(report)
}

/// Run chart jobs in parallel. Results keep job order.
pub fn run_batch(jobs: &[ChartJob], config: &PipelineConfig) -> Vec<Result<RunReport, RunError>> {
    jobs.par_iter().map(|job| run_chart(job, config)).collect()
}
