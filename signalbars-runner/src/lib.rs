//! signalbars runner: jobs, configuration, export.
//!
//! This crate builds on `signalbars-core` to provide:
//! - TOML pipeline configuration
//! - Signal sources (pasted text or files)
//! - Chart, curve and predict jobs producing tagged series
//! - Schema-versioned JSON and CSV export
//! - Parallel batch charting

pub mod config;
pub mod export;
pub mod runner;
pub mod series;
pub mod source;

pub use config::{ConfigError, PipelineConfig};
pub use export::{
    export_candles_csv, export_json, export_line_csv, export_series_csv, import_json,
    load_artifacts, save_artifacts,
};
pub use runner::{
    run_batch, run_chart, run_curve, run_predict, ChartJob, CurveJob, PredictJob, RunError,
    RunReport, EMPTY_MESSAGE, SCHEMA_VERSION,
};
pub use series::Series;
pub use source::SignalSource;
