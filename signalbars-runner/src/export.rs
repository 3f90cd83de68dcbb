//! Report export: JSON and CSV artifacts for renderers and other tools.
//!
//! Every JSON report carries a `schema_version`; newer versions are rejected
//! on load. Timestamps are written as `YYYY-MM-DD HH:MM:SS`.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use signalbars_core::domain::time_format::DISPLAY_FORMAT;
use signalbars_core::{Candle, PricePoint};

use crate::runner::{RunReport, SCHEMA_VERSION};
use crate::series::Series;

// ─── JSON export ────────────────────────────────────────────────────

pub fn export_json(report: &RunReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialize RunReport to JSON")
}

/// Deserialize a report, rejecting unknown schema versions.
pub fn import_json(json: &str) -> Result<RunReport> {
    let report: RunReport =
        serde_json::from_str(json).context("failed to deserialize RunReport from JSON")?;
    if report.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            report.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(report)
}

// ─── CSV export ─────────────────────────────────────────────────────

/// Columns: time, price
pub fn export_line_csv(points: &[PricePoint]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["time", "price"])?;
    for p in points {
        wtr.write_record([p.time.format(DISPLAY_FORMAT).to_string(), p.price.to_string()])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Columns: time, open, high, low, close, volume, wallet_count
pub fn export_candles_csv(candles: &[Candle]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["time", "open", "high", "low", "close", "volume", "wallet_count"])?;
    for c in candles {
        wtr.write_record([
            c.time.format(DISPLAY_FORMAT).to_string(),
            c.open.to_string(),
            c.high.to_string(),
            c.low.to_string(),
            c.close.to_string(),
            c.volume.to_string(),
            c.wallet_count.to_string(),
        ])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

pub fn export_series_csv(series: &Series) -> Result<String> {
    match series {
        Series::Line(points) => export_line_csv(points),
        Series::Candles(candles) => export_candles_csv(candles),
    }
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Write `report.json` and `{kind}.csv` into `output_dir`, creating it if
/// needed. Returns the written paths.
pub fn save_artifacts(report: &RunReport, output_dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create artifact dir: {}", output_dir.display()))?;

    let json_path = output_dir.join("report.json");
    std::fs::write(&json_path, export_json(report)?)
        .with_context(|| format!("failed to write {}", json_path.display()))?;

    let csv_path = output_dir.join(format!("{}.csv", report.series.kind()));
    std::fs::write(&csv_path, export_series_csv(&report.series)?)
        .with_context(|| format!("failed to write {}", csv_path.display()))?;

    Ok(vec![json_path, csv_path])
}

/// Load a report from an artifact directory's `report.json`.
pub fn load_artifacts(dir: &Path) -> Result<RunReport> {
    let path = dir.join("report.json");
    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    import_json(&json)
}
