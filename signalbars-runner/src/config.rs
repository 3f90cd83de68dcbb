//! Pipeline configuration loaded from TOML.
//!
//! Every section is optional; a missing section takes its defaults.
//!
//! ```toml
//! default_interval = "15m"
//! seed = 42
//!
//! [curve]
//! step_pct = 0.5
//!
//! [walk]
//! vol_pct = 3.0
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use signalbars_core::{CurveConfig, Interval, ParseConfig, SynthConfig, WalkConfig};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Candle interval when a chart job names none (default 30m).
    pub default_interval: Interval,
    /// Master seed for the walk and synthesizer. Absent means a fresh seed
    /// per run, recorded in the report.
    pub seed: Option<u64>,
    pub parse: ParseConfig,
    pub curve: CurveConfig,
    pub walk: WalkConfig,
    pub synth: SynthConfig,
}

impl PipelineConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
