//! Column contract for tabular signal files.

use thiserror::Error;

/// Columns every signal file must carry, in canonical order.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "time",
    "wallet",
    "operation",
    "pct",
    "volume_$",
    "balance_$",
    "price",
];

/// Required columns absent from a file header.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("missing required columns: {}", .missing.join(", "))]
pub struct SchemaError {
    /// Missing names in canonical column order.
    pub missing: Vec<String>,
}

/// Trim, lowercase, and replace spaces with underscores.
pub fn normalize_header(header: &str) -> String {
    header
        .trim_start_matches('\u{feff}')
        .trim()
        .to_lowercase()
        .replace(' ', "_")
}

/// Positions of the required columns within a header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub time: usize,
    pub wallet: usize,
    pub operation: usize,
    pub pct: usize,
    pub volume: usize,
    pub balance: usize,
    pub price: usize,
}

impl ColumnMap {
    /// Resolve required columns from raw (un-normalized) headers.
    ///
    /// Extra columns are ignored. When two headers normalize to the same
    /// name, the first one wins.
    pub fn resolve<S: AsRef<str>>(headers: &[S]) -> Result<Self, SchemaError> {
        let normalized: Vec<String> = headers.iter().map(|h| normalize_header(h.as_ref())).collect();
        let positions = REQUIRED_COLUMNS.map(|name| normalized.iter().position(|h| h == name));

        match positions {
            [Some(time), Some(wallet), Some(operation), Some(pct), Some(volume), Some(balance), Some(price)] => {
                Ok(Self {
                    time,
                    wallet,
                    operation,
                    pct,
                    volume,
                    balance,
                    price,
                })
            }
            _ => Err(SchemaError {
                missing: REQUIRED_COLUMNS
                    .iter()
                    .zip(positions)
                    .filter(|(_, position)| position.is_none())
                    .map(|(name, _)| name.to_string())
                    .collect(),
            }),
        }
    }
}
