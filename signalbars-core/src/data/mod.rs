//! Signal ingestion: free text and tabular files into the canonical event table.

pub mod decimal;
pub mod file;
pub mod schema;
pub mod text;
pub mod timestamp;

use serde::{Deserialize, Serialize};

use crate::domain::UNKNOWN_WALLET;

pub use decimal::parse_decimal;
pub use file::{load_events_from_file, load_events_from_file_with, LoadError, TimestampError};
pub use schema::{ColumnMap, SchemaError, REQUIRED_COLUMNS};
pub use text::{parse_signal_line, parse_text_events, parse_text_events_with, ParseSkip};

/// Settings shared by the text and file parsers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseConfig {
    /// Wallet used when the input carries none.
    pub default_wallet: String,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            default_wallet: UNKNOWN_WALLET.to_string(),
        }
    }
}
