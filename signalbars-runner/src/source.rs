//! Where signals come from: pasted text or a file on disk.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use signalbars_core::{load_events_from_file_with, parse_text_events_with, Event, LoadError, ParseConfig};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum SignalSource {
    /// Free-text signal lines.
    Text(String),
    /// CSV or spreadsheet with the canonical columns.
    File(PathBuf),
}

impl SignalSource {
    /// Parse into the canonical event table.
    ///
    /// Text never fails (bad lines are skipped); files fail on schema or
    /// timestamp problems.
    pub fn load(&self, config: &ParseConfig) -> Result<Vec<Event>, LoadError> {
        match self {
            SignalSource::Text(text) => Ok(parse_text_events_with(text, config)),
            SignalSource::File(path) => load_events_from_file_with(path, config),
        }
    }
}

impl fmt::Display for SignalSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalSource::Text(text) => write!(f, "text ({} lines)", text.lines().count()),
            SignalSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn text_source_skips_noise() {
        let source = SignalSource::Text("hello\n2024-01-01 10:00 BUY 1,5".into());
        let events = source.load(&ParseConfig::default()).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].pct, Some(1.5));
        assert_eq!(source.to_string(), "text (2 lines)");
    }

    #[test]
    fn text_source_uses_configured_wallet() {
        let config = ParseConfig {
            default_wallet: "chat".into(),
        };
        let events = SignalSource::Text("2024-01-01 10:00 sell 2".into())
            .load(&config)
            .unwrap();
        assert_eq!(events[0].wallet, "chat");
    }

    #[test]
    fn file_source_reads_csv() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "time,wallet,operation,pct,volume_$,balance_$,price").unwrap();
        writeln!(file, "2024-01-01 10:00:00,a,buy,1,2,3,4").unwrap();
        let events = SignalSource::File(file.path().to_path_buf())
            .load(&ParseConfig::default())
            .unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].price, Some(4.0));
    }

    #[test]
    fn file_source_propagates_errors() {
        let source = SignalSource::File(PathBuf::from("/nonexistent/signals.csv"));
        assert!(matches!(
            source.load(&ParseConfig::default()),
            Err(LoadError::Io { .. })
        ));
    }
}
