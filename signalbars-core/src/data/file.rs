//! Tabular signal files (CSV and spreadsheets).
//!
//! An uploaded file is a structured contract: missing columns, unparseable
//! timestamps and malformed values fail the whole load instead of being
//! dropped row by row.

use std::fs;
use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Reader};
use chrono::NaiveDateTime;
use thiserror::Error;
use tracing::{info, warn};

use super::decimal::parse_decimal;
use super::schema::{ColumnMap, SchemaError};
use super::timestamp::{from_excel_serial, parse_timestamp};
use super::ParseConfig;
use crate::domain::{Event, Operation};

/// Extensions read with the spreadsheet reader. Anything else is CSV.
const SPREADSHEET_EXTENSIONS: &[&str] = &["xls", "xlsx", "xlsm", "xlsb", "ods"];

/// A `time` cell that could not be read as a timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("row {row}: cannot parse timestamp '{value}'")]
pub struct TimestampError {
    /// 1-based data row (the header row is not counted).
    pub row: usize,
    pub value: String,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("cannot read spreadsheet {path}: {message}")]
    Spreadsheet { path: PathBuf, message: String },

    #[error("spreadsheet {path} has no worksheets")]
    NoWorksheet { path: PathBuf },

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Timestamp(#[from] TimestampError),

    #[error("row {row}: invalid {column} value '{value}'")]
    InvalidValue {
        row: usize,
        column: &'static str,
        value: String,
    },
}

/// One cell of a loaded table, before column semantics are applied.
#[derive(Debug, Clone, PartialEq)]
enum Cell {
    Empty,
    Text(String),
    Number(f64),
    DateTime(NaiveDateTime),
}

impl Cell {
    fn text(s: &str) -> Self {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(trimmed.to_string())
        }
    }

    fn display(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Number(v) => v.to_string(),
            Cell::DateTime(t) => t.to_string(),
        }
    }
}

static EMPTY_CELL: Cell = Cell::Empty;

/// Header row plus data rows.
struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

/// Load a signal file with default settings.
pub fn load_events_from_file(path: impl AsRef<Path>) -> Result<Vec<Event>, LoadError> {
    load_events_from_file_with(path, &ParseConfig::default())
}

/// Load a CSV or spreadsheet file into the canonical event table.
///
/// Rows keep file order. Fails with [`LoadError::Schema`] when a required
/// column is missing and with [`LoadError::Timestamp`] on the first row
/// whose `time` cell cannot be parsed.
pub fn load_events_from_file_with(
    path: impl AsRef<Path>,
    config: &ParseConfig,
) -> Result<Vec<Event>, LoadError> {
    let path = path.as_ref();
    let table = if is_spreadsheet(path) {
        read_spreadsheet(path)?
    } else {
        read_csv(path)?
    };

    let columns = ColumnMap::resolve(&table.headers)?;
    let events = table
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| row_to_event(i + 1, row, &columns, config))
        .collect::<Result<Vec<_>, _>>()?;

    if events.is_empty() {
        warn!(path = %path.display(), "signal file has a header but no data rows");
    } else {
        info!(path = %path.display(), rows = events.len(), "loaded signal file");
    }
    Ok(events)
}

/// True when the extension selects the spreadsheet reader.
pub fn is_spreadsheet(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let e = e.to_ascii_lowercase();
            SPREADSHEET_EXTENSIONS.contains(&e.as_str())
        })
        .unwrap_or(false)
}

fn read_csv(path: &Path) -> Result<RawTable, LoadError> {
    let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let csv_err = |source: csv::Error| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(sniff_delimiter(&content))
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_err)?;
        let row: Vec<Cell> = record.iter().map(Cell::text).collect();
        if row.iter().all(|c| *c == Cell::Empty) {
            continue;
        }
        rows.push(row);
    }

    Ok(RawTable { headers, rows })
}

/// `;` when the header line uses it and has no commas, `,` otherwise.
fn sniff_delimiter(content: &str) -> u8 {
    let header = content.lines().next().unwrap_or("");
    if header.contains(';') && !header.contains(',') {
        b';'
    } else {
        b','
    }
}

fn read_spreadsheet(path: &Path) -> Result<RawTable, LoadError> {
    let spreadsheet_err = |message: String| LoadError::Spreadsheet {
        path: path.to_path_buf(),
        message,
    };

    let mut workbook = open_workbook_auto(path).map_err(|e| spreadsheet_err(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| LoadError::NoWorksheet {
            path: path.to_path_buf(),
        })?
        .map_err(|e| spreadsheet_err(e.to_string()))?;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .map(|r| r.iter().map(|c| cell_from_data(c).display()).collect())
        .unwrap_or_default();

    let rows = rows
        .map(|r| r.iter().map(cell_from_data).collect::<Vec<_>>())
        .filter(|r| r.iter().any(|c| *c != Cell::Empty))
        .collect();

    Ok(RawTable { headers, rows })
}

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::text(s),
        Data::Float(v) => Cell::Number(*v),
        Data::Int(v) => Cell::Number(*v as f64),
        Data::Bool(b) => Cell::Text(b.to_string()),
        Data::DateTime(dt) => {
            let serial = dt.as_f64();
            from_excel_serial(serial)
                .map(Cell::DateTime)
                .unwrap_or(Cell::Number(serial))
        }
        Data::Error(e) => Cell::Text(format!("{e:?}")),
    }
}

fn row_to_event(
    row: usize,
    cells: &[Cell],
    columns: &ColumnMap,
    config: &ParseConfig,
) -> Result<Event, LoadError> {
    let cell = |index: usize| cells.get(index).unwrap_or(&EMPTY_CELL);

    let time = match cell(columns.time) {
        Cell::DateTime(t) => Some(*t),
        Cell::Text(s) => parse_timestamp(s),
        Cell::Number(serial) => from_excel_serial(*serial),
        Cell::Empty => None,
    }
    .ok_or_else(|| TimestampError {
        row,
        value: cell(columns.time).display(),
    })?;

    let wallet = match cell(columns.wallet) {
        Cell::Empty => config.default_wallet.clone(),
        Cell::Number(v) if v.fract() == 0.0 => format!("{v:.0}"),
        other => other.display(),
    };

    let operation = match cell(columns.operation) {
        Cell::Empty => None,
        Cell::Text(s) => Some(s.parse::<Operation>().map_err(|_| LoadError::InvalidValue {
            row,
            column: "operation",
            value: s.clone(),
        })?),
        other => {
            return Err(LoadError::InvalidValue {
                row,
                column: "operation",
                value: other.display(),
            })
        }
    };

    Ok(Event {
        time,
        wallet,
        operation,
        pct: numeric(row, "pct", cell(columns.pct))?,
        volume: numeric(row, "volume_$", cell(columns.volume))?,
        balance: numeric(row, "balance_$", cell(columns.balance))?,
        price: numeric(row, "price", cell(columns.price))?,
    })
}

fn numeric(row: usize, column: &'static str, cell: &Cell) -> Result<Option<f64>, LoadError> {
    let invalid = || LoadError::InvalidValue {
        row,
        column,
        value: cell.display(),
    };
    match cell {
        Cell::Empty => Ok(None),
        Cell::Number(v) if v.is_finite() => Ok(Some(*v)),
        Cell::Text(s) => parse_decimal(s).map(Some).ok_or_else(invalid),
        _ => Err(invalid()),
    }
}
