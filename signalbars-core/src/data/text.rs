//! Free-text signal parsing.
//!
//! One signal per line: `YYYY-MM-DD HH:MM (buy|sell) PCT [PRICE]`. Numbers
//! may use a decimal comma. Chat text is noisy, so a line that does not fit
//! is skipped rather than failing the whole parse.

use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;
use thiserror::Error;
use tracing::debug;

use super::decimal::parse_decimal;
use super::ParseConfig;
use crate::domain::{Event, Operation};

static SIGNAL_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(\d{4}-\d{2}-\d{2})\s+(\d{2}:\d{2})\s+(buy|sell)\s+([\d.,]+)(?:\s+([\d.,]+))?",
    )
    .expect("signal line pattern must compile")
});

/// Why a single line was left out of the event table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseSkip {
    #[error("line does not match the signal pattern")]
    NoMatch,

    #[error("not a valid date/time: {0}")]
    BadTimestamp(String),

    #[error("not a valid number: {0}")]
    BadNumber(String),
}

/// Parse free text with default settings.
pub fn parse_text_events(text: &str) -> Vec<Event> {
    parse_text_events_with(text, &ParseConfig::default())
}

/// Parse free text into events, one per matching line, in input order.
///
/// Never fails: unusable lines are logged at debug level and dropped.
pub fn parse_text_events_with(text: &str, config: &ParseConfig) -> Vec<Event> {
    let mut events = Vec::new();

    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match parse_signal_line(line, config) {
            Ok(event) => events.push(event),
            Err(reason) => debug!(line = index + 1, %reason, "skipping signal line"),
        }
    }

    events
}

/// Parse a single trimmed line.
pub fn parse_signal_line(line: &str, config: &ParseConfig) -> Result<Event, ParseSkip> {
    let caps = SIGNAL_LINE.captures(line).ok_or(ParseSkip::NoMatch)?;

    let stamp = format!("{} {}", &caps[1], &caps[2]);
    let time = NaiveDateTime::parse_from_str(&stamp, "%Y-%m-%d %H:%M")
        .map_err(|_| ParseSkip::BadTimestamp(stamp.clone()))?;

    let operation: Operation = caps[3]
        .parse()
        .map_err(|_| ParseSkip::NoMatch)?;

    let pct = parse_decimal(&caps[4]).ok_or_else(|| ParseSkip::BadNumber(caps[4].to_string()))?;

    let price = match caps.get(5) {
        Some(m) => Some(
            parse_decimal(m.as_str()).ok_or_else(|| ParseSkip::BadNumber(m.as_str().to_string()))?,
        ),
        None => None,
    };

    let mut event = Event::new(time, config.default_wallet.clone())
        .with_operation(operation)
        .with_pct(pct);
    event.price = price;
    Ok(event)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn parses_reference_message() {
        let text = "2024-01-01 10:00 buy 5 0.02\n2024-01-01 10:05 sell 3\nGARBAGE LINE\n2024-01-01 10:10 buy 2 0.021";
        let events = parse_text_events(text);

        assert_eq!(events.len(), 3);
        assert_eq!(events[0].time, at(10, 0));
        assert_eq!(events[0].operation, Some(Operation::Buy));
        assert_eq!(events[0].pct, Some(5.0));
        assert_eq!(events[0].price, Some(0.02));

        assert_eq!(events[1].operation, Some(Operation::Sell));
        assert_eq!(events[1].price, None);

        assert_eq!(events[2].price, Some(0.021));
        for e in &events {
            assert_eq!(e.wallet, "unknown");
            assert!(e.volume.is_none());
            assert!(e.balance.is_none());
        }
    }

    #[test]
    fn decimal_comma_matches_dot() {
        let comma = parse_text_events("2024-01-01 10:00 buy 1,5 0,02");
        let dot = parse_text_events("2024-01-01 10:00 buy 1.5 0.02");
        assert_eq!(comma, dot);
        assert_eq!(comma[0].pct, Some(1.5));
    }

    #[test]
    fn operation_keyword_is_case_insensitive() {
        let events = parse_text_events("2024-01-01 10:00 BUY 1\n2024-01-01 10:01 Sell 2");
        assert_eq!(events[0].operation, Some(Operation::Buy));
        assert_eq!(events[1].operation, Some(Operation::Sell));
    }

    #[test]
    fn skips_malformed_lines_without_failing() {
        let text = "\n   \n2024-01-01 10:00 hold 5\n2024-13-40 10:00 buy 5\n2024-01-01 25:00 buy 5\n2024-01-01 10:00 buy 1.2.3\n2024-01-01 10:00 buy\n2024-01-01 10:00 sell 4";
        let events = parse_text_events(text);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].pct, Some(4.0));
    }

    #[test]
    fn skip_reasons() {
        let config = ParseConfig::default();
        assert_eq!(
            parse_signal_line("hello", &config).unwrap_err(),
            ParseSkip::NoMatch
        );
        assert!(matches!(
            parse_signal_line("2024-02-30 10:00 buy 1", &config).unwrap_err(),
            ParseSkip::BadTimestamp(_)
        ));
        assert!(matches!(
            parse_signal_line("2024-01-01 10:00 buy 1 2..5", &config).unwrap_err(),
            ParseSkip::BadNumber(_)
        ));
    }

    #[test]
    fn leading_text_is_tolerated() {
        let events = parse_text_events("signal: 2024-01-01 10:00 buy 5 trailing words");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].price, None);
    }

    #[test]
    fn uses_configured_wallet() {
        let config = ParseConfig {
            default_wallet: "chat".into(),
        };
        let events = parse_text_events_with("2024-01-01 10:00 buy 5", &config);
        assert_eq!(events[0].wallet, "chat");
    }

    #[test]
    fn empty_text_yields_no_events() {
        assert!(parse_text_events("").is_empty());
    }
}
