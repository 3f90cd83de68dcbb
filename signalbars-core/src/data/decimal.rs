//! Decimal parsing that accepts either `.` or `,` as the separator.

/// Parse a finite float, treating `,` as a decimal point.
///
/// Returns `None` for blanks, malformed numbers (`"1.2.3"`) and non-finite
/// values.
pub fn parse_decimal(s: &str) -> Option<f64> {
    let normalized = s.trim().replace(',', ".");
    if normalized.is_empty() {
        return None;
    }
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}
