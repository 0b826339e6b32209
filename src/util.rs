// Utility helpers for parsing and console formatting.
//
// Registration exports are hand-edited spreadsheets more often than not, so
// the loader leans on these forgiving parsers and the rest of the code only
// ever sees typed values.
use chrono::Month;
use num_format::{Locale, ToFormattedString};

/// Trim a text cell and turn blanks into `None`.
pub fn clean_text(s: Option<String>) -> Option<String> {
    let s = s?;
    let t = s.trim();
    if t.is_empty() {
        None
    } else {
        Some(t.to_string())
    }
}

/// Parse a non-negative integer quantity.
///
/// - Trims whitespace.
/// - Rejects anything with alphabetic characters or a sign.
/// - Strips thousands separators (`","`, spaces, non-breaking spaces).
pub fn parse_u64_safe(s: Option<&str>) -> Option<u64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if s.chars().any(|c| c.is_alphabetic()) {
        return None;
    }
    let digits: String = s
        .chars()
        .filter(|c| *c != ',' && *c != ' ' && *c != '\u{a0}')
        .collect();
    digits.parse::<u64>().ok()
}

pub fn parse_u32_safe(s: Option<&str>) -> Option<u32> {
    parse_u64_safe(s).and_then(|v| u32::try_from(v).ok())
}

pub fn parse_month_safe(s: Option<&str>) -> Option<Month> {
    // Months are stored as plain numbers 1..=12.
    let n = parse_u64_safe(s)?;
    let n = u8::try_from(n).ok()?;
    Month::try_from(n).ok()
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Thin wrapper around `num-format` for counts shown in the console
    // (e.g., `12,480 rows loaded`).
    n.to_formatted_string(&Locale::en)
}
