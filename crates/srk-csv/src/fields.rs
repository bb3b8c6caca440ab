//! Field-level normalization shared by the movement and stock parsers.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use srk_schemas::ErrorEntry;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

// Source systems pad empty fixed-width fields with underscores.
const PLACEHOLDER_SHORT: &str = "__________";
const PLACEHOLDER_LONG: &str = "____________________";

/// Split a line on commas. No quoting: the source exports never quote.
pub fn split_fields(line: &str) -> Vec<&str> {
    line.split(',').collect()
}

/// Trimmed value, or `None` for empty and placeholder fields.
pub fn normalize(raw: &str) -> Option<&str> {
    let v = raw.trim();
    if v.is_empty() || v == PLACEHOLDER_SHORT || v == PLACEHOLDER_LONG {
        None
    } else {
        Some(v)
    }
}

pub fn text(raw: &str) -> Option<String> {
    normalize(raw).map(str::to_string)
}

pub fn integer(line: &str, field: &str, raw: &str) -> Result<Option<i64>, ErrorEntry> {
    normalize(raw)
        .map(|v| {
            v.parse::<i64>()
                .map_err(|_| ErrorEntry::invalid_number_format(line, field, v))
        })
        .transpose()
}

pub fn decimal(line: &str, field: &str, raw: &str) -> Result<Option<Decimal>, ErrorEntry> {
    normalize(raw)
        .map(|v| {
            Decimal::from_str(v).map_err(|_| ErrorEntry::invalid_number_format(line, field, v))
        })
        .transpose()
}

pub fn date(line: &str, field: &str, raw: &str) -> Result<Option<NaiveDate>, ErrorEntry> {
    normalize(raw)
        .map(|v| {
            NaiveDate::parse_from_str(v, DATE_FORMAT)
                .map_err(|_| ErrorEntry::invalid_date_format(line, field, v))
        })
        .transpose()
}

/// Required integer: absent is a parse error naming the field.
pub fn required_integer(line: &str, field: &str, raw: &str) -> Result<i64, ErrorEntry> {
    integer(line, field, raw)?
        .ok_or_else(|| ErrorEntry::parse_error(line, format!("Missing required field '{field}'")))
}

pub fn format_opt<T: ToString>(v: &Option<T>) -> String {
    v.as_ref().map(ToString::to_string).unwrap_or_default()
}

pub fn format_date(d: &Option<NaiveDate>) -> String {
    d.map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}
