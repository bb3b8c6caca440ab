use std::fmt;

use serde::{Deserialize, Serialize};

/// Closed set of error classes. Upstream parsing produces the malformed-input
/// kinds; the replay engine itself only produces `MovementError` and
/// `MovementIdOutOfOrder`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    InvalidFieldCount,
    InvalidEvent,
    InvalidNumberFormat,
    InvalidDateFormat,
    ParseError,
    WriteError,
    MovementError,
    MovementIdOutOfOrder,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidFieldCount => "INVALID_FIELD_COUNT",
            ErrorKind::InvalidEvent => "INVALID_EVENT",
            ErrorKind::InvalidNumberFormat => "INVALID_NUMBER_FORMAT",
            ErrorKind::InvalidDateFormat => "INVALID_DATE_FORMAT",
            ErrorKind::ParseError => "PARSE_ERROR",
            ErrorKind::WriteError => "WRITE_ERROR",
            ErrorKind::MovementError => "MOVEMENT_ERROR",
            ErrorKind::MovementIdOutOfOrder => "MOVEMENT_ID_OUT_OF_ORDER",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One classified failure.
///
/// `line` carries the offending raw input line, or the path for read/write
/// failures, so an operator can locate the problem without re-running.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEntry {
    pub kind: ErrorKind,
    pub message: String,
    pub line: String,
}

impl ErrorEntry {
    pub fn new(kind: ErrorKind, message: impl Into<String>, line: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            line: line.into(),
        }
    }

    pub fn invalid_field_count(line: &str, expected: usize, actual: usize) -> Self {
        Self::new(
            ErrorKind::InvalidFieldCount,
            format!("Expected {expected} fields but got {actual}"),
            line,
        )
    }

    pub fn invalid_event(line: &str, value: &str) -> Self {
        Self::new(
            ErrorKind::InvalidEvent,
            format!("Invalid event value: {value}"),
            line,
        )
    }

    pub fn invalid_number_format(line: &str, field: &str, value: &str) -> Self {
        Self::new(
            ErrorKind::InvalidNumberFormat,
            format!("Invalid number format for field '{field}': {value}"),
            line,
        )
    }

    pub fn invalid_date_format(line: &str, field: &str, value: &str) -> Self {
        Self::new(
            ErrorKind::InvalidDateFormat,
            format!("Invalid date format for field '{field}': {value}"),
            line,
        )
    }

    pub fn parse_error(line: &str, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ParseError, message, line)
    }

    pub fn write_error(path: &str, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::WriteError, message, path)
    }

    pub fn movement_error(line: &str, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MovementError, message, line)
    }

    /// Reversing `change` from `on_hand` leaves the decimal range.
    pub fn quantity_overflow(key: i64, on_hand: &str, change: &str, line: &str) -> Self {
        Self::new(
            ErrorKind::MovementError,
            format!(
                "Stock quantity overflow for key {key}: on hand {on_hand}, change {change}"
            ),
            line,
        )
    }

    pub fn movement_id_out_of_order(sequence: i64, previous: i64, line: &str) -> Self {
        Self::new(
            ErrorKind::MovementIdOutOfOrder,
            format!("Movement ID {sequence} out of order (previous {previous})"),
            line,
        )
    }
}

impl fmt::Display for ErrorEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for ErrorEntry {}
