use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

use srk_schemas::{ErrorEntry, MovementResult};

use crate::fields::split_fields;
use crate::movement::parse_movement_line;

/// True when the first field names a column rather than holding a key.
pub fn is_header_line(line: &str) -> bool {
    is_header_field(split_fields(line).first().copied().unwrap_or(""))
}

/// Header test on an already-split first field.
pub(crate) fn is_header_field(first: &str) -> bool {
    let first = first.trim();
    if first.is_empty() {
        return false;
    }
    if first.eq_ignore_ascii_case("LFDNR") || first.eq_ignore_ascii_case("SEQUENCE") {
        return true;
    }
    first.parse::<i64>().is_err()
}

pub(crate) fn strip_bom(line: &str) -> &str {
    line.strip_prefix('\u{feff}').unwrap_or(line)
}

/// Lazy, single-pass sequence of parsed journal lines.
///
/// Owns its reader; dropping the stream releases the file whether or not it
/// was read to the end. A header on the first line is skipped, as are blank
/// lines. A read failure yields one `PARSE_ERROR` and ends the stream.
pub struct MovementStream<R = BufReader<File>> {
    origin: String,
    pending: Option<String>,
    lines: Lines<R>,
    done: bool,
}

impl MovementStream<BufReader<File>> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ErrorEntry> {
        let path = path.as_ref();
        let origin = path.display().to_string();
        let file = File::open(path).map_err(|e| {
            ErrorEntry::parse_error(&origin, format!("Failed to open movement file: {e}"))
        })?;
        Self::from_reader(BufReader::new(file), origin)
    }
}

impl<R: BufRead> MovementStream<R> {
    pub fn from_reader(reader: R, origin: impl Into<String>) -> Result<Self, ErrorEntry> {
        let origin = origin.into();
        let mut lines = reader.lines();

        let pending = match lines.next() {
            None => None,
            Some(Err(e)) => {
                return Err(ErrorEntry::parse_error(
                    &origin,
                    format!("Failed to read movement file: {e}"),
                ))
            }
            Some(Ok(first)) => {
                let first = strip_bom(&first);
                if is_header_line(first) {
                    None
                } else {
                    Some(first.to_string())
                }
            }
        };

        Ok(Self {
            origin,
            pending,
            lines,
            done: false,
        })
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }
}

impl<R: BufRead> Iterator for MovementStream<R> {
    type Item = MovementResult;

    fn next(&mut self) -> Option<MovementResult> {
        if let Some(first) = self.pending.take() {
            if !first.trim().is_empty() {
                return Some(parse_movement_line(&first));
            }
        }
        if self.done {
            return None;
        }

        loop {
            match self.lines.next() {
                None => {
                    self.done = true;
                    return None;
                }
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(ErrorEntry::parse_error(
                        &self.origin,
                        format!("Failed to read movement file: {e}"),
                    )));
                }
                Some(Ok(line)) if line.trim().is_empty() => continue,
                Some(Ok(line)) => return Some(parse_movement_line(&line)),
            }
        }
    }
}
