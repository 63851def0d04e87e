//! Category metadata extraction.

use crate::error::Result;
use std::io::{BufRead, BufReader, Read};

/// Exact line prefix that designates the category, colon-space literal.
const CATEGORY_PREFIX: &[u8] = b"category: ";

/// Scan a file's contents for its category line.
///
/// Lines are read byte-wise in order; the first line starting with the exact
/// bytes `category: ` wins. The remainder of that line, trimmed of ASCII
/// whitespace, is the category value. Matching is case-sensitive and anchored
/// at line start, so lines merely containing the word elsewhere never match.
///
/// Returns `None` when no line matches before end of input, or when the first
/// matching line carries an empty value. Neither is an error; the caller must
/// surface both as a skip. Later `category:` lines in the same file are
/// ordinary content and are ignored.
pub fn extract_category<R: Read>(reader: R) -> Result<Option<Vec<u8>>> {
    let mut reader = BufReader::new(reader);
    let mut line = Vec::new();

    loop {
        line.clear();
        let read = reader.read_until(b'\n', &mut line)?;
        if read == 0 {
            return Ok(None);
        }

        if line.ends_with(b"\n") {
            line.pop();
        }
        if line.ends_with(b"\r") {
            line.pop();
        }

        if let Some(value) = line.strip_prefix(CATEGORY_PREFIX) {
            let value = value.trim_ascii();
            if value.is_empty() {
                // First match wins even when its value is empty
                return Ok(None);
            }
            return Ok(Some(value.to_vec()));
        }
    }
}
