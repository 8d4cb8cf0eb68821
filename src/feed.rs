//! Parser for newline-delimited DROP feeds.
//!
//! Each line of a feed is an independent JSON object. Address records carry
//! a `cidr` field; the feed also ends with a metadata record that has none.
//!
//! ```text
//! {"cidr":"192.0.2.0/24","sblid":"SBL000001","rir":"arin"}
//! {"type":"metadata","timestamp":1700000000,"size":1234,"records":1}
//! ```

use serde_json::Value;
use tracing::debug;

use crate::error::RecordError;
use crate::validation::AddressFamily;

/// Entries extracted from one feed body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedFeed {
    /// Valid addresses in feed order
    pub entries: Vec<String>,
    /// Lines that were malformed, had no address, or failed validation
    pub skipped: usize,
}

impl ParsedFeed {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Decode a single feed line into an address accepted by `family`.
///
/// A `cidr` that is absent, empty or not a string counts as missing. When a
/// record repeats the key, the last occurrence wins.
pub fn decode_record(line: &str, family: AddressFamily) -> Result<String, RecordError> {
    let record: Value =
        serde_json::from_str(line).map_err(|e| RecordError::Malformed(e.to_string()))?;

    let cidr = match record.get("cidr").and_then(Value::as_str) {
        Some(cidr) if !cidr.is_empty() => cidr.to_string(),
        _ => return Err(RecordError::MissingAddress),
    };

    if family.validate(&cidr) {
        Ok(cidr)
    } else {
        Err(RecordError::InvalidAddress { family, value: cidr })
    }
}

/// Parse a feed body, keeping every line that decodes to a valid address.
///
/// Blank lines are ignored without being counted. Duplicates are kept.
/// A byte order mark is stripped along with surrounding whitespace.
pub fn parse_feed(body: &str, family: AddressFamily) -> ParsedFeed {
    let mut feed = ParsedFeed::default();

    for (index, line) in body.lines().enumerate() {
        let trimmed = line.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
        if trimmed.is_empty() {
            continue;
        }

        match decode_record(trimmed, family) {
            Ok(cidr) => feed.entries.push(cidr),
            Err(e) => {
                debug!("Skipping line {}: {}", index + 1, e);
                feed.skipped += 1;
            }
        }
    }

    feed
}
