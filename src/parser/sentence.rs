//! NMEA sentence framing
//!
//! Finds the sentence on a log line, splits it into address, data fields and
//! optional checksum, and validates the checksum when one is present.

use crate::error::SentenceError;
use regex::Regex;
use std::sync::OnceLock;

/// A structurally valid sentence, borrowed from its source line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSentence<'a> {
    /// Full address field, e.g. `GPGGA` or `PGRME`
    pub address: &'a str,
    /// Comma-separated data fields following the address
    pub fields: Vec<&'a str>,
    pub checksum: Option<u8>,
}

impl<'a> RawSentence<'a> {
    /// Three-letter sentence type; `None` for proprietary sentences
    pub fn sentence_type(&self) -> Option<&'a str> {
        if self.is_standard() {
            self.address.get(2..)
        } else {
            None
        }
    }

    pub fn is_proprietary(&self) -> bool {
        self.address.starts_with('P')
    }

    fn is_standard(&self) -> bool {
        !self.is_proprietary() && self.address.len() == 5
    }

    /// Data field at `index`, empty string when the sentence is shorter
    pub fn field(&self, index: usize) -> &'a str {
        self.fields.get(index).copied().unwrap_or("")
    }
}

fn sentence_regex() -> &'static Regex {
    static SENTENCE_RE: OnceLock<Regex> = OnceLock::new();
    SENTENCE_RE.get_or_init(|| {
        Regex::new(r"^\$(?P<address>[A-Za-z0-9]{2,}),(?P<data>[^*$]*)(?:\*(?P<checksum>[0-9A-Fa-f]{2}))?\s*$")
            .expect("sentence pattern is valid")
    })
}

/// Return the text from the first `$` to the end of the line
///
/// Log noise before the `$` is dropped; lines without one are not sentences.
pub fn extract_sentence(line: &str) -> Option<&str> {
    line.find('$').map(|start| line[start..].trim_end())
}

/// XOR of every byte between `$` and `*`
pub fn nmea_checksum(body: &str) -> u8 {
    body.bytes().fold(0u8, |acc, byte| acc ^ byte)
}

/// Parse an extracted sentence, validating its checksum when present
pub fn parse_sentence(text: &str) -> Result<RawSentence<'_>, SentenceError> {
    let captures = sentence_regex()
        .captures(text)
        .ok_or_else(|| SentenceError::Malformed(text.to_string()))?;

    let address = captures
        .name("address")
        .map(|m| m.as_str())
        .ok_or_else(|| SentenceError::Malformed(text.to_string()))?;
    let data = captures.name("data").map(|m| m.as_str()).unwrap_or("");

    let checksum = match captures.name("checksum") {
        Some(hex) => {
            let expected = u8::from_str_radix(hex.as_str(), 16)
                .map_err(|_| SentenceError::Malformed(text.to_string()))?;
            // Body is everything between '$' and '*'
            let body = &text[1..hex.start() - 1];
            let computed = nmea_checksum(body);
            if computed != expected {
                return Err(SentenceError::ChecksumMismatch { expected, computed });
            }
            Some(expected)
        }
        None => None,
    };

    Ok(RawSentence {
        address,
        fields: data.split(',').collect(),
        checksum,
    })
}
