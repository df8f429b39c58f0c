use std::fmt;

/// Reasons a line is rejected by the sentence decoder
///
/// None of these are fatal: the aggregator simply never sees the line. They
/// exist so callers and tests can tell the rejection cases apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SentenceError {
    /// No `$` anywhere on the line
    NoSentence,
    /// `$` present but the text does not have the shape of a sentence
    Malformed(String),
    /// Checksum present but wrong
    ChecksumMismatch { expected: u8, computed: u8 },
    /// Recognized sentence with too few fields to address what we consume
    Truncated {
        address: String,
        fields: usize,
        required: usize,
    },
}

impl fmt::Display for SentenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SentenceError::NoSentence => write!(f, "No NMEA sentence on line"),
            SentenceError::Malformed(msg) => write!(f, "Malformed sentence: {}", msg),
            SentenceError::ChecksumMismatch { expected, computed } => write!(
                f,
                "Checksum mismatch: expected {:02X}, computed {:02X}",
                expected, computed
            ),
            SentenceError::Truncated {
                address,
                fields,
                required,
            } => write!(
                f,
                "Truncated {} sentence: {} fields, {} required",
                address, fields, required
            ),
        }
    }
}

impl std::error::Error for SentenceError {}
