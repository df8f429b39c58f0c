use crate::types::fix::FixRecord;
use crate::types::message::SentenceKind;

/// Line and sentence counters collected while parsing one log
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseStats {
    pub lines: usize,
    /// Lines without a `$`
    pub non_sentence_lines: usize,
    /// Malformed, bad checksum or truncated sentences
    pub rejected_sentences: usize,
    pub gga_sentences: usize,
    pub rmc_sentences: usize,
    pub hdt_sentences: usize,
    pub other_sentences: usize,
}

impl ParseStats {
    pub fn count_sentence(&mut self, kind: SentenceKind) {
        match kind {
            SentenceKind::Gga => self.gga_sentences += 1,
            SentenceKind::Rmc => self.rmc_sentences += 1,
            SentenceKind::Hdt => self.hdt_sentences += 1,
            SentenceKind::Other => self.other_sentences += 1,
        }
    }

    /// Sentences that decoded successfully, of any type
    pub fn decoded_sentences(&self) -> usize {
        self.gga_sentences + self.rmc_sentences + self.hdt_sentences + self.other_sentences
    }
}

/// Parsed contents of one NMEA log
#[derive(Debug, Clone, Default)]
pub struct NmeaLog {
    pub records: Vec<FixRecord>,
    pub stats: ParseStats,
}

impl NmeaLog {
    /// Check if any record ever reached a usable fix
    pub fn has_valid_fix(&self) -> bool {
        self.records.iter().any(FixRecord::has_valid_quality)
    }
}
