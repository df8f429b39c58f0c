//! Line-level drivers feeding a whole log through decoder and aggregator

use crate::error::SentenceError;
use crate::parser::aggregator::FixAggregator;
use crate::parser::decoder::decode_line;
use crate::types::{NmeaLog, ParseStats};
use crate::Result;
use anyhow::Context;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, trace};

/// Parse an NMEA log file into fix records
pub fn parse_nmea_file(file_path: &Path) -> Result<NmeaLog> {
    let file = File::open(file_path)
        .with_context(|| format!("Failed to open NMEA log: {:?}", file_path))?;
    let log = parse_nmea_reader(BufReader::new(file))
        .with_context(|| format!("Failed to read NMEA log: {:?}", file_path))?;

    debug!(
        "{}: {} lines, {} sentences decoded, {} rejected, {} fix records",
        file_path.display(),
        log.stats.lines,
        log.stats.decoded_sentences(),
        log.stats.rejected_sentences,
        log.records.len()
    );
    Ok(log)
}

/// Parse NMEA text from any buffered reader
///
/// Lines are split on `\n` and decoded lossily so stray binary bytes in a
/// capture do not abort the file.
pub fn parse_nmea_reader<R: BufRead>(mut reader: R) -> Result<NmeaLog> {
    let mut aggregator = FixAggregator::new();
    let mut stats = ParseStats::default();
    let mut buffer = Vec::new();

    loop {
        buffer.clear();
        if reader.read_until(b'\n', &mut buffer)? == 0 {
            break;
        }
        let line = String::from_utf8_lossy(&buffer);
        process_line(&line, &mut aggregator, &mut stats);
    }

    Ok(NmeaLog {
        records: aggregator.finish(),
        stats,
    })
}

/// Parse NMEA text already in memory
pub fn parse_nmea_str(text: &str) -> NmeaLog {
    let mut aggregator = FixAggregator::new();
    let mut stats = ParseStats::default();

    for line in text.lines() {
        process_line(line, &mut aggregator, &mut stats);
    }

    NmeaLog {
        records: aggregator.finish(),
        stats,
    }
}

fn process_line(line: &str, aggregator: &mut FixAggregator, stats: &mut ParseStats) {
    stats.lines += 1;
    match decode_line(line) {
        Ok(message) => {
            stats.count_sentence(message.kind());
            aggregator.push(message);
        }
        Err(SentenceError::NoSentence) => stats.non_sentence_lines += 1,
        Err(err) => {
            trace!("Line {} rejected: {}", stats.lines, err);
            stats.rejected_sentences += 1;
        }
    }
}
