//! Merging decoded sentences into one record per GPS epoch
//!
//! A GGA sentence opens a record and closes the previous one. RMC and HDT
//! sentences enrich whichever record is open; with nothing open they are
//! dropped. The open record is flushed when input ends.

use crate::types::{DecodedMessage, FixRecord};

/// One transition of the aggregation fold
///
/// Takes the currently open record and the next message, returns the new open
/// record and the record closed by this step, if any.
pub fn step(
    current: Option<FixRecord>,
    message: DecodedMessage,
) -> (Option<FixRecord>, Option<FixRecord>) {
    match message {
        DecodedMessage::Gga(gga) => (Some(FixRecord::from_gga(gga)), current),
        DecodedMessage::Rmc(rmc) => (
            current.map(|mut record| {
                record.apply_rmc(rmc);
                record
            }),
            None,
        ),
        DecodedMessage::Hdt(hdt) => (
            current.map(|mut record| {
                record.apply_hdt(hdt);
                record
            }),
            None,
        ),
        DecodedMessage::Other { .. } => (current, None),
    }
}

/// Incremental aggregator over a message stream
#[derive(Debug, Default)]
pub struct FixAggregator {
    current: Option<FixRecord>,
    records: Vec<FixRecord>,
}

impl FixAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: DecodedMessage) {
        let (current, closed) = step(self.current.take(), message);
        self.current = current;
        if let Some(record) = closed {
            self.records.push(record);
        }
    }

    /// Flush the open record and return every record in GGA order
    pub fn finish(mut self) -> Vec<FixRecord> {
        if let Some(record) = self.current.take() {
            self.records.push(record);
        }
        self.records
    }
}

/// Aggregate a complete message sequence
pub fn aggregate<I>(messages: I) -> Vec<FixRecord>
where
    I: IntoIterator<Item = DecodedMessage>,
{
    let mut aggregator = FixAggregator::new();
    for message in messages {
        aggregator.push(message);
    }
    aggregator.finish()
}
