use chrono::{NaiveDate, NaiveTime};

/// Sentence types the fix aggregator consumes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentenceKind {
    Gga,
    Rmc,
    Hdt,
    Other,
}

impl SentenceKind {
    /// Classify a three-letter NMEA sentence type, ignoring the talker prefix
    pub fn from_type(sentence_type: &str) -> Self {
        match sentence_type.to_ascii_uppercase().as_str() {
            "GGA" => SentenceKind::Gga,
            "RMC" => SentenceKind::Rmc,
            "HDT" => SentenceKind::Hdt,
            _ => SentenceKind::Other,
        }
    }

    /// Minimum number of data fields needed to address every consumed field
    pub fn min_fields(self) -> usize {
        match self {
            // time .. altitude
            SentenceKind::Gga => 9,
            // time .. datestamp
            SentenceKind::Rmc => 9,
            SentenceKind::Hdt => 1,
            SentenceKind::Other => 0,
        }
    }
}

/// GGA (fix data) fields, each already validated to its semantic type
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GgaData {
    pub timestamp: Option<NaiveTime>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub gps_qual: Option<u8>,
    /// Kept verbatim so leading zeros survive ("08")
    pub num_sats: Option<String>,
    pub altitude: Option<f64>,
}

/// RMC (recommended minimum) fields
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RmcData {
    pub datestamp: Option<NaiveDate>,
    /// Knots
    pub speed_over_ground: Option<f64>,
    /// Degrees true
    pub true_course: Option<f64>,
}

/// HDT (true heading) fields
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HdtData {
    pub heading: Option<f64>,
}

/// A sentence decoded far enough for the fix aggregator
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedMessage {
    Gga(GgaData),
    Rmc(RmcData),
    Hdt(HdtData),
    /// Recognized as NMEA but not consumed; kept only for diagnostics
    Other { address: String },
}

impl DecodedMessage {
    pub fn kind(&self) -> SentenceKind {
        match self {
            DecodedMessage::Gga(_) => SentenceKind::Gga,
            DecodedMessage::Rmc(_) => SentenceKind::Rmc,
            DecodedMessage::Hdt(_) => SentenceKind::Hdt,
            DecodedMessage::Other { .. } => SentenceKind::Other,
        }
    }
}
