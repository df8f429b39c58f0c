//! Typed decoding of GGA, RMC and HDT sentences
//!
//! Sentences are classified by their three-letter type so any talker (`GP`,
//! `GN`, `GL`, ...) is accepted. Fields are validated one by one; a field of the
//! wrong type becomes `None` while the rest of the sentence still counts.

use crate::error::SentenceError;
use crate::parser::fields::{
    parse_coordinate, parse_date, parse_float, parse_numeric_string, parse_quality, parse_time,
    Axis,
};
use crate::parser::sentence::{extract_sentence, parse_sentence, RawSentence};
use crate::types::{DecodedMessage, GgaData, HdtData, RmcData, SentenceKind};

// GGA data field positions
const GGA_TIME: usize = 0;
const GGA_LAT: usize = 1;
const GGA_LAT_DIR: usize = 2;
const GGA_LON: usize = 3;
const GGA_LON_DIR: usize = 4;
const GGA_QUALITY: usize = 5;
const GGA_NUM_SATS: usize = 6;
const GGA_ALTITUDE: usize = 8;

// RMC data field positions
const RMC_SPEED: usize = 6;
const RMC_COURSE: usize = 7;
const RMC_DATE: usize = 8;

const HDT_HEADING: usize = 0;

/// Decode one log line
///
/// Returns `Err(SentenceError::NoSentence)` for lines without `$`, which is the
/// common case for blank lines and log noise.
pub fn decode_line(line: &str) -> Result<DecodedMessage, SentenceError> {
    let text = extract_sentence(line).ok_or(SentenceError::NoSentence)?;
    let sentence = parse_sentence(text)?;
    decode_sentence(&sentence)
}

/// Classify a framed sentence and decode the fields we consume
pub fn decode_sentence(sentence: &RawSentence<'_>) -> Result<DecodedMessage, SentenceError> {
    let kind = sentence
        .sentence_type()
        .map(SentenceKind::from_type)
        .unwrap_or(SentenceKind::Other);

    let required = kind.min_fields();
    if sentence.fields.len() < required {
        return Err(SentenceError::Truncated {
            address: sentence.address.to_string(),
            fields: sentence.fields.len(),
            required,
        });
    }

    let message = match kind {
        SentenceKind::Gga => DecodedMessage::Gga(decode_gga(sentence)),
        SentenceKind::Rmc => DecodedMessage::Rmc(decode_rmc(sentence)),
        SentenceKind::Hdt => DecodedMessage::Hdt(decode_hdt(sentence)),
        SentenceKind::Other => DecodedMessage::Other {
            address: sentence.address.to_string(),
        },
    };
    Ok(message)
}

fn decode_gga(sentence: &RawSentence<'_>) -> GgaData {
    GgaData {
        timestamp: parse_time(sentence.field(GGA_TIME)),
        latitude: parse_coordinate(
            sentence.field(GGA_LAT),
            sentence.field(GGA_LAT_DIR),
            Axis::Latitude,
        ),
        longitude: parse_coordinate(
            sentence.field(GGA_LON),
            sentence.field(GGA_LON_DIR),
            Axis::Longitude,
        ),
        gps_qual: parse_quality(sentence.field(GGA_QUALITY)),
        num_sats: parse_numeric_string(sentence.field(GGA_NUM_SATS)),
        altitude: parse_float(sentence.field(GGA_ALTITUDE)),
    }
}

fn decode_rmc(sentence: &RawSentence<'_>) -> RmcData {
    RmcData {
        datestamp: parse_date(sentence.field(RMC_DATE)),
        speed_over_ground: parse_float(sentence.field(RMC_SPEED)),
        true_course: parse_float(sentence.field(RMC_COURSE)),
    }
}

fn decode_hdt(sentence: &RawSentence<'_>) -> HdtData {
    HdtData {
        heading: parse_float(sentence.field(HDT_HEADING)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::sentence::nmea_checksum;
    use chrono::{NaiveDate, NaiveTime};

    fn line(body: &str) -> String {
        format!("${}*{:02X}", body, nmea_checksum(body))
    }

    #[test]
    fn test_decode_gga() {
        let message =
            decode_line("$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47")
                .unwrap();
        let DecodedMessage::Gga(gga) = message else {
            panic!("expected GGA, got {message:?}");
        };
        assert_eq!(gga.timestamp, NaiveTime::from_hms_opt(12, 35, 19));
        assert!((gga.latitude.unwrap() - 48.1173).abs() < 1e-6);
        assert!((gga.longitude.unwrap() - 11.516_666_7).abs() < 1e-6);
        assert_eq!(gga.gps_qual, Some(1));
        assert_eq!(gga.num_sats.as_deref(), Some("08"));
        assert_eq!(gga.altitude, Some(545.4));
    }

    #[test]
    fn test_decode_rmc() {
        let message =
            decode_line("$GPRMC,123519,A,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,W*6A")
                .unwrap();
        assert_eq!(
            message,
            DecodedMessage::Rmc(RmcData {
                datestamp: NaiveDate::from_ymd_opt(1994, 3, 23),
                speed_over_ground: Some(22.4),
                true_course: Some(84.4),
            })
        );
    }

    #[test]
    fn test_decode_hdt_any_talker() {
        let message = decode_line(&line("HEHDT,045.0,T")).unwrap();
        assert_eq!(
            message,
            DecodedMessage::Hdt(HdtData {
                heading: Some(45.0)
            })
        );
    }

    #[test]
    fn test_mistyped_gga_field_becomes_missing() {
        let message = decode_line(&line(
            "GNGGA,120000,4807.038,N,0113X.000,E,4,12,0.9,545.4,M,46.9,M,,",
        ))
        .unwrap();
        let DecodedMessage::Gga(gga) = message else {
            panic!("expected GGA, got {message:?}");
        };
        assert_eq!(gga.longitude, None);
        assert!(gga.latitude.is_some());
        assert_eq!(gga.gps_qual, Some(4));
        assert_eq!(gga.num_sats.as_deref(), Some("12"));
    }

    #[test]
    fn test_empty_rmc_fields_are_missing() {
        let message = decode_line(&line("GPRMC,120000,V,,,,,,,040321,,")).unwrap();
        assert_eq!(
            message,
            DecodedMessage::Rmc(RmcData {
                datestamp: NaiveDate::from_ymd_opt(2021, 3, 4),
                speed_over_ground: None,
                true_course: None,
            })
        );
    }

    #[test]
    fn test_truncated_gga_is_rejected() {
        let result = decode_line(&line("GPGGA,120000,4807.038,N"));
        assert!(matches!(
            result,
            Err(SentenceError::Truncated { required: 9, .. })
        ));
    }

    #[test]
    fn test_unrecognized_type_is_other() {
        let message = decode_line(&line("GPGSV,3,1,12,01,40,083,46")).unwrap();
        assert_eq!(
            message,
            DecodedMessage::Other {
                address: "GPGSV".to_string()
            }
        );
    }

    #[test]
    fn test_non_sentence_lines() {
        assert_eq!(decode_line(""), Err(SentenceError::NoSentence));
        assert_eq!(decode_line("boot ok"), Err(SentenceError::NoSentence));
        assert!(decode_line("noise $GPGGA,12*00").is_err());
    }
}
