//! Per-type field validators
//!
//! Every validator takes the raw field text and returns `None` when the text
//! does not match the expected type. Empty fields are always `None`. A field
//! that fails here never rejects its sentence.

use chrono::{NaiveDate, NaiveTime};

/// Which axis a coordinate belongs to, selecting the hemisphere letters and range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Latitude,
    Longitude,
}

impl Axis {
    fn max_degrees(self) -> f64 {
        match self {
            Axis::Latitude => 90.0,
            Axis::Longitude => 180.0,
        }
    }

    /// Sign for a hemisphere letter, `None` if the letter is wrong for the axis
    fn hemisphere_sign(self, hemisphere: &str) -> Option<f64> {
        match (self, hemisphere) {
            (Axis::Latitude, "N") | (Axis::Longitude, "E") => Some(1.0),
            (Axis::Latitude, "S") | (Axis::Longitude, "W") => Some(-1.0),
            _ => None,
        }
    }
}

fn all_digits(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

/// Two ASCII digits at `start` as a number
fn two_digits(value: &str, start: usize) -> Option<u32> {
    let part = value.get(start..start + 2)?;
    if all_digits(part) {
        part.parse().ok()
    } else {
        None
    }
}

/// `hhmmss[.ffffff]` to a time of day
///
/// The fraction is read to microsecond precision; extra digits are ignored.
pub fn parse_time(value: &str) -> Option<NaiveTime> {
    let hour = two_digits(value, 0)?;
    let minute = two_digits(value, 2)?;
    let second = two_digits(value, 4)?;

    let micros = match value.get(6..)? {
        "" => 0,
        rest => {
            let fraction = rest.strip_prefix('.')?;
            if !fraction.is_empty() && !all_digits(fraction) {
                return None;
            }
            let padded: String = fraction.chars().chain("000000".chars()).take(6).collect();
            padded.parse::<u32>().ok()?
        }
    };

    NaiveTime::from_hms_micro_opt(hour, minute, second, micros)
}

/// `ddmmyy` to a calendar date
///
/// Two-digit years follow the usual pivot: 00-68 are 2000-2068, 69-99 are
/// 1969-1999.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    if value.len() != 6 {
        return None;
    }
    let day = two_digits(value, 0)?;
    let month = two_digits(value, 2)?;
    let year = two_digits(value, 4)? as i32;
    let year = if year <= 68 { 2000 + year } else { 1900 + year };

    NaiveDate::from_ymd_opt(year, month, day)
}

/// `d+mm[.mmmm]` plus hemisphere letter to signed decimal degrees
pub fn parse_coordinate(value: &str, hemisphere: &str, axis: Axis) -> Option<f64> {
    let sign = axis.hemisphere_sign(hemisphere.trim())?;

    let (whole, fraction) = match value.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (value, None),
    };
    // At least one degree digit followed by two minute digits
    if whole.len() < 3 || !all_digits(whole) {
        return None;
    }
    if let Some(fraction) = fraction {
        if !all_digits(fraction) {
            return None;
        }
    }

    let split = whole.len() - 2;
    let degrees: f64 = whole[..split].parse().ok()?;
    let minutes: f64 = value[split..].parse().ok()?;
    if minutes >= 60.0 {
        return None;
    }

    let decimal = degrees + minutes / 60.0;
    if decimal > axis.max_degrees() {
        return None;
    }
    Some(sign * decimal)
}

/// Finite decimal float
pub fn parse_float(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|parsed| parsed.is_finite())
}

/// GGA fix quality indicator
pub fn parse_quality(value: &str) -> Option<u8> {
    if all_digits(value) {
        value.parse().ok()
    } else {
        None
    }
}

/// Digits-only field kept as text, e.g. satellites in use ("08")
pub fn parse_numeric_string(value: &str) -> Option<String> {
    if all_digits(value) {
        Some(value.to_string())
    } else {
        None
    }
}
