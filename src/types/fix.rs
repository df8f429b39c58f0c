use crate::types::message::{GgaData, HdtData, RmcData};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize, Serializer};

/// Column order of the persisted fix table
pub const FIX_COLUMNS: [&str; 10] = [
    "datestamp",
    "timestamp",
    "longitude",
    "latitude",
    "gps_qual",
    "num_sats",
    "spd_over_grnd",
    "true_course",
    "heading",
    "altitude",
];

/// One merged navigation epoch
///
/// Opened by a GGA sentence and enriched by the RMC/HDT sentences that arrive
/// before the next GGA. Every field is independently optional: a field that
/// failed validation, or whose sentence never arrived, stays `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FixRecord {
    pub datestamp: Option<NaiveDate>,
    #[serde(serialize_with = "serialize_fix_time")]
    pub timestamp: Option<NaiveTime>,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub gps_qual: Option<u8>,
    pub num_sats: Option<String>,
    #[serde(rename = "spd_over_grnd")]
    pub speed_over_ground: Option<f64>,
    pub true_course: Option<f64>,
    pub heading: Option<f64>,
    pub altitude: Option<f64>,
}

/// `HH:MM:SS`, or `HH:MM:SS.ffffff` when the time has a fraction
fn serialize_fix_time<S: Serializer>(
    time: &Option<NaiveTime>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match time {
        Some(time) if time.nanosecond() != 0 => {
            serializer.collect_str(&time.format("%H:%M:%S%.6f"))
        }
        Some(time) => serializer.collect_str(&time.format("%H:%M:%S")),
        None => serializer.serialize_none(),
    }
}

impl FixRecord {
    /// Open a new record from GGA fields; RMC/HDT fields start unset
    pub fn from_gga(gga: GgaData) -> Self {
        Self {
            timestamp: gga.timestamp,
            longitude: gga.longitude,
            latitude: gga.latitude,
            gps_qual: gga.gps_qual,
            num_sats: gga.num_sats,
            altitude: gga.altitude,
            ..Self::default()
        }
    }

    /// Overwrite date, speed and course (last write wins)
    pub fn apply_rmc(&mut self, rmc: RmcData) {
        self.datestamp = rmc.datestamp;
        self.speed_over_ground = rmc.speed_over_ground;
        self.true_course = rmc.true_course;
    }

    pub fn apply_hdt(&mut self, hdt: HdtData) {
        self.heading = hdt.heading;
    }

    /// True when the record carries a usable fix quality (1 or above)
    pub fn has_valid_quality(&self) -> bool {
        matches!(self.gps_qual, Some(q) if q >= 1)
    }

    /// (longitude, latitude) when both are present
    pub fn position(&self) -> Option<(f64, f64)> {
        Some((self.longitude?, self.latitude?))
    }

    /// Combined date and time of the fix, used as the track `<when>`
    pub fn datetime(&self) -> Option<NaiveDateTime> {
        Some(self.datestamp?.and_time(self.timestamp?))
    }
}
