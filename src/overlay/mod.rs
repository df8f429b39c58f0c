//! Overlay model: the geometry and tour rendered from a fix sequence
//!
//! The model is independent of any file format; [`kml`] serializes it.

pub mod builder;
pub mod kml;

pub use builder::*;
pub use kml::*;

use crate::style::{KmlColor, QualityStyle};
use chrono::NaiveDateTime;

/// Camera altitude of the opening overview shot (meters)
pub const OVERVIEW_ALTITUDE_M: f64 = 5000.0;
/// Camera altitude of the approach shot and of every follow keyframe (meters)
pub const FOLLOW_ALTITUDE_M: f64 = 250.0;

pub const OVERVIEW_FLYTO_SECONDS: f64 = 1.0;
pub const OVERVIEW_WAIT_SECONDS: f64 = 3.0;
pub const APPROACH_FLYTO_SECONDS: f64 = 5.0;
/// Duration of every per-record keyframe
pub const KEYFRAME_SECONDS: f64 = 0.05;

pub const LINE_WIDTH: f64 = 5.0;
pub const TRACKER_SCALE: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AltitudeMode {
    ClampToGround,
    RelativeToGround,
}

impl AltitudeMode {
    pub fn as_str(self) -> &'static str {
        match self {
            AltitudeMode::ClampToGround => "clampToGround",
            AltitudeMode::RelativeToGround => "relativeToGround",
        }
    }
}

/// Camera placement for a fly-to keyframe; unset angles keep viewer defaults
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub longitude: f64,
    pub latitude: f64,
    pub altitude: f64,
    pub heading: Option<f64>,
    pub tilt: Option<f64>,
    pub roll: Option<f64>,
    pub altitude_mode: Option<AltitudeMode>,
}

impl Camera {
    /// Camera above a point with no orientation set
    pub fn above(longitude: f64, latitude: f64, altitude: f64) -> Self {
        Self {
            longitude,
            latitude,
            altitude,
            heading: None,
            tilt: None,
            roll: None,
            altitude_mode: None,
        }
    }

    /// Level camera, north up, relative to the ground
    pub fn level(longitude: f64, latitude: f64, altitude: f64) -> Self {
        Self {
            heading: Some(0.0),
            tilt: Some(0.0),
            roll: Some(0.0),
            altitude_mode: Some(AltitudeMode::RelativeToGround),
            ..Self::above(longitude, latitude, altitude)
        }
    }
}

/// One entry of the tour playlist
#[derive(Debug, Clone, PartialEq)]
pub enum TourStep {
    /// Smooth camera flight
    FlyTo { duration: f64, camera: Camera },
    Wait { duration: f64 },
    /// Animated update moving the tracker placemark
    MoveTracker {
        duration: f64,
        longitude: f64,
        latitude: f64,
    },
    /// Animated update turning the tracker icon
    RotateTracker { duration: f64, heading: f64 },
}

/// The single placemark the tour moves along the path
#[derive(Debug, Clone, PartialEq)]
pub struct Tracker {
    pub longitude: f64,
    pub latitude: f64,
    pub heading: f64,
    pub scale: f64,
}

/// Time-tagged vertex of the animated track
#[derive(Debug, Clone, PartialEq)]
pub struct TrackVertex {
    pub when: NaiveDateTime,
    pub longitude: f64,
    pub latitude: f64,
}

/// Styled point marker for one rendered fix
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub longitude: f64,
    pub latitude: f64,
    pub gps_qual: u8,
    pub style: &'static QualityStyle,
    /// Icon rotation, from the RMC true course
    pub heading: Option<f64>,
}

/// Path line for one quality segment
#[derive(Debug, Clone, PartialEq)]
pub struct PathLine {
    pub name: String,
    pub gps_qual: u8,
    pub color: KmlColor,
    pub width: f64,
    pub coordinates: Vec<(f64, f64)>,
}

/// A rendered fix whose quality code has no dedicated style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualityAnomaly {
    /// Position in the rendered sequence
    pub rendered_index: usize,
    pub gps_qual: u8,
}

/// Everything needed to write the overlay document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overlay {
    pub tracker: Option<Tracker>,
    pub track: Vec<TrackVertex>,
    pub markers: Vec<Marker>,
    pub lines: Vec<PathLine>,
    pub tour: Vec<TourStep>,
    pub anomalies: Vec<QualityAnomaly>,
}

impl Overlay {
    /// True when no record ever reached a valid fix
    pub fn is_empty(&self) -> bool {
        self.tracker.is_none()
    }
}
