//! Styling by GPS quality code
//!
//! One table drives both point markers and path lines, so the two can never
//! disagree about what a quality code looks like.

use std::fmt;

/// KML color, `aabbggrr` as KML writes it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KmlColor(pub u32);

impl KmlColor {
    pub const ORANGE: KmlColor = KmlColor(0xff00a5ff);
    pub const YELLOW: KmlColor = KmlColor(0xff00ffff);
    pub const GREEN: KmlColor = KmlColor(0xff008000);
    pub const RED: KmlColor = KmlColor(0xff0000ff);
}

impl fmt::Display for KmlColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}", self.0)
    }
}

/// Icon assets referenced by the overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconKind {
    Arrow,
    Forbidden,
}

/// Where the overlay finds its icon images
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconSet {
    pub arrow: String,
    pub forbidden: String,
}

impl IconSet {
    /// Icons named `arrow.png` and `forbidden.png` under `base`
    pub fn with_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            arrow: format!("{}/arrow.png", base),
            forbidden: format!("{}/forbidden.png", base),
        }
    }

    pub fn href(&self, icon: IconKind) -> &str {
        match icon {
            IconKind::Arrow => &self.arrow,
            IconKind::Forbidden => &self.forbidden,
        }
    }
}

impl Default for IconSet {
    fn default() -> Self {
        Self::with_base(DEFAULT_ICON_BASE)
    }
}

/// Icon location relative to the generated KML
pub const DEFAULT_ICON_BASE: &str = "../icon";

/// Appearance of one quality code
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityStyle {
    /// Line name; `None` for the fallback, whose name carries the code
    pub name: Option<&'static str>,
    pub color: KmlColor,
    pub icon: IconKind,
    /// Marker icon scale; `None` keeps the viewer default
    pub marker_scale: Option<f64>,
}

impl QualityStyle {
    /// Name for a path line drawn with this style
    pub fn line_name(&self, gps_qual: u8) -> String {
        match self.name {
            Some(name) => name.to_string(),
            None => format!("GPS quality indicator = {}", gps_qual),
        }
    }
}

const FIX_MARKER_SCALE: f64 = 0.3;

static QUALITY_STYLES: [(u8, QualityStyle); 3] = [
    (
        1,
        QualityStyle {
            name: Some("GPS fixed"),
            color: KmlColor::ORANGE,
            icon: IconKind::Arrow,
            marker_scale: Some(FIX_MARKER_SCALE),
        },
    ),
    (
        2,
        QualityStyle {
            name: Some("DGPS fixed"),
            color: KmlColor::YELLOW,
            icon: IconKind::Arrow,
            marker_scale: Some(FIX_MARKER_SCALE),
        },
    ),
    (
        4,
        QualityStyle {
            name: Some("RTK fixed"),
            color: KmlColor::GREEN,
            icon: IconKind::Arrow,
            marker_scale: Some(FIX_MARKER_SCALE),
        },
    ),
];

/// Style for every code not in the table
pub static FALLBACK_STYLE: QualityStyle = QualityStyle {
    name: None,
    color: KmlColor::RED,
    icon: IconKind::Forbidden,
    marker_scale: None,
};

/// Result of looking up a quality code
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StyleLookup {
    Known(&'static QualityStyle),
    /// Code not handled; rendered with [`FALLBACK_STYLE`] and reported
    Fallback(&'static QualityStyle),
}

impl StyleLookup {
    pub fn style(&self) -> &'static QualityStyle {
        match self {
            StyleLookup::Known(style) | StyleLookup::Fallback(style) => style,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, StyleLookup::Fallback(_))
    }
}

/// Look up the style for a GGA quality code
pub fn style_for_quality(gps_qual: u8) -> StyleLookup {
    QUALITY_STYLES
        .iter()
        .find(|(code, _)| *code == gps_qual)
        .map(|(_, style)| StyleLookup::Known(style))
        .unwrap_or(StyleLookup::Fallback(&FALLBACK_STYLE))
}
