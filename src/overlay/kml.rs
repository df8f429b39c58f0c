//! KML serialization of the overlay model
//!
//! Layout of the written document:
//! - the tracker placemark moved by the tour
//! - a `gx:Track` placemark named "Track"
//! - a "Points" folder-document of styled markers
//! - a "Lines" folder-document with one placemark per quality segment
//! - a `gx:Tour` named "Tour" holding the playlist

use crate::overlay::{
    AltitudeMode, Camera, Marker, Overlay, PathLine, TourStep, TrackVertex, Tracker,
};
use crate::style::{IconKind, IconSet};
use crate::Result;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Write;

const KML_NAMESPACE: &str = "http://www.opengis.net/kml/2.2";
const GX_NAMESPACE: &str = "http://www.google.com/kml/ext/2.2";

/// Ids tying the tour's animated updates to the tracker placemark
const TRACKER_ID: &str = "tracker";
const TRACKER_POINT_ID: &str = "tracker-point";
const TRACKER_ICON_ID: &str = "tracker-icon";

/// Serialize an overlay as a KML document
pub fn write_kml<W: Write>(overlay: &Overlay, icons: &IconSet, writer: W) -> Result<()> {
    let mut kml = KmlWriter::new(writer);

    kml.declaration()?;
    kml.start_with(
        "kml",
        &[("xmlns", KML_NAMESPACE), ("xmlns:gx", GX_NAMESPACE)],
    )?;
    kml.start("Document")?;

    if let Some(tracker) = &overlay.tracker {
        write_tracker(&mut kml, tracker, icons)?;
        write_track(&mut kml, &overlay.track, icons)?;

        kml.start("Document")?;
        kml.text_element("name", "Points")?;
        for marker in &overlay.markers {
            write_marker(&mut kml, marker, icons)?;
        }
        kml.end("Document")?;

        kml.start("Document")?;
        kml.text_element("name", "Lines")?;
        for line in &overlay.lines {
            write_line(&mut kml, line)?;
        }
        kml.end("Document")?;

        write_tour(&mut kml, &overlay.tour)?;
    }

    kml.end("Document")?;
    kml.end("kml")?;
    Ok(())
}

/// Serialize an overlay to a KML string
pub fn render_kml(overlay: &Overlay, icons: &IconSet) -> Result<String> {
    let mut buffer = Vec::new();
    write_kml(overlay, icons, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

fn write_tracker<W: Write>(kml: &mut KmlWriter<W>, tracker: &Tracker, icons: &IconSet) -> Result<()> {
    kml.start_with("Placemark", &[("id", TRACKER_ID)])?;
    kml.text_element("name", "")?;
    kml.start("Style")?;
    kml.start_with("IconStyle", &[("id", TRACKER_ICON_ID)])?;
    kml.number_element("scale", tracker.scale)?;
    kml.number_element("heading", tracker.heading)?;
    write_icon(kml, icons.href(IconKind::Arrow))?;
    kml.centered_hotspot()?;
    kml.end("IconStyle")?;
    kml.end("Style")?;
    kml.start_with("Point", &[("id", TRACKER_POINT_ID)])?;
    kml.text_element("coordinates", &coordinate(tracker.longitude, tracker.latitude))?;
    kml.end("Point")?;
    kml.end("Placemark")
}

fn write_track<W: Write>(kml: &mut KmlWriter<W>, track: &[TrackVertex], icons: &IconSet) -> Result<()> {
    kml.start("Placemark")?;
    kml.text_element("name", "Track")?;
    kml.start("Style")?;
    kml.start("IconStyle")?;
    write_icon(kml, icons.href(IconKind::Arrow))?;
    kml.centered_hotspot()?;
    kml.end("IconStyle")?;
    kml.end("Style")?;

    kml.start("gx:Track")?;
    kml.text_element("altitudeMode", AltitudeMode::ClampToGround.as_str())?;
    for vertex in track {
        kml.text_element("when", &vertex.when.format("%Y-%m-%dT%H:%M:%S%.f").to_string())?;
    }
    for vertex in track {
        kml.text_element(
            "gx:coord",
            &format!("{} {} 0", vertex.longitude, vertex.latitude),
        )?;
    }
    kml.end("gx:Track")?;
    kml.end("Placemark")
}

fn write_marker<W: Write>(kml: &mut KmlWriter<W>, marker: &Marker, icons: &IconSet) -> Result<()> {
    kml.start("Placemark")?;
    kml.text_element("name", "")?;
    kml.start("Style")?;
    kml.start("IconStyle")?;
    kml.text_element("color", &marker.style.color.to_string())?;
    if let Some(scale) = marker.style.marker_scale {
        kml.number_element("scale", scale)?;
    }
    if let Some(heading) = marker.heading {
        kml.number_element("heading", heading)?;
    }
    write_icon(kml, icons.href(marker.style.icon))?;
    kml.centered_hotspot()?;
    kml.end("IconStyle")?;
    kml.end("Style")?;
    kml.start("Point")?;
    kml.text_element("coordinates", &coordinate(marker.longitude, marker.latitude))?;
    kml.end("Point")?;
    kml.end("Placemark")
}

fn write_line<W: Write>(kml: &mut KmlWriter<W>, line: &PathLine) -> Result<()> {
    kml.start("Placemark")?;
    kml.text_element("name", &line.name)?;
    kml.start("Style")?;
    kml.start("LineStyle")?;
    kml.text_element("color", &line.color.to_string())?;
    kml.number_element("width", line.width)?;
    kml.end("LineStyle")?;
    kml.end("Style")?;
    kml.start("LineString")?;
    kml.text_element("altitudeMode", AltitudeMode::ClampToGround.as_str())?;
    let coordinates: Vec<String> = line
        .coordinates
        .iter()
        .map(|&(lon, lat)| coordinate(lon, lat))
        .collect();
    kml.text_element("coordinates", &coordinates.join(" "))?;
    kml.end("LineString")?;
    kml.end("Placemark")
}

fn write_tour<W: Write>(kml: &mut KmlWriter<W>, tour: &[TourStep]) -> Result<()> {
    kml.start("gx:Tour")?;
    kml.text_element("name", "Tour")?;
    kml.start("gx:Playlist")?;

    for step in tour {
        match step {
            TourStep::FlyTo { duration, camera } => {
                kml.start("gx:FlyTo")?;
                kml.number_element("gx:duration", *duration)?;
                kml.text_element("gx:flyToMode", "smooth")?;
                write_camera(kml, camera)?;
                kml.end("gx:FlyTo")?;
            }
            TourStep::Wait { duration } => {
                kml.start("gx:Wait")?;
                kml.number_element("gx:duration", *duration)?;
                kml.end("gx:Wait")?;
            }
            TourStep::MoveTracker {
                duration,
                longitude,
                latitude,
            } => {
                start_update(kml, *duration)?;
                kml.start_with("Point", &[("targetId", TRACKER_POINT_ID)])?;
                kml.text_element("coordinates", &coordinate(*longitude, *latitude))?;
                kml.end("Point")?;
                end_update(kml)?;
            }
            TourStep::RotateTracker { duration, heading } => {
                start_update(kml, *duration)?;
                kml.start_with("IconStyle", &[("targetId", TRACKER_ICON_ID)])?;
                kml.number_element("heading", *heading)?;
                kml.end("IconStyle")?;
                end_update(kml)?;
            }
        }
    }

    kml.end("gx:Playlist")?;
    kml.end("gx:Tour")
}

fn write_camera<W: Write>(kml: &mut KmlWriter<W>, camera: &Camera) -> Result<()> {
    kml.start("Camera")?;
    kml.number_element("longitude", camera.longitude)?;
    kml.number_element("latitude", camera.latitude)?;
    kml.number_element("altitude", camera.altitude)?;
    if let Some(heading) = camera.heading {
        kml.number_element("heading", heading)?;
    }
    if let Some(tilt) = camera.tilt {
        kml.number_element("tilt", tilt)?;
    }
    if let Some(roll) = camera.roll {
        kml.number_element("roll", roll)?;
    }
    if let Some(mode) = camera.altitude_mode {
        kml.text_element("altitudeMode", mode.as_str())?;
    }
    kml.end("Camera")
}

fn write_icon<W: Write>(kml: &mut KmlWriter<W>, href: &str) -> Result<()> {
    kml.start("Icon")?;
    kml.text_element("href", href)?;
    kml.end("Icon")
}

fn start_update<W: Write>(kml: &mut KmlWriter<W>, duration: f64) -> Result<()> {
    kml.start("gx:AnimatedUpdate")?;
    kml.number_element("gx:duration", duration)?;
    kml.start("Update")?;
    kml.text_element("targetHref", "")?;
    kml.start("Change")
}

fn end_update<W: Write>(kml: &mut KmlWriter<W>) -> Result<()> {
    kml.end("Change")?;
    kml.end("Update")?;
    kml.end("gx:AnimatedUpdate")
}

fn coordinate(longitude: f64, latitude: f64) -> String {
    format!("{},{},0", longitude, latitude)
}

/// Thin element-level wrapper over the quick-xml event writer
struct KmlWriter<W: Write> {
    inner: Writer<W>,
}

impl<W: Write> KmlWriter<W> {
    fn new(writer: W) -> Self {
        Self {
            inner: Writer::new_with_indent(writer, b' ', 2),
        }
    }

    fn declaration(&mut self) -> Result<()> {
        self.inner
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        Ok(())
    }

    fn start(&mut self, name: &str) -> Result<()> {
        self.start_with(name, &[])
    }

    fn start_with(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<()> {
        let mut element = BytesStart::new(name);
        for &attribute in attributes {
            element.push_attribute(attribute);
        }
        self.inner.write_event(Event::Start(element))?;
        Ok(())
    }

    fn end(&mut self, name: &str) -> Result<()> {
        self.inner.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    fn empty_with(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<()> {
        let mut element = BytesStart::new(name);
        for &attribute in attributes {
            element.push_attribute(attribute);
        }
        self.inner.write_event(Event::Empty(element))?;
        Ok(())
    }

    /// `<name>text</name>`, or `<name/>` for empty text
    fn text_element(&mut self, name: &str, text: &str) -> Result<()> {
        if text.is_empty() {
            return self.empty_with(name, &[]);
        }
        self.start(name)?;
        self.inner.write_event(Event::Text(BytesText::new(text)))?;
        self.end(name)
    }

    fn number_element(&mut self, name: &str, value: f64) -> Result<()> {
        self.text_element(name, &value.to_string())
    }

    fn centered_hotspot(&mut self) -> Result<()> {
        self.empty_with(
            "hotSpot",
            &[
                ("x", "0.5"),
                ("y", "0.5"),
                ("xunits", "fraction"),
                ("yunits", "fraction"),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::build_overlay;
    use crate::types::FixRecord;
    use chrono::{NaiveDate, NaiveTime};

    fn fix(gps_qual: u8, second: u32, course: Option<f64>) -> FixRecord {
        FixRecord {
            datestamp: NaiveDate::from_ymd_opt(2021, 3, 4),
            timestamp: NaiveTime::from_hms_opt(12, 0, second),
            longitude: Some(11.5),
            latitude: Some(48.25),
            gps_qual: Some(gps_qual),
            true_course: course,
            ..FixRecord::default()
        }
    }

    #[test]
    fn test_empty_overlay_writes_bare_document() {
        let kml = render_kml(&Overlay::default(), &IconSet::default()).unwrap();
        assert!(kml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(kml.contains("<kml xmlns=\"http://www.opengis.net/kml/2.2\""));
        assert!(!kml.contains("<Placemark"));
        assert!(!kml.contains("gx:Tour"));
    }

    #[test]
    fn test_document_sections() {
        let overlay = build_overlay(&[fix(0, 0, None), fix(1, 1, Some(90.0)), fix(4, 2, None)]);
        let kml = render_kml(&overlay, &IconSet::default()).unwrap();

        assert!(kml.contains("<name>Track</name>"));
        assert!(kml.contains("<name>Points</name>"));
        assert!(kml.contains("<name>Lines</name>"));
        assert!(kml.contains("<name>Tour</name>"));
        assert!(kml.contains("<when>2021-03-04T12:00:01</when>"));
        assert!(kml.contains("<gx:coord>11.5 48.25 0</gx:coord>"));
        assert!(kml.contains("<name>GPS fixed</name>"));
        assert!(kml.contains("<name>RTK fixed</name>"));
        assert!(kml.contains("<href>../icon/arrow.png</href>"));
        assert_eq!(kml.matches("<gx:AnimatedUpdate>").count(), 3);
        assert_eq!(kml.matches("<gx:FlyTo>").count(), 4);
        assert_eq!(kml.matches("<gx:Wait>").count(), 1);
        assert!(kml.contains("<Point targetId=\"tracker-point\">"));
        assert!(kml.contains("<IconStyle targetId=\"tracker-icon\">"));
        assert!(kml.contains("<altitudeMode>relativeToGround</altitudeMode>"));
    }

    #[test]
    fn test_fallback_marker_uses_forbidden_icon() {
        let overlay = build_overlay(&[fix(7, 0, None)]);
        let kml = render_kml(&overlay, &IconSet::with_base("icons")).unwrap();
        assert!(kml.contains("<href>icons/forbidden.png</href>"));
        assert!(kml.contains("<color>ff0000ff</color>"));
        assert!(kml.contains("<name>GPS quality indicator = 7</name>"));
    }

    #[test]
    fn test_text_is_escaped() {
        let overlay = build_overlay(&[fix(1, 0, None)]);
        let icons = IconSet {
            arrow: "a.png?x=1&y=2".to_string(),
            forbidden: "f.png".to_string(),
        };
        let kml = render_kml(&overlay, &icons).unwrap();
        assert!(kml.contains("a.png?x=1&amp;y=2"));
    }
}
