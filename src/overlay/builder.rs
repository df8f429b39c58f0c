//! Building the overlay from a fix sequence
//!
//! Walks the quality segmentation in order. Every rendered record yields a
//! track vertex, a styled marker, a vertex on its segment's line and a set of
//! tour keyframes following the tracker.

use crate::overlay::{
    Camera, Marker, Overlay, PathLine, QualityAnomaly, TourStep, TrackVertex, Tracker,
    APPROACH_FLYTO_SECONDS, FOLLOW_ALTITUDE_M, KEYFRAME_SECONDS, LINE_WIDTH,
    OVERVIEW_ALTITUDE_M, OVERVIEW_FLYTO_SECONDS, OVERVIEW_WAIT_SECONDS, TRACKER_SCALE,
};
use crate::segment::{segment_by_quality, Segmentation};
use crate::style::style_for_quality;
use crate::types::FixRecord;
use tracing::{debug, warn};

/// Build the overlay for an ordered fix sequence
///
/// Without any valid fix there is nothing to anchor the camera on and the
/// overlay is empty; that is a normal outcome, not an error.
pub fn build_overlay(records: &[FixRecord]) -> Overlay {
    match segment_by_quality(records) {
        Some(segmentation) => build_from_segmentation(&segmentation),
        None => {
            debug!("No record with a valid fix; overlay is empty");
            Overlay::default()
        }
    }
}

/// Build the overlay from an existing segmentation
pub fn build_from_segmentation(segmentation: &Segmentation<'_>) -> Overlay {
    // The anchor normally is the first valid fix; if it has no position use
    // the first rendered record that does.
    let anchor = segmentation
        .anchor
        .position()
        .or_else(|| segmentation.rendered().find_map(FixRecord::position));
    let Some((anchor_lon, anchor_lat)) = anchor else {
        debug!("No valid fix carries a position; overlay is empty");
        return Overlay::default();
    };

    let mut overlay = Overlay {
        tracker: Some(Tracker {
            longitude: anchor_lon,
            latitude: anchor_lat,
            heading: 0.0,
            scale: TRACKER_SCALE,
        }),
        ..Overlay::default()
    };

    overlay.tour.push(TourStep::FlyTo {
        duration: OVERVIEW_FLYTO_SECONDS,
        camera: Camera::above(anchor_lon, anchor_lat, OVERVIEW_ALTITUDE_M),
    });
    overlay.tour.push(TourStep::Wait {
        duration: OVERVIEW_WAIT_SECONDS,
    });
    overlay.tour.push(TourStep::FlyTo {
        duration: APPROACH_FLYTO_SECONDS,
        camera: Camera::above(anchor_lon, anchor_lat, FOLLOW_ALTITUDE_M),
    });

    let mut rendered_index = 0;
    for segment in &segmentation.segments {
        let lookup = style_for_quality(segment.gps_qual);
        let style = lookup.style();
        let mut line = PathLine {
            name: style.line_name(segment.gps_qual),
            gps_qual: segment.gps_qual,
            color: style.color,
            width: LINE_WIDTH,
            coordinates: Vec::with_capacity(segment.len()),
        };

        for record in &segment.records {
            if lookup.is_fallback() {
                warn!("Unprocessed GPS quality indicator: {}", segment.gps_qual);
                overlay.anomalies.push(QualityAnomaly {
                    rendered_index,
                    gps_qual: segment.gps_qual,
                });
            }
            rendered_index += 1;

            let Some((longitude, latitude)) = record.position() else {
                debug!(
                    "Fix at {:?} has no position; no geometry drawn",
                    record.timestamp
                );
                continue;
            };

            match record.datetime() {
                Some(when) => overlay.track.push(TrackVertex {
                    when,
                    longitude,
                    latitude,
                }),
                None => debug!(
                    "Fix at ({}, {}) lacks date or time; left off the track",
                    longitude, latitude
                ),
            }

            overlay.markers.push(Marker {
                longitude,
                latitude,
                gps_qual: segment.gps_qual,
                style,
                heading: record.true_course,
            });

            line.coordinates.push((longitude, latitude));

            push_follow_keyframes(&mut overlay.tour, longitude, latitude, record.true_course);
        }

        if !line.coordinates.is_empty() {
            overlay.lines.push(line);
        }
    }

    overlay
}

/// Keyframes moving the tracker to a fix and the camera after it
fn push_follow_keyframes(
    tour: &mut Vec<TourStep>,
    longitude: f64,
    latitude: f64,
    true_course: Option<f64>,
) {
    tour.push(TourStep::MoveTracker {
        duration: KEYFRAME_SECONDS,
        longitude,
        latitude,
    });
    if let Some(heading) = true_course {
        tour.push(TourStep::RotateTracker {
            duration: KEYFRAME_SECONDS,
            heading,
        });
    }
    tour.push(TourStep::FlyTo {
        duration: KEYFRAME_SECONDS,
        camera: Camera::level(longitude, latitude, FOLLOW_ALTITUDE_M),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{IconKind, KmlColor};
    use chrono::{NaiveDate, NaiveTime};

    fn fix(gps_qual: u8, index: u32) -> FixRecord {
        FixRecord {
            datestamp: NaiveDate::from_ymd_opt(2021, 3, 4),
            timestamp: NaiveTime::from_hms_opt(12, 0, index),
            longitude: Some(11.0 + index as f64 * 0.001),
            latitude: Some(48.0),
            gps_qual: Some(gps_qual),
            ..FixRecord::default()
        }
    }

    fn sequence(qualities: &[u8]) -> Vec<FixRecord> {
        qualities
            .iter()
            .enumerate()
            .map(|(i, &q)| fix(q, i as u32))
            .collect()
    }

    #[test]
    fn test_no_valid_fix_gives_empty_overlay() {
        let overlay = build_overlay(&sequence(&[0, 0, 0]));
        assert!(overlay.is_empty());
        assert!(overlay.tour.is_empty());
        assert!(overlay.markers.is_empty());
        assert!(build_overlay(&[]).is_empty());
    }

    #[test]
    fn test_lines_follow_segments() {
        let overlay = build_overlay(&sequence(&[0, 0, 1, 1, 2, 2, 2, 1, 0, 4]));

        let names: Vec<&str> = overlay.lines.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["GPS fixed", "DGPS fixed", "GPS fixed", "RTK fixed"]);
        let lengths: Vec<usize> = overlay.lines.iter().map(|l| l.coordinates.len()).collect();
        assert_eq!(lengths, vec![2, 3, 1, 1]);
        assert!(overlay.lines.iter().all(|l| l.width == LINE_WIDTH));

        assert_eq!(overlay.markers.len(), 7);
        assert_eq!(overlay.track.len(), 7);
        assert!(overlay.anomalies.is_empty());
    }

    #[test]
    fn test_opening_shots_center_on_first_fix() {
        let records = sequence(&[0, 2, 2]);
        let first_fix_lon = records[1].longitude.unwrap();
        let overlay = build_overlay(&records);
        let tracker = overlay.tracker.as_ref().unwrap();
        assert_eq!(tracker.longitude, first_fix_lon);
        assert_eq!(tracker.heading, 0.0);
        assert_eq!(tracker.scale, TRACKER_SCALE);

        match &overlay.tour[..3] {
            [TourStep::FlyTo {
                duration: d1,
                camera: overview,
            }, TourStep::Wait { duration: wait }, TourStep::FlyTo {
                duration: d2,
                camera: approach,
            }] => {
                assert_eq!(*d1, OVERVIEW_FLYTO_SECONDS);
                assert_eq!(overview.altitude, OVERVIEW_ALTITUDE_M);
                assert_eq!(overview.longitude, first_fix_lon);
                assert_eq!(*wait, OVERVIEW_WAIT_SECONDS);
                assert_eq!(*d2, APPROACH_FLYTO_SECONDS);
                assert_eq!(approach.altitude, FOLLOW_ALTITUDE_M);
                assert_eq!(approach.tilt, None);
            }
            other => panic!("unexpected opening keyframes: {other:?}"),
        }
    }

    #[test]
    fn test_unsupported_quality_uses_fallback_and_reports_each_occurrence() {
        let overlay = build_overlay(&sequence(&[1, 7, 7, 1, 7]));

        assert_eq!(overlay.anomalies.len(), 3);
        assert!(overlay.anomalies.iter().all(|a| a.gps_qual == 7));
        let indices: Vec<usize> = overlay.anomalies.iter().map(|a| a.rendered_index).collect();
        assert_eq!(indices, vec![1, 2, 4]);

        let marker = &overlay.markers[1];
        assert_eq!(marker.style.icon, IconKind::Forbidden);
        assert_eq!(marker.style.color, KmlColor::RED);

        let line = &overlay.lines[1];
        assert_eq!(line.name, "GPS quality indicator = 7");
        assert_eq!(line.color, KmlColor::RED);
    }

    #[test]
    fn test_course_drives_marker_heading_and_rotation() {
        let mut records = sequence(&[1, 1]);
        records[0].true_course = Some(84.4);

        let overlay = build_overlay(&records);
        assert_eq!(overlay.markers[0].heading, Some(84.4));
        assert_eq!(overlay.markers[1].heading, None);

        // 3 opening steps, then move+rotate+fly, then move+fly
        assert_eq!(overlay.tour.len(), 3 + 3 + 2);
        assert!(matches!(
            overlay.tour[4],
            TourStep::RotateTracker { heading, .. } if heading == 84.4
        ));
        match &overlay.tour[7] {
            TourStep::FlyTo { duration, camera } => {
                assert_eq!(*duration, KEYFRAME_SECONDS);
                assert_eq!(camera.altitude, FOLLOW_ALTITUDE_M);
                assert_eq!(camera.tilt, Some(0.0));
                assert_eq!(camera.heading, Some(0.0));
                assert_eq!(camera.roll, Some(0.0));
            }
            other => panic!("expected fly-to, got {other:?}"),
        }
    }

    #[test]
    fn test_records_without_date_are_left_off_track_only() {
        let mut records = sequence(&[1, 1, 1]);
        records[1].datestamp = None;

        let overlay = build_overlay(&records);
        assert_eq!(overlay.track.len(), 2);
        assert_eq!(overlay.markers.len(), 3);
        assert_eq!(overlay.lines[0].coordinates.len(), 3);
    }

    #[test]
    fn test_positionless_anchor_falls_back_to_next_position() {
        let mut records = sequence(&[1, 1]);
        records[0].longitude = None;

        let overlay = build_overlay(&records);
        assert_eq!(
            overlay.tracker.as_ref().unwrap().longitude,
            records[1].longitude.unwrap()
        );
        assert_eq!(overlay.markers.len(), 1);
    }
}
