//! Quality segmentation of a fix sequence
//!
//! Records before the first valid fix (gps_qual >= 1) are dropped. After it,
//! records with gps_qual 0 or missing are skipped without closing the current
//! segment, and a new segment starts whenever the quality code changes between
//! consecutive rendered records.

use crate::types::FixRecord;

/// Maximal run of rendered records sharing one quality code
#[derive(Debug, Clone, PartialEq)]
pub struct Segment<'a> {
    pub gps_qual: u8,
    pub records: Vec<&'a FixRecord>,
}

impl Segment<'_> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Segmented view of a fix sequence
#[derive(Debug, Clone, PartialEq)]
pub struct Segmentation<'a> {
    /// First record with a valid fix; camera and tracker start here
    pub anchor: &'a FixRecord,
    pub segments: Vec<Segment<'a>>,
}

impl<'a> Segmentation<'a> {
    /// Rendered records in sequence order
    pub fn rendered(&self) -> impl Iterator<Item = &'a FixRecord> + '_ {
        self.segments
            .iter()
            .flat_map(|segment| segment.records.iter().copied())
    }
}

/// Group records into same-quality segments
///
/// Returns `None` when no record ever reaches a valid fix.
pub fn segment_by_quality(records: &[FixRecord]) -> Option<Segmentation<'_>> {
    let first_fix = records.iter().position(FixRecord::has_valid_quality)?;
    let anchor = &records[first_fix];

    let mut segments: Vec<Segment<'_>> = Vec::new();
    for record in &records[first_fix..] {
        let gps_qual = match record.gps_qual {
            Some(q) if q >= 1 => q,
            _ => continue,
        };

        match segments.last_mut() {
            Some(segment) if segment.gps_qual == gps_qual => segment.records.push(record),
            _ => segments.push(Segment {
                gps_qual,
                records: vec![record],
            }),
        }
    }

    Some(Segmentation { anchor, segments })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(qualities: &[Option<u8>]) -> Vec<FixRecord> {
        qualities
            .iter()
            .enumerate()
            .map(|(i, &gps_qual)| FixRecord {
                gps_qual,
                longitude: Some(i as f64),
                latitude: Some(0.0),
                ..FixRecord::default()
            })
            .collect()
    }

    fn qualities(values: &[u8]) -> Vec<Option<u8>> {
        values.iter().map(|&q| Some(q)).collect()
    }

    #[test]
    fn test_mixed_quality_sequence() {
        let input = records(&qualities(&[0, 0, 1, 1, 2, 2, 2, 1, 0, 4]));
        let segmentation = segment_by_quality(&input).unwrap();

        let rendered: Vec<u8> = segmentation
            .rendered()
            .filter_map(|record| record.gps_qual)
            .collect();
        assert_eq!(rendered, vec![1, 1, 2, 2, 2, 1, 4]);

        let lengths: Vec<usize> = segmentation.segments.iter().map(Segment::len).collect();
        assert_eq!(lengths, vec![2, 3, 1, 1]);

        // Anchor is the first valid fix, at index 2
        assert_eq!(segmentation.anchor.longitude, Some(2.0));
    }

    #[test]
    fn test_invalid_record_does_not_split_a_run() {
        let input = records(&qualities(&[1, 0, 1, 0, 0, 1]));
        let segmentation = segment_by_quality(&input).unwrap();
        assert_eq!(segmentation.segments.len(), 1);
        assert_eq!(segmentation.segments[0].len(), 3);
    }

    #[test]
    fn test_missing_quality_is_skipped() {
        let input = records(&[None, Some(2), None, Some(2), Some(4)]);
        let segmentation = segment_by_quality(&input).unwrap();
        assert_eq!(segmentation.anchor.longitude, Some(1.0));
        let lengths: Vec<usize> = segmentation.segments.iter().map(Segment::len).collect();
        assert_eq!(lengths, vec![2, 1]);
    }

    #[test]
    fn test_no_valid_fix_yields_none() {
        assert!(segment_by_quality(&[]).is_none());
        assert!(segment_by_quality(&records(&qualities(&[0, 0, 0]))).is_none());
        assert!(segment_by_quality(&records(&[None, None])).is_none());
    }

    #[test]
    fn test_every_segment_is_uniform_and_non_empty() {
        let input = records(&qualities(&[5, 5, 7, 1, 0, 2, 2, 8]));
        let segmentation = segment_by_quality(&input).unwrap();
        for segment in &segmentation.segments {
            assert!(!segment.is_empty());
            assert!(segment
                .records
                .iter()
                .all(|record| record.gps_qual == Some(segment.gps_qual)));
        }
        assert_eq!(segmentation.segments.len(), 5);
    }
}
