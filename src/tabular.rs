//! CSV persistence of fix records
//!
//! One row per record, columns in [`FIX_COLUMNS`] order, missing values as
//! empty fields. The header is always written, even for an empty log.

use crate::types::{FixRecord, FIX_COLUMNS};
use crate::Result;
use anyhow::Context;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

/// Write records as CSV
pub fn write_fix_csv<W: Write>(records: &[FixRecord], writer: W) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    csv_writer.write_record(FIX_COLUMNS)?;
    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Read records back from CSV
///
/// Columns are matched by header name, so extra columns are ignored.
pub fn read_fix_csv<R: Read>(reader: R) -> Result<Vec<FixRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for (index, row) in csv_reader.deserialize::<FixRecord>().enumerate() {
        // Row 1 is the header
        let record = row.with_context(|| format!("Invalid fix record on row {}", index + 2))?;
        records.push(record);
    }
    Ok(records)
}

pub fn write_fix_csv_file(records: &[FixRecord], output_path: &Path) -> Result<()> {
    let file = File::create(output_path)
        .with_context(|| format!("Failed to create CSV file: {:?}", output_path))?;
    let mut writer = BufWriter::new(file);
    write_fix_csv(records, &mut writer)?;
    writer
        .flush()
        .with_context(|| format!("Failed to flush CSV file: {:?}", output_path))?;
    Ok(())
}

pub fn read_fix_csv_file(input_path: &Path) -> Result<Vec<FixRecord>> {
    let file = File::open(input_path)
        .with_context(|| format!("Failed to open CSV file: {:?}", input_path))?;
    read_fix_csv(file).with_context(|| format!("Failed to read CSV file: {:?}", input_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn sample() -> FixRecord {
        FixRecord {
            datestamp: NaiveDate::from_ymd_opt(2021, 3, 4),
            timestamp: NaiveTime::from_hms_micro_opt(12, 0, 1, 500_000),
            longitude: Some(11.5),
            latitude: Some(-48.25),
            gps_qual: Some(4),
            num_sats: Some("08".to_string()),
            speed_over_ground: Some(0.02),
            true_course: None,
            heading: Some(45.0),
            altitude: Some(545.4),
        }
    }

    #[test]
    fn test_header_written_for_empty_log() {
        let mut buffer = Vec::new();
        write_fix_csv(&[], &mut buffer).unwrap();
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "datestamp,timestamp,longitude,latitude,gps_qual,num_sats,spd_over_grnd,true_course,heading,altitude\n"
        );
    }

    #[test]
    fn test_row_layout() {
        let mut buffer = Vec::new();
        write_fix_csv(&[sample(), FixRecord::default()], &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[1],
            "2021-03-04,12:00:01.500000,11.5,-48.25,4,08,0.02,,45.0,545.4"
        );
        assert_eq!(lines[2], ",,,,,,,,,");
    }

    #[test]
    fn test_time_fraction_is_fixed_width() {
        let records = [
            FixRecord {
                timestamp: NaiveTime::from_hms_micro_opt(8, 15, 0, 250),
                ..FixRecord::default()
            },
            FixRecord {
                timestamp: NaiveTime::from_hms_opt(8, 15, 1),
                ..FixRecord::default()
            },
        ];
        let mut buffer = Vec::new();
        write_fix_csv(&records, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[1], ",08:15:00.000250,,,,,,,,");
        assert_eq!(lines[2], ",08:15:01,,,,,,,,");

        assert_eq!(read_fix_csv(text.as_bytes()).unwrap(), records);
    }

    #[test]
    fn test_read_back_preserves_values() {
        let mut buffer = Vec::new();
        write_fix_csv(&[sample(), FixRecord::default()], &mut buffer).unwrap();

        let records = read_fix_csv(buffer.as_slice()).unwrap();
        assert_eq!(records, vec![sample(), FixRecord::default()]);
    }

    #[test]
    fn test_read_reports_bad_row() {
        let text = "datestamp,timestamp,longitude,latitude,gps_qual,num_sats,spd_over_grnd,true_course,heading,altitude\n\
                    2021-03-04,12:00:00,11.5,48.0,one,08,,,,\n";
        let err = read_fix_csv(text.as_bytes()).unwrap_err();
        assert!(format!("{err:#}").contains("row 2"));
    }
}
