//! Log to KML Example
//!
//! Demonstrates both conversion stages on one NMEA capture: the raw log is
//! parsed into a fix table (CSV), and the table is rendered as a KML overlay.
//!
//! Outputs land beside the input unless an output directory is given. Existing
//! outputs are skipped, as the command-line tool does.

use nmea2kml::{
    compute_export_path, convert_csv_to_kml, convert_log_to_csv, parse_nmea_file,
    ExportOptions,
};
use std::path::Path;

fn main() -> anyhow::Result<()> {
    // Get input file from command line or show usage
    let input_file = std::env::args().nth(1).unwrap_or_else(|| {
        println!("Usage: log_to_kml <capture.txt> [output_dir]");
        println!("Example: log_to_kml raw/drive.txt ./output");
        std::process::exit(1);
    });

    let export_opts = ExportOptions {
        output_dir: std::env::args().nth(2),
        ..ExportOptions::default()
    };

    let input = Path::new(&input_file);
    let log = parse_nmea_file(input)?;
    println!(
        "Parsed {} lines: {} GGA, {} RMC, {} HDT, {} rejected",
        log.stats.lines,
        log.stats.gga_sentences,
        log.stats.rmc_sentences,
        log.stats.hdt_sentences,
        log.stats.rejected_sentences
    );
    if !log.has_valid_fix() {
        println!("No valid fix in this capture; the overlay will be empty");
    }

    let csv_path = compute_export_path(input, "csv", &export_opts)?;
    let outcome = convert_log_to_csv(input, &csv_path, &export_opts)?;
    println!("CSV: {:?}", outcome);

    let kml_path = compute_export_path(&csv_path, "kml", &export_opts)?;
    let outcome = convert_csv_to_kml(&csv_path, &kml_path, &export_opts)?;
    println!("KML: {:?}", outcome);

    Ok(())
}
