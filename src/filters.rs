//! Input filtering for the conversion stages
//!
//! Raw NMEA captures are plain text saved as `.txt` or `.log`; the tabular
//! stage produces `.csv`. Matching is on the extension only and ignores case.

use std::path::Path;

const RAW_LOG_EXTENSIONS: [&str; 2] = ["txt", "log"];

fn has_extension(path: &Path, accepted: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext_lower = ext.to_ascii_lowercase();
            accepted.iter().any(|candidate| *candidate == ext_lower)
        })
        .unwrap_or(false)
}

/// True for files the CSV stage reads
pub fn is_raw_log_file(path: &Path) -> bool {
    has_extension(path, &RAW_LOG_EXTENSIONS)
}

/// True for files the KML stage reads
pub fn is_csv_file(path: &Path) -> bool {
    has_extension(path, &["csv"])
}
