//! Export functionality for NMEA conversions
//!
//! Drives the two file stages: raw log to fix-table CSV, and fix-table CSV to
//! KML overlay. Each stage leaves an existing output alone unless
//! `force_export` is set, so re-running a batch only fills in what is missing.

use crate::overlay::{build_overlay, write_kml, Overlay};
use crate::parser::parse_nmea_file;
use crate::style::IconSet;
use crate::tabular::{read_fix_csv_file, write_fix_csv_file};
use crate::types::FixRecord;
use crate::Result;
use anyhow::Context;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Export options for controlling output placement and styling
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// Directory for output files; `None` writes beside the input
    pub output_dir: Option<String>,
    /// Regenerate outputs that already exist
    pub force_export: bool,
    pub icons: IconSet,
}

/// What a stage did with one input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Written { path: PathBuf, records: usize },
    /// Output already present and not forced
    Skipped { path: PathBuf },
}

impl ExportOutcome {
    pub fn path(&self) -> &Path {
        match self {
            ExportOutcome::Written { path, .. } | ExportOutcome::Skipped { path } => path,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, ExportOutcome::Skipped { .. })
    }
}

/// Output path for `input_path` with its extension replaced
///
/// The file lands in `output_dir` when one is configured (created if needed),
/// otherwise beside the input.
pub fn compute_export_path(
    input_path: &Path,
    extension: &str,
    options: &ExportOptions,
) -> Result<PathBuf> {
    let base_name = input_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("nmea");

    let output_dir = match options.output_dir {
        Some(ref dir) => PathBuf::from(dir),
        None => input_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
    };

    if !output_dir.as_os_str().is_empty() && !output_dir.exists() {
        std::fs::create_dir_all(&output_dir)
            .with_context(|| format!("Failed to create output directory: {:?}", output_dir))?;
        debug!("Created output directory: {:?}", output_dir);
    }

    Ok(output_dir.join(format!("{base_name}.{extension}")))
}

/// Icon images referenced by the default [`IconSet`], by file name
pub const BUNDLED_ICONS: [(&str, &[u8]); 2] = [
    ("arrow.png", include_bytes!("../assets/icon/arrow.png")),
    ("forbidden.png", include_bytes!("../assets/icon/forbidden.png")),
];

/// Write the bundled icons into `icon_dir`, keeping any already there
///
/// Returns the number of icons written.
pub fn install_icons(icon_dir: &Path) -> Result<usize> {
    std::fs::create_dir_all(icon_dir)
        .with_context(|| format!("Failed to create icon directory: {:?}", icon_dir))?;

    let mut written = 0;
    for (name, bytes) in BUNDLED_ICONS {
        let path = icon_dir.join(name);
        if path.exists() {
            continue;
        }
        std::fs::write(&path, bytes)
            .with_context(|| format!("Failed to write icon: {:?}", path))?;
        debug!("Installed icon {}", path.display());
        written += 1;
    }
    Ok(written)
}

/// Skip notice shared by both stages; `true` when the stage should not run
fn skip_existing(output_path: &Path, options: &ExportOptions) -> bool {
    if output_path.exists() && !options.force_export {
        info!("Skip! Output file {} exists.", output_path.display());
        return true;
    }
    info!("Generating {}...", output_path.display());
    false
}

/// Parse a raw NMEA log and write its fix table
pub fn convert_log_to_csv(
    input_path: &Path,
    output_path: &Path,
    options: &ExportOptions,
) -> Result<ExportOutcome> {
    if skip_existing(output_path, options) {
        return Ok(ExportOutcome::Skipped {
            path: output_path.to_path_buf(),
        });
    }

    let log = parse_nmea_file(input_path)?;
    if !log.has_valid_fix() {
        debug!(
            "{} holds no fix with gps_qual >= 1",
            input_path.display()
        );
    }
    write_fix_csv_file(&log.records, output_path)?;

    Ok(ExportOutcome::Written {
        path: output_path.to_path_buf(),
        records: log.records.len(),
    })
}

/// Read a fix table and write its KML overlay
pub fn convert_csv_to_kml(
    input_path: &Path,
    output_path: &Path,
    options: &ExportOptions,
) -> Result<ExportOutcome> {
    if skip_existing(output_path, options) {
        return Ok(ExportOutcome::Skipped {
            path: output_path.to_path_buf(),
        });
    }

    let records = read_fix_csv_file(input_path)?;
    export_overlay_to_kml(&records, output_path, options)?;

    Ok(ExportOutcome::Written {
        path: output_path.to_path_buf(),
        records: records.len(),
    })
}

/// Build the overlay for `records` and write it to `output_path`
///
/// Always writes, even when the overlay is empty. Returns the overlay so the
/// caller can inspect its anomalies.
pub fn export_overlay_to_kml(
    records: &[FixRecord],
    output_path: &Path,
    options: &ExportOptions,
) -> Result<Overlay> {
    let overlay = build_overlay(records);
    if overlay.is_empty() {
        debug!(
            "No valid fix; writing an empty overlay to {}",
            output_path.display()
        );
    }

    let file = File::create(output_path)
        .with_context(|| format!("Failed to create KML file: {:?}", output_path))?;
    let mut writer = BufWriter::new(file);
    write_kml(&overlay, &options.icons, &mut writer)
        .with_context(|| format!("Failed to write KML file: {:?}", output_path))?;
    writer
        .flush()
        .with_context(|| format!("Failed to flush KML file: {:?}", output_path))?;

    Ok(overlay)
}
