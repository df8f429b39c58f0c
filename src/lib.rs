//! NMEA to KML Library
//!
//! A Rust library for turning raw NMEA-0183 GPS captures into a fix table and
//! an animated KML overlay colored by fix quality.
//!
//! # Features
//!
//! - **`cli`** (default): Build the command-line interface binary
//!
//! # Quick Start
//!
//! Parse a capture and inspect the merged fixes:
//! ```rust,no_run
//! use nmea2kml::parse_nmea_file;
//! use std::path::Path;
//!
//! let log = parse_nmea_file(Path::new("raw/drive.txt")).unwrap();
//! println!("Parsed {} fixes", log.records.len());
//! println!("Rejected {} sentences", log.stats.rejected_sentences);
//! ```
//!
//! Run both file stages:
//! ```rust,no_run
//! use nmea2kml::{convert_csv_to_kml, convert_log_to_csv, compute_export_path, ExportOptions};
//! use std::path::Path;
//!
//! let options = ExportOptions::default();
//! let input = Path::new("raw/drive.txt");
//! let csv_path = compute_export_path(input, "csv", &options).unwrap();
//! convert_log_to_csv(input, &csv_path, &options).unwrap();
//! let kml_path = compute_export_path(&csv_path, "kml", &options).unwrap();
//! let outcome = convert_csv_to_kml(&csv_path, &kml_path, &options).unwrap();
//! println!("KML at {}", outcome.path().display());
//! ```
//!
//! # Public API
//!
//! ## Parsing Functions
//! - [`parse_nmea_file`] - Parse a capture file into fix records
//! - [`parse_nmea_reader`] - Parse from any buffered reader
//! - [`parse_nmea_str`] - Parse from memory
//! - [`decode_line`] - Decode a single line into a typed message
//! - [`aggregate`] - Fold typed messages into fix records
//!
//! ## Data Types
//! - [`FixRecord`] - One merged navigation epoch
//! - [`NmeaLog`] - Parsed records with line statistics
//! - [`DecodedMessage`] - Typed GGA/RMC/HDT sentence
//! - [`Overlay`] - Geometry and tour built from a fix sequence
//! - [`ExportOptions`] - Configuration for export operations
//!
//! ## Rendering Functions
//! - [`segment_by_quality`] - Split rendered fixes into same-quality runs
//! - [`build_overlay`] - Build the overlay model
//! - [`write_kml`] - Serialize an overlay as KML
//!
//! ## Export Functions
//! - [`convert_log_to_csv`] - Raw capture to fix table
//! - [`convert_csv_to_kml`] - Fix table to KML overlay
//! - [`compute_export_path`] - Helper for consistent path computation

// Module declarations
pub mod error;
pub mod export;
pub mod filters;
#[cfg(feature = "cli")]
pub mod logging;
pub mod overlay;
pub mod parser;
pub mod segment;
pub mod style;
pub mod tabular;
pub mod types;

// Re-export everything from modules for convenience
#[allow(ambiguous_glob_reexports)]
pub use error::*;
#[allow(ambiguous_glob_reexports)]
pub use export::*;
#[allow(ambiguous_glob_reexports)]
pub use filters::*;
#[allow(ambiguous_glob_reexports)]
pub use overlay::*;
#[allow(ambiguous_glob_reexports)]
pub use parser::*;
#[allow(ambiguous_glob_reexports)]
pub use segment::*;
#[allow(ambiguous_glob_reexports)]
pub use style::*;
#[allow(ambiguous_glob_reexports)]
pub use tabular::*;
#[allow(ambiguous_glob_reexports)]
pub use types::*;

// Re-export Result type for convenience
pub use anyhow::Result;
