//! CLI binary for NMEA to KML
//!
//! Converts raw NMEA captures to fix-table CSV files and those to KML
//! overlays. Inputs may be files, glob patterns or project directories laid
//! out as `ROOT/raw` (captures), `ROOT/csv` and `ROOT/kml` (outputs).

use anyhow::{Context, Result};
use clap::{Arg, Command};
use glob::glob;
use nmea2kml::logging::init_logging;
use nmea2kml::{
    compute_export_path, convert_csv_to_kml, convert_log_to_csv, install_icons, is_csv_file,
    is_raw_log_file, ExportOptions, ExportOutcome, IconSet,
};
use rayon::prelude::*;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

const RAW_SUBDIR: &str = "raw";
const CSV_SUBDIR: &str = "csv";
const KML_SUBDIR: &str = "kml";
const ICON_SUBDIR: &str = "icon";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Csv,
    Kml,
    All,
}

impl Stage {
    fn from_arg(value: &str) -> Option<Self> {
        match value {
            "csv" => Some(Stage::Csv),
            "kml" => Some(Stage::Kml),
            "all" => Some(Stage::All),
            _ => None,
        }
    }

    fn runs_csv(self) -> bool {
        matches!(self, Stage::Csv | Stage::All)
    }

    fn runs_kml(self) -> bool {
        matches!(self, Stage::Kml | Stage::All)
    }
}

/// One input file and the options its outputs are written with
#[derive(Debug, Clone)]
struct WorkItem {
    input: PathBuf,
    options: ExportOptions,
}

#[derive(Debug, Default)]
struct WorkList {
    raw_logs: Vec<WorkItem>,
    csv_files: Vec<WorkItem>,
    /// Project roots; their `csv/` directory is scanned after the CSV stage
    projects: Vec<PathBuf>,
}

impl WorkList {
    fn is_empty(&self) -> bool {
        self.raw_logs.is_empty() && self.csv_files.is_empty() && self.projects.is_empty()
    }
}

fn build_command() -> Command {
    Command::new("NMEA to KML")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert NMEA-0183 GPS logs to CSV fix tables and animated KML overlays.")
        .arg(
            Arg::new("stage")
                .help("Conversion to run: csv (log to CSV), kml (CSV to KML) or all")
                .value_parser(["csv", "kml", "all"])
                .required(false)
                .index(1),
        )
        .arg(
            Arg::new("paths")
                .help("Log or CSV files, glob patterns, or project directories containing raw/ and csv/ subdirectories. Log files: .txt, .log; tables: .csv (case-insensitive).")
                .required(false)
                .num_args(1..)
                .index(2),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .help("Enable debug output and detailed parsing information")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("output-dir")
                .long("output-dir")
                .help("Directory for output files (default: same as input file; ignored for project directories)")
                .value_name("DIR"),
        )
        .arg(
            Arg::new("force-export")
                .long("force-export")
                .help("Regenerate outputs that already exist instead of skipping them")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("icon-base")
                .long("icon-base")
                .help("Base URL of arrow.png and forbidden.png referenced by the KML (default: ../icon)")
                .value_name("URL"),
        )
}

fn main() -> Result<()> {
    let matches = build_command().get_matches();

    let debug = matches.get_flag("debug");
    init_logging(debug)?;
    debug!(
        "nmea2kml {} (git {})",
        env!("CARGO_PKG_VERSION"),
        option_env!("VERGEN_GIT_SHA").unwrap_or("unknown")
    );

    let stage = matches
        .get_one::<String>("stage")
        .and_then(|value| Stage::from_arg(value));
    let patterns: Vec<String> = matches
        .get_many::<String>("paths")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();

    let Some(stage) = stage.filter(|_| !patterns.is_empty()) else {
        // No work given, show help and exit
        build_command().print_help()?;
        println!();
        return Ok(());
    };

    let options = ExportOptions {
        output_dir: matches.get_one::<String>("output-dir").cloned(),
        force_export: matches.get_flag("force-export"),
        icons: matches
            .get_one::<String>("icon-base")
            .map(|base| IconSet::with_base(base))
            .unwrap_or_default(),
    };

    debug!("Input patterns: {patterns:?}");

    let work = match collect_work(&patterns, stage, &options) {
        Ok(work) => work,
        Err(e) => {
            error!("Error expanding input paths: {e:#}");
            std::process::exit(1);
        }
    };

    if work.is_empty() {
        error!("No valid input files found in the specified paths.");
        error!("Supported extensions: .txt, .log, .csv (case-insensitive)");
        error!("Input patterns were: {patterns:?}");
        std::process::exit(1);
    }

    let mut attempted = 0;
    let mut processed = 0;

    let mut csv_files = work.csv_files;
    if stage.runs_csv() {
        let raw_logs = dedup_by_output(work.raw_logs, CSV_SUBDIR);
        let results = run_stage(&raw_logs, CSV_SUBDIR, convert_log_to_csv);
        attempted += results.len();
        for (item, result) in raw_logs.iter().zip(results) {
            if let Some(outcome) = report(&item.input, result) {
                processed += 1;
                // Tables feed the KML stage with the same placement
                if stage.runs_kml() && !is_project_item(&item.options, &work.projects) {
                    csv_files.push(WorkItem {
                        input: outcome.path().to_path_buf(),
                        options: item.options.clone(),
                    });
                }
            }
        }
    }

    if stage.runs_kml() {
        for root in &work.projects {
            csv_files.extend(project_items(root, CSV_SUBDIR, KML_SUBDIR, is_csv_file, &options));
            if options.icons == IconSet::default() {
                let icon_dir = root.join(ICON_SUBDIR);
                match install_icons(&icon_dir) {
                    Ok(0) => {}
                    Ok(count) => info!("Installed {count} icon(s) in {}", icon_dir.display()),
                    Err(e) => warn!("Icons not installed: {e:#}"),
                }
            }
        }
        // A table can arrive both as an input and as a CSV stage output
        let csv_files = dedup_by_output(csv_files, KML_SUBDIR);
        let results = run_stage(&csv_files, KML_SUBDIR, convert_csv_to_kml);
        attempted += results.len();
        for (item, result) in csv_files.iter().zip(results) {
            if report(&item.input, result).is_some() {
                processed += 1;
            }
        }
    }

    debug!("Processed {processed} of {attempted} file(s)");

    if attempted == 0 {
        error!("No files found for the {stage:?} stage.");
        std::process::exit(1);
    }
    if processed == 0 {
        error!("No files were successfully processed out of {attempted} files found.");
        error!("Use --debug flag for more detailed error information.");
        std::process::exit(1);
    }

    Ok(())
}

/// Run one stage over every item in parallel
///
/// Results come back in item order.
fn run_stage<F>(items: &[WorkItem], extension: &str, convert: F) -> Vec<Result<ExportOutcome>>
where
    F: Fn(&Path, &Path, &ExportOptions) -> Result<ExportOutcome> + Sync,
{
    items
        .par_iter()
        .map(|item| {
            let output = compute_export_path(&item.input, extension, &item.options)?;
            convert(&item.input, &output, &item.options)
        })
        .collect()
}

/// Drop items that would write the same output as an earlier item
///
/// Keeps the first occurrence. The output directory is canonicalized when it
/// exists so different spellings of one path compare equal.
fn dedup_by_output(items: Vec<WorkItem>, extension: &str) -> Vec<WorkItem> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| {
            let key = output_key(item, extension);
            let first = seen.insert(key.clone());
            if !first {
                debug!("Duplicate input {} for {}", item.input.display(), key.display());
            }
            first
        })
        .collect()
}

fn output_key(item: &WorkItem, extension: &str) -> PathBuf {
    let dir = match item.options.output_dir {
        Some(ref dir) => PathBuf::from(dir),
        None => item
            .input
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
    };
    let dir = dir.canonicalize().unwrap_or(dir);
    let stem = item.input.file_stem().unwrap_or_default().to_string_lossy();
    dir.join(format!("{stem}.{extension}"))
}

/// Log a stage result; returns the outcome on success
fn report(input: &Path, result: Result<ExportOutcome>) -> Option<ExportOutcome> {
    match result {
        Ok(outcome) => {
            if let ExportOutcome::Written { path, records } = &outcome {
                debug!("Wrote {} record(s) to {}", records, path.display());
            }
            Some(outcome)
        }
        Err(e) => {
            warn!("Error processing {}: {:#}", input.display(), e);
            warn!("Continuing with next file...");
            None
        }
    }
}

/// True when the item's outputs go to a project's `csv/` directory
fn is_project_item(options: &ExportOptions, projects: &[PathBuf]) -> bool {
    options.output_dir.as_deref().is_some_and(|dir| {
        projects
            .iter()
            .any(|root| Path::new(dir) == root.join(CSV_SUBDIR))
    })
}

/// Expand the command-line paths into the files each stage will read
fn collect_work(patterns: &[String], stage: Stage, options: &ExportOptions) -> Result<WorkList> {
    let mut work = WorkList::default();

    for pattern in patterns {
        // Check if this is a glob pattern
        if pattern.contains('*') || pattern.contains('?') {
            let paths = glob(pattern)
                .with_context(|| format!("Invalid glob pattern '{}'", pattern))?
                .collect::<Result<Vec<_>, _>>()
                .with_context(|| format!("Error expanding glob pattern '{}'", pattern))?;
            for path in paths {
                add_path(&mut work, &path, stage, options);
            }
            continue;
        }
        add_path(&mut work, Path::new(pattern), stage, options);
    }

    Ok(work)
}

fn add_path(work: &mut WorkList, path: &Path, stage: Stage, options: &ExportOptions) {
    if path.is_dir() {
        debug!("Project directory: {path:?}");
        if stage.runs_csv() {
            work.raw_logs.extend(project_items(
                path,
                RAW_SUBDIR,
                CSV_SUBDIR,
                is_raw_log_file,
                options,
            ));
        }
        work.projects.push(path.to_path_buf());
        return;
    }

    if !path.is_file() {
        warn!("Path not found or not accessible: {}", path.display());
        return;
    }

    let item = WorkItem {
        input: path.to_path_buf(),
        options: options.clone(),
    };
    if is_raw_log_file(path) && stage.runs_csv() {
        work.raw_logs.push(item);
    } else if is_csv_file(path) && stage.runs_kml() {
        work.csv_files.push(item);
    } else {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("none");
        warn!(
            "Skipping file with unsupported extension '{ext}' for the {stage:?} stage: {}",
            path.display()
        );
    }
}

/// Inputs of `root/source` matching `accept`, written to `root/target`
fn project_items(
    root: &Path,
    source: &str,
    target: &str,
    accept: fn(&Path) -> bool,
    options: &ExportOptions,
) -> Vec<WorkItem> {
    let source_dir = root.join(source);
    let mut inputs = match list_files(&source_dir) {
        Ok(files) => files,
        Err(e) => {
            warn!("Skipping {}: {:#}", source_dir.display(), e);
            return Vec::new();
        }
    };
    inputs.retain(|path| accept(path));
    inputs.sort();
    info!("Found {} file(s) in {}", inputs.len(), source_dir.display());

    let project_options = ExportOptions {
        output_dir: Some(root.join(target).to_string_lossy().into_owned()),
        ..options.clone()
    };
    inputs
        .into_iter()
        .map(|input| WorkItem {
            input,
            options: project_options.clone(),
        })
        .collect()
}

fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("Failed to read directory {:?}", dir))? {
        let path = entry
            .with_context(|| format!("Failed to read entry in {:?}", dir))?
            .path();
        if path.is_file() {
            files.push(path);
        }
    }
    Ok(files)
}
