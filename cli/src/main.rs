//! sd-ingest - Command-line interface for the SD card ingest engine.
//!
//! Thin wrapper around the engine: argument parsing, configuration file
//! loading, progress printing and the final summary line.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use engine::{
    run_ingest, IngestOptions, IngestSummary, MediaFile, MediaKind, ProgressCallback,
};

mod config;
use config::ConfigFile;

/// SD Card Media Ingest Utility
#[derive(Parser, Debug)]
#[command(name = "sd-ingest")]
#[command(version)]
#[command(about = "Copy media off an SD card into date-organized directories")]
struct Args {
    /// Config file (default is ~/.sdingest.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ingest media from an SD card
    Ingest {
        /// Source directory to copy files from
        #[arg(long, value_name = "PATH")]
        source: PathBuf,

        /// Suffix to add to destination directory names
        #[arg(long, value_name = "SUFFIX")]
        dest_suffix: Option<String>,

        /// Only ingest files captured on or after this date
        /// (YYYY-MM-DD or YYYYMMDD)
        #[arg(long, value_name = "DATE")]
        from_date: Option<String>,
    },
}

/// CLI implementation of ProgressCallback; diagnostic output is gated on
/// --verbose, errors always print.
struct CliProgress {
    verbose: bool,
}

impl ProgressCallback for CliProgress {
    fn on_scan_started(&self, root: &Path) {
        if self.verbose {
            eprintln!("Source Directory: {}", root.display());
        }
    }

    fn on_walk_error(&self, message: &str) {
        eprintln!("Warning: {}", message);
    }

    fn on_file_retained(&self, path: &Path) {
        if self.verbose {
            eprintln!("Found {}", path.display());
        }
    }

    fn on_record_error(&self, message: &str) {
        eprintln!("Warning: {}", message);
    }

    fn on_file_skipped(&self, file: &MediaFile) {
        if self.verbose {
            eprintln!("Skipping {} before 'from-date'", file.file_name);
        }
    }

    fn on_bucket_started(&self, kind: MediaKind, _date_key: &str, directory: &Path) {
        if self.verbose {
            eprintln!("Copying {} bucket into {}", kind, directory.display());
        }
    }

    fn on_file_copied(&self, file: &MediaFile, destination: &Path) {
        if self.verbose {
            eprintln!("Copying {} to {}", file.file_name, destination.display());
        }
    }

    fn on_transfer_error(&self, message: &str) {
        eprintln!("Error: {}", message);
    }
}

/// Parse the from-date flag, accepting `YYYY-MM-DD` or `YYYYMMDD`.
fn parse_from_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(value, "%Y%m%d"))
        .ok()
}

/// Format a byte count with binary (IEC) units.
fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KiB", "MiB", "GiB", "TiB"];
    let mut size = bytes as f64;
    let mut unit_idx = 0;

    while size >= 1024.0 && unit_idx < UNITS.len() - 1 {
        size /= 1024.0;
        unit_idx += 1;
    }

    if unit_idx == 0 {
        format!("{} B", bytes)
    } else {
        format!("{:.1} {}", size, UNITS[unit_idx])
    }
}

fn print_summary(summary: &IngestSummary) {
    println!("Ingest Complete");
    println!(
        "Total Files: {} Total Size: {}",
        summary.files_copied,
        format_bytes(summary.bytes_copied)
    );

    if !summary.failures.is_empty() {
        eprintln!();
        eprintln!("{} file(s) were not copied:", summary.failures.len());
        for failure in &summary.failures {
            eprintln!("  {}: {}", failure.path.display(), failure.message);
        }
    }
}

fn main() {
    let args = Args::parse();

    println!("SD Ingest v{}", env!("CARGO_PKG_VERSION"));
    println!();

    let exit_code = match run_cli(&args) {
        Ok(()) => 0,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            2
        }
    };

    std::process::exit(exit_code);
}

/// Main CLI logic - separated for testability
fn run_cli(args: &Args) -> Result<(), String> {
    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => ConfigFile::default_path()?,
    };
    let config = ConfigFile::load(&config_path)?;

    let Command::Ingest {
        source,
        dest_suffix,
        from_date,
    } = &args.command;

    // Soft degrade: a malformed from-date is a warning, not an abort.
    let from_date = match from_date.as_deref() {
        Some(value) => {
            let parsed = parse_from_date(value);
            if parsed.is_none() {
                eprintln!(
                    "Invalid format for from-date flag, format should be YYYYMMDD or YYYY-MM-DD; ignoring"
                );
            }
            parsed
        }
        None => None,
    };

    let options = IngestOptions {
        source: source.clone(),
        photo_destination: config.photos.destination.clone(),
        video_destination: config.video.destination.clone(),
        include_formats: config.include_formats(),
        dest_suffix: dest_suffix.clone(),
        from_date,
    };

    let progress = CliProgress {
        verbose: args.verbose,
    };

    let summary = run_ingest(&options, Some(&progress)).map_err(|e| e.to_string())?;
    print_summary(&summary);

    Ok(())
}
