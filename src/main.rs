//! exif-ifd - print the EXIF directories of JPEG and TIFF files.

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use tracing::{debug, error, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use exif_ifd::{
    config::{Cli, OutputFormat},
    detect_payload, Decoder, Directory, Metadata, PayloadKind,
};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let decoder = Decoder::new();
    let mut reports = Vec::with_capacity(cli.files.len());
    let mut failed = false;

    for path in &cli.files {
        match decode_file(&decoder, path) {
            Ok(report) => reports.push(report),
            Err(message) => {
                error!(path = %path.display(), "{}", message);
                failed = true;
            }
        }
    }

    match cli.format {
        OutputFormat::Text => print_text(&reports, cli.errors_only),
        OutputFormat::Json => match serde_json::to_string_pretty(&reports) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                error!("Cannot serialize report: {}", e);
                return ExitCode::FAILURE;
            }
        },
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Initialize the tracing subscriber.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "exif_ifd=debug"
    } else {
        "exif_ifd=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

// =============================================================================
// Decoding
// =============================================================================

fn decode_file(decoder: &Decoder, path: &Path) -> Result<FileReport, String> {
    let data = std::fs::read(path).map_err(|e| format!("Cannot read file: {}", e))?;

    let (kind, payload) =
        detect_payload(&data).ok_or_else(|| "No EXIF data found".to_string())?;
    debug!(path = %path.display(), payload = kind.name(), bytes = payload.len(), "decoding");

    let metadata = match kind {
        PayloadKind::Exif => decoder.decode(payload),
        PayloadKind::Tiff => decoder.decode_tiff(payload),
    };
    if metadata.has_errors() {
        warn!(path = %path.display(), "decoded with errors");
    }

    Ok(FileReport::new(path, &metadata))
}

// =============================================================================
// Reports
// =============================================================================

#[derive(Debug, Serialize)]
struct FileReport {
    file: String,
    directories: Vec<DirectoryReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    thumbnail_bytes: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<[f64; 2]>,
}

#[derive(Debug, Serialize)]
struct DirectoryReport {
    name: &'static str,
    tags: Vec<TagReport>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<String>,
}

#[derive(Debug, Serialize)]
struct TagReport {
    id: String,
    name: String,
    description: String,
}

impl FileReport {
    fn new(path: &Path, metadata: &Metadata) -> Self {
        Self {
            file: path.display().to_string(),
            directories: metadata.iter().map(DirectoryReport::new).collect(),
            thumbnail_bytes: metadata.thumbnail().map(|t| t.len()),
            location: metadata.geo_location().map(|(lat, lon)| [lat, lon]),
        }
    }
}

impl DirectoryReport {
    fn new(directory: &Directory) -> Self {
        Self {
            name: directory.name(),
            tags: directory
                .tags()
                .map(|tag| TagReport {
                    id: format!("0x{:04X}", tag.id()),
                    name: tag.name_or_hex(),
                    description: tag.description().unwrap_or_default(),
                })
                .collect(),
            errors: directory.errors().to_vec(),
        }
    }
}

fn print_text(reports: &[FileReport], errors_only: bool) {
    for report in reports {
        if reports.len() > 1 {
            println!("==> {} <==", report.file);
        }
        for directory in &report.directories {
            if !errors_only {
                for tag in &directory.tags {
                    println!("[{}] {} - {}", directory.name, tag.name, tag.description);
                }
            }
            for message in &directory.errors {
                println!("[{}] ERROR: {}", directory.name, message);
            }
        }
        if !errors_only {
            if let Some(len) = report.thumbnail_bytes {
                println!("Thumbnail: {} bytes", len);
            }
            if let Some([lat, lon]) = report.location {
                println!("Location: {:.6}, {:.6}", lat, lon);
            }
        }
    }
}
