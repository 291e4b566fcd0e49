//! Configuration for the decoder and the `exif-ifd` binary.
//!
//! # Environment Variables
//!
//! - `EXIF_IFD_FORMAT` - Output format, `text` or `json` (default: text)
//! - `EXIF_IFD_VERBOSE` - Enable debug logging (default: false)
//! - `RUST_LOG` - Overrides the log filter entirely

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

// =============================================================================
// Decoder options
// =============================================================================

/// What `decode` returns when the header itself cannot be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FatalPolicy {
    /// A single error-only directory carrying the message
    #[default]
    ErrorDirectory,
    /// No directories at all
    Empty,
}

/// Options controlling a decode pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecodeOptions {
    pub fatal_policy: FatalPolicy,
}

impl DecodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fatal_policy(mut self, fatal_policy: FatalPolicy) -> Self {
        self.fatal_policy = fatal_policy;
        self
    }
}

// =============================================================================
// CLI Arguments
// =============================================================================

/// Output format of the binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One line per tag, `[Directory] Tag - Description`
    #[default]
    Text,
    /// A JSON array with one object per file
    Json,
}

/// exif-ifd - print the EXIF directories of JPEG and TIFF files.
#[derive(Parser, Debug, Clone)]
#[command(name = "exif-ifd")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Files to read (JPEG, TIFF-based raw, or a bare EXIF segment).
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, env = "EXIF_IFD_FORMAT")]
    pub format: OutputFormat,

    /// Only print recorded decode errors.
    #[arg(long)]
    pub errors_only: bool,

    /// Enable debug logging.
    #[arg(short, long, default_value_t = false, env = "EXIF_IFD_VERBOSE")]
    pub verbose: bool,
}
