//! CLI interface module
//!
//! Provides command-line interface using clap derive macros.

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

/// Exit codes for the CLI
///
/// These codes follow standard Unix conventions and provide
/// specific error categories for scripting and automation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    Success = 0,
    GeneralError = 1,
    InvalidArgs = 2,
    InputNotFound = 3,
    OutputError = 4,
    ProcessingError = 5,
    ExternalToolError = 6,
}

impl ExitCode {
    /// Convert to process exit code
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Get human-readable description
    pub fn description(self) -> &'static str {
        match self {
            ExitCode::Success => "Success",
            ExitCode::GeneralError => "General error",
            ExitCode::InvalidArgs => "Invalid arguments",
            ExitCode::InputNotFound => "Input file not found",
            ExitCode::OutputError => "Output error (permission denied, disk full, etc.)",
            ExitCode::ProcessingError => "Processing error",
            ExitCode::ExternalToolError => "External tool error (pdftoppm missing or failed)",
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.code()
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        std::process::ExitCode::from(code.code() as u8)
    }
}

/// Toolkit for fixing scanned PDFs
#[derive(Parser, Debug)]
#[command(name = "pdffixlab")]
#[command(version)]
#[command(about = "Fix scanned PDFs: deskew pages, rotate, and merge", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Detect and correct small-angle page skew
    Deskew(DeskewArgs),
    /// Rotate even-numbered pages by 180 degrees
    RotateEven {
        /// Input PDF file
        input: PathBuf,
        /// Output PDF file
        output: PathBuf,
    },
    /// Rotate every page by a multiple of 90 degrees
    RotateAll {
        /// Input PDF file
        input: PathBuf,
        /// Output PDF file
        output: PathBuf,
        /// Clockwise rotation in degrees (multiple of 90)
        #[arg(long, default_value_t = 270)]
        deg: i64,
    },
    /// Merge several PDFs into one, in argument order
    Merge {
        /// Output PDF file
        output: PathBuf,
        /// Input PDF files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },
}

/// Arguments for the deskew command
#[derive(clap::Args, Debug)]
pub struct DeskewArgs {
    /// Input PDF file
    pub input: PathBuf,

    /// Output PDF file
    pub output: PathBuf,

    /// Rasterization resolution in DPI
    #[arg(long, default_value_t = 300)]
    pub dpi: u32,

    /// Maximum skew magnitude (degrees) accepted as a scan artifact
    #[arg(long, default_value_t = 3.0)]
    pub tolerance: f64,

    /// Number of parallel threads
    #[arg(short, long)]
    pub threads: Option<usize>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,
}

impl DeskewArgs {
    /// Get thread count (default to available CPUs)
    pub fn thread_count(&self) -> usize {
        self.threads.unwrap_or_else(num_cpus::get)
    }
}

/// Create a spinner for indeterminate progress
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("Invalid spinner template"),
    );
    pb.set_message(message.to_string());
    pb
}

/// Create a progress bar for page processing
pub fn create_page_progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] Page {pos}/{len} ({percent}%) - {msg}")
            .expect("Invalid progress bar template")
            .progress_chars("█▓░"),
    );
    pb
}
