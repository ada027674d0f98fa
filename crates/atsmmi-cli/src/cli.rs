use std::path::PathBuf;

use atsmmi::DEFAULT_MARGIN;
use clap::{ArgGroup, Parser, ValueEnum};

/// Generate the MMI lookup table from ATS profile documents.
#[derive(Debug, Parser)]
#[command(name = "atsmmi", about, version)]
#[command(group(ArgGroup::new("mode").required(true).args(["input", "extract_all"])))]
pub struct Cli {
    /// Extract a single document
    #[arg(long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Page range of the single document (e.g. '3' or '1,3-5'). Default: all pages
    #[arg(long, requires = "input")]
    pub pages: Option<String>,

    /// Extract every document in the directory
    #[arg(long)]
    pub extract_all: bool,

    /// Directory searched by --extract-all
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub dir: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Rust)]
    pub format: OutputFormat,

    /// Coordinate tolerance in points
    #[arg(long, default_value_t = DEFAULT_MARGIN)]
    pub margin: f64,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Rust `match` fragment mapping (profile, id) to the MMI name
    Rust,
    /// JSON array of { profile, id, name }
    Json,
    /// Reconstructed table rows, for inspecting a document
    Rows,
}
