//! CLI argument parsing using clap.

use clap::Parser;
use std::path::PathBuf;

/// Repack legacy cbr and cbz comic archives into normalized cbz files.
#[derive(Parser, Debug)]
#[command(name = "repack")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory searched recursively for archives
    #[arg(value_name = "INPUT_DIR")]
    pub input_dir: PathBuf,

    /// Directory the repacked archives are written to
    /// (default: a `repacked` tree next to INPUT_DIR)
    #[arg(value_name = "OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// List the archives that would be repacked without touching anything
    #[arg(long)]
    pub dry_run: bool,

    /// Overwrite existing output directories and archives
    #[arg(long)]
    pub force: bool,

    /// Input formats to repack, comma separated
    #[arg(
        short = 'f',
        long,
        value_name = "FORMATS",
        value_delimiter = ',',
        default_value = "cbr"
    )]
    pub formats: Vec<String>,

    /// Verbosity level: 0 = error, 1 = info, 2 = debug
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(0..=2))]
    pub verbosity: u8,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Print the run summary as JSON
    #[arg(long)]
    pub json: bool,
}
