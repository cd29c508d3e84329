//! CLI argument parsing for casplot

use clap::Parser;
use std::path::PathBuf;

/// Usage line printed when no inputs are given
pub const USAGE: &str = "Usage: casplot file1 [file2 ...] OR a directory";

#[derive(Parser, Debug)]
#[command(name = "casplot")]
#[command(version)]
#[command(
    about = "Plot CAS contention scaling from benchmark logs and merge them into one CSV",
    long_about = None
)]
pub struct Cli {
    /// Benchmark log files and/or directories containing them
    #[arg(value_name = "INPUTS")]
    pub inputs: Vec<PathBuf>,

    /// Directory for the CSV and chart files (default: current directory)
    #[arg(short = 'o', long = "output-dir", value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// TOML file overriding output names, chart size and guide coefficients
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Only write the merged CSV, skip chart rendering
    #[arg(long = "no-charts")]
    pub no_charts: bool,

    /// Enable debug output on stderr
    #[arg(long)]
    pub debug: bool,
}
