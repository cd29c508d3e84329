//! End-to-end run: collect inputs, parse, merge, plot, export

use crate::chart::ScalingChart;
use crate::config::PlotConfig;
use crate::csv_output;
use crate::inputs::{collect_input_files, series_label};
use crate::parser::LogParser;
use crate::table::{LabeledSeries, MergedTable};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Options for one run
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Directory receiving the CSV and chart files
    pub output_dir: PathBuf,
    pub config: PlotConfig,
    /// Render PNG charts in addition to the CSV
    pub render_charts: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            config: PlotConfig::default(),
            render_charts: true,
        }
    }
}

/// What a completed run produced
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub input_files: Vec<PathBuf>,
    /// Total records parsed across all files
    pub records: usize,
    /// Distinct thread counts in the merged table
    pub rows: usize,
    pub csv_path: PathBuf,
    /// Chart images written, in order (time, attempts)
    pub charts: Vec<PathBuf>,
}

/// Result of a run
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// No argument resolved to an input file; nothing was written
    NoInputs,
    Completed(RunSummary),
}

/// Location of an output file; the current directory adds no prefix
pub fn output_path(dir: &Path, file_name: &str) -> PathBuf {
    if dir == Path::new(".") {
        PathBuf::from(file_name)
    } else {
        dir.join(file_name)
    }
}

/// Parse every file once, in order
pub fn load_series(files: &[PathBuf]) -> Result<Vec<LabeledSeries>> {
    let parser = LogParser::new()?;
    files
        .iter()
        .map(|path| -> Result<LabeledSeries> {
            let log = parser.parse_file(path)?;
            Ok(LabeledSeries::new(series_label(path), log))
        })
        .collect()
}

/// Run the whole pipeline for the given command-line paths
pub fn run<P: AsRef<Path>>(paths: &[P], options: &RunOptions) -> Result<RunOutcome> {
    let files = collect_input_files(paths)?;
    if files.is_empty() {
        return Ok(RunOutcome::NoInputs);
    }

    let series = load_series(&files)?;
    let records = series.iter().map(|s| s.log.len()).sum();
    let table = MergedTable::from_series(&series);
    tracing::info!(
        "Merged {} records from {} files into {} rows",
        records,
        files.len(),
        table.len()
    );
    if let Some((min, max)) = table.thread_range() {
        tracing::debug!("Thread counts span {}..={}", min, max);
    }

    fs::create_dir_all(&options.output_dir).with_context(|| {
        format!(
            "Failed to create output directory: {}",
            options.output_dir.display()
        )
    })?;

    let config = &options.config;
    let mut charts = Vec::new();
    if options.render_charts {
        let size = (config.width, config.height);
        let time = ScalingChart::time(&series, &config.guides);
        let attempts = ScalingChart::attempts(&series, &config.guides);

        for (chart, file_name) in [
            (time, &config.time_chart_file),
            (attempts, &config.attempts_chart_file),
        ] {
            if !chart.has_points() {
                println!("Warning: no plottable records, skipping {file_name}.");
                continue;
            }
            let path = output_path(&options.output_dir, file_name);
            chart.render_png(&path, size)?;
            println!("[✓] Chart saved to: {}", path.display());
            charts.push(path);
        }
    }

    let csv_path = output_path(&options.output_dir, &config.csv_file);
    csv_output::write_csv_file(&table, &csv_path)?;
    println!("[✓] Merged CSV saved to: {}", csv_path.display());

    Ok(RunOutcome::Completed(RunSummary {
        input_files: files,
        records,
        rows: table.len(),
        csv_path,
        charts,
    }))
}
