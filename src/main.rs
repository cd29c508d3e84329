use anyhow::Result;
use casplot::{
    cli::{Cli, USAGE},
    config::PlotConfig,
    pipeline::{self, RunOptions, RunOutcome},
};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();

    init_tracing(args.debug);

    if args.inputs.is_empty() {
        println!("{USAGE}");
        std::process::exit(1);
    }

    let config = match &args.config {
        Some(path) => PlotConfig::from_toml(path)?,
        None => PlotConfig::default(),
    };

    let options = RunOptions {
        output_dir: args.output_dir,
        config,
        render_charts: !args.no_charts,
    };

    match pipeline::run(&args.inputs, &options)? {
        RunOutcome::NoInputs => {
            println!("No valid input files found.");
            std::process::exit(1);
        }
        RunOutcome::Completed(summary) => {
            tracing::debug!(
                "Processed {} files, {} records",
                summary.input_files.len(),
                summary.records
            );
        }
    }

    Ok(())
}
