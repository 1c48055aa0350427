use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use sim_log_stats::compare_files;

/// Compares the log of an optimized run against the log of its baseline.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Path to the log of the optimized run
    optimized: PathBuf,

    /// Path to the log of the baseline run
    baseline: PathBuf,
}

fn main() -> anyhow::Result<()> {
    human_panic::setup_panic!();
    env_logger::init();

    let args = Args::parse();

    log::info!(
        "comparing {} against {}...",
        args.optimized.display(),
        args.baseline.display()
    );
    let comparison = compare_files(&args.optimized, &args.baseline)
        .context("could not compare logs")
        .map_err(|err| {
            log::error!("{err:#}");
            err
        })?;

    for (name, value) in comparison.entries() {
        match value {
            Some(value) => println!("{name}: {value:.6}"),
            None => println!("{name}: Data not found"),
        }
    }

    Ok(())
}
