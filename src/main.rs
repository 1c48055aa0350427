use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use sim_log_stats::aggregate;

/// Extracts simulator statistics from a folder of logs into a CSV table.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Path to a directory containing simulator logs, searched recursively
    log_folder: PathBuf,

    /// Path of the CSV file to write
    output_csv: PathBuf,

    /// If present (any value), treat the logs as a size test
    size_test: Option<String>,
}

fn main() -> anyhow::Result<()> {
    human_panic::setup_panic!();
    env_logger::init();

    let args = Args::parse();
    let size_test = args.size_test.is_some();

    log::info!(
        "parsing logs under {}{}...",
        args.log_folder.display(),
        if size_test { " as a size test" } else { "" }
    );
    let summary = aggregate(&args.log_folder, &args.output_csv, size_test)
        .context(format!(
            "could not aggregate logs under {}",
            args.log_folder.display()
        ))
        .map_err(|err| {
            log::error!("{err:#}");
            err
        })?;

    match summary.output {
        Some(path) => println!(
            "CSV file created at {} ({} rows, {} files skipped)",
            path.display(),
            summary.records,
            summary.skipped
        ),
        None => println!("No data extracted. CSV file not created."),
    }

    Ok(())
}
