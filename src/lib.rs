//! Statistics extraction for bytecode-dispatch simulator logs.
//!
//! sim-log-stats turns the free-text output of a ChampSim-based branch-prediction and bytecode-dispatch simulator into
//! flat CSV tables ready for analysis. Each log is searched for a fixed set of labeled numeric lines (cumulative IPC,
//! branch MPKI, L1 cache loads, bytecode buffer/HDBT/BPCP statistics, ...), classified from its file name, and
//! written out as one row.
//!
//! # Usage
//! sim-log-stats is primarily designed to be used as a pair of executables, but the extraction and aggregation steps
//! are also exposed as a library.
//!
//! ## As an executable
//! Aggregate a folder of logs into a table:
//! ```console
//! $ parse-logs logs/ results/stats.csv
//! ```
//!
//! Passing any third argument marks the run as a size test, in which case the trailing segments of each file name
//! become the size label:
//! ```console
//! $ parse-logs logs/sizes/ results/sizes.csv size
//! ```
//!
//! Compare an optimized run against its baseline:
//! ```console
//! $ compare-logs logs/nbody_8_16_skip.log logs/nbody_8_16_no.log
//! cut_cycles: 12.345678
//! skipped_instructions: 8.765432
//! removed_dcache_loads: Data not found
//! removed_icache_loads: 3.141593
//! dispatch_footprint: 0.087654
//! average_execution_length: 45.500000
//! ```
//!
//! Diagnostics go through [`log`]; set `RUST_LOG=info` to see which patterns were missing from which log.
//!
//! ## As a library
//! ```no_run
//! use std::path::PathBuf;
//!
//! use sim_log_stats::aggregate;
//!
//! # fn main() -> sim_log_stats::Result<()> {
//! let logs_path = PathBuf::from("logs");
//! let output_path = PathBuf::from("results/stats.csv");
//!
//! let summary = aggregate(&logs_path, &output_path, false)?;
//! #     Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]

pub mod aggregate;
pub mod compare;
mod error;
pub mod metrics;
pub mod records;
pub mod traces;

pub use aggregate::{aggregate, Summary};
pub use compare::{compare_files, Comparison};
pub use error::{Error, Result};
pub use metrics::{Extractor, Metrics};
pub use records::LogRecord;
