//! Comparison of an optimized run against its baseline.
//!
//! Given the logs of the same trace simulated with and without the dispatch optimization, [`Comparison::new`] reports
//! how much the optimization cut cycles and cache loads, and how many of the optimized run's instructions were
//! skipped. It also carries the dispatch footprint and average execution length of the optimized run.
//!
//! # Examples
//!
//! ```
//! use sim_log_stats::{compare::Comparison, metrics::Metrics};
//!
//! let optimized = Metrics { cycles: Some(750), ..Metrics::default() };
//! let baseline = Metrics { cycles: Some(1000), ..Metrics::default() };
//!
//! let comparison = Comparison::new(&optimized, &baseline);
//!
//! assert_eq!(comparison.cut_cycles, Some(25.0));
//! assert_eq!(comparison.skipped_instructions, None);
//! ```

use std::{fs, path::Path};

use crate::{
    metrics::{Extractor, Metrics},
    Error, Result,
};

/// Relative differences between an optimized run and its baseline, all in percent.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Comparison {
    /// Share of the baseline's cycles the optimized run did not need.
    pub cut_cycles: Option<f64>,
    /// Share of the optimized run's instructions that were skipped.
    pub skipped_instructions: Option<f64>,
    /// Share of the baseline's L1 data cache loads the optimized run did not issue.
    pub removed_dcache_loads: Option<f64>,
    /// Share of the baseline's L1 instruction cache loads the optimized run did not issue.
    pub removed_icache_loads: Option<f64>,
    /// Fraction of the optimized run's instructions that were skipped, see [`Metrics::dispatch_footprint`].
    pub dispatch_footprint: Option<f64>,
    /// Executed instructions per bytecode in the optimized run, see [`Metrics::average_execution_length`].
    pub average_execution_length: Option<f64>,
}

#[allow(clippy::cast_precision_loss)]
fn reduction(optimized: Option<u64>, baseline: Option<u64>) -> Option<f64> {
    let optimized = optimized.filter(|&v| v > 0)?;
    let baseline = baseline.filter(|&v| v > 0)?;
    Some(100.0 * (1.0 - optimized as f64 / baseline as f64))
}

impl Comparison {
    /// Compares the metrics of an optimized run against those of its baseline.
    ///
    /// A value is `None` when one of its inputs is missing or zero. Cache load reductions only consider regular loads,
    /// not the bytecode or dispatch table sub-categories.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn new(optimized: &Metrics, baseline: &Metrics) -> Self {
        let skipped_instructions = optimized
            .skipped_instructions
            .filter(|&v| v > 0)
            .zip(optimized.total_instructions.filter(|&v| v > 0))
            .map(|(skipped, total)| 100.0 * (skipped as f64 / total as f64));

        Self {
            cut_cycles: reduction(optimized.cycles, baseline.cycles),
            skipped_instructions,
            removed_dcache_loads: reduction(optimized.l1d_loads.plain, baseline.l1d_loads.plain),
            removed_icache_loads: reduction(optimized.l1i_loads.plain, baseline.l1i_loads.plain),
            dispatch_footprint: optimized.dispatch_footprint(),
            average_execution_length: optimized.average_execution_length(),
        }
    }

    /// Named values in display order.
    #[must_use]
    pub fn entries(&self) -> [(&'static str, Option<f64>); 6] {
        [
            ("cut_cycles", self.cut_cycles),
            ("skipped_instructions", self.skipped_instructions),
            ("removed_dcache_loads", self.removed_dcache_loads),
            ("removed_icache_loads", self.removed_icache_loads),
            ("dispatch_footprint", self.dispatch_footprint),
            ("average_execution_length", self.average_execution_length),
        ]
    }
}

/// Reads two logs and compares them, see [`Comparison::new`].
///
/// # Errors
///
/// Returns [`Error::Read`] if either log cannot be read.
pub fn compare_files(optimized: &Path, baseline: &Path) -> Result<Comparison> {
    let extractor = Extractor::new()?;
    let read = |path: &Path| {
        fs::read(path)
            .map(|bytes| extractor.extract(&path.display().to_string(), &String::from_utf8_lossy(&bytes)))
            .map_err(|err| Error::Read {
                path: path.to_path_buf(),
                source: err,
            })
    };

    let comparison = Comparison::new(&read(optimized)?, &read(baseline)?);
    log::debug!("comparison: {comparison:#?}");
    Ok(comparison)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::CacheLoads;

    #[test]
    fn computes_every_reduction() {
        let optimized = Metrics {
            cycles: Some(600),
            total_instructions: Some(1000),
            skipped_instructions: Some(200),
            l1d_loads: CacheLoads {
                plain: Some(90),
                bytecode: Some(1000),
                dispatch_table: None,
            },
            l1i_loads: CacheLoads {
                plain: Some(150),
                ..CacheLoads::default()
            },
            ..Metrics::default()
        };
        let baseline = Metrics {
            cycles: Some(800),
            l1d_loads: CacheLoads {
                plain: Some(100),
                ..CacheLoads::default()
            },
            l1i_loads: CacheLoads {
                plain: Some(200),
                ..CacheLoads::default()
            },
            ..Metrics::default()
        };

        let comparison = Comparison::new(&optimized, &baseline);

        assert_eq!(comparison.cut_cycles, Some(100.0 * (1.0 - 600.0 / 800.0)));
        assert_eq!(comparison.skipped_instructions, Some(100.0 * (200.0 / 1000.0)));
        assert_eq!(comparison.removed_dcache_loads, Some(100.0 * (1.0 - 90.0 / 100.0)));
        assert_eq!(comparison.removed_icache_loads, Some(100.0 * (1.0 - 150.0 / 200.0)));
        assert_eq!(comparison.dispatch_footprint, Some(200.0 / 1000.0));
        assert_eq!(comparison.average_execution_length, None);
    }

    #[test]
    fn missing_or_zero_inputs_leave_values_absent() {
        let optimized = Metrics {
            cycles: Some(0),
            skipped_instructions: Some(10),
            ..Metrics::default()
        };
        let baseline = Metrics {
            cycles: Some(800),
            ..Metrics::default()
        };

        assert_eq!(Comparison::new(&optimized, &baseline), Comparison::default());
    }

    #[test]
    fn compares_logs_on_disk() {
        let dir = tempfile::tempdir().expect("can create temporary directory");
        let optimized = dir.path().join("nbody_8_16_skip.log");
        let baseline = dir.path().join("nbody_8_16_no.log");
        fs::write(
            &optimized,
            "CPU 0 cumulative IPC: 2 instructions: 1000 cycles: 500\nSkipped instrs: 100\nSeen bytecodes: 60\n",
        )
        .expect("can write log");
        fs::write(&baseline, "CPU 0 cumulative IPC: 1 instructions: 1000 cycles: 1000\n")
            .expect("can write log");

        let comparison = compare_files(&optimized, &baseline).expect("logs can be read");

        assert_eq!(comparison.cut_cycles, Some(50.0));
        assert_eq!(comparison.skipped_instructions, Some(10.0));
        assert_eq!(comparison.removed_dcache_loads, None);
        assert_eq!(comparison.dispatch_footprint, Some(100.0 / 1000.0));
        assert_eq!(comparison.average_execution_length, Some(900.0 / 60.0));
        assert_eq!(comparison.entries().len(), 6);
    }
}
