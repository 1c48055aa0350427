//! Extraction of numeric statistics from a single simulator log.
//!
//! The primary entrypoint for this module is [`Extractor::extract`], which searches the text of one log for a fixed
//! list of patterns and returns a [`Metrics`] value. Every pattern is searched for independently: a log that is
//! missing, say, its HDBT statistics still yields its IPC and cache statistics. A missing pattern is reported at the
//! `info` log level and leaves the corresponding metric as `None`.
//!
//! Besides the columns of the output table, [`Metrics`] exposes the dispatch footprint and the average execution
//! length of a run; `compare-logs` prints both for the optimized log it is given.
//!
//! # Examples
//!
//! ```
//! use sim_log_stats::metrics::Extractor;
//!
//! # fn main() -> sim_log_stats::Result<()> {
//! let extractor = Extractor::new()?;
//! let metrics = extractor.extract(
//!     "nbody_8_16_skip.log",
//!     "CPU 0 cumulative IPC: 1.25 instructions: 1000000 cycles: 800000\nSkipped instrs: 250000\n",
//! );
//!
//! assert_eq!(metrics.ipc, Some(1.25));
//! assert_eq!(metrics.total_instructions, Some(1_000_000));
//! assert_eq!(metrics.dispatch_footprint(), Some(0.25));
//! assert_eq!(metrics.hdbt_hit_rate, None);
//! #     Ok(())
//! # }
//! ```

mod patterns;

use patterns::{parse_group, LoadKind, Pattern};

use crate::Result;

/// Outcome counters of the bytecode BTB (the BPCP) as reported at the end of a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BpcpCounts {
    /// Predictions made with a strong confidence that were correct.
    pub strong: u64,
    /// Predictions made with a weak confidence.
    pub weak: u64,
    /// Predictions that were wrong.
    pub wrong: u64,
}

impl BpcpCounts {
    /// Percentage of strong predictions over all predictions.
    ///
    /// A BTB that made no predictions at all has a hit rate of `0.0`. Counters are summed without overflowing, however
    /// large the simulator reported them.
    ///
    /// # Examples
    ///
    /// ```
    /// use sim_log_stats::metrics::BpcpCounts;
    ///
    /// let counts = BpcpCounts { strong: 3, weak: 0, wrong: 1 };
    /// assert_eq!(counts.hit_rate(), 75.0);
    /// assert_eq!(BpcpCounts::default().hit_rate(), 0.0);
    /// ```
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let total = u128::from(self.strong) + u128::from(self.weak) + u128::from(self.wrong);
        if total == 0 {
            0.0
        } else {
            self.strong as f64 / total as f64 * 100.0
        }
    }
}

/// Load accesses of one cache, split by the sub-categories the simulator reports.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheLoads {
    /// Regular load accesses.
    pub plain: Option<u64>,
    /// Load accesses issued for bytecode fetches.
    pub bytecode: Option<u64>,
    /// Load accesses issued for dispatch table lookups.
    pub dispatch_table: Option<u64>,
}

impl CacheLoads {
    /// All load accesses of the cache.
    ///
    /// The regular load line anchors the total: without it the total is absent. Each sub-category is added only if
    /// its own line was found. A total that does not fit in a `u64` is reported and treated as absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use sim_log_stats::metrics::CacheLoads;
    ///
    /// let loads = CacheLoads { plain: Some(100), bytecode: Some(20), dispatch_table: None };
    /// assert_eq!(loads.total(), Some(120));
    ///
    /// let loads = CacheLoads { plain: None, bytecode: Some(20), dispatch_table: Some(5) };
    /// assert_eq!(loads.total(), None);
    /// ```
    #[must_use]
    pub fn total(&self) -> Option<u64> {
        let total = self
            .plain?
            .checked_add(self.bytecode.unwrap_or(0))
            .and_then(|total| total.checked_add(self.dispatch_table.unwrap_or(0)));
        if total.is_none() {
            log::info!("cache load total overflows, leaving it absent: {self:?}");
        }
        total
    }

    fn is_empty(&self) -> bool {
        self.plain.is_none() && self.bytecode.is_none() && self.dispatch_table.is_none()
    }
}

/// Everything extracted from one simulator log.
///
/// Each field is `None` when its pattern was not found in the log. Derived metrics are exposed as methods and are
/// only computed when all of their inputs are present.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Metrics {
    /// Cumulative instructions per cycle of CPU 0.
    pub ipc: Option<f64>,
    /// Instructions retired by CPU 0.
    pub total_instructions: Option<u64>,
    /// Cycles simulated for CPU 0.
    pub cycles: Option<u64>,
    /// Branch mispredictions per kilo-instruction.
    pub branch_mpki: Option<f64>,
    /// Indirect branch mispredictions per kilo-instruction.
    pub indirect_branch_mpki: Option<f64>,
    /// Number of bytecodes the dispatch predictor saw.
    pub seen_bytecodes: Option<u64>,
    /// Number of dispatch instructions skipped by the predictor.
    pub skipped_instructions: Option<u64>,
    /// Percentage of hits in the bytecode buffer.
    pub buffer_hit_percentage: Option<f64>,
    /// Percentage of hits in the HDBT.
    pub hdbt_hit_rate: Option<f64>,
    /// Outcome counters of the bytecode BTB.
    pub bpcp: Option<BpcpCounts>,
    /// Load accesses of the L1 instruction cache.
    pub l1i_loads: CacheLoads,
    /// Load accesses of the L1 data cache.
    pub l1d_loads: CacheLoads,
}

impl Metrics {
    /// Whether nothing at all could be extracted from the log.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ipc.is_none()
            && self.total_instructions.is_none()
            && self.cycles.is_none()
            && self.branch_mpki.is_none()
            && self.indirect_branch_mpki.is_none()
            && self.seen_bytecodes.is_none()
            && self.skipped_instructions.is_none()
            && self.buffer_hit_percentage.is_none()
            && self.hdbt_hit_rate.is_none()
            && self.bpcp.is_none()
            && self.l1i_loads.is_empty()
            && self.l1d_loads.is_empty()
    }

    /// BPCP hit rate in percent, see [`BpcpCounts::hit_rate`].
    #[must_use]
    pub fn bpcp_hit_rate(&self) -> Option<f64> {
        self.bpcp.as_ref().map(BpcpCounts::hit_rate)
    }

    /// Fraction of retired instructions that were skipped dispatch instructions.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn dispatch_footprint(&self) -> Option<f64> {
        let skipped = self.skipped_instructions?;
        let total = self.total_instructions.filter(|&total| total > 0)?;
        Some(skipped as f64 / total as f64)
    }

    /// Average number of executed instructions per seen bytecode.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn average_execution_length(&self) -> Option<f64> {
        let total = self.total_instructions?;
        let skipped = self.skipped_instructions?;
        let seen = self.seen_bytecodes.filter(|&seen| seen > 0)?;
        Some((total as f64 - skipped as f64) / seen as f64)
    }
}

#[derive(Debug)]
struct CachePatterns {
    plain: Pattern,
    bytecode: Pattern,
    dispatch_table: Pattern,
}

impl CachePatterns {
    fn new(cache: &str) -> Result<Self> {
        Ok(Self {
            plain: Pattern::cache_loads(cache, LoadKind::Plain)?,
            bytecode: Pattern::cache_loads(cache, LoadKind::Bytecode)?,
            dispatch_table: Pattern::cache_loads(cache, LoadKind::DispatchTable)?,
        })
    }

    fn extract(&self, source: &str, text: &str) -> CacheLoads {
        CacheLoads {
            plain: self.plain.number(source, text, 1),
            bytecode: self.bytecode.number(source, text, 1),
            dispatch_table: self.dispatch_table.number(source, text, 1),
        }
    }
}

/// Compiled set of log patterns.
///
/// Building an extractor compiles every pattern once; the same extractor is then reused for every log of a run.
#[derive(Debug)]
pub struct Extractor {
    ipc: Pattern,
    total_instructions: Pattern,
    cycles: Pattern,
    branch_mpki: Pattern,
    indirect_branch_mpki: Pattern,
    seen_bytecodes: Pattern,
    skipped_instructions: Pattern,
    buffer_hit_percentage: Pattern,
    hdbt_hit_rate: Pattern,
    bpcp: Pattern,
    l1i: CachePatterns,
    l1d: CachePatterns,
}

impl Extractor {
    /// Compiles all log patterns.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Pattern`] if a pattern fails to compile.
    pub fn new() -> Result<Self> {
        Ok(Self {
            ipc: Pattern::new("IPC", patterns::IPC)?,
            total_instructions: Pattern::new("Total instrs", patterns::TOTAL_INSTRUCTIONS)?,
            cycles: Pattern::new("Cycles", patterns::CYCLES)?,
            branch_mpki: Pattern::new("Branch MPKI", patterns::BRANCH_MPKI)?,
            indirect_branch_mpki: Pattern::new(
                "Branch Indirect MPKI",
                patterns::INDIRECT_BRANCH_MPKI,
            )?,
            seen_bytecodes: Pattern::new("Seen bytecodes", patterns::SEEN_BYTECODES)?,
            skipped_instructions: Pattern::new("Skipped instrs", patterns::SKIPPED_INSTRUCTIONS)?,
            buffer_hit_percentage: Pattern::new(
                "Bytecode buffer hit percentage",
                patterns::BUFFER_HIT_PERCENTAGE,
            )?,
            hdbt_hit_rate: Pattern::new("HDBT hit rate", patterns::HDBT_HIT_RATE)?,
            bpcp: Pattern::new("BPCP hit rate", patterns::BPCP_COUNTS)?,
            l1i: CachePatterns::new("cpu0_L1I")?,
            l1d: CachePatterns::new("cpu0_L1D")?,
        })
    }

    /// Extracts every known metric from the text of one log.
    ///
    /// `source` only labels diagnostics, typically the path of the log.
    #[must_use]
    pub fn extract(&self, source: &str, text: &str) -> Metrics {
        let metrics = Metrics {
            ipc: self.ipc.number(source, text, 1),
            total_instructions: self.total_instructions.number(source, text, 1),
            cycles: self.cycles.number(source, text, 1),
            branch_mpki: self.branch_mpki.number(source, text, 1),
            indirect_branch_mpki: self.indirect_branch_mpki.number(source, text, 1),
            seen_bytecodes: self.seen_bytecodes.number(source, text, 1),
            skipped_instructions: self.skipped_instructions.number(source, text, 1),
            buffer_hit_percentage: self.buffer_hit_percentage.number(source, text, 1),
            hdbt_hit_rate: self.hdbt_hit_rate.number(source, text, 1),
            bpcp: self.extract_bpcp(source, text),
            l1i_loads: self.l1i.extract(source, text),
            l1d_loads: self.l1d.extract(source, text),
        };
        log::trace!("[{source}] extracted metrics: {metrics:#?}");
        metrics
    }

    fn extract_bpcp(&self, source: &str, text: &str) -> Option<BpcpCounts> {
        let captures = self.bpcp.captures(source, text)?;
        let name = self.bpcp.name();
        Some(BpcpCounts {
            strong: parse_group(name, source, &captures, 1)?,
            weak: parse_group(name, source, &captures, 2)?,
            wrong: parse_group(name, source, &captures, 3)?,
        })
    }
}
