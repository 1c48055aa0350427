//! Classification of simulator logs from their file names.
//!
//! Log files are named after the trace they simulate followed by the configuration of the run, separated by
//! underscores, e.g. `mandelbrot_8_6_no.log` or `nbody_16_32_skip.log`. The primary entrypoint for this module is
//! [`classify`], which turns such a path into a [`Classification`].
//!
//! # Examples
//!
//! ```
//! use std::path::Path;
//!
//! use sim_log_stats::traces::{classify, BenchmarkType, OptimizationMode};
//!
//! let classification = classify(Path::new("logs/mandelbrot_8_6_no.log"), false);
//!
//! assert_eq!(classification.trace.to_string(), "mandelbrot");
//! assert_eq!(classification.benchmark_type, BenchmarkType::Python);
//! assert_eq!(classification.optimization, OptimizationMode::No);
//! assert_eq!(classification.size, "no");
//! ```

use std::{
    fmt::{self, Display, Formatter},
    path::Path,
};

use serde::{Deserialize, Serialize};

/// Separator between the segments of a log file name.
pub const SEPARATOR: char = '_';

/// Size label used outside of size tests.
pub const NO_SIZE: &str = "no";

const BENCHMARK_TYPES: &[(&str, BenchmarkType)] = &[
    ("nbody", BenchmarkType::Python),
    ("binary", BenchmarkType::Python),
    ("knucleotide", BenchmarkType::Python),
    ("fasta", BenchmarkType::Python),
    ("recog", BenchmarkType::Native),
    ("decoder", BenchmarkType::Native),
    ("spectralnorm", BenchmarkType::Python),
    ("mandelbrot", BenchmarkType::Python),
    ("fannkuch-redux", BenchmarkType::Python),
];

/// Name of the trace a log was produced from.
///
/// # Examples
///
/// ```
/// use sim_log_stats::traces::Identifier;
///
/// let identifier = Identifier::from("nbody");
///
/// assert_eq!(identifier.to_string(), "nbody");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Identifier(String);

impl Display for Identifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Identifier {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Identifier {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Dispatch optimization the simulated run was configured with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptimizationMode {
    /// Baseline, no dispatch optimization.
    No,
    /// Dispatch instructions are skipped.
    Skip,
    /// Ideal dispatch prediction.
    Ideal,
    /// Minimal hardware configuration.
    Minimal,
}

impl OptimizationMode {
    /// Recognizes the mode from the trailing segments of a log file name.
    ///
    /// # Examples
    ///
    /// ```
    /// use sim_log_stats::traces::OptimizationMode;
    ///
    /// assert_eq!(OptimizationMode::from_tail("16_skip"), OptimizationMode::Skip);
    /// assert_eq!(OptimizationMode::from_tail("8_16"), OptimizationMode::No);
    /// ```
    #[must_use]
    pub fn from_tail(tail: &str) -> Self {
        if tail.contains("skip") {
            Self::Skip
        } else if tail.contains("ideal") {
            Self::Ideal
        } else if tail.contains("minimal") {
            Self::Minimal
        } else {
            Self::No
        }
    }
}

impl Display for OptimizationMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::No => "no",
            Self::Skip => "skip",
            Self::Ideal => "ideal",
            Self::Minimal => "minimal",
        })
    }
}

/// Kind of program a trace was recorded from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BenchmarkType {
    /// A Python program running on the bytecode interpreter.
    Python,
    /// A natively compiled program.
    Native,
    /// A trace missing from the lookup table.
    Unknown,
}

impl BenchmarkType {
    /// Looks up the type of a known trace, falling back to [`BenchmarkType::Unknown`].
    #[must_use]
    pub fn of(trace: &Identifier) -> Self {
        BENCHMARK_TYPES
            .iter()
            .find(|(name, _)| *name == trace.0)
            .map_or(Self::Unknown, |(_, benchmark_type)| *benchmark_type)
    }
}

impl Display for BenchmarkType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Python => "python",
            Self::Native => "native",
            Self::Unknown => "unknown",
        })
    }
}

/// Labels derived from a log's file name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Classification {
    /// Trace the log was produced from.
    pub trace: Identifier,
    /// Size/configuration label of the run.
    pub size: String,
    /// Dispatch optimization of the run.
    pub optimization: OptimizationMode,
    /// Kind of program the trace was recorded from.
    pub benchmark_type: BenchmarkType,
}

/// File name of `path` without its extension.
///
/// Only a trailing `.ext` made of a word without separators counts as an extension, so a dot inside a configuration
/// segment (`nbody_8_0.5_skip`) or a purely numeric suffix (`nbody_8_0.5`) keeps the whole name.
fn strip_extension(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    match name.rsplit_once('.') {
        Some((stem, extension))
            if !stem.is_empty()
                && !extension.contains(SEPARATOR)
                && extension.chars().any(|c| c.is_ascii_alphabetic()) =>
        {
            stem.to_string()
        }
        _ => name,
    }
}

/// Classifies a log from its file name.
///
/// The file name is taken without its extension (a dot inside a segment does not start one). The trace identifier is
/// everything before the first [`SEPARATOR`]; the last two segments form the "tail". In a size test the tail is the
/// size label and the run is always [`OptimizationMode::Skip`]; otherwise the size label is [`NO_SIZE`] and the mode
/// is recognized from the tail.
#[must_use]
pub fn classify(path: &Path, size_test: bool) -> Classification {
    let stem = strip_extension(path);

    let trace = Identifier::from(stem.split(SEPARATOR).next().unwrap_or_default());

    let segments: Vec<&str> = stem.split(SEPARATOR).collect();
    let tail = segments[segments.len().saturating_sub(2)..].join(SEPARATOR.to_string().as_str());

    let (size, optimization) = if size_test {
        (tail, OptimizationMode::Skip)
    } else {
        (NO_SIZE.to_string(), OptimizationMode::from_tail(&tail))
    };

    let benchmark_type = BenchmarkType::of(&trace);
    log::debug!(
        "[{}] classified as {benchmark_type} trace {trace} (size: {size}, optimized: {optimization})",
        path.display()
    );

    Classification {
        trace,
        size,
        optimization,
        benchmark_type,
    }
}
