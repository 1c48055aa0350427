//! Error type shared by the library.
//!
//! A pattern that cannot be found in a log is not an error: the corresponding metric is simply absent. The variants
//! here cover the failures that stop an aggregation run, which boil down to the file system misbehaving or the output
//! table not being writable.

use std::{io, path::PathBuf};

/// Failure that stops an aggregation run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The log folder does not exist or is not a directory.
    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),

    /// The log folder path is not valid UTF-8 and cannot be walked.
    #[error("{} is not a valid UTF-8 path", .0.display())]
    NonUtf8Path(PathBuf),

    /// One of the built-in log patterns failed to compile.
    #[error("could not compile log pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// The recursive walk pattern could not be built.
    #[error("could not build walk pattern: {0}")]
    Glob(#[from] glob::PatternError),

    /// An entry under the log folder could not be visited.
    #[error("could not walk log folder: {0}")]
    Walk(#[from] glob::GlobError),

    /// A log file exists but could not be read.
    #[error("could not read log file {}: {source}", path.display())]
    Read {
        /// Path of the unreadable file.
        path: PathBuf,
        /// Underlying I/O failure.
        source: io::Error,
    },

    /// The output table could not be serialized.
    #[error("could not write CSV output: {0}")]
    Csv(#[from] csv::Error),

    /// Any other I/O failure, e.g. creating the output directory.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Convenience alias for results carrying [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
