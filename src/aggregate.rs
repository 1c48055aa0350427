//! Aggregation of a whole folder of simulator logs into one table.
//!
//! The primary entrypoint for this module is [`aggregate`], which walks a log folder recursively, extracts the
//! metrics of every file with [`Extractor`], classifies it from its name with [`classify`], and writes one
//! [`LogRecord`] per file to a CSV table. Files are visited one at a time in sorted path order.
//!
//! # Examples
//!
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
//! println!("wrote {} rows", summary.records);
//! #     Ok(())
//! # }
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    metrics::Extractor,
    records::{write_file, LogRecord},
    traces::classify,
    Error, Result,
};

/// Glob pattern matching every entry below the log folder.
pub const FILE_PATTERN: &str = "**/*";

/// Outcome of an aggregation run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    /// Number of files visited.
    pub files: usize,
    /// Number of rows produced.
    pub records: usize,
    /// Number of files skipped because nothing could be extracted from them.
    pub skipped: usize,
    /// Path of the written table, `None` if no rows were produced.
    pub output: Option<PathBuf>,
}

/// Lists every regular file below `log_folder`, in sorted order.
///
/// # Errors
///
/// Returns [`Error::NotADirectory`] if `log_folder` is not a directory, [`Error::NonUtf8Path`] if its path is not
/// valid UTF-8, and [`Error::Walk`] if an entry cannot be visited.
pub fn find_logs(log_folder: &Path) -> Result<Vec<PathBuf>> {
    if !log_folder.is_dir() {
        return Err(Error::NotADirectory(log_folder.to_path_buf()));
    }

    let folder = log_folder
        .to_str()
        .ok_or_else(|| Error::NonUtf8Path(log_folder.to_path_buf()))?;
    let pattern = Path::new(&glob::Pattern::escape(folder)).join(FILE_PATTERN);
    let mut paths = Vec::new();
    for entry in glob::glob(&pattern.to_string_lossy())? {
        let path = entry?;
        if path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();

    log::info!("found {} files under {}", paths.len(), log_folder.display());
    Ok(paths)
}

/// Reads one log and turns it into a row.
///
/// Returns `None` if nothing could be extracted from the log.
///
/// # Errors
///
/// Returns [`Error::Read`] if the file cannot be read.
pub fn process_log(extractor: &Extractor, path: &Path, size_test: bool) -> Result<Option<LogRecord>> {
    let source = path.display().to_string();
    log::info!("processing {source}...");

    let bytes = fs::read(path).map_err(|err| Error::Read {
        path: path.to_path_buf(),
        source: err,
    })?;
    let metrics = extractor.extract(&source, &String::from_utf8_lossy(&bytes));
    if metrics.is_empty() {
        log::warn!("[{source}] no relevant data found, skipping...");
        return Ok(None);
    }

    Ok(Some(LogRecord::new(classify(path, size_test), &metrics)))
}

/// Extracts one row per log below `log_folder`.
///
/// Returns the rows together with the number of files that were skipped.
///
/// # Errors
///
/// Fails if the folder cannot be walked or a file cannot be read, see [`find_logs`] and [`process_log`].
pub fn collect(log_folder: &Path, size_test: bool) -> Result<(Vec<LogRecord>, usize)> {
    let extractor = Extractor::new()?;

    let mut records = Vec::new();
    let mut skipped = 0;
    for path in find_logs(log_folder)? {
        match process_log(&extractor, &path, size_test)? {
            Some(record) => records.push(record),
            None => skipped += 1,
        }
    }

    log::info!("extracted {} records, skipped {skipped} files", records.len());
    log::trace!("records: {records:#?}");
    Ok((records, skipped))
}

/// Aggregates every log below `log_folder` into a CSV table at `output`.
///
/// If no rows could be produced, no file is written and [`Summary::output`] is `None`. Parent directories of `output`
/// are created as needed.
///
/// # Errors
///
/// Fails if the folder cannot be walked, a log cannot be read, or the table cannot be written.
pub fn aggregate(log_folder: &Path, output: &Path, size_test: bool) -> Result<Summary> {
    let (records, skipped) = collect(log_folder, size_test)?;
    let mut summary = Summary {
        files: records.len() + skipped,
        records: records.len(),
        skipped,
        output: None,
    };

    if records.is_empty() {
        log::warn!("no data extracted, not writing {}", output.display());
        return Ok(summary);
    }

    if let Some(parent) = output.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    write_file(output, &records)?;
    log::info!("wrote CSV file to {}", output.display());

    summary.output = Some(output.to_path_buf());
    Ok(summary)
}
