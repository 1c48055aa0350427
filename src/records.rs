//! Rows of the output table and the CSV writer.
//!
//! Every [`LogRecord`] has the same 15 columns, listed in [`HEADER`]. Metrics missing from a log are written as
//! [`NOT_AVAILABLE`] so the table stays rectangular.

use std::{fs::File, io::Write, path::Path};

use serde::{Serialize, Serializer};

use crate::{
    metrics::Metrics,
    traces::{BenchmarkType, Classification, Identifier, OptimizationMode},
    Result,
};

/// Value written in place of a metric that could not be extracted.
pub const NOT_AVAILABLE: &str = "N/A";

/// Column names of the output table, in order.
pub const HEADER: [&str; 15] = [
    "Trace File",
    "Optimized",
    "Size",
    "Type",
    "IPC",
    "Branch MPKI",
    "Branch Indirect MPKI",
    "Seen bytecodes",
    "Skipped instrs",
    "Total instrs",
    "Bytecode buffer hit percentage",
    "HDBT hit rate",
    "BPCP hit rate",
    "D-Cache Loads",
    "I-Cache Loads",
];

/// A metric cell that serializes to [`NOT_AVAILABLE`] when empty.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Field<T>(pub Option<T>);

impl<T> From<Option<T>> for Field<T> {
    fn from(value: Option<T>) -> Self {
        Self(value)
    }
}

impl<T: Serialize> Serialize for Field<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match &self.0 {
            Some(value) => value.serialize(serializer),
            None => serializer.serialize_str(NOT_AVAILABLE),
        }
    }
}

/// One row of the output table, describing a single log.
///
/// # Examples
///
/// ```
/// use std::path::Path;
///
/// use sim_log_stats::{metrics::Metrics, records::LogRecord, traces::classify};
///
/// let metrics = Metrics { ipc: Some(1.5), ..Metrics::default() };
/// let record = LogRecord::new(classify(Path::new("nbody_8_16_skip.log"), false), &metrics);
///
/// assert_eq!(record.ipc.0, Some(1.5));
/// assert_eq!(record.branch_mpki.0, None);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LogRecord {
    /// Trace the log was produced from.
    #[serde(rename = "Trace File")]
    pub trace: Identifier,
    /// Dispatch optimization of the run.
    #[serde(rename = "Optimized")]
    pub optimized: OptimizationMode,
    /// Size/configuration label of the run.
    #[serde(rename = "Size")]
    pub size: String,
    /// Kind of program the trace was recorded from.
    #[serde(rename = "Type")]
    pub benchmark_type: BenchmarkType,
    /// Cumulative IPC.
    #[serde(rename = "IPC")]
    pub ipc: Field<f64>,
    /// Branch MPKI.
    #[serde(rename = "Branch MPKI")]
    pub branch_mpki: Field<f64>,
    /// Indirect branch MPKI.
    #[serde(rename = "Branch Indirect MPKI")]
    pub indirect_branch_mpki: Field<f64>,
    /// Bytecodes seen by the dispatch predictor.
    #[serde(rename = "Seen bytecodes")]
    pub seen_bytecodes: Field<u64>,
    /// Skipped dispatch instructions.
    #[serde(rename = "Skipped instrs")]
    pub skipped_instructions: Field<u64>,
    /// Retired instructions.
    #[serde(rename = "Total instrs")]
    pub total_instructions: Field<u64>,
    /// Bytecode buffer hit percentage.
    #[serde(rename = "Bytecode buffer hit percentage")]
    pub buffer_hit_percentage: Field<f64>,
    /// HDBT hit rate.
    #[serde(rename = "HDBT hit rate")]
    pub hdbt_hit_rate: Field<f64>,
    /// BPCP hit rate.
    #[serde(rename = "BPCP hit rate")]
    pub bpcp_hit_rate: Field<f64>,
    /// All L1 data cache loads.
    #[serde(rename = "D-Cache Loads")]
    pub dcache_loads: Field<u64>,
    /// All L1 instruction cache loads.
    #[serde(rename = "I-Cache Loads")]
    pub icache_loads: Field<u64>,
}

impl LogRecord {
    /// Builds the row of a log from its file name labels and extracted metrics.
    #[must_use]
    pub fn new(classification: Classification, metrics: &Metrics) -> Self {
        let Classification {
            trace,
            size,
            optimization,
            benchmark_type,
        } = classification;

        Self {
            trace,
            optimized: optimization,
            size,
            benchmark_type,
            ipc: metrics.ipc.into(),
            branch_mpki: metrics.branch_mpki.into(),
            indirect_branch_mpki: metrics.indirect_branch_mpki.into(),
            seen_bytecodes: metrics.seen_bytecodes.into(),
            skipped_instructions: metrics.skipped_instructions.into(),
            total_instructions: metrics.total_instructions.into(),
            buffer_hit_percentage: metrics.buffer_hit_percentage.into(),
            hdbt_hit_rate: metrics.hdbt_hit_rate.into(),
            bpcp_hit_rate: metrics.bpcp_hit_rate().into(),
            dcache_loads: metrics.l1d_loads.total().into(),
            icache_loads: metrics.l1i_loads.total().into(),
        }
    }
}

/// Writes `records` as a CSV table, header first, to any writer.
///
/// # Errors
///
/// Returns [`crate::Error::Csv`] if a row cannot be serialized or written.
pub fn write<W: Write>(writer: W, records: &[LogRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    if records.is_empty() {
        writer.write_record(HEADER)?;
    }
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes `records` as a CSV table to a new file at `path`, replacing any existing file.
///
/// # Errors
///
/// Returns [`crate::Error::Io`] if the file cannot be created and [`crate::Error::Csv`] if a row cannot be written.
pub fn write_file(path: &Path, records: &[LogRecord]) -> Result<()> {
    log::debug!("writing {} records to {}...", records.len(), path.display());
    write(File::create(path)?, records)?;
    log::debug!("wrote {} records to {}", records.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::{
        metrics::{BpcpCounts, CacheLoads},
        traces::classify,
    };

    fn render(records: &[LogRecord]) -> String {
        let mut buffer = Vec::new();
        write(&mut buffer, records).expect("writing to memory succeeds");
        String::from_utf8(buffer).expect("csv output is utf-8")
    }

    #[test]
    fn header_matches_serialized_field_order() {
        let record = LogRecord::new(classify(Path::new("nbody_8_16_skip.log"), false), &Metrics::default());
        let output = render(&[record]);

        assert_eq!(output.lines().next(), Some(HEADER.join(",").as_str()));
    }

    #[test]
    fn missing_metrics_render_as_sentinel() {
        let metrics = Metrics {
            ipc: Some(1.25),
            ..Metrics::default()
        };
        let record = LogRecord::new(classify(Path::new("nbody_8_16_skip.log"), false), &metrics);
        let output = render(&[record]);

        assert_eq!(
            output.lines().nth(1),
            Some("nbody,skip,no,python,1.25,N/A,N/A,N/A,N/A,N/A,N/A,N/A,N/A,N/A,N/A")
        );
    }

    #[test]
    fn full_record_renders_every_column() {
        let metrics = Metrics {
            ipc: Some(1.4213),
            total_instructions: Some(1000),
            cycles: Some(700),
            branch_mpki: Some(2.5),
            indirect_branch_mpki: Some(0.75),
            seen_bytecodes: Some(40),
            skipped_instructions: Some(100),
            buffer_hit_percentage: Some(90.5),
            hdbt_hit_rate: Some(70.25),
            bpcp: Some(BpcpCounts {
                strong: 1,
                weak: 1,
                wrong: 2,
            }),
            l1i_loads: CacheLoads {
                plain: Some(500),
                bytecode: Some(5),
                dispatch_table: Some(1),
            },
            l1d_loads: CacheLoads {
                plain: Some(300),
                bytecode: None,
                dispatch_table: Some(7),
            },
        };
        let record = LogRecord::new(classify(Path::new("recog_8_6_ideal.log"), false), &metrics);
        let output = render(&[record]);

        assert_eq!(
            output.lines().nth(1),
            Some("recog,ideal,no,native,1.4213,2.5,0.75,40,100,1000,90.5,70.25,25.0,307,506")
        );
    }

    #[test]
    fn empty_table_still_has_header() {
        assert_eq!(render(&[]), format!("{}\n", HEADER.join(",")));
    }
}
