use std::{fs, path::Path};

use sim_log_stats::{aggregate, records::HEADER};

const SKIP_LOG: &str = "\
CPU 0 cumulative IPC: 1.8125 instructions: 100000000 cycles: 55172413
CPU 0 Branch Prediction Accuracy: 98.1% MPKI: 1.5 Average ROB Occupancy at Mispredict: 60.2
BRANCH_INDIRECT: 0.875
Seen bytecodes: 2000000
Skipped instrs: 4000000
BYTECODE BUFFER stats - hits: 95 misses: 5 percentage hits: 95.0
BYTECODE HDBT stats - hits: 80 misses: 20 percentage hits: 80.0
BYTECODE BTB - strong: 3, weak: 0, wrong: 1
cpu0_L1D LOAD         ACCESS:   2000  HIT:   1900  MISS:   100
cpu0_L1D LOAD  BYTECODE ACCESS:    300  HIT:    300  MISS:     0
cpu0_L1D LOAD  DISPATCH TABLE ACCESS:     50  HIT:     50  MISS:     0
cpu0_L1I LOAD         ACCESS:   4000  HIT:   3990  MISS:    10
";

const BASELINE_LOG: &str = "\
CPU 0 cumulative IPC: 1.5 instructions: 100000000 cycles: 66666666
CPU 0 Branch Prediction Accuracy: 97.0% MPKI: 2.25 Average ROB Occupancy at Mispredict: 55.0
";

fn write_log(dir: &Path, name: &str, contents: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("can create log directory");
    }
    fs::write(path, contents).expect("can write log");
}

fn read_rows(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::Reader::from_path(path).expect("output table can be opened");
    let header = reader
        .headers()
        .expect("output table has a header")
        .iter()
        .map(str::to_string)
        .collect();
    let rows = reader
        .records()
        .map(|record| {
            record
                .expect("rows are well-formed")
                .iter()
                .map(str::to_string)
                .collect()
        })
        .collect();
    (header, rows)
}

#[test]
fn empty_folder_writes_no_table() {
    let logs = tempfile::tempdir().expect("can create temporary directory");
    let out = tempfile::tempdir().expect("can create temporary directory");
    let output = out.path().join("stats.csv");

    let summary = aggregate(logs.path(), &output, false).expect("aggregation succeeds");

    assert_eq!(summary.records, 0);
    assert_eq!(summary.output, None);
    assert!(!output.exists());
}

#[test]
fn folder_of_unparseable_logs_writes_no_table() {
    let logs = tempfile::tempdir().expect("can create temporary directory");
    write_log(logs.path(), "README.txt", "these are the logs of the size sweep\n");
    let out = tempfile::tempdir().expect("can create temporary directory");
    let output = out.path().join("stats.csv");

    let summary = aggregate(logs.path(), &output, false).expect("aggregation succeeds");

    assert_eq!(summary.files, 1);
    assert_eq!(summary.skipped, 1);
    assert!(!output.exists());
}

#[test]
fn writes_one_rectangular_row_per_log() {
    let logs = tempfile::tempdir().expect("can create temporary directory");
    write_log(logs.path(), "mandelbrot_8_6_skip.log", SKIP_LOG);
    write_log(logs.path(), "mandelbrot_8_6_no.log", BASELINE_LOG);
    write_log(logs.path(), "native/recog_16_32_ideal.log", BASELINE_LOG);
    write_log(logs.path(), "notes.txt", "nothing here\n");
    let out = tempfile::tempdir().expect("can create temporary directory");
    let output = out.path().join("nested/stats.csv");

    let summary = aggregate(logs.path(), &output, false).expect("aggregation succeeds");

    assert_eq!(summary.files, 4);
    assert_eq!(summary.records, 3);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.output.as_deref(), Some(output.as_path()));

    let (header, rows) = read_rows(&output);
    assert_eq!(header, HEADER);
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|row| row.len() == HEADER.len()));

    assert_eq!(
        rows[0],
        [
            "mandelbrot", "no", "no", "python", "1.5", "2.25", "N/A", "N/A", "N/A", "100000000", "N/A", "N/A",
            "N/A", "N/A", "N/A",
        ]
    );
    assert_eq!(
        rows[1],
        [
            "mandelbrot", "skip", "no", "python", "1.8125", "1.5", "0.875", "2000000", "4000000", "100000000",
            "95.0", "80.0", "75.0", "2350", "4000",
        ]
    );
    assert_eq!(&rows[2][..4], ["recog", "ideal", "no", "native"]);
}

#[test]
fn size_test_labels_rows_by_trailing_segments() {
    let logs = tempfile::tempdir().expect("can create temporary directory");
    write_log(logs.path(), "fasta_8_16_32.log", SKIP_LOG);
    write_log(logs.path(), "raytrace_8_4_8.log", SKIP_LOG);
    let out = tempfile::tempdir().expect("can create temporary directory");
    let output = out.path().join("sizes.csv");

    aggregate(logs.path(), &output, true).expect("aggregation succeeds");

    let (_, rows) = read_rows(&output);
    assert_eq!(&rows[0][..4], ["fasta", "skip", "16_32", "python"]);
    assert_eq!(&rows[1][..4], ["raytrace", "skip", "4_8", "unknown"]);
}

#[test]
fn missing_log_folder_is_an_error() {
    let out = tempfile::tempdir().expect("can create temporary directory");

    let result = aggregate(&out.path().join("missing"), &out.path().join("stats.csv"), false);

    assert!(matches!(result, Err(sim_log_stats::Error::NotADirectory(_))));
}
