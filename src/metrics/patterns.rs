use std::str::FromStr;

use regex::{Captures, Regex};

pub(super) const IPC: &str = r"CPU 0 cumulative IPC:\s+([0-9.]+)";
pub(super) const TOTAL_INSTRUCTIONS: &str = r"CPU 0 cumulative IPC:.*? instructions:\s+([0-9]+)";
pub(super) const CYCLES: &str = r"CPU 0 cumulative IPC:.*? cycles:\s+([0-9]+)";
pub(super) const BRANCH_MPKI: &str = r"CPU 0 Branch Prediction Accuracy:.*?MPKI:\s+([0-9.]+)";
pub(super) const INDIRECT_BRANCH_MPKI: &str = r"BRANCH_INDIRECT:\s+([0-9.]+)";
pub(super) const SEEN_BYTECODES: &str = r"Seen bytecodes:\s+(\d+)";
pub(super) const SKIPPED_INSTRUCTIONS: &str = r"Skipped instrs:\s+(\d+)";
pub(super) const BUFFER_HIT_PERCENTAGE: &str =
    r"BYTECODE BUFFER stats.*?percentage hits:\s+([0-9.]+)";
pub(super) const HDBT_HIT_RATE: &str = r"BYTECODE HDBT stats.*?percentage hits:\s+([0-9.]+)";
pub(super) const BPCP_COUNTS: &str =
    r"BYTECODE BTB - strong:\s+(\d+), weak:\s+(\d+), wrong:\s+(\d+)";

/// Sub-category of a cache load line.
#[derive(Clone, Copy, Debug)]
pub(super) enum LoadKind {
    Plain,
    Bytecode,
    DispatchTable,
}

impl LoadKind {
    fn infix(self) -> &'static str {
        match self {
            Self::Plain => "",
            Self::Bytecode => " BYTECODE ",
            Self::DispatchTable => " DISPATCH TABLE ",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Plain => "loads",
            Self::Bytecode => "bytecode loads",
            Self::DispatchTable => "dispatch table loads",
        }
    }
}

/// A named regular expression searched for once per log.
#[derive(Debug)]
pub(super) struct Pattern {
    name: String,
    regex: Regex,
}

impl Pattern {
    pub(super) fn new(name: impl Into<String>, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            name: name.into(),
            regex: Regex::new(pattern)?,
        })
    }

    /// Pattern for one `LOAD` line of a cache's statistics block, e.g. `cpu0_L1D`.
    pub(super) fn cache_loads(cache: &str, kind: LoadKind) -> Result<Self, regex::Error> {
        Self::new(
            format!("{cache} {}", kind.label()),
            &format!(
                r"{cache} LOAD\s+{}ACCESS:\s+(\d+)\s+HIT:\s+\d+\s+MISS:\s+\d+",
                kind.infix()
            ),
        )
    }

    /// First match in `text`, with a diagnostic if there is none.
    pub(super) fn captures<'t>(&self, source: &str, text: &'t str) -> Option<Captures<'t>> {
        let captures = self.regex.captures(text);
        if captures.is_none() {
            log::info!("[{source}] {} not found", self.name);
        }
        captures
    }

    /// Parses capture group `group` of the first match as a number.
    ///
    /// A match whose group does not parse (e.g. `1.2.3` for a float) is reported and treated as not found.
    pub(super) fn number<T: FromStr>(&self, source: &str, text: &str, group: usize) -> Option<T> {
        let captures = self.captures(source, text)?;
        parse_group(&self.name, source, &captures, group)
    }

    pub(super) fn name(&self) -> &str {
        &self.name
    }
}

pub(super) fn parse_group<T: FromStr>(
    name: &str,
    source: &str,
    captures: &Captures<'_>,
    group: usize,
) -> Option<T> {
    let raw = captures.get(group)?.as_str();
    raw.parse()
        .map_err(|_| {
            log::info!("[{source}] {name} has unparseable value ({raw}), skipping...");
        })
        .ok()
}
