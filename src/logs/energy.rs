//! Energy extraction from the simulation log.
//!
//! Every line containing [`ENERGY_MARKER`] contributes the first signed
//! scientific number that follows the marker. In [`ScanMode::Incremental`]
//! the extractor keeps a byte cursor so each energy is appended once; in
//! [`ScanMode::Replay`] the whole file is rescanned and every match is
//! appended again on every call.
//!
//! A rewritten log is noticed when it shrinks below the cursor or when the
//! bytes just before the cursor no longer match what was consumed. A
//! rewrite that reproduces those trailing bytes exactly goes unnoticed.

use std::fmt;
use std::io::{self, SeekFrom};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tracing::warn;

use crate::consts::ENERGY_MARKER;
use crate::series::EnergySeries;

/// Bytes kept from the end of the consumed region to detect rewrites.
const ANCHOR_LEN: usize = 64;

/// Optional sign, integer and/or decimal part, optional exponent.
static ENERGY_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?").expect("energy pattern compiles")
});

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScanMode {
    /// Only lines appended since the previous scan are consumed.
    #[default]
    Incremental,
    /// The file is rescanned from the start on every call.
    Replay,
}

impl FromStr for ScanMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "incremental" => Ok(Self::Incremental),
            "replay" => Ok(Self::Replay),
            other => Err(format!("unknown scan mode: {other}")),
        }
    }
}

impl fmt::Display for ScanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Incremental => f.write_str("incremental"),
            Self::Replay => f.write_str("replay"),
        }
    }
}

/// Classification of a single log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineScan<'a> {
    Unrelated,
    Energy(&'a str),
    /// The marker is present but no number follows it.
    Malformed,
}

pub fn scan_line(line: &str) -> LineScan<'_> {
    let Some(pos) = line.find(ENERGY_MARKER) else {
        return LineScan::Unrelated;
    };
    let rest = &line[pos + ENERGY_MARKER.len()..];
    match ENERGY_VALUE.find(rest) {
        Some(m) => LineScan::Energy(m.as_str()),
        None => LineScan::Malformed,
    }
}

/// A marker line that carried no parseable value. Skipped, not fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedLine {
    /// 1-based line number in the log.
    pub line_number: usize,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    pub appended: usize,
    pub malformed: Vec<MalformedLine>,
}

pub struct EnergyExtractor {
    path: PathBuf,
    mode: ScanMode,
    offset: u64,
    lines_seen: usize,
    /// Tail of the consumed bytes, at most [`ANCHOR_LEN`] long.
    anchor: Vec<u8>,
}

impl EnergyExtractor {
    pub fn new(path: impl Into<PathBuf>, mode: ScanMode) -> Self {
        Self {
            path: path.into(),
            mode,
            offset: 0,
            lines_seen: 0,
            anchor: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Byte position up to which the log has been consumed.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Append newly found energies to `series`. A trailing line without a
    /// newline is left for the next call in incremental mode.
    pub async fn scan(&mut self, series: &mut EnergySeries) -> io::Result<ScanReport> {
        self.read(series, false).await
    }

    /// Like [`scan`](Self::scan), but also consumes an unterminated last
    /// line. Meant for the final pass once the job has finished. Replay
    /// scans already include the last line, so this is a no-op for them.
    pub async fn finish(&mut self, series: &mut EnergySeries) -> io::Result<ScanReport> {
        if self.mode == ScanMode::Replay {
            return Ok(ScanReport::default());
        }
        self.read(series, true).await
    }

    async fn read(
        &mut self,
        series: &mut EnergySeries,
        include_tail: bool,
    ) -> io::Result<ScanReport> {
        if self.mode == ScanMode::Replay {
            let bytes = tokio::fs::read(&self.path).await?;
            let text = String::from_utf8_lossy(&bytes);
            return Ok(collect(&text, 1, series));
        }

        let mut file = tokio::fs::File::open(&self.path).await?;
        let len = file.metadata().await?.len();
        if len < self.offset {
            warn!(
                path = %self.path.display(),
                offset = self.offset,
                len,
                "job log shrank, rescanning from the start"
            );
            self.rewind();
        }

        let mut buf = Vec::new();
        file.seek(SeekFrom::Start(self.offset - self.anchor.len() as u64))
            .await?;
        file.read_to_end(&mut buf).await?;

        if buf.starts_with(&self.anchor) {
            buf.drain(..self.anchor.len());
        } else {
            warn!(
                path = %self.path.display(),
                offset = self.offset,
                "job log was rewritten, rescanning from the start"
            );
            self.rewind();
            buf.clear();
            file.seek(SeekFrom::Start(0)).await?;
            file.read_to_end(&mut buf).await?;
        }

        let consumed = if include_tail {
            buf.len()
        } else {
            buf.iter().rposition(|&b| b == b'\n').map_or(0, |i| i + 1)
        };
        let text = String::from_utf8_lossy(&buf[..consumed]);
        let report = collect(&text, self.lines_seen + 1, series);

        self.lines_seen += text.lines().count();
        self.offset += consumed as u64;
        self.anchor.extend_from_slice(&buf[..consumed]);
        let excess = self.anchor.len().saturating_sub(ANCHOR_LEN);
        self.anchor.drain(..excess);
        Ok(report)
    }

    fn rewind(&mut self) {
        self.offset = 0;
        self.lines_seen = 0;
        self.anchor.clear();
    }
}

fn collect(text: &str, first_line: usize, series: &mut EnergySeries) -> ScanReport {
    let mut report = ScanReport::default();
    for (i, line) in text.lines().enumerate() {
        match scan_line(line) {
            LineScan::Unrelated => {}
            LineScan::Energy(value) => {
                series.push(value);
                report.appended += 1;
            }
            LineScan::Malformed => report.malformed.push(MalformedLine {
                line_number: first_line + i,
                text: line.to_string(),
            }),
        }
    }
    report
}
