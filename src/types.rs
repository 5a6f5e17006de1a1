use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// A file selected for concatenation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileCandidate {
    /// Location of the file, rooted at the scanned directory.
    pub path: PathBuf,
    /// On-disk size in bytes at scan time.
    pub size: u64,
    /// Declared content type, used only as a classification hint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub declared_type: Option<String>,
}

/// Output of a directory scan.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ScanResult {
    /// Candidates in natural path order.
    pub files: Vec<FileCandidate>,
    /// Entries that were seen but rejected by a filter.
    pub skipped: usize,
}

/// Phase-tagged progress reported while a run is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "lowercase")]
pub enum Progress {
    Scanning {
        visited: usize,
    },
    Writing {
        files_done: usize,
        total_files: usize,
        bytes_written: u64,
    },
}

impl Progress {
    /// Completed share of the write phase; `None` while scanning.
    pub fn fraction(&self) -> Option<f64> {
        match *self {
            Progress::Scanning { .. } => None,
            Progress::Writing { total_files: 0, .. } => Some(1.0),
            Progress::Writing {
                files_done,
                total_files,
                ..
            } => Some(files_done as f64 / total_files as f64),
        }
    }
}

/// Counts for a run that completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub destination: PathBuf,
    pub files_written: usize,
    pub skipped: usize,
    pub bytes_written: u64,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Wrote {} files ({}). Skipped {} items.",
            self.files_written,
            format_bytes(self.bytes_written),
            self.skipped
        )
    }
}

/// How a run ended when nothing failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    Completed(RunSummary),
    /// Stopped on request; the destination may hold partial output.
    Cancelled,
}

pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}
