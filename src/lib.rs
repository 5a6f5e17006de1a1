//! # dir2txt
//!
//! `dir2txt` harvests a directory tree into a single text file. It walks the tree,
//! filters files by name pattern, type, size and visibility, streams every surviving
//! file into one output behind a `// ===== File: ./relative/path =====` header, and can
//! append a rendered directory-tree listing.
//!
//! A run is one sequential, cancellable job: [`run`] takes an owned [`RunConfig`]
//! snapshot, a [`CancellationToken`] the caller may trigger from another thread, and a
//! progress callback that receives [`Progress`] events in order.
//!
//! # Features
//!
//! - `logging` (default): emits `tracing` events for run milestones, skipped entries
//!   and ignored patterns.
//!
//! # Example
//!
//! ```no_run
//! use dir2txt::{CancellationToken, PatternMode, RunConfigBuilder, RunOutcome, run};
//! use std::path::Path;
//!
//! let config = RunConfigBuilder::new()
//!     .pattern_mode(PatternMode::Glob)
//!     .exclusions("*.log\ntarget")
//!     .max_file_size(Some(1024 * 1024))
//!     .build();
//!
//! let token = CancellationToken::new();
//! match run(Path::new("."), Path::new("out.txt"), config, &token, |_| {})
//!     .expect("run failed")
//! {
//!     RunOutcome::Completed(summary) => println!("{}", summary),
//!     RunOutcome::Cancelled => println!("cancelled"),
//! }
//! ```

mod cancel;
pub mod classify;
pub mod collate;
pub mod concat;
mod error;
pub mod matcher;
mod options;
pub mod pipeline;
pub mod scanner;
pub mod template;
pub mod tree;
mod types;

pub use cancel::CancellationToken;
pub use classify::{declared_type_for, is_text};
pub use concat::{append_string, concatenate};
pub use error::Dir2TxtError;
pub use matcher::{ExclusionMatcher, PatternMode};
pub use options::{
    BinaryDetection, DEFAULT_MAX_FILE_SIZE, DEFAULT_TEMPLATE, ExclusionConfig, RunConfig,
    RunConfigBuilder, ScanOptions, TreeOptions,
};
pub use pipeline::run;
pub use scanner::{scan, scan_all_file_names};
pub use template::{directory_label, render, resolve_destination};
pub use tree::build_tree;
pub use types::{FileCandidate, Progress, RunOutcome, RunSummary, ScanResult, format_bytes};
