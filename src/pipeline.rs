//! Sequences one run: scan, concatenate, then optionally append the tree listing.

use crate::cancel::CancellationToken;
use crate::concat::{append_string, concatenate};
use crate::error::Dir2TxtError;
use crate::options::RunConfig;
use crate::scanner::scan;
use crate::tree::build_tree;
use crate::types::{FileCandidate, Progress, RunOutcome, RunSummary};
use std::fs;
use std::path::Path;

/// Heading placed between the concatenated files and the tree listing.
pub fn tree_section_header(root: &Path) -> String {
    format!("\n\n===== DIRECTORY TREE: {} =====\n\n", root.display())
}

/// Runs the whole pipeline for `source` into `destination`.
///
/// `config` is owned by the run; `on_progress` is called from the running thread
/// only, in increasing order. Cancellation through `token` yields
/// [`RunOutcome::Cancelled`]; the destination may then hold partial output.
pub fn run(
    source: &Path,
    destination: &Path,
    config: RunConfig,
    token: &CancellationToken,
    mut on_progress: impl FnMut(Progress),
) -> Result<RunOutcome, Dir2TxtError> {
    match execute(source, destination, &config, token, &mut on_progress) {
        Ok(summary) => Ok(RunOutcome::Completed(summary)),
        Err(Dir2TxtError::Cancelled) => {
            #[cfg(feature = "logging")]
            tracing::info!("Run for {} cancelled", source.display());
            Ok(RunOutcome::Cancelled)
        }
        Err(e) => Err(e),
    }
}

fn execute(
    source: &Path,
    destination: &Path,
    config: &RunConfig,
    token: &CancellationToken,
    on_progress: &mut impl FnMut(Progress),
) -> Result<RunSummary, Dir2TxtError> {
    let source_abs = std::path::absolute(source).map_err(|e| Dir2TxtError::io(source, e))?;
    #[cfg(feature = "logging")]
    tracing::info!(
        "Starting run: {} -> {}",
        source_abs.display(),
        destination.display()
    );
    let exclusion = config.exclusion.matcher();
    let mut result = scan(&source_abs, &config.scan, &exclusion, token, |visited| {
        on_progress(Progress::Scanning { visited })
    })?;
    result.skipped += drop_destination(&mut result.files, destination);

    let total_files = result.files.len();
    let mut bytes_written = concatenate(
        &result.files,
        destination,
        &source_abs,
        token,
        |files_done, bytes_written| {
            on_progress(Progress::Writing {
                files_done,
                total_files,
                bytes_written,
            })
        },
    )?;

    if config.append_tree {
        token.check()?;
        let tree = build_tree(&source_abs, &config.tree, config.scan.follow_symlinks)?;
        let section = tree_section_header(&source_abs) + &tree;
        bytes_written += append_string(&section, destination)?;
    }

    let summary = RunSummary {
        destination: destination.to_path_buf(),
        files_written: total_files,
        skipped: result.skipped,
        bytes_written,
    };
    #[cfg(feature = "logging")]
    tracing::info!("{}", summary);
    Ok(summary)
}

/// Removes the output file from the candidates so a run never reads its own output.
fn drop_destination(files: &mut Vec<FileCandidate>, destination: &Path) -> usize {
    let Ok(target) = fs::canonicalize(destination) else {
        return 0;
    };
    let before = files.len();
    files.retain(|c| {
        c.path.file_name() != target.file_name()
            || !fs::canonicalize(&c.path).is_ok_and(|p| p == target)
    });
    before - files.len()
}
