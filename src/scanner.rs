use crate::cancel::CancellationToken;
use crate::classify::{declared_type_for, is_text};
use crate::collate::natural_cmp;
use crate::error::Dir2TxtError;
use crate::matcher::ExclusionMatcher;
use crate::options::ScanOptions;
use crate::types::{FileCandidate, ScanResult};
use ignore::{DirEntry, WalkBuilder};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
/// Entries visited between two scan progress reports.
pub const SCAN_PROGRESS_INTERVAL: usize = 400;
/// Skipped whenever hidden files are excluded, whatever the exclusion patterns say.
const SECRETS_FILE: &str = ".env";
struct Walker {
    inner: ignore::Walk,
}
impl Walker {
    fn new(root: &Path, options: &ScanOptions) -> Result<Self, Dir2TxtError> {
        let metadata = fs::metadata(root).map_err(|e| Dir2TxtError::io(root, e))?;
        if !metadata.is_dir() {
            return Err(Dir2TxtError::InvalidPath(format!(
                "{} is not a directory",
                root.display()
            )));
        }
        // The walker reports an unlistable root as an ordinary entry error.
        fs::read_dir(root).map_err(|e| Dir2TxtError::io(root, e))?;
        let mut builder = WalkBuilder::new(root);
        builder
            .standard_filters(false)
            .hidden(!options.include_hidden)
            .follow_links(options.follow_symlinks)
            .git_ignore(options.respect_gitignore)
            .git_exclude(options.respect_gitignore)
            .ignore(options.respect_gitignore)
            .parents(options.respect_gitignore)
            .require_git(false);
        Ok(Self {
            inner: builder.build(),
        })
    }
    /// Yields every entry below the root; unreadable entries are logged and dropped.
    fn into_entries(self) -> impl Iterator<Item = DirEntry> {
        self.inner.filter_map(|result| match result {
            Ok(entry) if entry.depth() == 0 => None,
            Ok(entry) => Some(entry),
            Err(_e) => {
                #[cfg(feature = "logging")]
                tracing::debug!("Skipping unreadable entry: {}", _e);
                None
            }
        })
    }
}
fn is_regular_file(entry: &DirEntry) -> bool {
    entry.file_type().is_some_and(|t| t.is_file())
}
/// Walks `root` and returns the files that survive every filter, in natural path order.
///
/// Cancellation is checked before each entry. `on_progress` receives the running count
/// of visited entries every [`SCAN_PROGRESS_INTERVAL`] entries and once at the end.
pub fn scan(
    root: &Path,
    options: &ScanOptions,
    exclusion: &ExclusionMatcher,
    token: &CancellationToken,
    mut on_progress: impl FnMut(usize),
) -> Result<ScanResult, Dir2TxtError> {
    #[cfg(feature = "logging")]
    tracing::debug!("Scanning {} with {:?}", root.display(), options);
    let walker = Walker::new(root, options)?;
    let mut files = Vec::new();
    let mut skipped = 0;
    let mut visited = 0;
    for entry in walker.into_entries() {
        token.check()?;
        visited += 1;
        if visited % SCAN_PROGRESS_INTERVAL == 0 {
            on_progress(visited);
        }
        match evaluate(&entry, options, exclusion) {
            Verdict::Keep(candidate) => files.push(candidate),
            Verdict::Skip(_reason) => {
                #[cfg(feature = "logging")]
                tracing::trace!("Skipping {} ({})", entry.path().display(), _reason);
                skipped += 1;
            }
            Verdict::Ignore => {}
        }
    }
    if visited % SCAN_PROGRESS_INTERVAL != 0 {
        on_progress(visited);
    }
    sort_candidates(&mut files);
    #[cfg(feature = "logging")]
    tracing::debug!("Scan found {} candidates, skipped {}", files.len(), skipped);
    Ok(ScanResult { files, skipped })
}
enum Verdict {
    Keep(FileCandidate),
    Skip(&'static str),
    /// Not a file: neither kept nor counted.
    Ignore,
}
fn evaluate(entry: &DirEntry, options: &ScanOptions, exclusion: &ExclusionMatcher) -> Verdict {
    if entry.path_is_symlink() && !options.follow_symlinks {
        return Verdict::Skip("symlink");
    }
    if !is_regular_file(entry) {
        return Verdict::Ignore;
    }
    let name = entry.file_name().to_string_lossy();
    if exclusion.matches(&name) {
        return Verdict::Skip("excluded");
    }
    if !options.include_hidden && name == SECRETS_FILE {
        return Verdict::Skip("secrets file");
    }
    let size = match entry.metadata() {
        Ok(metadata) => metadata.len(),
        Err(_) => return Verdict::Skip("unreadable metadata"),
    };
    if options.max_file_size.is_some_and(|max| size > max) {
        return Verdict::Skip("too large");
    }
    let path = entry.path();
    let declared = declared_type_for(path);
    if options.text_only && !is_text(declared, path, options.binary_detection) {
        return Verdict::Skip("not text");
    }
    Verdict::Keep(FileCandidate {
        path: path.to_path_buf(),
        size,
        declared_type: declared.map(str::to_string),
    })
}
fn sort_candidates(files: &mut Vec<FileCandidate>) {
    let mut keyed: Vec<(String, FileCandidate)> = files
        .drain(..)
        .map(|c| (c.path.to_string_lossy().into_owned(), c))
        .collect();
    keyed.sort_by(|(ka, a), (kb, b)| natural_cmp(ka, kb).then_with(|| a.path.cmp(&b.path)));
    files.extend(keyed.into_iter().map(|(_, c)| c));
}
/// Base names of every regular file under `root`, deduplicated and sorted.
pub fn scan_all_file_names(
    root: &Path,
    include_hidden: bool,
    token: &CancellationToken,
) -> Result<Vec<String>, Dir2TxtError> {
    let options = ScanOptions {
        include_hidden,
        follow_symlinks: false,
        respect_gitignore: false,
        ..ScanOptions::default()
    };
    let mut names = BTreeSet::new();
    for entry in Walker::new(root, &options)?.into_entries() {
        token.check()?;
        if is_regular_file(&entry) {
            names.insert(entry.file_name().to_string_lossy().into_owned());
        }
    }
    Ok(names.into_iter().collect())
}
