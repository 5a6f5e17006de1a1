//! Internal module for rendering a directory tree listing.

use crate::collate::natural_cmp;
use crate::error::Dir2TxtError;
use crate::options::TreeOptions;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Renders the tree under `root` in the style of the `tree` command.
///
/// The first line is the root's base name; children follow depth-first in natural
/// name order, joined with `├── `/`└── ` connectors. Hidden entries are never listed.
/// Symbolic links that are not followed are marked with ` @` and not descended into.
/// Each directory's canonical path is remembered, so a directory reached a second
/// time through followed links is listed but not expanded again.
///
/// # Errors
///
/// Returns an error if `root` itself cannot be read. Unreadable subdirectories are
/// listed without children.
pub fn build_tree(
    root: &Path,
    options: &TreeOptions,
    follow_symlinks: bool,
) -> Result<String, Dir2TxtError> {
    let mut out = String::new();
    out.push_str(&root_label(root));
    out.push('\n');
    let mut walker = TreeWalker {
        options,
        follow_symlinks,
        visited: HashSet::new(),
        out,
    };
    walker.walk(root, "", 0)?;
    Ok(walker.out)
}

struct TreeWalker<'a> {
    options: &'a TreeOptions,
    follow_symlinks: bool,
    visited: HashSet<PathBuf>,
    out: String,
}

struct Child {
    name: String,
    path: PathBuf,
}

impl TreeWalker<'_> {
    fn walk(&mut self, dir: &Path, prefix: &str, depth: usize) -> Result<(), Dir2TxtError> {
        if self.options.max_depth.is_some_and(|max| depth >= max) {
            return Ok(());
        }
        let canonical = fs::canonicalize(dir).unwrap_or_else(|_| dir.to_path_buf());
        if !self.visited.insert(canonical) {
            return Ok(());
        }
        let children = read_children(dir)?;
        let count = children.len();
        for (idx, child) in children.into_iter().enumerate() {
            let last = idx + 1 == count;
            let branch = if last { "└── " } else { "├── " };
            let link = fs::symlink_metadata(&child.path)
                .map(|m| m.file_type().is_symlink())
                .unwrap_or(false);
            let resolved = if link && self.follow_symlinks {
                fs::metadata(&child.path).or_else(|_| fs::symlink_metadata(&child.path))
            } else {
                fs::symlink_metadata(&child.path)
            };
            let (is_dir, size) = resolved.map(|m| (m.is_dir(), m.len())).unwrap_or((false, 0));

            let mut line = child.name;
            if link && !self.follow_symlinks {
                line.push_str(" @");
            }
            if self.options.show_sizes && !is_dir {
                line.push_str(&format!(" ({} B)", size));
            }
            self.out.push_str(prefix);
            self.out.push_str(branch);
            self.out.push_str(&line);
            self.out.push('\n');

            if is_dir {
                let child_prefix = format!("{}{}", prefix, if last { "    " } else { "│   " });
                if let Err(_e) = self.walk(&child.path, &child_prefix, depth + 1) {
                    #[cfg(feature = "logging")]
                    tracing::debug!("Not expanding {}: {}", child.path.display(), _e);
                }
            }
        }
        Ok(())
    }
}

/// Non-hidden entries of `dir`, in natural name order.
fn read_children(dir: &Path) -> Result<Vec<Child>, Dir2TxtError> {
    let mut children: Vec<Child> = fs::read_dir(dir)
        .map_err(|e| Dir2TxtError::io(dir, e))?
        .filter_map(Result::ok)
        .map(|entry| Child {
            name: entry.file_name().to_string_lossy().into_owned(),
            path: entry.path(),
        })
        .filter(|child| !child.name.starts_with('.'))
        .collect();
    children.sort_by(|a, b| natural_cmp(&a.name, &b.name));
    Ok(children)
}

fn root_label(root: &Path) -> String {
    if let Some(name) = root.file_name() {
        return name.to_string_lossy().into_owned();
    }
    fs::canonicalize(root)
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| root.display().to_string())
}
