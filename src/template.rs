//! Output filename templates.
//!
//! A template is free text with `{token}` placeholders:
//!
//! | token    | replacement                         |
//! |----------|-------------------------------------|
//! | `{yyyy}` | 4-digit year                        |
//! | `{yy}`   | 2-digit year (year mod 100)         |
//! | `{MM}`   | 2-digit month                       |
//! | `{dd}`   | 2-digit day                         |
//! | `{HH}`   | 2-digit hour, 24h clock             |
//! | `{mm}`   | 2-digit minute                      |
//! | `{ss}`   | 2-digit second                      |
//! | `{dir}`  | directory name, path-unsafe chars → `-` |
//!
//! Unknown tokens are left as written. The rendered name never contains `/`.

use chrono::{DateTime, Datelike, TimeZone, Timelike};
use std::fs;
use std::path::{Path, PathBuf};

const UNSAFE_NAME_CHARS: [char; 10] = [':', '/', '\\', '?', '%', '*', '|', '"', '<', '>'];

/// Renders `template` for `directory_name` at the wall-clock time carried by `at`.
///
/// Tokens are substituted in a single left-to-right pass, so text produced by one
/// substitution (for example a directory literally named `{yyyy}`) is never expanded
/// again.
///
/// ```
/// use chrono::{FixedOffset, TimeZone};
/// let at = FixedOffset::east_opt(0).unwrap().with_ymd_and_hms(2024, 2, 3, 4, 5, 6).unwrap();
/// let name = dir2txt::render("{yyyy}-{MM}-{dd}_{dir}.txt", "my/folder", &at);
/// assert_eq!(name, "2024-02-03_my-folder.txt");
/// ```
pub fn render<Tz: TimeZone>(template: &str, directory_name: &str, at: &DateTime<Tz>) -> String {
    let mut out = String::with_capacity(template.len() + directory_name.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        let Some(close) = tail.find('}') else {
            out.push_str(tail);
            rest = "";
            break;
        };
        let token = &tail[1..close];
        match expand(token, directory_name, at) {
            Some(value) => {
                out.push_str(&value);
                rest = &tail[close + 1..];
            }
            None => {
                // Emit the brace alone so a nested `{` can still open a token.
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out.replace('/', "-")
}

fn expand<Tz: TimeZone>(token: &str, directory_name: &str, at: &DateTime<Tz>) -> Option<String> {
    let value = match token {
        "yyyy" => format!("{:04}", at.year()),
        "yy" => format!("{:02}", at.year().rem_euclid(100)),
        "MM" => format!("{:02}", at.month()),
        "dd" => format!("{:02}", at.day()),
        "HH" => format!("{:02}", at.hour()),
        "mm" => format!("{:02}", at.minute()),
        "ss" => format!("{:02}", at.second()),
        "dir" => sanitize_name(directory_name),
        _ => return None,
    };
    Some(value)
}

fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| if UNSAFE_NAME_CHARS.contains(&c) { '-' } else { c })
        .collect()
}

/// The value substituted for `{dir}` when naming output for `root`.
///
/// The filesystem root renders as `root`; a path with no usable final component
/// renders as `folder`.
pub fn directory_label(root: &Path) -> String {
    let resolved = fs::canonicalize(root)
        .or_else(|_| std::path::absolute(root))
        .unwrap_or_else(|_| root.to_path_buf());
    match resolved.file_name() {
        Some(name) if !name.is_empty() => name.to_string_lossy().into_owned(),
        _ if resolved.parent().is_none() && resolved.has_root() => "root".to_string(),
        _ => "folder".to_string(),
    }
}

/// Picks the output file for a run.
///
/// An existing directory (or no `output` at all, meaning the current directory) gets
/// the rendered template name appended; anything else is taken as the file path.
pub fn resolve_destination<Tz: TimeZone>(
    output: Option<&Path>,
    source: &Path,
    template: &str,
    at: &DateTime<Tz>,
) -> PathBuf {
    let name = || render(template, &directory_label(source), at);
    match output {
        Some(path) if path.is_dir() => path.join(name()),
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(name()),
    }
}
