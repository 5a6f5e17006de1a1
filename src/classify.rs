//! Text/binary classification.
//!
//! A declared type (a MIME-style identifier) is consulted first; files with no
//! conclusive declared type are sniffed from their first bytes.

use crate::options::BinaryDetection;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Number of leading bytes inspected when sniffing.
pub const SNIFF_LEN: u64 = 4096;

/// Broad families a declared type can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeCategory {
    Text,
    SourceCode,
    Markup,
    /// json, yaml, xml, plain text.
    StructuredText,
    Image,
    Audiovisual,
    Archive,
}

impl TypeCategory {
    /// Maps a declared type to its family, or `None` when it is not in the taxonomy.
    pub fn of(declared: &str) -> Option<Self> {
        let declared = declared.trim().to_ascii_lowercase();
        let (top, sub) = declared.split_once('/')?;
        let category = match (top, sub) {
            ("text", "plain") => TypeCategory::StructuredText,
            ("text", "html" | "markdown" | "x-rst" | "x-tex") => TypeCategory::Markup,
            ("text", sub) if sub.starts_with("x-") => TypeCategory::SourceCode,
            ("text", _) => TypeCategory::Text,
            ("application", "json" | "yaml" | "xml" | "toml") => TypeCategory::StructuredText,
            ("application", "xhtml+xml") | ("image", "svg+xml") => TypeCategory::Markup,
            ("application", "javascript" | "typescript" | "sql" | "x-sh" | "x-httpd-php") => {
                TypeCategory::SourceCode
            }
            (
                "application",
                "zip" | "gzip" | "x-tar" | "x-bzip2" | "x-xz" | "x-7z-compressed"
                | "vnd.rar" | "zstd" | "java-archive",
            ) => TypeCategory::Archive,
            ("image", _) => TypeCategory::Image,
            ("audio" | "video", _) => TypeCategory::Audiovisual,
            _ => return None,
        };
        Some(category)
    }

    pub fn is_text(self) -> bool {
        match self {
            TypeCategory::Text
            | TypeCategory::SourceCode
            | TypeCategory::Markup
            | TypeCategory::StructuredText => true,
            TypeCategory::Image | TypeCategory::Audiovisual | TypeCategory::Archive => false,
        }
    }
}

/// Derives a declared type from the file extension.
pub fn declared_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let declared = match ext.as_str() {
        "txt" | "text" | "log" => "text/plain",
        "md" | "markdown" => "text/markdown",
        "html" | "htm" => "text/html",
        "rst" => "text/x-rst",
        "tex" => "text/x-tex",
        "css" => "text/css",
        "csv" => "text/csv",
        "rs" => "text/x-rust",
        "py" => "text/x-python",
        "c" | "h" => "text/x-c",
        "cpp" | "cc" | "cxx" | "hpp" => "text/x-c++",
        "go" => "text/x-go",
        "java" => "text/x-java",
        "kt" | "kts" => "text/x-kotlin",
        "swift" => "text/x-swift",
        "rb" => "text/x-ruby",
        "js" | "mjs" | "cjs" => "application/javascript",
        "ts" | "tsx" => "application/typescript",
        "sh" | "bash" | "zsh" => "application/x-sh",
        "php" => "application/x-httpd-php",
        "sql" => "application/sql",
        "json" => "application/json",
        "yml" | "yaml" => "application/yaml",
        "xml" => "application/xml",
        "xhtml" => "application/xhtml+xml",
        "toml" => "application/toml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "ico" => "image/x-icon",
        "svg" => "image/svg+xml",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "flac" => "audio/flac",
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        "mkv" => "video/x-matroska",
        "zip" => "application/zip",
        "gz" | "tgz" => "application/gzip",
        "tar" => "application/x-tar",
        "bz2" => "application/x-bzip2",
        "xz" => "application/x-xz",
        "7z" => "application/x-7z-compressed",
        "rar" => "application/vnd.rar",
        "zst" => "application/zstd",
        "jar" => "application/java-archive",
        _ => return None,
    };
    Some(declared)
}

/// Decides whether `path` should be treated as text.
///
/// A recognised declared type settles the question without touching the file.
/// Otherwise up to [`SNIFF_LEN`] bytes are read: an empty read, an unreadable file,
/// or binary content (per `detection`) means not text.
pub fn is_text(declared: Option<&str>, path: &Path, detection: BinaryDetection) -> bool {
    if let Some(category) = declared.and_then(TypeCategory::of) {
        return category.is_text();
    }
    let Ok(file) = File::open(path) else {
        return false;
    };
    let mut head = Vec::with_capacity(SNIFF_LEN as usize);
    if file.take(SNIFF_LEN).read_to_end(&mut head).is_err() || head.is_empty() {
        return false;
    }
    let binary = match detection {
        BinaryDetection::Simple => head.contains(&0),
        BinaryDetection::Accurate => content_inspector::inspect(&head).is_binary(),
    };
    #[cfg(feature = "logging")]
    if binary {
        tracing::trace!("Binary content detected: {}", path.display());
    }
    !binary
}
