//! Name-based exclusion rules.

use globset::{Glob, GlobMatcher};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Pattern language used to interpret exclusion lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternMode {
    /// Case-sensitive whole-name equality.
    Exact,
    /// Shell-style wildcards: `*`, `?`, `[...]`.
    #[default]
    Glob,
    /// Regular expression searched anywhere in the name.
    Regex,
}

enum Compiled {
    Exact,
    Glob(Vec<GlobPattern>),
    Regex(Vec<Regex>),
}

enum GlobPattern {
    Wildcard(GlobMatcher),
    // Unparseable globs (e.g. an unclosed `[`) compare literally, like fnmatch.
    Literal(String),
}

/// Decides whether a bare file or directory name is excluded.
///
/// Built once per run from free-form multi-line text: each line is trimmed and blank
/// lines are dropped. Glob and regex patterns are compiled up front; a regex that does
/// not compile is dropped and never matches.
pub struct ExclusionMatcher {
    mode: PatternMode,
    patterns: Vec<String>,
    compiled: Compiled,
}

impl ExclusionMatcher {
    pub fn new(mode: PatternMode, raw_text: &str) -> Self {
        let patterns = parse_patterns(raw_text);
        let compiled = match mode {
            PatternMode::Exact => Compiled::Exact,
            PatternMode::Glob => Compiled::Glob(patterns.iter().map(|p| compile_glob(p)).collect()),
            PatternMode::Regex => Compiled::Regex(patterns.iter().filter_map(|p| compile_regex(p)).collect()),
        };
        Self {
            mode,
            patterns,
            compiled,
        }
    }

    /// A matcher that excludes nothing.
    pub fn empty() -> Self {
        Self::new(PatternMode::default(), "")
    }

    pub fn mode(&self) -> PatternMode {
        self.mode
    }

    /// The normalized pattern lines, in input order.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn matches(&self, name: &str) -> bool {
        if self.patterns.is_empty() {
            return false;
        }
        match &self.compiled {
            Compiled::Exact => self.patterns.iter().any(|p| p == name),
            Compiled::Glob(globs) => globs.iter().any(|g| match g {
                GlobPattern::Wildcard(m) => m.is_match(name),
                GlobPattern::Literal(p) => p == name,
            }),
            Compiled::Regex(regexes) => regexes.iter().any(|r| r.is_match(name)),
        }
    }
}

impl std::fmt::Debug for ExclusionMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExclusionMatcher")
            .field("mode", &self.mode)
            .field("patterns", &self.patterns)
            .finish()
    }
}

fn parse_patterns(raw_text: &str) -> Vec<String> {
    raw_text
        .split(['\n', '\r'])
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Rewrites `{` and `}` outside bracket expressions as one-character classes, so
/// globset's alternation never applies and braces match themselves.
fn escape_braces(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut in_class = false;
    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '[' if !in_class => {
                in_class = true;
                out.push(c);
                // A leading negation or `]` belongs to the class body.
                if let Some(negation) = chars.next_if(|&n| n == '!' || n == '^') {
                    out.push(negation);
                }
                if let Some(bracket) = chars.next_if_eq(&']') {
                    out.push(bracket);
                }
            }
            ']' if in_class => {
                in_class = false;
                out.push(c);
            }
            '{' | '}' if !in_class => {
                out.push('[');
                out.push(c);
                out.push(']');
            }
            _ => out.push(c),
        }
    }
    out
}

fn compile_glob(pattern: &str) -> GlobPattern {
    match Glob::new(&escape_braces(pattern)) {
        Ok(glob) => GlobPattern::Wildcard(glob.compile_matcher()),
        Err(_e) => {
            #[cfg(feature = "logging")]
            tracing::debug!("Glob '{}' is not valid ({}), matching literally", pattern, _e);
            GlobPattern::Literal(pattern.to_string())
        }
    }
}

fn compile_regex(pattern: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(regex) => Some(regex),
        Err(_e) => {
            #[cfg(feature = "logging")]
            tracing::debug!("Ignoring invalid exclusion regex '{}': {}", pattern, _e);
            None
        }
    }
}
