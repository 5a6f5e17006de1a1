use crate::error::Dir2TxtError;
use crate::matcher::{ExclusionMatcher, PatternMode};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
pub const DEFAULT_TEMPLATE: &str = "{dd}.{MM}.{yy}@{HH}-{mm}-{ss}_{dir}.txt";
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BinaryDetection {
    #[default]
    Simple,
    Accurate,
}
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanOptions {
    pub text_only: bool,
    pub follow_symlinks: bool,
    pub include_hidden: bool,
    pub max_file_size: Option<u64>,
    pub binary_detection: BinaryDetection,
    pub respect_gitignore: bool,
}
impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            text_only: true,
            follow_symlinks: false,
            include_hidden: false,
            max_file_size: Some(DEFAULT_MAX_FILE_SIZE),
            binary_detection: BinaryDetection::Simple,
            respect_gitignore: false,
        }
    }
}
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExclusionConfig {
    pub mode: PatternMode,
    pub text: String,
}
impl ExclusionConfig {
    pub fn matcher(&self) -> ExclusionMatcher {
        ExclusionMatcher::new(self.mode, &self.text)
    }
}
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeOptions {
    pub show_sizes: bool,
    pub max_depth: Option<usize>,
}
impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            show_sizes: true,
            max_depth: None,
        }
    }
}
/// Everything one run needs, captured before the run starts.
///
/// The pipeline takes its own copy, so later edits to a live settings value never
/// reach a run that is already in flight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub scan: ScanOptions,
    pub exclusion: ExclusionConfig,
    pub append_tree: bool,
    pub tree: TreeOptions,
    pub template: String,
}
impl Default for RunConfig {
    fn default() -> Self {
        Self {
            scan: ScanOptions::default(),
            exclusion: ExclusionConfig::default(),
            append_tree: true,
            tree: TreeOptions::default(),
            template: DEFAULT_TEMPLATE.to_string(),
        }
    }
}
impl RunConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, Dir2TxtError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| Dir2TxtError::io(path, e))?;
        serde_json::from_str(&raw)
            .map_err(|e| Dir2TxtError::Config(format!("{}: {}", path.display(), e)))
    }
    pub fn to_json_file(&self, path: impl AsRef<Path>) -> Result<(), Dir2TxtError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| Dir2TxtError::Config(e.to_string()))?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| Dir2TxtError::io(parent, e))?;
        }
        fs::write(path, json).map_err(|e| Dir2TxtError::io(path, e))
    }
}
#[derive(Debug, Default)]
pub struct RunConfigBuilder {
    config: RunConfig,
}
impl RunConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn from_config(config: RunConfig) -> Self {
        Self { config }
    }
    pub fn text_only(mut self, yes: bool) -> Self {
        self.config.scan.text_only = yes;
        self
    }
    pub fn follow_symlinks(mut self, yes: bool) -> Self {
        self.config.scan.follow_symlinks = yes;
        self
    }
    pub fn include_hidden(mut self, yes: bool) -> Self {
        self.config.scan.include_hidden = yes;
        self
    }
    pub fn max_file_size(mut self, limit: Option<u64>) -> Self {
        self.config.scan.max_file_size = limit;
        self
    }
    pub fn binary_detection(mut self, method: BinaryDetection) -> Self {
        self.config.scan.binary_detection = method;
        self
    }
    pub fn respect_gitignore(mut self, yes: bool) -> Self {
        self.config.scan.respect_gitignore = yes;
        self
    }
    pub fn pattern_mode(mut self, mode: PatternMode) -> Self {
        self.config.exclusion.mode = mode;
        self
    }
    pub fn exclusions(mut self, text: impl Into<String>) -> Self {
        self.config.exclusion.text = text.into();
        self
    }
    pub fn append_tree(mut self, yes: bool) -> Self {
        self.config.append_tree = yes;
        self
    }
    pub fn tree_show_sizes(mut self, yes: bool) -> Self {
        self.config.tree.show_sizes = yes;
        self
    }
    pub fn tree_max_depth(mut self, depth: Option<usize>) -> Self {
        self.config.tree.max_depth = depth;
        self
    }
    pub fn template(mut self, template: impl Into<String>) -> Self {
        self.config.template = template.into();
        self
    }
    pub fn build(self) -> RunConfig {
        self.config
    }
}
