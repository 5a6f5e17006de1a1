//! Command-line interface for dir2txt.
//!
//! Scans a source directory, concatenates the selected files into one text file and
//! optionally appends a directory tree. Ctrl+C cancels the run cooperatively.

use clap::Parser;
use dir2txt::{
    BinaryDetection, CancellationToken, PatternMode, Progress, RunConfig, RunConfigBuilder,
    RunOutcome, resolve_destination, run, scan_all_file_names,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::PathBuf;
use std::process::exit;
use std::time::Duration;

/// dir2txt — combine a directory tree into one text file
#[derive(Parser)]
#[command(name = "dir2txt", version, about, long_about = None)]
struct Cli {
    /// Source directory (default current dir)
    #[arg(default_value = ".")]
    root: PathBuf,

    /// Output file, or directory to place a template-named file in
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON settings file; explicit flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the effective settings to this JSON file
    #[arg(long)]
    save_config: Option<PathBuf>,

    /// Output filename template ({yyyy} {yy} {MM} {dd} {HH} {mm} {ss} {dir})
    #[arg(long)]
    template: Option<String>,

    /// Exclusion pattern language: exact, glob or regex
    #[arg(long, value_parser = parse_pattern_mode)]
    mode: Option<PatternMode>,

    /// Exclusion pattern matched against bare file names (can be repeated)
    #[arg(short = 'x', long = "exclude")]
    exclude: Vec<String>,

    /// File with one exclusion pattern per line
    #[arg(long)]
    exclude_file: Option<PathBuf>,

    /// Include every file, not only text files
    #[arg(long)]
    all_files: bool,

    /// Binary detection strategy used when sniffing file contents
    #[arg(long, value_parser = parse_binary_detection)]
    binary_detection: Option<BinaryDetection>,

    /// Skip files larger than this many MiB
    #[arg(long, conflicts_with = "no_size_limit")]
    max_size_mb: Option<u64>,

    /// Do not limit file size
    #[arg(long)]
    no_size_limit: bool,

    /// Include hidden files
    #[arg(long)]
    hidden: bool,

    /// Follow symlinks
    #[arg(long)]
    follow_links: bool,

    /// Honour .gitignore and .ignore files
    #[arg(long)]
    gitignore: bool,

    /// Do not append the directory tree
    #[arg(long)]
    no_tree: bool,

    /// Omit file sizes from the directory tree
    #[arg(long)]
    no_tree_sizes: bool,

    /// Max tree depth (unlimited if not set)
    #[arg(long)]
    tree_depth: Option<usize>,

    /// Only list the distinct file names under the root
    #[arg(long)]
    list_names: bool,

    /// Hide the progress bar
    #[arg(short, long)]
    quiet: bool,

    /// Verbose logging (same as RUST_LOG=debug)
    #[arg(short, long)]
    verbose: bool,
}

/// Parse string into PatternMode enum.
fn parse_pattern_mode(s: &str) -> Result<PatternMode, String> {
    match s {
        "exact" => Ok(PatternMode::Exact),
        "glob" => Ok(PatternMode::Glob),
        "regex" => Ok(PatternMode::Regex),
        _ => Err(format!("invalid pattern mode: {}", s)),
    }
}

/// Parse string into BinaryDetection enum.
fn parse_binary_detection(s: &str) -> Result<BinaryDetection, String> {
    match s {
        "simple" => Ok(BinaryDetection::Simple),
        "accurate" => Ok(BinaryDetection::Accurate),
        _ => Err(format!("invalid binary detection method: {}", s)),
    }
}

impl Cli {
    fn to_config(&self) -> Result<RunConfig, dir2txt::Dir2TxtError> {
        let base = match &self.config {
            Some(path) => RunConfig::from_json_file(path)?,
            None => RunConfig::default(),
        };
        let mut exclusions = base.exclusion.text.clone();
        if let Some(path) = &self.exclude_file {
            let text = fs::read_to_string(path).map_err(|e| dir2txt::Dir2TxtError::Io {
                path: path.clone(),
                source: e,
            })?;
            exclusions.push('\n');
            exclusions.push_str(&text);
        }
        for pattern in &self.exclude {
            exclusions.push('\n');
            exclusions.push_str(pattern);
        }

        let mut builder = RunConfigBuilder::from_config(base).exclusions(exclusions);
        if let Some(mode) = self.mode {
            builder = builder.pattern_mode(mode);
        }
        if let Some(template) = &self.template {
            builder = builder.template(template.clone());
        }
        if let Some(method) = self.binary_detection {
            builder = builder.binary_detection(method);
        }
        if self.all_files {
            builder = builder.text_only(false);
        }
        if let Some(mb) = self.max_size_mb {
            builder = builder.max_file_size(Some(mb.saturating_mul(1024 * 1024)));
        }
        if self.no_size_limit {
            builder = builder.max_file_size(None);
        }
        if self.hidden {
            builder = builder.include_hidden(true);
        }
        if self.follow_links {
            builder = builder.follow_symlinks(true);
        }
        if self.gitignore {
            builder = builder.respect_gitignore(true);
        }
        if self.no_tree {
            builder = builder.append_tree(false);
        }
        if self.no_tree_sizes {
            builder = builder.tree_show_sizes(false);
        }
        if self.tree_depth.is_some() {
            builder = builder.tree_max_depth(self.tree_depth);
        }
        Ok(builder.build())
    }
}

#[cfg(feature = "logging")]
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;
    let fallback = if verbose { "dir2txt=debug" } else { "dir2txt=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(not(feature = "logging"))]
fn init_logging(_verbose: bool) {}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let token = CancellationToken::new();
    let handler_token = token.clone();
    if let Err(e) = ctrlc::set_handler(move || handler_token.cancel()) {
        eprintln!("Warning: Failed to install Ctrl+C handler: {}", e);
    }

    if cli.list_names {
        list_names(&cli, &token);
        return;
    }

    let config = match cli.to_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            exit(1);
        }
    };
    if let Some(path) = &cli.save_config {
        if let Err(e) = config.to_json_file(path) {
            eprintln!("Error: {}", e);
            exit(1);
        }
    }

    let destination = resolve_destination(
        cli.output.as_deref(),
        &cli.root,
        &config.template,
        &chrono::Local::now(),
    );
    let bar = progress_bar(cli.quiet);
    let outcome = run(&cli.root, &destination, config, &token, |event| {
        report(&bar, event)
    });
    bar.finish_and_clear();

    match outcome {
        Ok(RunOutcome::Completed(summary)) => {
            println!("{}", summary);
            println!("Output: {}", summary.destination.display());
        }
        Ok(RunOutcome::Cancelled) => {
            eprintln!("Cancelled. {} may be incomplete.", destination.display());
            exit(130);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            exit(1);
        }
    }
}

fn list_names(cli: &Cli, token: &CancellationToken) {
    match scan_all_file_names(&cli.root, cli.hidden, token) {
        Ok(names) => {
            for name in names {
                println!("{}", name);
            }
        }
        Err(e) if e.is_cancelled() => exit(130),
        Err(e) => {
            eprintln!("Error: {}", e);
            exit(1);
        }
    }
}

fn progress_bar(quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new_spinner();
    bar.enable_steady_tick(Duration::from_millis(100));
    bar.set_message("Preparing…");
    bar
}

fn report(bar: &ProgressBar, event: Progress) {
    match event {
        Progress::Scanning { visited } => bar.set_message(format!("Scanning… {}", visited)),
        Progress::Writing {
            files_done,
            total_files,
            bytes_written,
        } => {
            if bar.length() != Some(total_files as u64) {
                bar.set_length(total_files as u64);
                if let Ok(style) = ProgressStyle::default_bar()
                    .template("{spinner:.green} {bar:40.cyan/blue} {pos}/{len} {msg}")
                {
                    bar.set_style(style);
                }
            }
            bar.set_position(files_done as u64);
            let percent = event.fraction().unwrap_or_default() * 100.0;
            bar.set_message(format!(
                "Writing… {:.0}% {}",
                percent,
                dir2txt::format_bytes(bytes_written)
            ));
        }
    }
}
