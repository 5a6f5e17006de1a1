use chrono::{FixedOffset, TimeZone};
use dir2txt::{
    CancellationToken, Dir2TxtError, ExclusionMatcher, PatternMode, Progress, RunConfig, RunConfigBuilder,
    RunOutcome, RunSummary, ScanOptions, TreeOptions, append_string, build_tree, concatenate,
    pipeline::tree_section_header, resolve_destination, run, scan,
};
use std::fs;
use tempfile::tempdir;
#[test]
fn integration_scan_concatenate_and_append_tree() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::write(root.join("a.txt"), "A").unwrap();
    fs::write(root.join("b.md"), "B").unwrap();
    fs::write(root.join("ignored.log"), "IGNORED").unwrap();
    let options = ScanOptions {
        text_only: false,
        include_hidden: true,
        max_file_size: None,
        ..ScanOptions::default()
    };
    let token = CancellationToken::new();
    let matcher = ExclusionMatcher::new(PatternMode::Glob, "*.log");
    let result = scan(root, &options, &matcher, &token, |_| {}).unwrap();
    assert_eq!(result.files.len(), 2);
    let out = root.join("output.txt");
    concatenate(&result.files, &out, root, &token, |_, _| {}).unwrap();
    let tree_options = TreeOptions {
        show_sizes: false,
        max_depth: None,
    };
    let tree = build_tree(root, &tree_options, false).unwrap();
    append_string(&(tree_section_header(root) + &tree), &out).unwrap();
    let output = fs::read_to_string(&out).unwrap();
    assert!(output.contains("// ===== File: ./a.txt =====\nA\n"));
    assert!(output.contains("// ===== File: ./b.md =====\nB\n"));
    assert!(!output.contains("IGNORED"));
    assert!(output.contains("===== DIRECTORY TREE:"));
    assert!(output.contains(&root.file_name().unwrap().to_string_lossy().into_owned()));
    let tree_at = output.find("===== DIRECTORY TREE:").unwrap();
    assert!(output.find("./b.md").unwrap() < tree_at);
}
#[test]
fn integration_full_run() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("project");
    fs::create_dir_all(src.join("src")).unwrap();
    fs::write(src.join("main.rs"), "fn main() {}").unwrap();
    fs::write(src.join("src/lib.rs"), "pub fn test() {}").unwrap();
    fs::write(src.join("debug.log"), "noise").unwrap();
    fs::write(src.join("logo.png"), [0x89u8, b'P', b'N', b'G', 0, 0]).unwrap();
    let dst = dir.path().join("out/result.txt");
    let config = RunConfigBuilder::new()
        .pattern_mode(PatternMode::Glob)
        .exclusions("*.log")
        .tree_show_sizes(false)
        .build();
    let mut events = Vec::new();
    let outcome = run(&src, &dst, config, &CancellationToken::new(), |e| events.push(e)).unwrap();
    let RunOutcome::Completed(summary) = outcome else {
        panic!("run was not completed");
    };
    assert_eq!(summary.files_written, 2);
    assert_eq!(summary.skipped, 2);
    let output = fs::read_to_string(&dst).unwrap();
    assert_eq!(summary.bytes_written, output.len() as u64);
    let main_at = output.find("// ===== File: ./main.rs =====").unwrap();
    let lib_at = output.find("// ===== File: ./src/lib.rs =====").unwrap();
    assert!(main_at < lib_at);
    let abs = std::path::absolute(&src).unwrap();
    assert!(output.contains(&format!("\n\n===== DIRECTORY TREE: {} =====\n\nproject\n", abs.display())));
    assert!(output.ends_with("└── src\n    └── lib.rs\n"));
    assert!(matches!(
        events.last(),
        Some(Progress::Writing {
            files_done: 2,
            total_files: 2,
            ..
        })
    ));
}
#[test]
fn integration_run_without_tree() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("one.txt"), "payload").unwrap();
    let dst = dir.path().join("elsewhere").join("out.txt");
    let config = RunConfigBuilder::new().append_tree(false).build();
    let outcome = run(dir.path(), &dst, config, &CancellationToken::new(), |_| {}).unwrap();
    assert!(matches!(outcome, RunOutcome::Completed(_)));
    let output = fs::read_to_string(&dst).unwrap();
    assert_eq!(output, "// ===== File: ./one.txt =====\npayload\n");
}
#[test]
fn integration_rerun_skips_previous_output() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "A").unwrap();
    let dst = dir.path().join("combined.txt");
    let config = RunConfigBuilder::new().append_tree(false).build();
    let token = CancellationToken::new();
    run(dir.path(), &dst, config.clone(), &token, |_| {}).unwrap();
    let outcome = run(dir.path(), &dst, config, &token, |_| {}).unwrap();
    let RunOutcome::Completed(summary) = outcome else {
        panic!("run was not completed");
    };
    assert_eq!(summary.files_written, 1);
    assert_eq!(summary.skipped, 1);
    let output = fs::read_to_string(&dst).unwrap();
    assert!(!output.contains("./combined.txt"));
}
#[test]
fn integration_cancelled_run() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "A").unwrap();
    let token = CancellationToken::new();
    token.cancel();
    let outcome = run(
        dir.path(),
        &dir.path().join("out.txt"),
        RunConfig::default(),
        &token,
        |_| {},
    )
    .unwrap();
    assert_eq!(outcome, RunOutcome::Cancelled);
}
#[test]
fn integration_missing_source_is_error() {
    let dir = tempdir().unwrap();
    let result = run(
        &dir.path().join("missing"),
        &dir.path().join("out.txt"),
        RunConfig::default(),
        &CancellationToken::new(),
        |_| {},
    );
    assert!(result.is_err());
}
#[cfg(unix)]
#[test]
fn integration_unreadable_source_is_error() {
    use std::os::unix::fs::PermissionsExt;
    let dir = tempdir().unwrap();
    let src = dir.path().join("locked");
    fs::create_dir(&src).unwrap();
    fs::write(src.join("a.txt"), "A").unwrap();
    fs::set_permissions(&src, fs::Permissions::from_mode(0o000)).unwrap();
    // Privileged users can still list the directory; nothing to check then.
    let listable = fs::read_dir(&src).is_ok();
    let config = RunConfigBuilder::new().append_tree(false).build();
    let result = run(&src, &dir.path().join("out.txt"), config, &CancellationToken::new(), |_| {});
    fs::set_permissions(&src, fs::Permissions::from_mode(0o755)).unwrap();
    if listable {
        return;
    }
    assert!(matches!(result, Err(Dir2TxtError::Io { .. })));
}
#[test]
fn integration_config_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings/dir2txt.json");
    let config = RunConfigBuilder::new()
        .pattern_mode(PatternMode::Regex)
        .exclusions("^target$")
        .max_file_size(None)
        .tree_max_depth(Some(3))
        .build();
    config.to_json_file(&path).unwrap();
    assert_eq!(RunConfig::from_json_file(&path).unwrap(), config);
    fs::write(&path, r#"{ "append_tree": false, "scan": { "include_hidden": true } }"#).unwrap();
    let partial = RunConfig::from_json_file(&path).unwrap();
    assert!(!partial.append_tree);
    assert!(partial.scan.include_hidden);
    assert!(partial.scan.text_only);
    assert_eq!(partial.template, RunConfig::default().template);
    fs::write(&path, "not json").unwrap();
    assert!(RunConfig::from_json_file(&path).is_err());
}
#[test]
fn integration_destination_resolution() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("my project");
    fs::create_dir(&src).unwrap();
    let at = FixedOffset::east_opt(0)
        .unwrap()
        .with_ymd_and_hms(2024, 2, 3, 4, 5, 6)
        .unwrap();
    let template = "{dd}.{MM}.{yy}@{HH}-{mm}-{ss}_{dir}.txt";
    let in_dir = resolve_destination(Some(dir.path()), &src, template, &at);
    assert_eq!(in_dir, dir.path().join("03.02.24@04-05-06_my project.txt"));
    let explicit = dir.path().join("chosen.txt");
    assert_eq!(resolve_destination(Some(&explicit), &src, template, &at), explicit);
}
#[test]
fn integration_summary_display() {
    let summary = RunSummary {
        destination: "out.txt".into(),
        files_written: 3,
        skipped: 4,
        bytes_written: 2048,
    };
    assert_eq!(summary.to_string(), "Wrote 3 files (2.0 KiB). Skipped 4 items.");
}
