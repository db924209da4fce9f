use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use fanwalk::{
    walk, BudgetPolicy, ExtensionMatcher, GlobMatcher, HookResult, PathEntry, Stage, WalkConfig,
    WalkError,
};

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

/// Create a temporary directory tree for testing.
///
/// Structure:
/// ```
/// tmp/
///   invoice_jan.txt
///   report.md
///   empty/
///   subdir/
///     invoice_mar.txt
///     other.rs
///     deeper/
///       notes.txt
///       deepest/
///         leaf.txt
/// ```
fn setup_test_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    fs::write(root.join("invoice_jan.txt"), "january invoice").unwrap();
    fs::write(root.join("report.md"), "quarterly report").unwrap();
    fs::create_dir(root.join("empty")).unwrap();

    let sub = root.join("subdir");
    fs::create_dir_all(sub.join("deeper").join("deepest")).unwrap();
    fs::write(sub.join("invoice_mar.txt"), "march invoice").unwrap();
    fs::write(sub.join("other.rs"), "fn main() {}").unwrap();
    fs::write(sub.join("deeper").join("notes.txt"), "notes").unwrap();
    fs::write(sub.join("deeper").join("deepest").join("leaf.txt"), "leaf").unwrap();

    dir
}

/// Independent oracle: what walkdir finds under `root`, filtered by type.
fn walkdir_set(root: &Path, dirs: bool, max_depth: usize) -> BTreeSet<PathBuf> {
    walkdir::WalkDir::new(root)
        .min_depth(1)
        .max_depth(max_depth)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| if dirs { e.file_type().is_dir() } else { e.file_type().is_file() })
        .map(|e| e.path().to_path_buf())
        .collect()
}

fn set(paths: Vec<PathBuf>) -> BTreeSet<PathBuf> {
    paths.into_iter().collect()
}

fn is_txt(p: &Path) -> bool {
    p.extension().map(|e| e == "txt").unwrap_or(false)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn finds_every_reachable_file_once() {
    let dir = setup_test_dir();
    let paths = walk(dir.path()).paths().await.unwrap();

    assert_eq!(paths.len(), 6, "no path should appear twice: {paths:?}");
    assert_eq!(set(paths), walkdir_set(dir.path(), false, usize::MAX));
}

#[tokio::test]
async fn directory_mode_returns_directories_only() {
    let dir = setup_test_dir();
    let paths = walk(dir.path()).directory_mode(true).paths().await.unwrap();

    assert_eq!(set(paths), walkdir_set(dir.path(), true, usize::MAX));
}

#[tokio::test]
async fn max_depth_limits_what_is_read() {
    let dir = setup_test_dir();

    let paths = walk(dir.path()).max_depth(1).paths().await.unwrap();
    assert_eq!(set(paths), walkdir_set(dir.path(), false, 1));

    let paths = walk(dir.path()).max_depth(2).paths().await.unwrap();
    assert_eq!(set(paths), walkdir_set(dir.path(), false, 2));
    assert!(!set(walk(dir.path()).max_depth(2).paths().await.unwrap())
        .contains(&dir.path().join("subdir/deeper/notes.txt")));

    let dirs = walk(dir.path())
        .max_depth(1)
        .directory_mode(true)
        .paths()
        .await
        .unwrap();
    assert_eq!(
        set(dirs),
        [dir.path().join("empty"), dir.path().join("subdir")].into_iter().collect()
    );
}

#[tokio::test]
async fn zero_iterations_resolves_empty() {
    let dir = setup_test_dir();
    let report = walk(dir.path()).max_iterations(0).run().await.unwrap();

    assert!(report.paths.is_empty());
    assert_eq!(report.stats.iterations, 0);
}

#[tokio::test]
async fn budget_counts_reads_across_the_whole_tree() {
    let dir = setup_test_dir();
    let report = walk(dir.path()).max_iterations(3).run().await.unwrap();

    assert_eq!(report.stats.iterations, 3);
    assert!(report.stats.budget_skips > 0);
    assert!(report.paths.len() < 6);

    let err = walk(dir.path())
        .max_iterations(3)
        .budget_policy(BudgetPolicy::Fail)
        .run()
        .await
        .unwrap_err();
    assert!(matches!(err, WalkError::BudgetExceeded { limit: 3 }));
}

#[tokio::test]
async fn empty_directory_resolves_empty() {
    let dir = setup_test_dir();
    let paths = walk(dir.path().join("empty")).paths().await.unwrap();
    assert!(paths.is_empty());
}

#[tokio::test]
async fn missing_root_rejects() {
    let dir = setup_test_dir();
    let err = walk(dir.path().join("missing")).paths().await.unwrap_err();

    assert!(matches!(err, WalkError::NotFound { stage: Stage::Stat, .. }));
    assert_eq!(err.path(), Some(dir.path().join("missing").as_path()));
}

#[tokio::test]
async fn file_root_rejects() {
    let dir = setup_test_dir();
    let err = walk(dir.path().join("report.md")).paths().await.unwrap_err();
    assert!(matches!(err, WalkError::NotADirectory(_)));
}

#[tokio::test]
async fn filter_is_the_matching_subset_of_walk() {
    let dir = setup_test_dir();
    let all = set(walk(dir.path()).paths().await.unwrap());
    let filtered = set(fanwalk::filter(dir.path(), is_txt, false).await.unwrap());

    let expected: BTreeSet<PathBuf> = all.iter().filter(|p| is_txt(p)).cloned().collect();
    assert_eq!(filtered, expected);
    assert_eq!(filtered.len(), 4);
}

#[tokio::test]
async fn filter_matching_directories_prunes_them() {
    let dir = setup_test_dir();
    let root = dir.path().to_path_buf();

    // Accept the `subdir` branch and text files; `deeper` fails and is pruned.
    let keep = move |p: &Path| p == root.join("subdir").as_path() || is_txt(p);
    let paths = set(fanwalk::filter(dir.path(), keep, true).await.unwrap());

    assert_eq!(
        paths,
        [dir.path().join("invoice_jan.txt"), dir.path().join("subdir/invoice_mar.txt")]
            .into_iter()
            .collect()
    );
}

#[tokio::test]
async fn map_rewrites_every_file() {
    let dir = setup_test_dir();
    let all = set(walk(dir.path()).paths().await.unwrap());
    let upper = |p: &Path| PathBuf::from(p.to_string_lossy().to_uppercase());

    let mapped = set(fanwalk::map(dir.path(), upper).await.unwrap());
    let expected: BTreeSet<PathBuf> = all.iter().map(|p| upper(p.as_path())).collect();
    assert_eq!(mapped, expected);
}

#[tokio::test]
async fn walk_with_takes_a_bare_hook() {
    let dir = setup_test_dir();
    let only_md = |entry: PathEntry| {
        if entry.is_file && entry.path.extension().map(|e| e != "md").unwrap_or(true) {
            HookResult::Drop
        } else {
            HookResult::Keep(entry)
        }
    };

    let paths = fanwalk::walk_with(dir.path(), WalkConfig::with_hook(only_md)).await.unwrap();
    assert_eq!(paths, vec![dir.path().join("report.md")]);
}

#[tokio::test]
async fn builder_hooks_chain() {
    let dir = setup_test_dir();
    let report = walk(dir.path())
        .filter(ExtensionMatcher::new("txt"))
        .map(|p: &Path| p.with_extension("bak"))
        .run()
        .await
        .unwrap();

    assert_eq!(report.paths.len(), 4);
    assert!(report.paths.iter().all(|p| p.extension().unwrap() == "bak"));
    assert_eq!(report.stats.transformed, 4);
    assert_eq!(report.stats.dropped, 2);
}

#[tokio::test]
async fn glob_matcher_filters_walk() {
    let dir = setup_test_dir();
    let globs = GlobMatcher::new(dir.path(), ["invoice_*", "!*_mar.txt"]).unwrap();
    let paths = walk(dir.path()).filter(globs).paths().await.unwrap();

    assert_eq!(paths, vec![dir.path().join("invoice_jan.txt")]);
}

#[tokio::test]
async fn relative_roots_are_normalized() {
    let dir = setup_test_dir();
    let messy = dir.path().join("subdir").join("..").join(".").join("subdir");
    let paths = set(walk(&messy).max_depth(1).paths().await.unwrap());

    assert_eq!(
        paths,
        [dir.path().join("subdir/invoice_mar.txt"), dir.path().join("subdir/other.rs")]
            .into_iter()
            .collect()
    );
}

#[tokio::test]
async fn errors_empty_when_not_collecting() {
    let dir = setup_test_dir();
    let report = walk(dir.path()).run().await.unwrap();

    assert!(
        report.errors.is_empty(),
        "errors should be empty when collect_errors is false"
    );
    assert_eq!(report.stats.files, 6);
    assert_eq!(report.stats.dirs, 4);
}

#[cfg(unix)]
#[tokio::test]
async fn dangling_symlink_is_skipped_and_reported() {
    let dir = setup_test_dir();
    std::os::unix::fs::symlink(dir.path().join("gone"), dir.path().join("dangling")).unwrap();

    let report = walk(dir.path()).collect_errors(true).run().await.unwrap();

    assert_eq!(report.paths.len(), 6);
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].is_recoverable());
    assert_eq!(report.errors[0].path(), Some(dir.path().join("dangling").as_path()));
}

// Linux filesystems accept arbitrary bytes in names; APFS rejects them.
#[cfg(target_os = "linux")]
#[tokio::test]
async fn non_utf8_names_are_walked_unchanged() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let dir = tempfile::tempdir().unwrap();
    let raw = OsStr::from_bytes(b"bad\xffname.txt");
    fs::write(dir.path().join("ok.txt"), "ok").unwrap();
    fs::write(dir.path().join(raw), "raw").unwrap();

    let report = walk(dir.path()).collect_errors(true).run().await.unwrap();

    assert!(report.errors.is_empty());
    assert_eq!(
        set(report.paths),
        [dir.path().join("ok.txt"), dir.path().join(raw)].into_iter().collect()
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn local_walk_is_spawnable_on_a_tokio_runtime() {
    let dir = setup_test_dir();
    let root = dir.path().to_path_buf();

    let paths = tokio::spawn(walk(root.clone()).unbounded().paths())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(set(paths), walkdir_set(&root, false, usize::MAX));
}
