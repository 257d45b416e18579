use std::collections::HashSet;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::Instant;

use tempfile::TempDir;

use super::SearchContext;
use crate::cancel::CancellationToken;
use crate::exclusion::ExclusionPolicy;
use crate::types::{SearchMode, SearchRequest, SearchStatus};

fn context_with(policy: ExclusionPolicy) -> SearchContext {
    SearchContext::with_policy(4, 4, policy).expect("search context")
}

fn context() -> SearchContext {
    context_with(ExclusionPolicy::empty())
}

fn touch(root: &Path, relative: &str) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    File::create(&path).unwrap();
    path
}

fn as_set(paths: &[PathBuf]) -> HashSet<PathBuf> {
    paths.iter().cloned().collect()
}

#[test]
fn exhaustive_search_skips_excluded_subtree() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    let a = touch(root, "a/target.txt");
    let c = touch(root, "b/c/target.txt");
    touch(root, "excluded_dir/target.txt");

    let context = context_with(ExclusionPolicy::builder().name("excluded_dir").build());
    let request = SearchRequest::new(root, "target.txt").mode(SearchMode::File);
    let result = context.search(&request, &CancellationToken::new());

    assert_eq!(result.status, SearchStatus::Found);
    assert_eq!(as_set(&result.paths), as_set(&[a, c]));
    // root, a, b, b/c; excluded_dir is never listed.
    assert_eq!(result.stats.scanned_dirs, 4);
}

#[test]
fn match_inside_excluded_directory_is_never_found() {
    let temp = TempDir::new().unwrap();
    touch(temp.path(), "node_modules/pkg/index.js");

    let context = context_with(ExclusionPolicy::builder().name("node_modules").build());
    let request = SearchRequest::new(temp.path(), "index.js");
    let result = context.search(&request, &CancellationToken::new());

    assert_eq!(result.status, SearchStatus::Exhausted);
    assert!(result.paths.is_empty());
}

#[test]
fn excluded_path_prefix_is_honoured() {
    let temp = TempDir::new().unwrap();
    touch(temp.path(), "archive/old/report.pdf");
    let kept = touch(temp.path(), "current/report.pdf");

    let context = context_with(
        ExclusionPolicy::builder()
            .path(temp.path().join("archive"))
            .build(),
    );
    let request = SearchRequest::new(temp.path(), "report.pdf");
    let result = context.search(&request, &CancellationToken::new());

    assert_eq!(result.paths, vec![kept]);
}

#[test]
fn exhaustive_search_returns_every_match() {
    let temp = TempDir::new().unwrap();
    let mut expected = Vec::new();
    for index in 0..40 {
        expected.push(touch(temp.path(), &format!("d{index}/nested/notes.md")));
    }
    touch(temp.path(), "d0/notes.txt");

    let request = SearchRequest::new(temp.path(), "notes.md")
        .mode(SearchMode::File)
        .max_concurrency(3);
    let result = context().search(&request, &CancellationToken::new());

    assert_eq!(result.status, SearchStatus::Found);
    assert_eq!(result.paths.len(), expected.len());
    assert_eq!(as_set(&result.paths), as_set(&expected));
    assert!(result.is_ambiguous());
}

#[test]
fn first_match_returns_one_path_and_stops_scanning() {
    let temp = TempDir::new().unwrap();
    let hit = touch(temp.path(), "target.txt");
    touch(temp.path(), "a/b/c/d/filler.txt");
    touch(temp.path(), "e/f/target.txt");

    let request = SearchRequest::new(temp.path(), "target.txt")
        .mode(SearchMode::File)
        .first_match();
    let result = context().search(&request, &CancellationToken::new());

    assert_eq!(result.status, SearchStatus::Found);
    assert_eq!(result.paths, vec![hit]);
    // The root held the match; nothing else was dispatched.
    assert_eq!(result.stats.scanned_dirs, 1);
}

#[test]
fn first_match_below_root_leaves_wide_siblings_unscanned() {
    let temp = TempDir::new().unwrap();
    let hit = touch(temp.path(), "level/target.txt");
    for index in 0..24 {
        touch(temp.path(), &format!("level/wide{index}/a/b/filler.txt"));
        touch(temp.path(), &format!("level/wide{index}/c/target.txt"));
    }

    let request = SearchRequest::new(temp.path(), "target.txt")
        .mode(SearchMode::File)
        .first_match()
        .max_concurrency(1);
    let result = context().search(&request, &CancellationToken::new());

    assert_eq!(result.status, SearchStatus::Found);
    assert_eq!(result.paths, vec![hit]);
    // Root, then `level`; its subdirectories are never enqueued.
    assert_eq!(result.stats.scanned_dirs, 2);
}

#[test]
fn first_match_picks_exactly_one_of_several() {
    let temp = TempDir::new().unwrap();
    let candidates: Vec<_> = (0..10)
        .map(|index| touch(temp.path(), &format!("dir{index}/config.toml")))
        .collect();

    let request = SearchRequest::new(temp.path(), "config.toml")
        .first_match()
        .max_concurrency(8);
    let result = context().search(&request, &CancellationToken::new());

    assert_eq!(result.status, SearchStatus::Found);
    assert_eq!(result.paths.len(), 1);
    assert!(candidates.contains(&result.paths[0]));
}

#[test]
fn folder_mode_finds_directories_only() {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("x/reports")).unwrap();
    touch(temp.path(), "y/reports");

    let request = SearchRequest::new(temp.path(), "reports").mode(SearchMode::Folder);
    let result = context().search(&request, &CancellationToken::new());

    assert_eq!(result.paths, vec![temp.path().join("x/reports")]);
}

#[test]
fn either_mode_finds_files_and_folders() {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("x/budget")).unwrap();
    let file = touch(temp.path(), "y/budget");

    let request = SearchRequest::new(temp.path(), "budget");
    let result = context().search(&request, &CancellationToken::new());

    assert_eq!(
        as_set(&result.paths),
        as_set(&[temp.path().join("x/budget"), file])
    );
}

#[test]
fn missing_target_exhausts_frontier() {
    let temp = TempDir::new().unwrap();
    touch(temp.path(), "a/b/other.txt");

    let request = SearchRequest::new(temp.path(), "absent.txt");
    let result = context().search(&request, &CancellationToken::new());

    assert_eq!(result.status, SearchStatus::Exhausted);
    assert!(result.paths.is_empty());
    assert_eq!(result.stats.scanned_dirs, 3);
}

#[test]
fn nonexistent_root_is_exhausted_without_work() {
    let request = SearchRequest::new("/nonexistent", "x");
    let result = context().search(&request, &CancellationToken::new());

    assert_eq!(result.status, SearchStatus::Exhausted);
    assert!(result.paths.is_empty());
    assert_eq!(result.stats.scanned_dirs, 0);
}

#[test]
fn empty_target_is_exhausted_without_work() {
    let temp = TempDir::new().unwrap();
    touch(temp.path(), "a/x");

    for target in ["", "   "] {
        let request = SearchRequest::new(temp.path(), target);
        let result = context().search(&request, &CancellationToken::new());

        assert_eq!(result.status, SearchStatus::Exhausted);
        assert!(result.paths.is_empty());
        assert_eq!(result.stats.scanned_dirs, 0);
        assert_eq!(result.stats.skipped_dirs, 0);
    }
}

#[test]
fn file_root_is_exhausted_without_work() {
    let temp = TempDir::new().unwrap();
    let file = touch(temp.path(), "plain.txt");

    let request = SearchRequest::new(&file, "plain.txt");
    let result = context().search(&request, &CancellationToken::new());

    assert_eq!(result.status, SearchStatus::Exhausted);
    assert_eq!(result.stats.scanned_dirs, 0);
}

#[test]
fn excluded_root_is_exhausted_without_work() {
    let temp = TempDir::new().unwrap();
    touch(temp.path(), ".git/HEAD");

    let context = context_with(ExclusionPolicy::builder().name(".git").build());
    let request = SearchRequest::new(temp.path().join(".git"), "HEAD");
    let result = context.search(&request, &CancellationToken::new());

    assert_eq!(result.status, SearchStatus::Exhausted);
    assert_eq!(result.stats.scanned_dirs, 0);
}

#[test]
fn empty_root_directory_is_exhausted() {
    let temp = TempDir::new().unwrap();

    let request = SearchRequest::new(temp.path(), "anything");
    let result = context().search(&request, &CancellationToken::new());

    assert_eq!(result.status, SearchStatus::Exhausted);
    assert_eq!(result.stats.scanned_dirs, 1);
}

#[test]
fn cancelled_token_reports_cancelled() {
    let temp = TempDir::new().unwrap();
    touch(temp.path(), "a/target.txt");

    let token = CancellationToken::new();
    token.cancel();
    let request = SearchRequest::new(temp.path(), "target.txt");
    let result = context().search(&request, &token);

    assert_eq!(result.status, SearchStatus::Cancelled);
    assert!(result.paths.is_empty());
    assert_eq!(result.stats.scanned_dirs, 0);
}

#[test]
fn expired_deadline_reports_cancelled() {
    let temp = TempDir::new().unwrap();
    touch(temp.path(), "a/target.txt");

    let token = CancellationToken::with_deadline(Instant::now());
    let request = SearchRequest::new(temp.path(), "target.txt");
    let result = context().search(&request, &token);

    assert_eq!(result.status, SearchStatus::Cancelled);
}

#[test]
fn first_match_does_not_cancel_callers_token() {
    let temp = TempDir::new().unwrap();
    touch(temp.path(), "target.txt");

    let token = CancellationToken::new();
    let request = SearchRequest::new(temp.path(), "target.txt").first_match();
    let result = context().search(&request, &token);

    assert_eq!(result.status, SearchStatus::Found);
    assert!(!token.is_cancelled());
}

#[test]
fn context_can_run_searches_back_to_back() {
    let temp = TempDir::new().unwrap();
    let hit = touch(temp.path(), "a/target.txt");
    let context = context();

    for _ in 0..5 {
        let request = SearchRequest::new(temp.path(), "target.txt");
        let result = context.search(&request, &CancellationToken::new());
        assert_eq!(result.paths, vec![hit.clone()]);
    }
}

#[test]
fn case_insensitive_request() {
    let temp = TempDir::new().unwrap();
    let hit = touch(temp.path(), "docs/ReadMe.MD");

    let request = SearchRequest::new(temp.path(), "readme.md").case_sensitive(false);
    let result = context().search(&request, &CancellationToken::new());
    assert_eq!(result.paths, vec![hit]);

    let request = SearchRequest::new(temp.path(), "readme.md");
    let result = context().search(&request, &CancellationToken::new());
    assert!(result.paths.is_empty());
}

#[test]
fn zero_concurrency_is_clamped() {
    let temp = TempDir::new().unwrap();
    let hit = touch(temp.path(), "a/target.txt");

    let request = SearchRequest::new(temp.path(), "target.txt").max_concurrency(0);
    let result = context().search(&request, &CancellationToken::new());
    assert_eq!(result.paths, vec![hit]);
}

#[test]
fn zero_worker_threads_in_config_is_rejected() {
    let config = crate::config::SearchConfig {
        worker_threads: 0,
        ..Default::default()
    };
    assert!(SearchContext::new(&config).is_err());
}

#[cfg(unix)]
#[test]
fn symlink_cycle_terminates_and_visits_each_directory_once() {
    use std::os::unix::fs::symlink;

    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::create_dir_all(root.join("a/b")).unwrap();
    symlink(root, root.join("a/b/back_to_root")).unwrap();
    symlink(root.join("a"), root.join("a/b/back_to_a")).unwrap();
    let hit = touch(root, "a/b/target.txt");

    let request = SearchRequest::new(root, "target.txt").mode(SearchMode::File);
    let result = context().search(&request, &CancellationToken::new());

    assert_eq!(result.status, SearchStatus::Found);
    assert_eq!(result.paths, vec![hit]);
    // root, a, a/b
    assert_eq!(result.stats.scanned_dirs, 3);
}

#[cfg(unix)]
#[test]
fn symlinked_root_is_searched() {
    use std::os::unix::fs::symlink;

    let temp = TempDir::new().unwrap();
    touch(temp.path(), "real/inner/target.txt");
    let link = temp.path().join("link");
    symlink(temp.path().join("real"), &link).unwrap();

    let request = SearchRequest::new(&link, "target.txt");
    let result = context().search(&request, &CancellationToken::new());

    assert_eq!(result.paths, vec![link.join("inner/target.txt")]);
}

#[cfg(unix)]
#[test]
fn unreadable_directory_does_not_abort_search() {
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new().unwrap();
    let locked = temp.path().join("locked");
    fs::create_dir(&locked).unwrap();
    touch(&locked, "inner/secret.txt");
    let open = touch(temp.path(), "open/secret.txt");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
    if fs::read_dir(&locked).is_ok() {
        // Running with CAP_DAC_OVERRIDE (e.g. as root); permissions are not enforced.
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let request = SearchRequest::new(temp.path(), "secret.txt");
    let result = context().search(&request, &CancellationToken::new());

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    assert_eq!(result.status, SearchStatus::Found);
    assert_eq!(result.paths, vec![open]);
    assert_eq!(result.stats.skipped_dirs, 1);
}
