// Tests for the history store

use chrono::{TimeZone, Utc};
use digger_core::error::DiggerError;
use digger_core::history::{self, History};
use digger_core::model::HostingLink;
use std::fs;
use tempfile::TempDir;

fn links(urls: &[&str]) -> Vec<HostingLink> {
    urls.iter().map(|u| HostingLink::from(*u)).collect()
}

// ============================================================================
// Loading and filtering
// ============================================================================

#[test]
fn test_load_missing_store_is_unavailable() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("git_log.txt");

    let result = history::load(&path);

    assert!(matches!(result, Err(DiggerError::StoreUnavailable { .. })));
}

#[test]
fn test_filter_logged_removes_exact_token() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("git_log.txt");
    fs::write(
        &path,
        "\n\n\n\nResults 2024-08-12 10:00:00.000000 :\nhttps://github.com/a/b\n",
    )
    .unwrap();

    let kept = history::filter_logged(
        links(&["https://github.com/a/b", "https://github.com/c/d"]),
        &path,
    )
    .unwrap();

    assert_eq!(kept, links(&["https://github.com/c/d"]));
}

#[test]
fn test_filter_is_not_normalized() {
    let history = History::from_blob("https://github.com/a/b");

    let kept = history.filter(links(&[
        "https://github.com/a/b/",
        "HTTPS://github.com/a/b",
        "https://github.com/a/b",
    ]));

    assert_eq!(kept, links(&["https://github.com/a/b/", "HTTPS://github.com/a/b"]));
}

#[test]
fn test_filter_keeps_duplicates_not_in_history() {
    let history = History::from_blob("");
    let input = links(&["https://github.com/a/b", "https://github.com/a/b"]);
    assert_eq!(history.filter(input.clone()), input);
}

// ============================================================================
// Appending
// ============================================================================

#[test]
fn test_append_preserves_existing_content() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("git_log.txt");
    fs::write(&path, "earlier results\n").unwrap();
    let ts = Utc.with_ymd_and_hms(2024, 8, 12, 12, 0, 0).unwrap();

    history::append(&path, &links(&["https://github.com/a/b"]), ts).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(
        content,
        "earlier results\n\n\n\n\nResults 2024-08-12 12:00:00.000000 :\nhttps://github.com/a/b\n"
    );
}

#[test]
fn test_appended_links_are_filtered_next_time() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("git_log.txt");
    history::init(&path, false).unwrap();
    let found = links(&["https://github.com/a/b", "https://gitlab.com/c/d"]);

    history::append(&path, &found, Utc::now()).unwrap();

    assert!(history::filter_logged(found, &path).unwrap().is_empty());
}

#[test]
fn test_append_to_unwritable_location_fails() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("no-such-dir").join("git_log.txt");

    let result = history::append(&path, &links(&["https://github.com/a/b"]), Utc::now());

    assert!(matches!(result, Err(DiggerError::StoreWriteFailed { .. })));
}

// ============================================================================
// Initialization
// ============================================================================

#[test]
fn test_init_creates_empty_store_with_parents() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("state").join("git_log.txt");

    assert!(history::init(&path, false).unwrap());
    assert_eq!(fs::read_to_string(&path).unwrap(), "");
}

#[test]
fn test_init_keeps_existing_store_without_force() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("git_log.txt");
    fs::write(&path, "https://github.com/a/b\n").unwrap();

    assert!(!history::init(&path, false).unwrap());
    assert_eq!(fs::read_to_string(&path).unwrap(), "https://github.com/a/b\n");
}

#[test]
fn test_init_force_empties_store() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("git_log.txt");
    fs::write(&path, "https://github.com/a/b\n").unwrap();

    assert!(history::init(&path, true).unwrap());
    assert_eq!(fs::read_to_string(&path).unwrap(), "");
}
