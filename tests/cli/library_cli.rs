use serde_json::json;

use crate::helpers::{SAMPLE_BOOKS, books_file, run_readlog, spawn_server, stdout_json};

#[test]
fn test_library_push_stats_and_delete() {
    let server = spawn_server();
    let url = server.address.as_str();
    let file = books_file(SAMPLE_BOOKS);

    let pushed = stdout_json(&run_readlog(
        &[
            "--api-url",
            url,
            "library",
            "push",
            "--id",
            "alice",
            "--file",
            file.path().to_str().unwrap(),
        ],
        &[],
    ));
    assert_eq!(pushed["library_id"], "alice");
    assert_eq!(pushed["books"], 3);

    let listed = stdout_json(&run_readlog(&["library", "list"], &[("READLOG_URL", url)]));
    assert_eq!(listed, json!(["alice"]));

    let cached = stdout_json(&run_readlog(
        &["--api-url", url, "library", "stats", "--id", "alice", "--year", "2024"],
        &[],
    ));
    assert_eq!(cached["year"], 2024);
    assert_eq!(cached["stats"]["total_pages"], 387);

    let years = stdout_json(&run_readlog(
        &["--api-url", url, "library", "years", "--id", "alice"],
        &[],
    ));
    assert_eq!(years, json!([2024, 2023]));

    let deleted = run_readlog(&["--api-url", url, "library", "delete", "--id", "alice"], &[]);
    assert!(deleted.status.success());

    let missing = run_readlog(&["--api-url", url, "library", "stats", "--id", "alice"], &[]);
    assert!(!missing.status.success());
    let stderr = String::from_utf8_lossy(&missing.stderr);
    assert!(stderr.contains("404"), "stderr: {stderr}");
}

#[test]
fn test_library_preferences_merge_overrides() {
    let server = spawn_server();
    let url = server.address.as_str();

    let saved = stdout_json(&run_readlog(
        &[
            "--api-url",
            url,
            "library",
            "preferences",
            "--id",
            "bob",
            "--reading-speed",
            "45",
        ],
        &[],
    ));
    assert_eq!(saved["reading_speed"], 45);
    assert_eq!(saved["yearly_goal"], 50);

    let updated = stdout_json(&run_readlog(
        &[
            "--api-url",
            url,
            "library",
            "preferences",
            "--id",
            "bob",
            "--purchase-scope",
            "all-shelves",
        ],
        &[],
    ));
    assert_eq!(updated["reading_speed"], 45);
    assert_eq!(updated["purchase_scope"], "all-shelves");

    let shown = stdout_json(&run_readlog(
        &["--api-url", url, "library", "preferences", "--id", "bob"],
        &[],
    ));
    assert_eq!(shown, updated);
}

#[test]
fn test_library_rejects_invalid_id_before_sending() {
    let output = run_readlog(
        &[
            "--api-url",
            "http://127.0.0.1:9",
            "library",
            "years",
            "--id",
            "not valid",
        ],
        &[],
    );

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid library id"), "stderr: {stderr}");
}
