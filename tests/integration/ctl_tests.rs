//! End-to-end tests for the `godeeper-ctl` binary.

use std::path::Path;
use std::process::{Command, Output};

fn ctl(db: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_godeeper-ctl"))
        .arg("--db")
        .arg(db)
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("run godeeper-ctl")
}

fn stdout_json(output: &Output) -> serde_json::Value {
    assert!(
        output.status.success(),
        "ctl failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("json on stdout")
}

#[test]
fn parse_prints_thread_id_or_no_match() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db = dir.path().join("store.db");

    let hit = ctl(&db, &["parse", "godeeperapp://question/abc-1"]);
    assert_eq!(String::from_utf8_lossy(&hit.stdout).trim(), "abc-1");

    let miss = ctl(&db, &["parse", "https://example.com/other/abc"]);
    assert_eq!(String::from_utf8_lossy(&miss.stdout).trim(), "no match");
}

#[test]
fn open_then_flush_resumes_link() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db = dir.path().join("store.db");

    let opened = stdout_json(&ctl(&db, &["open", "https://example.com/question/beef"]));
    assert_eq!(opened["threadId"], "beef");
    assert_eq!(opened["handled"], true);
    assert_eq!(opened["navigation"][0]["kind"], "replace");

    let flushed = stdout_json(&ctl(&db, &["flush"]));
    assert_eq!(flushed["consumed"], true);
    assert_eq!(flushed["navigation"][0]["kind"], "push");
    assert_eq!(flushed["navigation"][0]["target"], "/thread/beef");

    let again = stdout_json(&ctl(&db, &["flush"]));
    assert_eq!(again["consumed"], false);
}

#[test]
fn prompt_commands_drive_cadence() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db = dir.path().join("store.db");

    let status = stdout_json(&ctl(&db, &["prompt", "status"]));
    assert_eq!(status["shouldShowPrompt"], true);

    let shown = stdout_json(&ctl(&db, &["prompt", "shown"]));
    assert_eq!(shown["preferences"]["timesPrompted"], 1);
    assert_eq!(shown["shouldShowPrompt"], false);

    let status = stdout_json(&ctl(&db, &["prompt", "status"]));
    assert_eq!(status["shouldShowPrompt"], false);

    let reset = stdout_json(&ctl(&db, &["prompt", "reset"]));
    assert_eq!(reset["shouldShowPrompt"], true);
    assert_eq!(reset["preferences"]["timesPrompted"], 0);
}
