//! Integration tests for the cmerge CLI.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use courtdb::init::initialize_schema;
use courtdb::{EventRecord, MatchRecord, Record, SessionRecord};
use rusqlite::types::Value;
use rusqlite::Connection;
use tempfile::TempDir;

fn cmerge_cmd(cwd: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_cmerge"));
    cmd.current_dir(cwd);
    cmd.env_remove("RUST_LOG");
    cmd
}

fn run(cmd: &mut Command) -> Output {
    cmd.output().expect("failed to run cmerge")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Write a source store with one session, `matches` matches, and one event
/// per match.
fn make_source(path: PathBuf, session: &str, matches: i64, secs: f64) -> PathBuf {
    let conn = Connection::open(&path).unwrap();
    initialize_schema(&conn).unwrap();
    SessionRecord::new(session, "2026-02-01T10:00:00Z", "training")
        .insert(&conn)
        .unwrap();
    for id in 1..=matches {
        MatchRecord {
            id,
            session_id: Some(session.to_string()),
            display_name: None,
            seed: id,
            level: 1,
            level_name: "Arena".to_string(),
            left_profile: "Balanced".to_string(),
            right_profile: "Sniper".to_string(),
            score_left: 3,
            score_right: 5,
            duration_secs: secs,
            winner: "right".to_string(),
        }
        .insert(&conn)
        .unwrap();
        EventRecord {
            id,
            match_id: Some(id),
            point_id: None,
            time_ms: 0,
            tick_frame: 0,
            event_type: Value::from("MS".to_string()),
            data: Value::from("{}".to_string()),
            created_at: None,
        }
        .insert(&conn)
        .unwrap();
    }
    path
}

fn write_list(dir: &Path, lines: &[String]) -> PathBuf {
    let list = dir.join("db_list.txt");
    std::fs::write(&list, lines.join("\n")).unwrap();
    list
}

fn count(db: &Path, sql: &str) -> i64 {
    let conn = Connection::open(db).unwrap();
    conn.query_row(sql, [], |row| row.get(0)).unwrap()
}

#[test]
fn test_merge_two_sources() {
    let tmp = TempDir::new().unwrap();
    let a = make_source(tmp.path().join("a.db"), "s1", 1, 30.0);
    let b = make_source(tmp.path().join("b.db"), "s2", 1, 30.0);
    let list = write_list(tmp.path(), &[a.display().to_string(), b.display().to_string()]);
    let out = tmp.path().join("db/combined.db");

    let output = run(cmerge_cmd(tmp.path())
        .arg("--list")
        .arg(&list)
        .arg("--out")
        .arg(&out));

    assert!(output.status.success(), "cmerge failed: {:?}", output);
    let text = stdout(&output);
    assert!(text.contains(&format!("Merged {}", a.display())));
    assert!(text.contains(&format!("Merged {}", b.display())));
    assert!(text.contains(&format!("Combined DB written to {}", out.display())));

    assert_eq!(count(&out, "SELECT COUNT(*) FROM sessions"), 2);
    assert_eq!(count(&out, "SELECT MAX(id) FROM matches"), 2);
    assert_eq!(count(&out, "SELECT match_id FROM events WHERE id = 2"), 2);
}

#[test]
fn test_merge_subcommand_matches_default_action() {
    let tmp = TempDir::new().unwrap();
    let a = make_source(tmp.path().join("a.db"), "s1", 2, 30.0);
    let list = write_list(tmp.path(), &[a.display().to_string()]);
    let out = tmp.path().join("combined.db");

    let output = run(cmerge_cmd(tmp.path())
        .args(["merge", "--quiet", "--list"])
        .arg(&list)
        .arg("--out")
        .arg(&out));

    assert!(output.status.success(), "cmerge merge failed: {:?}", output);
    assert!(!stdout(&output).contains("Merged"));
    assert_eq!(count(&out, "SELECT COUNT(*) FROM matches"), 2);
}

#[test]
fn test_missing_source_is_skipped() {
    let tmp = TempDir::new().unwrap();
    let a = make_source(tmp.path().join("a.db"), "s1", 1, 30.0);
    let missing = tmp.path().join("missing.db");
    let list = write_list(
        tmp.path(),
        &[
            "# first run".to_string(),
            format!("{}  # trailing", missing.display()),
            a.display().to_string(),
        ],
    );
    let out = tmp.path().join("combined.db");

    let output = run(cmerge_cmd(tmp.path())
        .arg("--list")
        .arg(&list)
        .arg("--out")
        .arg(&out));

    assert!(output.status.success());
    assert!(stdout(&output).contains(&format!("Skipping missing DB: {}", missing.display())));
    assert_eq!(count(&out, "SELECT COUNT(*) FROM matches"), 1);
}

#[test]
fn test_empty_list_exits_nonzero() {
    let tmp = TempDir::new().unwrap();
    let list = write_list(tmp.path(), &["# nothing".to_string(), String::new()]);
    let out = tmp.path().join("combined.db");

    let output = run(cmerge_cmd(tmp.path())
        .arg("--list")
        .arg(&list)
        .arg("--out")
        .arg(&out));

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("No DBs found in list"));
    assert!(!out.exists());
}

#[test]
fn test_missing_list_exits_nonzero() {
    let tmp = TempDir::new().unwrap();

    let output = run(cmerge_cmd(tmp.path())
        .arg("--list")
        .arg(tmp.path().join("nope.txt")));

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("List file not found"));
}

#[test]
fn test_defaults_come_from_config_file() {
    let tmp = TempDir::new().unwrap();
    let a = make_source(tmp.path().join("a.db"), "s1", 1, 30.0);
    write_list(tmp.path(), &[a.display().to_string()]);
    std::fs::write(
        tmp.path().join("cmerge.toml"),
        "list_path = \"db_list.txt\"\nout_path = \"merged/out.db\"\n",
    )
    .unwrap();

    let output = run(cmerge_cmd(tmp.path()).arg("-q"));

    assert!(output.status.success(), "cmerge failed: {:?}", output);
    let out = tmp.path().join("merged/out.db");
    assert_eq!(count(&out, "SELECT COUNT(*) FROM matches"), 1);
}

#[test]
fn test_rerun_duplicates_unless_fresh() {
    let tmp = TempDir::new().unwrap();
    let a = make_source(tmp.path().join("a.db"), "s1", 2, 30.0);
    let list = write_list(tmp.path(), &[a.display().to_string()]);
    let out = tmp.path().join("combined.db");

    for _ in 0..2 {
        let output = run(cmerge_cmd(tmp.path())
            .arg("--list")
            .arg(&list)
            .arg("--out")
            .arg(&out));
        assert!(output.status.success());
    }
    assert_eq!(count(&out, "SELECT COUNT(*) FROM matches"), 4);
    assert_eq!(count(&out, "SELECT COUNT(*) FROM sessions"), 1);

    let output = run(cmerge_cmd(tmp.path())
        .arg("--fresh")
        .arg("--list")
        .arg(&list)
        .arg("--out")
        .arg(&out));
    assert!(output.status.success());
    assert_eq!(count(&out, "SELECT COUNT(*) FROM matches"), 2);
}

#[test]
fn test_merge_json_report() {
    let tmp = TempDir::new().unwrap();
    let a = make_source(tmp.path().join("a.db"), "s1", 3, 30.0);
    let missing = tmp.path().join("missing.db");
    let list = write_list(tmp.path(), &[a.display().to_string(), missing.display().to_string()]);
    let out = tmp.path().join("combined.db");

    let output = run(cmerge_cmd(tmp.path())
        .args(["--format", "json", "--list"])
        .arg(&list)
        .arg("--out")
        .arg(&out));

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["sources"][0]["status"], "merged");
    assert_eq!(report["sources"][0]["stats"]["matches"], 3);
    assert_eq!(report["sources"][1]["status"], "skipped");
}

#[test]
fn test_minutes_summary() {
    let tmp = TempDir::new().unwrap();
    let a = make_source(tmp.path().join("a.db"), "s1", 2, 90.0);
    let b = make_source(tmp.path().join("b.db"), "s2", 1, 60.0);
    let list = write_list(tmp.path(), &[a.display().to_string()]);

    let output = run(cmerge_cmd(tmp.path())
        .args(["minutes", "--list"])
        .arg(&list)
        .arg(&b));

    assert!(output.status.success(), "cmerge minutes failed: {:?}", output);
    let text = stdout(&output);
    assert!(text.contains("Total matches: 3"));
    assert!(text.contains("Total seconds: 240.0"));
    assert!(text.contains("Total minutes: 4.0"));
}

#[test]
fn test_minutes_missing_store_exits_nonzero() {
    let tmp = TempDir::new().unwrap();
    let a = make_source(tmp.path().join("a.db"), "s1", 2, 60.0);
    let missing = tmp.path().join("gone.db");

    let output = run(cmerge_cmd(tmp.path())
        .args(["minutes", "--no-list"])
        .arg(&a)
        .arg(&missing));

    assert_eq!(output.status.code(), Some(1));
    let text = stdout(&output);
    assert!(text.contains(&format!("{}: missing", missing.display())));
    assert!(text.contains("Total matches: 2"));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Missing DB"));
}

#[test]
fn test_init_creates_schema() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("db/empty.db");

    let output = run(cmerge_cmd(tmp.path()).args(["init", "--out"]).arg(&out));

    assert!(output.status.success());
    assert_eq!(
        count(&out, "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'"),
        6
    );
}
