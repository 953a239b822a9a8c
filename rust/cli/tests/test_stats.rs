mod helpers;

use helpers::{evaluate_sample, run_cli, s};
use serde_json::Value;
use std::fs;

#[test]
fn stats_summarizes_results() {
    let dir = tempfile::tempdir().unwrap();
    let input = evaluate_sample(dir.path());
    let res = run_cli(&["stats", "--input", &s(&input)]);
    assert_eq!(res.code, 0, "stderr: {}", res.stderr);

    let v: Value = serde_json::from_str(&res.stdout).unwrap();
    assert_eq!(v["decisions"], 1);
    assert_eq!(v["correct"], 0);
    assert_eq!(v["ev_loss"], 1);
    assert_eq!(v["total_ev_loss"], 1.2);
    assert_eq!(v["amount_won_bb"], -1.0);
    assert_eq!(v["by_opportunity"]["Squeeze / Overcall"]["decisions"], 1);
    assert_eq!(v["by_position"]["BB"]["ev_loss"], 1);
}

#[test]
fn stats_walks_directories_and_reports_corruption() {
    let dir = tempfile::tempdir().unwrap();
    let results = evaluate_sample(dir.path());
    let line = fs::read_to_string(&results).unwrap();
    let nested = dir.path().join("runs").join("b");
    fs::create_dir_all(&nested).unwrap();
    fs::write(nested.join("more.jsonl"), format!("{}not json\n", line)).unwrap();

    let res = run_cli(&["stats", "--input", &s(dir.path())]);
    assert_eq!(res.code, 0, "stderr: {}", res.stderr);
    let v: Value = serde_json::from_str(&res.stdout).unwrap();
    assert_eq!(v["decisions"], 2);
    // the same hand counted once for amount won
    assert_eq!(v["hands"], 1);
    assert!(res.stderr.contains("Skipped 1 corrupted record(s)"));
}

#[test]
fn stats_file_with_only_garbage_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("bad.jsonl");
    fs::write(&input, "nope\n").unwrap();
    let res = run_cli(&["stats", "--input", &s(&input)]);
    assert_eq!(res.code, 2);
    assert!(res.stderr.contains("Invalid record"));
}
