mod helpers;

use helpers::{run_cli, s, write_hands};
use serde_json::Value;

#[test]
fn inspect_lists_decision_points_per_segment() {
    let dir = tempfile::tempdir().unwrap();
    let hands = write_hands(dir.path());
    let res = run_cli(&[
        "inspect",
        "--input",
        &s(&hands),
        "--format",
        "adda52",
        "--hero",
        "hero",
    ]);
    assert_eq!(res.code, 0, "stderr: {}", res.stderr);

    let records: Vec<Value> = res
        .stdout
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(records.len(), 2);

    let first = &records[0];
    assert_eq!(first["hand_id"], "100");
    assert_eq!(first["position"], "BB");
    assert_eq!(first["hole_cards"], "AsKdTh5c");
    let decisions = first["decisions"].as_array().unwrap();
    assert_eq!(decisions.len(), 1);
    assert_eq!(decisions[0]["path"], "r_c_h");
    assert_eq!(decisions[0]["hero_move"], "fold");
    assert_eq!(decisions[0]["opportunity"], "Squeeze / Overcall");

    assert!(records[1]["error"].as_str().unwrap().contains("big blind"));
    assert!(res.stderr.contains("1 malformed segment"));
}

#[test]
fn inspect_reads_zstd_input() {
    let dir = tempfile::tempdir().unwrap();
    let plain = write_hands(dir.path());
    let packed = dir.path().join("hands.txt.zst");
    let bytes = zstd::bulk::compress(&std::fs::read(&plain).unwrap(), 3).unwrap();
    std::fs::write(&packed, bytes).unwrap();

    let a = run_cli(&["inspect", "--input", &s(&plain), "--format", "adda52", "--hero", "hero"]);
    let b = run_cli(&["inspect", "--input", &s(&packed), "--format", "adda52", "--hero", "hero"]);
    assert_eq!(b.code, 0);
    assert_eq!(a.stdout, b.stdout);
}

#[test]
fn inspect_missing_file_exits_2() {
    let res = run_cli(&[
        "inspect",
        "--input",
        "target/does/not/exist.txt",
        "--format",
        "pokerstars",
    ]);
    assert_eq!(res.code, 2);
    assert!(res.stderr.contains("Error"));
}
