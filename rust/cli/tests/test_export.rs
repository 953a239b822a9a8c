mod helpers;

use gtolens_cli::EXPORT_COLUMNS;
use helpers::{evaluate_sample, run_cli, s};
use rusqlite::Connection;
use std::fs;

#[test]
fn export_to_csv() {
    let dir = tempfile::tempdir().unwrap();
    let input = evaluate_sample(dir.path());
    let output = dir.path().join("table.csv");
    let res = run_cli(&[
        "export",
        "--input",
        &s(&input),
        "--format",
        "csv",
        "--output",
        &s(&output),
    ]);
    assert_eq!(res.code, 0, "stderr: {}", res.stderr);

    let csv = fs::read_to_string(&output).unwrap();
    let mut lines = csv.lines();
    assert_eq!(lines.next().unwrap(), EXPORT_COLUMNS.join(","));
    assert_eq!(
        lines.next().unwrap(),
        "100,AsKdTh5c,Unpaired,Rainbow,Broadway,BB,EV Loss,Squeeze / Overcall,100/200,fold,call,-1,0,1.2"
    );
    assert_eq!(lines.count(), 0);
}

#[test]
fn export_to_json_array() {
    let dir = tempfile::tempdir().unwrap();
    let input = evaluate_sample(dir.path());
    let output = dir.path().join("nested").join("table.json");
    let res = run_cli(&[
        "export",
        "--input",
        &s(&input),
        "--format",
        "JSON",
        "--output",
        &s(&output),
    ]);
    assert_eq!(res.code, 0, "stderr: {}", res.stderr);

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    let arr = json.as_array().unwrap();
    assert_eq!(arr.len(), 1);
    let row = arr[0].as_object().unwrap();
    assert_eq!(row.len(), EXPORT_COLUMNS.len());
    for col in EXPORT_COLUMNS {
        assert!(row.contains_key(col), "missing column {}", col);
    }
    assert_eq!(row["Player's Move"], "fold");
    assert_eq!(row["GTO EV"], 1.2);
}

#[test]
fn export_to_sqlite() {
    let dir = tempfile::tempdir().unwrap();
    let input = evaluate_sample(dir.path());
    let output = dir.path().join("table.sqlite");
    for _ in 0..2 {
        let res = run_cli(&[
            "export",
            "--input",
            &s(&input),
            "--format",
            "sqlite",
            "--output",
            &s(&output),
        ]);
        assert_eq!(res.code, 0, "stderr: {}", res.stderr);
    }

    // a second export replaces the table
    let conn = Connection::open(&output).unwrap();
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM results", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 1);
    let (result, opportunity, move_ev): (String, String, Option<f64>) = conn
        .query_row(
            "SELECT result, opportunity, move_ev FROM results WHERE id = '100'",
            [],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
        )
        .unwrap();
    assert_eq!(result, "EV Loss");
    assert_eq!(opportunity, "Squeeze / Overcall");
    assert_eq!(move_ev, Some(0.0));
}

#[test]
fn export_rejects_corrupt_records() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("bad.jsonl");
    fs::write(&input, "{\"hand_id\":\"1\"}\n").unwrap();
    let res = run_cli(&[
        "export",
        "--input",
        &s(&input),
        "--format",
        "csv",
        "--output",
        &s(&dir.path().join("o.csv")),
    ]);
    assert_eq!(res.code, 2);
    assert!(res.stderr.contains("Invalid record at line 1"));
}

#[test]
fn export_unknown_format_exits_2() {
    let dir = tempfile::tempdir().unwrap();
    let input = evaluate_sample(dir.path());
    let res = run_cli(&[
        "export",
        "--input",
        &s(&input),
        "--format",
        "xml",
        "--output",
        &s(&dir.path().join("o.xml")),
    ]);
    assert_eq!(res.code, 2);
    assert!(res.stderr.contains("Unsupported format"));
}
