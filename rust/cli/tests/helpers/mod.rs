#![allow(dead_code)]

use std::path::{Path, PathBuf};

use gtolens_cli::store::SqliteStore;
use gtolens_engine::stakes::StakeNamespace;
use gtolens_engine::store::{EquityRow, HandCategory};
use serde_json::{Value, json};

pub const ADDA_HANDS: &str = "\
***** Hand History For Game 100 *****
Hand ID: 100
Blinds: 100/200
Seat 1: carol
Seat 2: dave
Seat 3: hero (B Blind)
My Cards are s(A), h(10), d(K), c(5)
carol raised 600
dave called 600
hero folded
Winner is carol won 1500
***** Hand History For Game 101 *****
Hand ID: 101
Seat 1: carol
Seat 2: hero
My Cards are s(A), h(10), d(K), c(5)
carol raised 600
hero folded
";

pub struct Captured {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

pub fn run_cli(args: &[&str]) -> Captured {
    let mut out = Vec::new();
    let mut err = Vec::new();
    let mut argv = vec!["gtolens"];
    argv.extend_from_slice(args);
    let code = gtolens_cli::run(argv, &mut out, &mut err);
    Captured {
        code,
        stdout: String::from_utf8(out).expect("utf8 stdout"),
        stderr: String::from_utf8(err).expect("utf8 stderr"),
    }
}

pub fn s(p: &Path) -> String {
    p.to_string_lossy().into_owned()
}

pub fn write_hands(dir: &Path) -> PathBuf {
    let path = dir.join("hands.txt");
    std::fs::write(&path, ADDA_HANDS).expect("write hands");
    path
}

fn tree() -> Value {
    json!({"r": {"c": {"h": ["f", "c", "v"]}}})
}

fn rows() -> Vec<(&'static str, EquityRow)> {
    vec![
        (
            "r_c_h_f",
            EquityRow {
                combo: "AsKdTh5c".into(),
                weight: 0.4,
                ev: 0.0,
            },
        ),
        (
            "r_c_h_c",
            EquityRow {
                combo: "AsKdTh5c".into(),
                weight: 0.6,
                ev: 1.2,
            },
        ),
    ]
}

fn category() -> HandCategory {
    HandCategory {
        pairing: "Unpaired".into(),
        suiting: "Rainbow".into(),
        category: "Broadway".into(),
    }
}

pub fn write_json_store(dir: &Path) -> PathBuf {
    let mut tables = serde_json::Map::new();
    for (table, row) in rows() {
        tables.insert(table.to_string(), json!([row]));
    }
    let doc = json!({
        "trees": { "PLO500_100BB_6P": tree() },
        "tables": { "PLO500_100BB_6P": tables },
        "categories": { "AsKdTh5c": category() },
    });
    let path = dir.join("store.json");
    std::fs::write(&path, serde_json::to_string(&doc).unwrap()).expect("write store");
    path
}

pub fn write_sqlite_store(dir: &Path) -> PathBuf {
    let path = dir.join("store.db");
    let store = SqliteStore::open(&path).expect("open store");
    store.init_schema().expect("schema");
    let ns = StakeNamespace::Plo500_100bb6p;
    store.insert_tree(ns, &tree()).expect("tree");
    for (table, row) in rows() {
        store.insert_row(ns, table, &row).expect("row");
    }
    store.insert_category("AsKdTh5c", &category()).expect("category");
    path
}

/// Runs `evaluate` over the sample hands and returns the results path.
pub fn evaluate_sample(dir: &Path) -> PathBuf {
    let hands = write_hands(dir);
    let store = write_json_store(dir);
    let output = dir.join("out").join("results.jsonl");
    let res = run_cli(&[
        "evaluate",
        "--input",
        &s(&hands),
        "--format",
        "adda52",
        "--store",
        &s(&store),
        "--output",
        &s(&output),
        "--hero",
        "hero",
    ]);
    assert_eq!(res.code, 0, "stderr: {}", res.stderr);
    output
}
