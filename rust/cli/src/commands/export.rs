//! Results export command.
//!
//! Converts a JSONL results file into the review table: CSV, a JSON array,
//! or a SQLite `results` table. Each row carries the same fourteen columns.

use crate::error::CliError;
use crate::io_utils::read_text_auto;
use crate::ui;
use gtolens_engine::logger::{EvaluationResult, format_chips};
use serde::Serialize;
use std::io::Write;

pub const COLUMNS: [&str; 14] = [
    "ID",
    "Hand",
    "Pairedness",
    "Suitedness",
    "Hand Category",
    "Position",
    "Result",
    "Opportunity",
    "Big Blind",
    "Player's Move",
    "GTO Move",
    "Amount Won in BB",
    "Move EV",
    "GTO EV",
];

/// One row of the review table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Hand")]
    pub hand: String,
    #[serde(rename = "Pairedness")]
    pub pairedness: String,
    #[serde(rename = "Suitedness")]
    pub suitedness: String,
    #[serde(rename = "Hand Category")]
    pub hand_category: String,
    #[serde(rename = "Position")]
    pub position: String,
    #[serde(rename = "Result")]
    pub result: String,
    #[serde(rename = "Opportunity")]
    pub opportunity: String,
    #[serde(rename = "Big Blind")]
    pub big_blind: String,
    #[serde(rename = "Player's Move")]
    pub players_move: String,
    #[serde(rename = "GTO Move")]
    pub gto_move: String,
    #[serde(rename = "Amount Won in BB")]
    pub amount_won_bb: f64,
    #[serde(rename = "Move EV")]
    pub move_ev: Option<f64>,
    #[serde(rename = "GTO EV")]
    pub gto_ev: f64,
}

impl From<&EvaluationResult> for ExportRow {
    fn from(r: &EvaluationResult) -> Self {
        Self {
            id: r.hand_id.clone(),
            hand: r.hand.clone(),
            pairedness: r.pairedness.clone(),
            suitedness: r.suitedness.clone(),
            hand_category: r.hand_category.clone(),
            position: r.position.map(|p| p.label().to_string()).unwrap_or_default(),
            result: r.result.to_string(),
            opportunity: r.opportunity.label().to_string(),
            big_blind: r.big_blind.clone(),
            players_move: r.players_move.name().to_string(),
            gto_move: r.gto_move.name().to_string(),
            amount_won_bb: r.amount_won_bb,
            move_ev: r.move_ev,
            gto_ev: r.gto_ev,
        }
    }
}

impl ExportRow {
    fn csv_fields(&self) -> [String; 14] {
        [
            self.id.clone(),
            self.hand.clone(),
            self.pairedness.clone(),
            self.suitedness.clone(),
            self.hand_category.clone(),
            self.position.clone(),
            self.result.clone(),
            self.opportunity.clone(),
            self.big_blind.clone(),
            self.players_move.clone(),
            self.gto_move.clone(),
            format_chips(self.amount_won_bb),
            self.move_ev.map(format_chips).unwrap_or_default(),
            format_chips(self.gto_ev),
        ]
    }
}

fn csv_escape(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Handles the export command.
///
/// `format` is one of `csv`, `json` or `sqlite` (case-insensitive).
pub fn handle_export_command(
    input: String,
    output: String,
    format: String,
    _out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let content = read_text_auto(&input).map_err(|e| {
        let _ = ui::write_error(err, &format!("Failed to read {}: {}", input, e));
        CliError::InvalidInput(format!("Failed to read {}: {}", input, e))
    })?;

    match format.as_str() {
        f if f.eq_ignore_ascii_case("csv") => export_csv(&content, &output, err),
        f if f.eq_ignore_ascii_case("sqlite") => export_sqlite(&content, &output, err),
        f if f.eq_ignore_ascii_case("json") => export_json(&content, &output, err),
        _ => {
            ui::write_error(err, &format!("Unsupported format: {}", format))?;
            Err(CliError::InvalidInput(format!(
                "Unsupported format: {}",
                format
            )))
        }
    }
}

/// Parses every non-blank line; the first bad line aborts the export.
fn parse_results(content: &str, err: &mut dyn Write) -> Result<Vec<EvaluationResult>, CliError> {
    let mut out = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str(line) {
            Ok(r) => out.push(r),
            Err(e) => {
                ui::write_error(err, &format!("Invalid record at line {}: {}", idx + 1, e))?;
                return Err(CliError::InvalidInput(format!(
                    "Invalid record at line {}: {}",
                    idx + 1,
                    e
                )));
            }
        }
    }
    Ok(out)
}

fn create_parent(output: &str, err: &mut dyn Write) -> Result<(), CliError> {
    if let Some(parent) = std::path::Path::new(output).parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            let _ = ui::write_error(
                err,
                &format!("Failed to create parent directory for {}: {}", output, e),
            );
            CliError::Io(e)
        })?;
    }
    Ok(())
}

/// Export to CSV format
fn export_csv(content: &str, output: &str, err: &mut dyn Write) -> Result<(), CliError> {
    let results = parse_results(content, err)?;
    create_parent(output, err)?;
    let mut w = std::fs::File::create(output)
        .map(std::io::BufWriter::new)
        .map_err(|e| {
            let _ = ui::write_error(err, &format!("Failed to write {}: {}", output, e));
            CliError::Io(e)
        })?;
    writeln!(w, "{}", COLUMNS.map(csv_escape).join(","))?;
    for r in &results {
        let row = ExportRow::from(r);
        let fields: Vec<String> = row.csv_fields().iter().map(|f| csv_escape(f)).collect();
        writeln!(w, "{}", fields.join(","))?;
    }
    w.flush()?;
    Ok(())
}

/// Export to JSON array format
fn export_json(content: &str, output: &str, err: &mut dyn Write) -> Result<(), CliError> {
    let results = parse_results(content, err)?;
    let rows: Vec<ExportRow> = results.iter().map(ExportRow::from).collect();
    let s = serde_json::to_string_pretty(&rows).map_err(|e| {
        let _ = ui::write_error(err, &format!("Failed to serialize JSON: {}", e));
        CliError::InvalidInput(format!("Failed to serialize JSON: {}", e))
    })?;
    create_parent(output, err)?;
    std::fs::write(output, s).map_err(|e| {
        let _ = ui::write_error(err, &format!("Failed to write {}: {}", output, e));
        CliError::Io(e)
    })?;
    Ok(())
}

/// Export to SQLite format, retrying while the database is locked.
fn export_sqlite(content: &str, output: &str, err: &mut dyn Write) -> Result<(), CliError> {
    enum ExportAttemptError {
        Busy(String),
        Fatal(String),
    }

    fn sqlite_busy(err: &rusqlite::Error) -> bool {
        matches!(
            err,
            rusqlite::Error::SqliteFailure(info, _)
                if matches!(
                    info.code,
                    rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked
                )
        )
    }

    fn classify(what: &str, e: rusqlite::Error) -> ExportAttemptError {
        if sqlite_busy(&e) {
            ExportAttemptError::Busy(format!("{}: {}", what, e))
        } else {
            ExportAttemptError::Fatal(format!("Failed to {}: {}", what, e))
        }
    }

    fn export_sqlite_attempt(
        results: &[EvaluationResult],
        output: &str,
    ) -> Result<(), ExportAttemptError> {
        let mut conn = rusqlite::Connection::open(output)
            .map_err(|e| classify(&format!("open {}", output), e))?;
        let tx = conn
            .transaction()
            .map_err(|e| classify("start transaction", e))?;

        tx.execute("DROP TABLE IF EXISTS results", [])
            .map_err(|e| classify("reset schema", e))?;
        tx.execute(
            "CREATE TABLE results (
                id TEXT NOT NULL,
                hand TEXT NOT NULL,
                pairedness TEXT NOT NULL,
                suitedness TEXT NOT NULL,
                hand_category TEXT NOT NULL,
                position TEXT,
                result TEXT NOT NULL,
                opportunity TEXT NOT NULL,
                big_blind TEXT NOT NULL,
                players_move TEXT NOT NULL,
                gto_move TEXT NOT NULL,
                amount_won_bb REAL NOT NULL,
                move_ev REAL,
                gto_ev REAL NOT NULL,
                raw_json TEXT NOT NULL
            )",
            [],
        )
        .map_err(|e| classify("create schema", e))?;

        let mut stmt = tx
            .prepare(
                "INSERT INTO results (id, hand, pairedness, suitedness, hand_category, position,
                    result, opportunity, big_blind, players_move, gto_move, amount_won_bb,
                    move_ev, gto_ev, raw_json)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
            )
            .map_err(|e| classify("prepare insert", e))?;

        for (idx, r) in results.iter().enumerate() {
            let row = ExportRow::from(r);
            let raw = serde_json::to_string(r)
                .map_err(|e| ExportAttemptError::Fatal(format!("Invalid record: {}", e)))?;
            let position = (!row.position.is_empty()).then_some(row.position.as_str());
            stmt.execute(rusqlite::params![
                row.id,
                row.hand,
                row.pairedness,
                row.suitedness,
                row.hand_category,
                position,
                row.result,
                row.opportunity,
                row.big_blind,
                row.players_move,
                row.gto_move,
                row.amount_won_bb,
                row.move_ev,
                row.gto_ev,
                raw
            ])
            .map_err(|e| classify(&format!("insert record {}", idx + 1), e))?;
        }

        drop(stmt);
        tx.commit().map_err(|e| classify("commit export", e))?;
        Ok(())
    }

    let results = parse_results(content, err)?;
    create_parent(output, err)?;

    let backoff_ms = std::env::var("GTOLENS_SQLITE_BACKOFF_MS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(100);
    let max_attempts: u32 = std::env::var("GTOLENS_SQLITE_MAX_ATTEMPTS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(50);

    if max_attempts == 0 {
        ui::write_error(err, "GTOLENS_SQLITE_MAX_ATTEMPTS must be >= 1 (got 0)")?;
        return Err(CliError::Config(
            "GTOLENS_SQLITE_MAX_ATTEMPTS must be >= 1".to_string(),
        ));
    }

    let mut attempt = 1;
    loop {
        match export_sqlite_attempt(&results, output) {
            Ok(()) => return Ok(()),
            Err(ExportAttemptError::Busy(msg)) if attempt >= max_attempts => {
                ui::write_error(
                    err,
                    &format!("SQLite busy after {} attempt(s): {}", attempt, msg),
                )?;
                return Err(CliError::Config(format!(
                    "SQLite busy after {} attempt(s): {}",
                    attempt, msg
                )));
            }
            Err(ExportAttemptError::Busy(_)) => {
                std::thread::sleep(std::time::Duration::from_millis(
                    backoff_ms * attempt as u64,
                ));
                attempt += 1;
            }
            Err(ExportAttemptError::Fatal(msg)) => {
                ui::write_error(err, &msg)?;
                return Err(CliError::Config(msg));
            }
        }
    }
}
