//! Summary statistics over evaluation results.
//!
//! Reads one results file (or every `.jsonl` / `.jsonl.zst` under a
//! directory) and reports how many decisions were correct, how much EV was
//! given up, and the same figures per opportunity.

use crate::error::CliError;
use crate::io_utils::read_text_auto;
use crate::ui;
use gtolens_engine::evaluator::Verdict;
use gtolens_engine::logger::EvaluationResult;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Tally {
    pub decisions: u64,
    pub correct: u64,
    pub ev_loss: u64,
    pub total_ev_loss: f64,
}

impl Tally {
    fn add(&mut self, r: &EvaluationResult) {
        self.decisions += 1;
        match r.result {
            Verdict::Correct => self.correct += 1,
            Verdict::EvLoss => {
                self.ev_loss += 1;
                // a move missing from the table counts its whole GTO EV
                self.total_ev_loss += r.ev_loss.unwrap_or(r.gto_ev).max(0.0);
            }
        }
    }
}

#[derive(Debug, Default)]
struct StatsState {
    overall: Tally,
    by_opportunity: BTreeMap<String, Tally>,
    by_position: BTreeMap<String, Tally>,
    amount_won_bb: f64,
    hands: std::collections::BTreeSet<String>,
    skipped: u64,
    corrupted: u64,
}

impl StatsState {
    fn consume(&mut self, content: &str) {
        let has_trailing_nl = content.ends_with('\n');
        let lines: Vec<&str> = content.lines().filter(|l| !l.trim().is_empty()).collect();
        for (i, line) in lines.iter().enumerate() {
            let rec: EvaluationResult = match serde_json::from_str(line) {
                Ok(v) => v,
                Err(_) => {
                    if i == lines.len() - 1 && !has_trailing_nl {
                        self.skipped += 1;
                    } else {
                        self.corrupted += 1;
                    }
                    continue;
                }
            };
            self.overall.add(&rec);
            self.by_opportunity
                .entry(rec.opportunity.label().to_string())
                .or_default()
                .add(&rec);
            let position = rec.position.map(|p| p.label()).unwrap_or("Unknown");
            self.by_position
                .entry(position.to_string())
                .or_default()
                .add(&rec);
            // amount won is per hand, not per decision
            if self.hands.insert(rec.hand_id.clone()) {
                self.amount_won_bb += rec.amount_won_bb;
            }
        }
    }
}

/// Aggregates statistics from JSONL results files.
///
/// Corrupted lines are counted and reported on `err`; a single input file
/// with no readable record is an error.
pub fn handle_stats_command(
    input: String,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let path = Path::new(&input);
    let mut state = StatsState::default();

    if path.is_dir() {
        let mut stack = vec![path.to_path_buf()];
        while let Some(d) = stack.pop() {
            let rd = match std::fs::read_dir(&d) {
                Ok(v) => v,
                Err(_) => continue,
            };
            for e in rd.filter_map(Result::ok) {
                let p = e.path();
                if p.is_dir() {
                    stack.push(p);
                } else if let Some(fname) = p.file_name().and_then(|f| f.to_str())
                    && (fname.ends_with(".jsonl") || fname.ends_with(".jsonl.zst"))
                {
                    match read_text_auto(&p.to_string_lossy()) {
                        Ok(content) => state.consume(&content),
                        Err(_) => state.corrupted += 1,
                    }
                }
            }
        }
    } else {
        match read_text_auto(&input) {
            Ok(s) => state.consume(&s),
            Err(e) => {
                ui::write_error(err, &format!("Failed to read {}: {}", input, e))?;
                return Err(CliError::InvalidInput(format!(
                    "Failed to read {}: {}",
                    input, e
                )));
            }
        }
    }

    if state.corrupted > 0 {
        ui::write_error(
            err,
            &format!("Skipped {} corrupted record(s)", state.corrupted),
        )?;
    }
    if state.skipped > 0 {
        ui::write_error(
            err,
            &format!("Discarded {} incomplete final line(s)", state.skipped),
        )?;
    }
    if !path.is_dir() && state.overall.decisions == 0 && (state.corrupted > 0 || state.skipped > 0)
    {
        ui::write_error(err, "Invalid record")?;
        return Err(CliError::InvalidInput("Invalid record".to_string()));
    }

    let accuracy = if state.overall.decisions > 0 {
        state.overall.correct as f64 / state.overall.decisions as f64
    } else {
        0.0
    };
    let summary = serde_json::json!({
        "hands": state.hands.len(),
        "decisions": state.overall.decisions,
        "correct": state.overall.correct,
        "ev_loss": state.overall.ev_loss,
        "total_ev_loss": state.overall.total_ev_loss,
        "accuracy": accuracy,
        "amount_won_bb": state.amount_won_bb,
        "by_opportunity": state.by_opportunity,
        "by_position": state.by_position,
    });
    let json_output = serde_json::to_string_pretty(&summary)
        .map_err(|e| CliError::InvalidInput(format!("Failed to serialize stats: {}", e)))?;
    writeln!(out, "{}", json_output)?;
    Ok(())
}
