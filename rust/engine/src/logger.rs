use serde::{Deserialize, Serialize};

use crate::decision::Position;
use crate::evaluator::Verdict;
use crate::moves::{MoveCode, Opportunity};

/// Scored decision point, one JSON object per line in a results file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// Hand identifier as printed by the poker room
    pub hand_id: String,
    pub hero: String,
    /// Hole cards in canonical order
    pub hand: String,
    pub pairedness: String,
    pub suitedness: String,
    pub hand_category: String,
    pub position: Option<Position>,
    pub result: Verdict,
    pub opportunity: Opportunity,
    /// Blinds as `sb/bb`
    pub big_blind: String,
    pub big_blind_amount: f64,
    #[serde(default)]
    pub stack_size_bb: Option<f64>,
    pub players_move: MoveCode,
    pub gto_move: MoveCode,
    pub amount_won_bb: f64,
    /// Absent when the move has no row in the strategy table
    pub move_ev: Option<f64>,
    pub gto_ev: f64,
    pub ev_loss: Option<f64>,
    pub namespace: String,
    /// Resolved strategy node, `_`-joined
    pub path: String,
    pub decision_index: usize,
    /// RFC3339 time the record was written
    #[serde(default)]
    pub ts: Option<String>,
}

/// Renders a chip amount without a trailing `.0`.
pub fn format_chips(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{}", amount as i64)
    } else {
        format!("{}", amount)
    }
}

pub fn format_blinds(small_blind: f64, big_blind: f64) -> String {
    format!("{}/{}", format_chips(small_blind), format_chips(big_blind))
}

use chrono::{SecondsFormat, Utc};
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::Path;

pub struct ResultLogger {
    writer: Option<BufWriter<File>>,
    written: usize,
}

impl ResultLogger {
    pub fn create<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                create_dir_all(parent)?;
            }
        }
        let f = File::create(path)?;
        Ok(Self {
            writer: Some(BufWriter::new(f)),
            written: 0,
        })
    }

    /// Logger that counts records without writing them.
    pub fn sink() -> Self {
        Self {
            writer: None,
            written: 0,
        }
    }

    pub fn written(&self) -> usize {
        self.written
    }

    pub fn write(&mut self, record: &EvaluationResult) -> std::io::Result<()> {
        // inject timestamp if missing
        let mut rec = record.clone();
        if rec.ts.is_none() {
            rec.ts = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
        }
        let line = serde_json::to_string(&rec).map_err(std::io::Error::other)?;
        if let Some(w) = &mut self.writer {
            w.write_all(line.as_bytes())?;
            w.write_all(b"\n")?;
        }
        self.written += 1;
        Ok(())
    }

    pub fn write_all<'r, I>(&mut self, records: I) -> std::io::Result<()>
    where
        I: IntoIterator<Item = &'r EvaluationResult>,
    {
        for rec in records {
            self.write(rec)?;
        }
        self.flush()
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        if let Some(w) = &mut self.writer {
            w.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blinds_render_without_fractions_when_whole() {
        assert_eq!(format_blinds(100.0, 200.0), "100/200");
        assert_eq!(format_blinds(0.25, 0.5), "0.25/0.5");
    }
}
