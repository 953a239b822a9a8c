use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::EvalError;
use crate::moves::MoveCode;
use crate::resolver::TableHandle;
use crate::store::EquityStore;

/// EVs closer than this to the best EV count as optimal.
pub const EV_TOLERANCE: f64 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoveStat {
    pub weight: f64,
    pub ev: f64,
}

pub type Evaluation = BTreeMap<MoveCode, MoveStat>;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    #[serde(rename = "Correct")]
    Correct,
    #[serde(rename = "EV Loss")]
    EvLoss,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Verdict::Correct => "Correct",
            Verdict::EvLoss => "EV Loss",
        })
    }
}

pub struct Evaluator<'a> {
    equity: &'a dyn EquityStore,
}

impl<'a> Evaluator<'a> {
    pub fn new(equity: &'a dyn EquityStore) -> Self {
        Self { equity }
    }

    /// Fetches one row per legal move for the handle's combo and normalizes
    /// the weights. Moves without a row are left out.
    pub fn evaluate(&self, handle: &TableHandle) -> Result<Evaluation, EvalError> {
        let combo = handle.combo.to_string();
        let mut evaluation = Evaluation::new();
        for mv in &handle.moves {
            let rows = self
                .equity
                .query_combo(handle.namespace, &handle.table_name(*mv), &combo)?;
            if let Some(row) = rows.into_iter().find(|r| r.combo == combo) {
                evaluation.insert(
                    *mv,
                    MoveStat {
                        weight: row.weight,
                        ev: row.ev,
                    },
                );
            }
        }
        if evaluation.is_empty() {
            return Err(EvalError::EmptyEquityResult {
                namespace: handle.namespace.to_string(),
                path: handle.path_key(),
                combo,
            });
        }
        normalize(&mut evaluation);
        Ok(evaluation)
    }
}

/// Scales weights to sum to one; all-zero weights become uniform.
pub fn normalize(evaluation: &mut Evaluation) {
    let total: f64 = evaluation.values().map(|s| s.weight).sum();
    let n = evaluation.len() as f64;
    for stat in evaluation.values_mut() {
        stat.weight = if total > 0.0 { stat.weight / total } else { 1.0 / n };
    }
}

pub fn max_ev(evaluation: &Evaluation) -> Option<f64> {
    evaluation.values().map(|s| s.ev).reduce(f64::max)
}

/// Optimal move: among moves within [`EV_TOLERANCE`] of the best EV, the
/// most passive one (check, fold, call, bet, raise, all-in).
pub fn best_move(evaluation: &Evaluation) -> Option<MoveCode> {
    let top = max_ev(evaluation)?;
    evaluation
        .iter()
        .filter(|(_, s)| top - s.ev < EV_TOLERANCE)
        .map(|(m, _)| *m)
        .min_by_key(|m| m.tie_break_rank())
}

/// The hero's move scored against the table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Judgement {
    pub hero_move: MoveCode,
    pub gto_move: MoveCode,
    pub move_ev: Option<f64>,
    pub gto_ev: f64,
    pub ev_loss: Option<f64>,
    pub verdict: Verdict,
}

/// A move with no row has unknown EV and is always an EV loss. A move whose
/// EV ties the best one is correct even when the tie-break picked another.
pub fn judge(evaluation: &Evaluation, hero_move: MoveCode) -> Option<Judgement> {
    let gto_move = best_move(evaluation)?;
    let gto_ev = evaluation.get(&gto_move)?.ev;
    let move_ev = evaluation.get(&hero_move).map(|s| s.ev);
    // a tie can pick a passive move a hair below the hero's
    let ev_loss = move_ev.map(|ev| (gto_ev - ev).max(0.0));
    let verdict = match ev_loss {
        Some(loss) if loss < EV_TOLERANCE => Verdict::Correct,
        _ => Verdict::EvLoss,
    };
    Some(Judgement {
        hero_move,
        gto_move,
        move_ev,
        gto_ev,
        ev_loss,
        verdict,
    })
}
