//! Segment → extract → resolve → evaluate, one hand at a time.
//!
//! Failures are recorded per segment or per decision point and never stop
//! the batch. Only an unreadable source is fatal.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::decision::{extract_decisions, DecisionPoint, ParsedHand};
use crate::errors::{EvalError, PipelineError, ResolveError, StoreError};
use crate::evaluator::{judge, Evaluator};
use crate::formats::HistoryFormat;
use crate::logger::{format_blinds, EvaluationResult};
use crate::resolver::Resolver;
use crate::stakes::StakeNamespace;
use crate::store::{CategoryStore, DocumentTree, EquityStore, TextSource};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineSettings {
    pub rake: u32,
    /// Stack depth assumed when the format does not record one.
    pub default_stack_bb: f64,
    /// Overrides hero detection.
    pub hero: Option<String>,
    pub flop_decisions: bool,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            rake: 500,
            default_stack_bb: 100.0,
            hero: None,
            flop_decisions: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum FailureKind {
    MalformedSegment,
    UnresolvedTable,
    EmptyEquityResult,
    StoreFailure,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FailureKind::MalformedSegment => "MalformedSegment",
            FailureKind::UnresolvedTable => "UnresolvedTable",
            FailureKind::EmptyEquityResult => "EmptyEquityResult",
            FailureKind::StoreFailure => "StoreFailure",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    pub segment: usize,
    pub decision: Option<usize>,
    pub kind: FailureKind,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub segments: usize,
    pub decisions: usize,
    pub results: Vec<EvaluationResult>,
    pub failures: Vec<Failure>,
}

impl EvaluationReport {
    pub fn failures_by_kind(&self) -> BTreeMap<FailureKind, usize> {
        let mut counts = BTreeMap::new();
        for f in &self.failures {
            *counts.entry(f.kind).or_insert(0) += 1;
        }
        counts
    }
}

enum DecisionFailure {
    Resolve(ResolveError),
    Eval(EvalError),
    Store(StoreError),
}

impl DecisionFailure {
    fn kind(&self) -> FailureKind {
        match self {
            DecisionFailure::Resolve(ResolveError::Store(_))
            | DecisionFailure::Eval(EvalError::Store(_))
            | DecisionFailure::Store(_) => FailureKind::StoreFailure,
            DecisionFailure::Resolve(_) => FailureKind::UnresolvedTable,
            DecisionFailure::Eval(_) => FailureKind::EmptyEquityResult,
        }
    }

    fn reason(&self) -> String {
        match self {
            DecisionFailure::Resolve(e) => e.to_string(),
            DecisionFailure::Eval(e) => e.to_string(),
            DecisionFailure::Store(e) => e.to_string(),
        }
    }
}

pub struct Pipeline<'a> {
    tree: &'a dyn DocumentTree,
    equity: &'a dyn EquityStore,
    categories: &'a dyn CategoryStore,
    settings: PipelineSettings,
}

impl<'a> Pipeline<'a> {
    /// Uses one back end for all three store roles.
    pub fn new<S>(store: &'a S, settings: PipelineSettings) -> Self
    where
        S: DocumentTree + EquityStore + CategoryStore,
    {
        Self::with_stores(store, store, store, settings)
    }

    pub fn with_stores(
        tree: &'a dyn DocumentTree,
        equity: &'a dyn EquityStore,
        categories: &'a dyn CategoryStore,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            tree,
            equity,
            categories,
            settings,
        }
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    pub fn evaluate_source(
        &self,
        source: &dyn TextSource,
        path: &Path,
        format: &dyn HistoryFormat,
    ) -> Result<EvaluationReport, PipelineError> {
        let lines = source.read_lines(path)?;
        Ok(self.evaluate_lines(format, &lines))
    }

    pub fn evaluate_lines(&self, format: &dyn HistoryFormat, lines: &[String]) -> EvaluationReport {
        let hero = self.settings.hero.clone().or_else(|| format.identify_hero(lines));
        let segments = format.segment(lines);
        let mut report = EvaluationReport {
            segments: segments.len(),
            ..EvaluationReport::default()
        };

        for segment in &segments {
            let hand = match format.extract(segment, hero.as_deref()) {
                Ok(hand) => hand,
                Err(e) => {
                    warn!(segment = segment.index, error = %e, "skipping malformed segment");
                    report.failures.push(Failure {
                        segment: segment.index,
                        decision: None,
                        kind: FailureKind::MalformedSegment,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };
            let decisions = extract_decisions(&hand, self.settings.flop_decisions);
            debug!(
                segment = segment.index,
                hand_id = %hand.hand_id,
                decisions = decisions.len(),
                "extracted decision points"
            );
            report.decisions += decisions.len();

            for dp in &decisions {
                match self.evaluate_decision(&hand, dp) {
                    Ok(result) => report.results.push(result),
                    Err(failure) => {
                        warn!(
                            segment = segment.index,
                            decision = dp.index,
                            path = %dp.lookup_path(),
                            error = %failure.reason(),
                            "skipping decision point"
                        );
                        report.failures.push(Failure {
                            segment: segment.index,
                            decision: Some(dp.index),
                            kind: failure.kind(),
                            reason: failure.reason(),
                        });
                    }
                }
            }
        }
        report
    }

    fn evaluate_decision(
        &self,
        hand: &ParsedHand,
        dp: &DecisionPoint,
    ) -> Result<EvaluationResult, DecisionFailure> {
        let stack_bb = dp.stack_bb.unwrap_or(self.settings.default_stack_bb);
        let namespace = StakeNamespace::select(self.settings.rake, stack_bb, dp.players);

        let handle = Resolver::new(self.tree)
            .resolve(namespace, &dp.prefix, &dp.hole_cards)
            .map_err(DecisionFailure::Resolve)?;
        let evaluation = Evaluator::new(self.equity)
            .evaluate(&handle)
            .map_err(DecisionFailure::Eval)?;
        let judgement = judge(&evaluation, dp.hero_move).ok_or_else(|| {
            DecisionFailure::Eval(EvalError::EmptyEquityResult {
                namespace: namespace.to_string(),
                path: handle.path_key(),
                combo: handle.combo.to_string(),
            })
        })?;
        let category = self
            .categories
            .lookup_category(&dp.hole_cards)
            .map_err(DecisionFailure::Store)?
            .unwrap_or_default();

        Ok(EvaluationResult {
            hand_id: dp.hand_id.clone(),
            hero: dp.hero.clone(),
            hand: dp.hole_cards.canonical().to_string(),
            pairedness: category.pairing,
            suitedness: category.suiting,
            hand_category: category.category,
            position: dp.position,
            result: judgement.verdict,
            opportunity: dp.opportunity,
            big_blind: format_blinds(dp.small_blind, dp.big_blind),
            big_blind_amount: dp.big_blind,
            stack_size_bb: dp.stack_bb.or(hand.stack_bb),
            players_move: judgement.hero_move,
            gto_move: judgement.gto_move,
            amount_won_bb: dp.amount_won_bb,
            move_ev: judgement.move_ev,
            gto_ev: judgement.gto_ev,
            ev_loss: judgement.ev_loss,
            namespace: namespace.to_string(),
            path: handle.path_key(),
            decision_index: dp.index,
            ts: None,
        })
    }
}
