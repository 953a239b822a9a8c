use std::path::Path;

use gtolens_engine::decision::Position;
use gtolens_engine::errors::PipelineError;
use gtolens_engine::evaluator::Verdict;
use gtolens_engine::formats::{FormatKind, HistoryFormat};
use gtolens_engine::memory::MemoryStore;
use gtolens_engine::moves::{MoveCode, Opportunity};
use gtolens_engine::pipeline::{FailureKind, Pipeline, PipelineSettings};
use gtolens_engine::stakes::StakeNamespace;
use gtolens_engine::store::{EquityRow, FsSource, HandCategory};
use serde_json::json;

fn lines(s: &str) -> Vec<String> {
    s.lines().map(str::to_string).collect()
}

fn row(combo: &str, weight: f64, ev: f64) -> EquityRow {
    EquityRow {
        combo: combo.to_string(),
        weight,
        ev,
    }
}

const SIX_MAX: StakeNamespace = StakeNamespace::Plo500_100bb6p;
const HEADS_UP: StakeNamespace = StakeNamespace::Plo500_100bb2p;

const ADDA_FOLD: &str = "\
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
";

fn fold_store() -> MemoryStore {
    MemoryStore::new()
        .with_tree(SIX_MAX, json!({"r": {"c": {"h": ["f", "c", "v"]}}}))
        .with_row(SIX_MAX, "r_c_h_f", row("AsKdTh5c", 0.4, 0.0))
        .with_row(SIX_MAX, "r_c_h_c", row("AsKdTh5c", 0.6, 1.2))
        .with_category(
            "AsKdTh5c",
            HandCategory {
                pairing: "Unpaired".into(),
                suiting: "Rainbow".into(),
                category: "Broadway".into(),
            },
        )
}

fn with_hero(hero: &str) -> PipelineSettings {
    PipelineSettings {
        hero: Some(hero.to_string()),
        ..PipelineSettings::default()
    }
}

#[test]
fn folding_to_a_raise_and_call_is_scored_against_the_table() {
    let store = fold_store();
    let pipeline = Pipeline::new(&store, with_hero("hero"));
    let report = pipeline.evaluate_lines(FormatKind::Adda52.parser(), &lines(ADDA_FOLD));

    assert_eq!(report.segments, 1);
    assert!(report.failures.is_empty(), "{:?}", report.failures);
    assert_eq!(report.results.len(), 1);
    let r = &report.results[0];
    assert_eq!(r.hand_id, "100");
    assert_eq!(r.hand, "AsKdTh5c");
    assert_eq!(r.path, "r_c_h");
    assert_eq!(r.namespace, "PLO500_100BB_6P");
    assert_eq!(r.opportunity, Opportunity::Squeeze);
    assert_eq!(r.players_move, MoveCode::Fold);
    assert_eq!(r.gto_move, MoveCode::Call);
    assert_eq!(r.result, Verdict::EvLoss);
    assert_eq!(r.move_ev, Some(0.0));
    assert_eq!(r.gto_ev, 1.2);
    assert_eq!(r.position, Some(Position::Bb));
    assert_eq!(r.big_blind, "100/200");
    assert_eq!(r.amount_won_bb, -1.0);
    assert_eq!(r.pairedness, "Unpaired");
    assert_eq!(r.hand_category, "Broadway");
}

#[test]
fn facing_a_single_raise_is_a_three_bet_spot() {
    let text = ADDA_FOLD.replace("dave called 600\n", "dave folded\n");
    let store = MemoryStore::new()
        .with_tree(SIX_MAX, json!({"r": {"f": {"h": ["f", "c", "r"]}}}))
        .with_row(SIX_MAX, "r_f_h_f", row("AsKdTh5c", 0.4, 0.0))
        .with_row(SIX_MAX, "r_f_h_c", row("AsKdTh5c", 0.6, 1.2));
    let report = Pipeline::new(&store, with_hero("hero")).evaluate_lines(FormatKind::Adda52.parser(), &lines(&text));
    let r = &report.results[0];
    assert_eq!(r.opportunity, Opportunity::ThreeBet);
    assert_eq!(r.gto_move, MoveCode::Call);
    assert_eq!(r.result, Verdict::EvLoss);
    // no category stored
    assert_eq!(r.pairedness, "");
}

const STARS_FLOP: &str = "\
PokerStars Hand #200: Omaha Pot Limit ($1/$2 USD) - 2024/01/01 10:00:00 ET
Table 'T' 2-max Seat #1 is the button
Seat 1: villain ($200 in chips)
Seat 2: hero ($200 in chips)
villain: posts small blind $1
hero: posts big blind $2
*** HOLE CARDS ***
Dealt to hero [As Ks 9d 8c]
villain: raises $4 to $6
hero: calls $4
*** FLOP *** [2s 3s 4d]
hero: checks
villain: bets $6
hero: folds
Uncalled bet ($6) returned to villain
villain collected $12 from pot
*** SUMMARY ***
Total pot $12 | Rake $0
";

fn flop_store() -> MemoryStore {
    MemoryStore::new()
        .with_tree(
            HEADS_UP,
            json!({
                "r": {
                    "h": ["f", "c", "r"],
                    "c": {
                        "5s3d2d": {"h": ["x"]},
                        "4s3d2d": {
                            "h": ["x", "b", "v"],
                            "x": {"b": {"h": ["f", "c", "r", "v"]}}
                        }
                    }
                }
            }),
        )
        .with_row(HEADS_UP, "r_h_c", row("AsKs9d8c", 1.0, 0.5))
        .with_row(HEADS_UP, "r_h_f", row("AsKs9d8c", 0.0, 0.0))
        .with_row(HEADS_UP, "r_c_4s3d2d_h_x", row("AdKd9s8c", 0.7, 0.3))
        .with_row(HEADS_UP, "r_c_4s3d2d_h_b", row("AdKd9s8c", 0.3, 0.25))
        // untransformed combo must never be read on the flop
        .with_row(HEADS_UP, "r_c_4s3d2d_h_b", row("AsKs9d8c", 1.0, 50.0))
        .with_row(HEADS_UP, "r_c_4s3d2d_x_b_h_f", row("AdKd9s8c", 0.2, 0.0))
        .with_row(HEADS_UP, "r_c_4s3d2d_x_b_h_c", row("AdKd9s8c", 0.8, 0.9))
}

#[test]
fn flop_without_stored_branch_is_read_through_the_suit_transform() {
    let store = flop_store();
    let settings = PipelineSettings {
        flop_decisions: true,
        ..PipelineSettings::default()
    };
    let report = Pipeline::new(&store, settings).evaluate_lines(FormatKind::PokerStars.parser(), &lines(STARS_FLOP));

    assert!(report.failures.is_empty(), "{:?}", report.failures);
    assert_eq!(report.decisions, 3);
    let paths: Vec<&str> = report.results.iter().map(|r| r.path.as_str()).collect();
    assert_eq!(paths, vec!["r_h", "r_c_4s3d2d_h", "r_c_4s3d2d_x_b_h"]);

    let check = &report.results[1];
    assert_eq!(check.gto_move, MoveCode::Check);
    assert_eq!(check.result, Verdict::Correct);
    assert_eq!(check.gto_ev, 0.3);
    // the reported hand stays in the hero's own suits
    assert_eq!(check.hand, "AsKs9d8c");

    let fold = &report.results[2];
    assert_eq!(fold.result, Verdict::EvLoss);
    assert_eq!(fold.gto_move, MoveCode::Call);
    assert_eq!(fold.ev_loss, Some(0.9));
    assert_eq!(fold.namespace, "PLO500_100BB_2P");
    assert_eq!(fold.stack_size_bb, Some(100.0));
    assert_eq!(fold.amount_won_bb, -3.0);
}

#[test]
fn flop_decisions_are_off_by_default() {
    let store = flop_store();
    let report =
        Pipeline::new(&store, PipelineSettings::default()).evaluate_lines(FormatKind::PokerStars.parser(), &lines(STARS_FLOP));
    assert_eq!(report.results.len(), 1);
    assert_eq!(report.results[0].players_move, MoveCode::Call);
    assert_eq!(report.results[0].result, Verdict::Correct);
}

#[test]
fn segment_without_big_blind_is_skipped_and_the_batch_continues() {
    let broken = ADDA_FOLD.replace("Blinds: 100/200\n", "");
    let text = format!("{}{}", broken, ADDA_FOLD);
    let store = fold_store();
    let report = Pipeline::new(&store, with_hero("hero")).evaluate_lines(FormatKind::Adda52.parser(), &lines(&text));

    assert_eq!(report.segments, 2);
    assert_eq!(report.results.len(), 1);
    assert_eq!(report.failures.len(), 1);
    let f = &report.failures[0];
    assert_eq!(f.segment, 0);
    assert_eq!(f.decision, None);
    assert_eq!(f.kind, FailureKind::MalformedSegment);
}

#[test]
fn unresolved_and_empty_lookups_skip_only_their_decision() {
    let store = MemoryStore::new()
        .with_tree(HEADS_UP, json!({"r": {"h": ["f", "c"], "c": {"4s3d2d": {"h": ["x"]}}}}))
        .with_row(HEADS_UP, "r_h_c", row("AsKs9d8c", 1.0, 0.5));
    let settings = PipelineSettings {
        flop_decisions: true,
        ..PipelineSettings::default()
    };
    let report = Pipeline::new(&store, settings).evaluate_lines(FormatKind::PokerStars.parser(), &lines(STARS_FLOP));

    assert_eq!(report.results.len(), 1);
    let kinds = report.failures_by_kind();
    assert_eq!(kinds.get(&FailureKind::EmptyEquityResult), Some(&1));
    assert_eq!(kinds.get(&FailureKind::UnresolvedTable), Some(&1));
    assert!(report.failures.iter().all(|f| f.segment == 0 && f.decision.is_some()));
}

#[test]
fn hero_is_found_from_the_showdown_when_not_configured() {
    let text = ADDA_FOLD.replace("Winner is carol won 1500", "Winner is hero won 1500 with s(A) h(10) d(K) c(5)");
    let store = fold_store();
    let report =
        Pipeline::new(&store, PipelineSettings::default()).evaluate_lines(FormatKind::Adda52.parser(), &lines(&text));
    assert_eq!(report.results.len(), 1);
    assert_eq!(report.results[0].hero, "hero");

    let no_showdown = Pipeline::new(&store, PipelineSettings::default())
        .evaluate_lines(FormatKind::Adda52.parser(), &lines(ADDA_FOLD));
    assert_eq!(no_showdown.failures_by_kind().get(&FailureKind::MalformedSegment), Some(&1));
}

#[test]
fn missing_source_is_fatal() {
    let store = MemoryStore::new();
    let pipeline = Pipeline::new(&store, PipelineSettings::default());
    let err = pipeline
        .evaluate_source(&FsSource, Path::new("target/no_such_history.txt"), FormatKind::Adda52.parser())
        .unwrap_err();
    assert!(matches!(err, PipelineError::SourceNotFound(_)));
}

#[test]
fn segmenting_twice_gives_identical_segments() {
    for (format, text) in [(FormatKind::Adda52, ADDA_FOLD), (FormatKind::PokerStars, STARS_FLOP)] {
        let input = lines(&format!("{}\n{}", text, text));
        let parser = format.parser();
        let a = parser.segment(&input);
        let b = parser.segment(&input);
        assert_eq!(a.len(), 2);
        assert_eq!(a, b);
    }
}

#[test]
fn results_follow_segment_then_decision_order() {
    let text = format!("{}\n{}", STARS_FLOP, STARS_FLOP.replace("#200", "#201"));
    let store = flop_store();
    let settings = PipelineSettings {
        flop_decisions: true,
        ..PipelineSettings::default()
    };
    let report = Pipeline::new(&store, settings).evaluate_lines(FormatKind::PokerStars.parser(), &lines(&text));
    let order: Vec<(String, usize)> = report
        .results
        .iter()
        .map(|r| (r.hand_id.clone(), r.decision_index))
        .collect();
    assert_eq!(
        order,
        vec![
            ("200".to_string(), 0),
            ("200".to_string(), 1),
            ("200".to_string(), 2),
            ("201".to_string(), 0),
            ("201".to_string(), 1),
            ("201".to_string(), 2),
        ]
    );
}
