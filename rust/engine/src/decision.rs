use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cards::{Flop, HoleCards};
use crate::moves::{ActionPath, ActionToken, Actor, MoveCode, Opportunity, Street};

/// Table positions from first to act to last.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Position {
    #[serde(rename = "UTG")]
    Utg,
    #[serde(rename = "UTG+1")]
    Utg1,
    #[serde(rename = "UTG+2")]
    Utg2,
    #[serde(rename = "EP")]
    Ep,
    #[serde(rename = "MP")]
    Mp,
    #[serde(rename = "CO")]
    Co,
    #[serde(rename = "BU")]
    Bu,
    #[serde(rename = "SB")]
    Sb,
    #[serde(rename = "BB")]
    Bb,
}

pub const SEATING_ORDER: [Position; 9] = [
    Position::Utg,
    Position::Utg1,
    Position::Utg2,
    Position::Ep,
    Position::Mp,
    Position::Co,
    Position::Bu,
    Position::Sb,
    Position::Bb,
];

impl Position {
    pub fn label(self) -> &'static str {
        match self {
            Position::Utg => "UTG",
            Position::Utg1 => "UTG+1",
            Position::Utg2 => "UTG+2",
            Position::Ep => "EP",
            Position::Mp => "MP",
            Position::Co => "CO",
            Position::Bu => "BU",
            Position::Sb => "SB",
            Position::Bb => "BB",
        }
    }

    /// Position of the `index`-th player to act at a table of `players`.
    pub fn from_action_index(index: usize, players: usize) -> Option<Position> {
        seating(players).get(index).copied()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Positions in acting order for a table of `players` (the last `players`
/// entries of [`SEATING_ORDER`]); six players gives EP MP CO BU SB BB.
pub fn seating(players: usize) -> &'static [Position] {
    let n = players.min(SEATING_ORDER.len());
    &SEATING_ORDER[SEATING_ORDER.len() - n..]
}

/// Running chip commitment of one player across streets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChipLedger {
    street: f64,
    settled: f64,
    returned: f64,
}

impl ChipLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds chips on top of what is already in for this street.
    pub fn put_in(&mut self, amount: f64) {
        self.street += amount;
    }

    /// Sets the street commitment to a total (`raises X to Y`).
    pub fn commit_to(&mut self, total: f64) {
        self.street = total;
    }

    pub fn next_street(&mut self) {
        self.settled += self.street;
        self.street = 0.0;
    }

    /// Uncalled bets, returned chips and pots collected.
    pub fn take_back(&mut self, amount: f64) {
        self.returned += amount;
    }

    pub fn net(&self) -> f64 {
        self.returned - self.settled - self.street
    }
}

/// Structured fields of one hand, produced by a format parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedHand {
    pub segment: usize,
    pub hand_id: String,
    pub hero: String,
    pub hole_cards: HoleCards,
    pub big_blind: f64,
    pub small_blind: f64,
    /// Hero stack in big blinds, when the format records it.
    pub stack_bb: Option<f64>,
    pub players: usize,
    pub position: Option<Position>,
    pub tokens: Vec<ActionToken>,
    pub flop: Option<Flop>,
    /// Empty seats folded in front of the path so short tables use the 6-max tree.
    #[serde(default)]
    pub padding_folds: usize,
    /// Net chips won or lost by the hero over the hand.
    pub amount_won: f64,
}

impl ParsedHand {
    pub fn amount_won_bb(&self) -> f64 {
        if self.big_blind > 0.0 {
            self.amount_won / self.big_blind
        } else {
            0.0
        }
    }
}

/// One hero action together with everything that happened before it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionPoint {
    pub index: usize,
    pub hand_id: String,
    pub hero: String,
    pub hole_cards: HoleCards,
    /// Moves before the hero acted; the hero marker is not included.
    pub prefix: ActionPath,
    pub hero_move: MoveCode,
    pub players: usize,
    pub stack_bb: Option<f64>,
    pub flop: Option<Flop>,
    pub position: Option<Position>,
    pub big_blind: f64,
    pub small_blind: f64,
    pub amount_won_bb: f64,
    pub opportunity: Opportunity,
}

impl DecisionPoint {
    pub fn lookup_path(&self) -> ActionPath {
        self.prefix.with_hero()
    }
}

/// Walks the hand's tokens and emits one decision point per hero action.
///
/// Flop tokens are only followed when `include_flop` is set and the flop
/// cards are known; otherwise extraction stops at the first flop token.
pub fn extract_decisions(hand: &ParsedHand, include_flop: bool) -> Vec<DecisionPoint> {
    let mut prefix: ActionPath = std::iter::repeat(MoveCode::Fold)
        .take(hand.padding_folds)
        .collect();
    let mut decisions = Vec::new();
    let mut on_flop = false;

    for token in &hand.tokens {
        if token.street == Street::Flop && !on_flop {
            match (&hand.flop, include_flop) {
                (Some(flop), true) => {
                    prefix.push_flop(*flop);
                    on_flop = true;
                }
                _ => break,
            }
        }
        if token.actor.is_hero() {
            decisions.push(DecisionPoint {
                index: decisions.len(),
                hand_id: hand.hand_id.clone(),
                hero: hand.hero.clone(),
                hole_cards: hand.hole_cards,
                prefix: prefix.clone(),
                hero_move: token.kind,
                players: hand.players,
                stack_bb: hand.stack_bb,
                flop: if on_flop { hand.flop } else { None },
                position: hand.position,
                big_blind: hand.big_blind,
                small_blind: hand.small_blind,
                amount_won_bb: hand.amount_won_bb(),
                opportunity: Opportunity::classify(&prefix),
            });
        }
        prefix.push_move(token.kind);
    }
    decisions
}

/// Number of distinct actors in a token list.
pub fn unique_actors(tokens: &[ActionToken]) -> usize {
    tokens
        .iter()
        .map(|t| match &t.actor {
            Actor::Hero => None,
            Actor::Villain(name) => Some(name.as_str()),
        })
        .collect::<BTreeSet<_>>()
        .len()
}

/// Position guessed from how many pre-flop actions came before the hero's
/// first one, at a table sized by the number of distinct actors.
pub fn fallback_position(tokens: &[ActionToken]) -> Option<Position> {
    let preflop: Vec<&ActionToken> = tokens.iter().filter(|t| t.street == Street::Preflop).collect();
    let index = preflop.iter().position(|t| t.actor.is_hero())?;
    let players = unique_actors(tokens);
    Position::from_action_index(index, players)
}

/// True when `name` appears in `line` as a whole token.
pub fn mentions(line: &str, name: &str) -> bool {
    !name.is_empty()
        && line
            .split(|c: char| c.is_whitespace() || matches!(c, ':' | '(' | ')' | '[' | ']' | ','))
            .any(|tok| tok == name)
}
