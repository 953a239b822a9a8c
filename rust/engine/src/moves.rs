use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cards::Flop;

/// One letter of the action-path alphabet.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MoveCode {
    Raise,
    Fold,
    Call,
    Bet,
    AllIn,
    Check,
    /// Marks a node where the opponent acts; never a hero choice.
    Villain,
    /// Marks the node where the hero is to act.
    Hero,
}

impl MoveCode {
    pub fn code(self) -> char {
        match self {
            MoveCode::Raise => 'r',
            MoveCode::Fold => 'f',
            MoveCode::Call => 'c',
            MoveCode::Bet => 'b',
            MoveCode::AllIn => 'a',
            MoveCode::Check => 'x',
            MoveCode::Villain => 'v',
            MoveCode::Hero => 'h',
        }
    }

    pub fn key(self) -> String {
        self.code().to_string()
    }

    pub fn from_key(key: &str) -> Option<MoveCode> {
        match key {
            "r" => Some(MoveCode::Raise),
            "f" => Some(MoveCode::Fold),
            "c" => Some(MoveCode::Call),
            "b" => Some(MoveCode::Bet),
            "a" => Some(MoveCode::AllIn),
            "x" => Some(MoveCode::Check),
            "v" => Some(MoveCode::Villain),
            "h" => Some(MoveCode::Hero),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            MoveCode::Raise => "raise",
            MoveCode::Fold => "fold",
            MoveCode::Call => "call",
            MoveCode::Bet => "bet",
            MoveCode::AllIn => "all-in",
            MoveCode::Check => "check",
            MoveCode::Villain => "villain",
            MoveCode::Hero => "hero",
        }
    }

    /// Maps a hand-history verb in any tense (`raises`, `raised`, `all-in`)
    /// onto a player move.
    pub fn from_phrase(word: &str) -> Option<MoveCode> {
        let w = word.trim().to_ascii_lowercase();
        if w == "all-in" || w == "allin" || w == "all_in" {
            return Some(MoveCode::AllIn);
        }
        let stem = w
            .strip_suffix("ed")
            .or_else(|| w.strip_suffix('s'))
            .unwrap_or(&w);
        match stem {
            "fold" => Some(MoveCode::Fold),
            "check" => Some(MoveCode::Check),
            "call" => Some(MoveCode::Call),
            "bet" => Some(MoveCode::Bet),
            "rais" | "raise" => Some(MoveCode::Raise),
            _ => None,
        }
    }

    pub fn is_player_move(self) -> bool {
        !matches!(self, MoveCode::Villain | MoveCode::Hero)
    }

    /// Preference among moves whose EVs tie: the passive move wins.
    pub fn tie_break_rank(self) -> u8 {
        match self {
            MoveCode::Check => 0,
            MoveCode::Fold => 1,
            MoveCode::Call => 2,
            MoveCode::Bet => 3,
            MoveCode::Raise => 4,
            MoveCode::AllIn => 5,
            MoveCode::Villain | MoveCode::Hero => u8::MAX,
        }
    }
}

impl fmt::Display for MoveCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Betting rounds that can produce decision points.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum Street {
    Preflop,
    Flop,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum Actor {
    Hero,
    Villain(String),
}

impl Actor {
    pub fn is_hero(&self) -> bool {
        matches!(self, Actor::Hero)
    }
}

/// A single betting action as read from a hand history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionToken {
    pub actor: Actor,
    pub kind: MoveCode,
    pub amount: Option<f64>,
    pub street: Street,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum PathSegment {
    Move(MoveCode),
    Flop(Flop),
}

impl PathSegment {
    /// Node key in the strategy tree. Flops use their canonical form.
    pub fn key(&self) -> String {
        match self {
            PathSegment::Move(m) => m.key(),
            PathSegment::Flop(f) => f.canonical().to_string(),
        }
    }
}

/// Ordered action path, rendered as `_`-joined node keys (`f_r_c_h`).
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct ActionPath(Vec<PathSegment>);

impl ActionPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_move(&mut self, code: MoveCode) {
        self.0.push(PathSegment::Move(code));
    }

    pub fn push_flop(&mut self, flop: Flop) {
        self.0.push(PathSegment::Flop(flop));
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn flop(&self) -> Option<&Flop> {
        self.0.iter().find_map(|s| match s {
            PathSegment::Flop(f) => Some(f),
            PathSegment::Move(_) => None,
        })
    }

    pub fn keys(&self) -> Vec<String> {
        self.0.iter().map(PathSegment::key).collect()
    }

    /// The same path followed by the hero marker.
    pub fn with_hero(&self) -> ActionPath {
        let mut p = self.clone();
        p.push_move(MoveCode::Hero);
        p
    }
}

impl fmt::Display for ActionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.keys().join("_"))
    }
}

impl FromIterator<MoveCode> for ActionPath {
    fn from_iter<I: IntoIterator<Item = MoveCode>>(iter: I) -> Self {
        Self(iter.into_iter().map(PathSegment::Move).collect())
    }
}

/// Situation the hero faced, judged from the moves before their action.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Opportunity {
    #[serde(rename = "RFI")]
    Rfi,
    #[serde(rename = "3 Bet / Call 2 Bet")]
    ThreeBet,
    #[serde(rename = "Squeeze / Overcall")]
    Squeeze,
    #[serde(rename = "Other")]
    Other,
}

impl Opportunity {
    pub fn label(self) -> &'static str {
        match self {
            Opportunity::Rfi => "RFI",
            Opportunity::ThreeBet => "3 Bet / Call 2 Bet",
            Opportunity::Squeeze => "Squeeze / Overcall",
            Opportunity::Other => "Other",
        }
    }

    /// Counts raises, calls and checks up to the first hero marker.
    pub fn classify(path: &ActionPath) -> Opportunity {
        let (mut raises, mut calls, mut checks) = (0usize, 0usize, 0usize);
        for seg in path.segments() {
            match seg {
                PathSegment::Move(MoveCode::Hero) => break,
                PathSegment::Move(MoveCode::Raise) => raises += 1,
                PathSegment::Move(MoveCode::Call) => calls += 1,
                PathSegment::Move(MoveCode::Check) => checks += 1,
                _ => {}
            }
        }
        match (raises, calls, checks) {
            (0, 0, 0) => Opportunity::Rfi,
            (1, 0, _) => Opportunity::ThreeBet,
            (1, _, _) => Opportunity::Squeeze,
            _ => Opportunity::Other,
        }
    }
}

impl fmt::Display for Opportunity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
