//! PokerStars text exports. Hands are separated by blank lines.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::{numbers, HandSegment, HistoryFormat};
use crate::cards::{parse_cards, Flop, HoleCards};
use crate::decision::{fallback_position, ChipLedger, ParsedHand, Position};
use crate::errors::SegmentError;
use crate::moves::{ActionToken, Actor, MoveCode, Street};

static HAND_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"#(\d+)").expect("valid regex"));
static STAKES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\(\$?(\d[\d,]*(?:\.\d+)?)/\$?(\d[\d,]*(?:\.\d+)?)").expect("valid regex")
});
static BUTTON: Lazy<Regex> = Lazy::new(|| Regex::new(r"Seat #(\d+) is the button").expect("valid regex"));
static SEAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^Seat (\d+): (.+?) \(\$?(\d[\d,]*(?:\.\d+)?) in chips").expect("valid regex")
});
static DEALT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^Dealt to (.+?) \[([^\]]+)\]").expect("valid regex"));
static MOVE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(folds|checks|calls|bets|raises)\b").expect("valid regex"));
static BOARD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\]]+)\]").expect("valid regex"));
static UNCALLED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Uncalled bet \(\$?(\d[\d,]*(?:\.\d+)?)\) returned to (.+)$").expect("valid regex"));
static COLLECTED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.+?) collected \$?(\d[\d,]*(?:\.\d+)?)").expect("valid regex"));

const HOLE_CARDS: &str = "*** HOLE CARDS ***";
const FLOP: &str = "*** FLOP ***";
const TURN: &str = "*** TURN ***";
const RIVER: &str = "*** RIVER ***";
const SUMMARY: &str = "*** SUMMARY ***";
const MAX_SEATS: usize = 6;

#[derive(Debug, Clone, Copy, Default)]
pub struct PokerStars;

struct Seat {
    number: u32,
    name: String,
    stack: f64,
}

fn parse_amount(s: &str) -> Option<f64> {
    s.replace(',', "").parse().ok()
}

fn parse_seat(line: &str) -> Option<Seat> {
    let caps = SEAT.captures(line)?;
    Some(Seat {
        number: caps[1].parse().ok()?,
        name: caps[2].to_string(),
        stack: parse_amount(&caps[3])?,
    })
}

/// Splits `name: rest` lines; lines without a colon have no actor.
fn actor_line(line: &str) -> Option<(&str, &str)> {
    line.split_once(": ").map(|(who, rest)| (who.trim(), rest.trim()))
}

fn move_in(rest: &str) -> Option<(MoveCode, Option<f64>)> {
    if let Some(m) = MOVE.find(rest) {
        let kind = MoveCode::from_phrase(m.as_str())?;
        let amount = numbers(&rest[m.end()..]).first().copied();
        return Some((kind, amount));
    }
    if rest.contains("all-in") {
        return Some((MoveCode::AllIn, numbers(rest).first().copied()));
    }
    None
}

/// Net chips for `hero` over every street before the summary.
fn amount_won(segment: &HandSegment, hero: &str) -> f64 {
    let mut ledger = ChipLedger::new();
    for line in segment.header.iter().chain(&segment.actions) {
        if line.starts_with(FLOP) || line.starts_with(TURN) || line.starts_with(RIVER) {
            ledger.next_street();
            continue;
        }
        if let Some(caps) = UNCALLED.captures(line) {
            if caps[2].trim() == hero {
                ledger.take_back(parse_amount(&caps[1]).unwrap_or_default());
            }
            continue;
        }
        if let Some((who, rest)) = actor_line(line) {
            if who != hero {
                continue;
            }
            if rest.starts_with("posts") {
                if let Some(a) = numbers(rest).first() {
                    ledger.put_in(*a);
                }
            } else if let Some((kind, amount)) = move_in(rest) {
                let amounts = numbers(rest);
                match kind {
                    MoveCode::Raise => {
                        // raises X to Y
                        if let Some(total) = amounts.get(1).or(amounts.first()) {
                            ledger.commit_to(*total);
                        }
                    }
                    MoveCode::Call | MoveCode::Bet | MoveCode::AllIn => {
                        if let Some(a) = amount {
                            ledger.put_in(a);
                        }
                    }
                    _ => {}
                }
            }
            continue;
        }
        if let Some(caps) = COLLECTED.captures(line) {
            if caps[1].trim() == hero {
                ledger.take_back(parse_amount(&caps[2]).unwrap_or_default());
            }
        }
    }
    ledger.net()
}

impl HistoryFormat for PokerStars {
    fn name(&self) -> &'static str {
        "pokerstars"
    }

    fn segment(&self, lines: &[String]) -> Vec<HandSegment> {
        let mut blocks: Vec<Vec<&str>> = Vec::new();
        let mut current: Vec<&str> = Vec::new();
        for raw in lines {
            let line = raw.trim_end();
            if line.trim().is_empty() {
                if !current.is_empty() {
                    blocks.push(std::mem::take(&mut current));
                }
                continue;
            }
            current.push(line);
        }
        if !current.is_empty() {
            blocks.push(current);
        }

        blocks
            .into_iter()
            .enumerate()
            .map(|(index, block)| {
                let mut seg = HandSegment::new(index);
                let mut in_actions = false;
                let mut in_summary = false;
                for (i, line) in block.iter().enumerate() {
                    let line = line.to_string();
                    if i == 0 {
                        seg.header.push(line);
                    } else if in_summary || line.starts_with(SUMMARY) {
                        in_summary = true;
                        seg.summary.push(line);
                    } else if line.starts_with(HOLE_CARDS) || in_actions {
                        in_actions = true;
                        seg.actions.push(line);
                    } else if line.starts_with("Seat ") {
                        seg.seats.push(line);
                    } else {
                        seg.header.push(line);
                    }
                }
                seg
            })
            .collect()
    }

    fn extract(&self, segment: &HandSegment, hero: Option<&str>) -> Result<ParsedHand, SegmentError> {
        let title = segment.header.first().map(String::as_str).unwrap_or_default();
        let stakes = STAKES.captures(title).ok_or(SegmentError::MissingBigBlind)?;
        let big_blind = parse_amount(&stakes[2])
            .filter(|bb| *bb > 0.0)
            .ok_or(SegmentError::MissingBigBlind)?;
        let small_blind = parse_amount(&stakes[1]).unwrap_or(big_blind / 2.0);
        let hand_id = HAND_ID
            .captures(title)
            .map(|c| c[1].to_string())
            .unwrap_or_else(|| segment.index.to_string());

        let dealt = segment.actions.iter().find_map(|l| DEALT.captures(l));
        let (hero, hole_cards) = match dealt {
            Some(caps) => (caps[1].to_string(), HoleCards::new(&parse_cards(&caps[2])?)?),
            None if hero.is_some() => return Err(SegmentError::MissingHoleCards),
            None => return Err(SegmentError::MissingHero),
        };

        let seats: Vec<Seat> = segment.seats.iter().filter_map(|l| parse_seat(l)).take(MAX_SEATS).collect();
        let hero_seat = seats.iter().find(|s| s.name == hero).ok_or(SegmentError::MissingStack)?;
        let stack_bb = hero_seat.stack / big_blind;
        let players = seats.len();

        let button = segment
            .header
            .iter()
            .find_map(|l| BUTTON.captures(l))
            .and_then(|c| c[1].parse::<u32>().ok());
        let mut position = None;
        for line in &segment.header {
            if let Some((who, rest)) = actor_line(line) {
                if who == hero && rest.starts_with("posts small blind") {
                    position = Some(Position::Sb);
                } else if who == hero && rest.starts_with("posts big blind") {
                    position = Some(Position::Bb);
                }
            }
        }
        if position.is_none() && button == Some(hero_seat.number) {
            position = Some(Position::Bu);
        }

        let mut tokens = Vec::new();
        let mut flop = None;
        let mut street = Street::Preflop;
        for line in &segment.actions {
            if line.starts_with(TURN) || line.starts_with(RIVER) {
                break;
            }
            if line.starts_with(FLOP) {
                street = Street::Flop;
                flop = BOARD
                    .captures(line)
                    .and_then(|c| parse_cards(&c[1]).ok())
                    .and_then(|cards| Flop::new(&cards).ok());
                continue;
            }
            let Some((who, rest)) = actor_line(line) else {
                continue;
            };
            let Some((kind, amount)) = move_in(rest) else {
                continue;
            };
            let actor = if who == hero {
                Actor::Hero
            } else {
                Actor::Villain(who.to_string())
            };
            tokens.push(ActionToken {
                actor,
                kind,
                amount,
                street,
            });
        }

        let position = position.or_else(|| fallback_position(&tokens));
        let padding_folds = if players > 2 { MAX_SEATS - players } else { 0 };
        let amount_won = amount_won(segment, &hero);
        debug!(segment = segment.index, tokens = tokens.len(), players, "parsed pokerstars hand");

        Ok(ParsedHand {
            segment: segment.index,
            hand_id,
            hero,
            hole_cards,
            big_blind,
            small_blind,
            stack_bb: Some(stack_bb),
            players,
            position,
            tokens,
            flop,
            padding_folds,
            amount_won,
        })
    }
}
