//! Adda52 text exports.
//!
//! Hands start at a `*****` banner. `key: value` lines before the flop are
//! header fields, other pre-flop lines are actions, `Winner` lines form the
//! summary. Cards are written as `s(A)`, `h(10)`.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::{numbers, HandSegment, HistoryFormat};
use crate::cards::{Card, HoleCards};
use crate::decision::{fallback_position, mentions, unique_actors, ChipLedger, ParsedHand, Position};
use crate::errors::{CardError, SegmentError};
use crate::moves::{ActionToken, Actor, MoveCode, Street};

static CARD: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)[cdhs]\(\w+\)").expect("valid regex"));
static MOVE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(folded|checked|called|raised|all-in)\b").expect("valid regex"));
static WINNER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bwinner\b(?:\s+is)?\s*:?\s+(\S+)").expect("valid regex"));
static WON: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bwon\s+(\d[\d,]*(?:\.\d+)?)").expect("valid regex"));
static RETURNED: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b(uncalled|returned)\b").expect("valid regex"));
static BLINDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d[\d,]*(?:\.\d+)?)\s*/\s*(\d[\d,]*(?:\.\d+)?)").expect("valid regex"));

const BANNER: &str = "*****";

#[derive(Debug, Clone, Copy, Default)]
pub struct Adda52;

fn cards_in(line: &str) -> Result<Vec<Card>, CardError> {
    CARD.find_iter(line).map(|m| Card::parse_adda52(m.as_str())).collect()
}

fn card_set(line: &str) -> HashSet<Card> {
    cards_in(line).map(|v| v.into_iter().collect()).unwrap_or_default()
}

/// Big blind from a `Blinds` line: the second half of the `sb/bb` pair, so
/// antes or other trailing amounts are ignored.
fn big_blind_of(line: &str) -> Option<f64> {
    match BLINDS.captures(line) {
        Some(c) => c[2].replace(',', "").parse().ok(),
        None => numbers(line).first().copied(),
    }
}

fn winner_name(line: &str) -> Option<&str> {
    WINNER.captures(line).and_then(|c| c.get(1)).map(|m| m.as_str())
}

fn named_position(line: &str) -> Option<Position> {
    if line.contains("Button") {
        Some(Position::Bu)
    } else if line.contains("S Blind") {
        Some(Position::Sb)
    } else if line.contains("B Blind") {
        Some(Position::Bb)
    } else {
        None
    }
}

/// Finds the hero from showdowns.
///
/// Pass one records, for every line, the `My Cards` set in force at that
/// point. Pass two returns the first winner whose shown cards overlap the set
/// in force on the winner's line. Files without a showdown yield `None`.
pub fn identify_hero_by_showdown(lines: &[String]) -> Option<String> {
    let mut mine: Option<HashSet<Card>> = None;
    let active: Vec<Option<HashSet<Card>>> = lines
        .iter()
        .map(|line| {
            if line.contains("My Cards") {
                mine = Some(card_set(line));
            }
            mine.clone()
        })
        .collect();

    lines.iter().zip(&active).find_map(|(line, mine)| {
        if !line.contains("Winner") {
            return None;
        }
        let shown = card_set(line);
        let mine = mine.as_ref()?;
        if shown.is_empty() || mine.is_disjoint(&shown) {
            return None;
        }
        winner_name(line).map(str::to_string)
    })
}

impl Adda52 {
    fn flush(segments: &mut Vec<HandSegment>, current: &mut HandSegment) {
        let seg = std::mem::take(current);
        if !seg.header.is_empty() && !seg.actions.is_empty() {
            segments.push(HandSegment {
                index: segments.len(),
                ..seg
            });
        }
    }
}

impl HistoryFormat for Adda52 {
    fn name(&self) -> &'static str {
        "adda52"
    }

    fn segment(&self, lines: &[String]) -> Vec<HandSegment> {
        let mut segments = Vec::new();
        let mut current = HandSegment::default();
        let mut preflop = true;

        for raw in lines {
            let line = raw.trim_end();
            if line.trim().is_empty() {
                continue;
            }
            if line.contains(BANNER) {
                Self::flush(&mut segments, &mut current);
                preflop = true;
                current.header.push(line.to_string());
                continue;
            }
            if line.contains("Winner") {
                current.summary.push(line.to_string());
                continue;
            }
            if !preflop {
                continue;
            }
            if line.contains("Flop Cards") {
                preflop = false;
            } else if line.contains(':') {
                current.header.push(line.to_string());
            } else {
                current.actions.push(line.to_string());
            }
        }
        Self::flush(&mut segments, &mut current);
        segments
    }

    fn identify_hero(&self, lines: &[String]) -> Option<String> {
        identify_hero_by_showdown(lines)
    }

    fn extract(&self, segment: &HandSegment, hero: Option<&str>) -> Result<ParsedHand, SegmentError> {
        let hero = hero.ok_or(SegmentError::MissingHero)?;

        let mut hand_id = None;
        let mut big_blind = None;
        let mut position = None;
        for line in &segment.header {
            if mentions(line, hero) {
                position = named_position(line).or(position);
            } else if line.contains("Blinds") {
                big_blind = big_blind_of(line);
            } else if line.contains("Hand ID") {
                hand_id = line.split_once(':').map(|(_, id)| id.trim().to_string());
            }
        }
        let big_blind = big_blind.filter(|bb| *bb > 0.0).ok_or(SegmentError::MissingBigBlind)?;
        let small_blind = big_blind / 2.0;

        let mut ledger = ChipLedger::new();
        match position {
            Some(Position::Sb) => ledger.put_in(small_blind),
            Some(Position::Bb) => ledger.put_in(big_blind),
            _ => {}
        }

        let mut hole_cards = None;
        let mut tokens = Vec::new();
        for line in &segment.actions {
            if line.contains("My Cards") {
                hole_cards = Some(HoleCards::new(&cards_in(line)?)?);
                continue;
            }
            let Some(m) = MOVE.find(line) else {
                if RETURNED.is_match(line) && mentions(line, hero) {
                    if let Some(amount) = numbers(line).first() {
                        ledger.take_back(*amount);
                    }
                }
                continue;
            };
            let Some(kind) = MoveCode::from_phrase(m.as_str()) else {
                continue;
            };
            let name = line.split_whitespace().next().unwrap_or_default();
            let amount = numbers(&line[m.end()..]).first().copied();
            let actor = if name == hero {
                if let (MoveCode::Raise | MoveCode::Call | MoveCode::AllIn, Some(a)) = (kind, amount) {
                    ledger.commit_to(a);
                }
                Actor::Hero
            } else {
                Actor::Villain(name.to_string())
            };
            tokens.push(ActionToken {
                actor,
                kind,
                amount,
                street: Street::Preflop,
            });
        }
        let hole_cards = hole_cards.ok_or(SegmentError::MissingHoleCards)?;

        for line in &segment.summary {
            if winner_name(line) == Some(hero) {
                let won = WON
                    .captures(line)
                    .and_then(|c| c.get(1))
                    .and_then(|m| m.as_str().replace(',', "").parse::<f64>().ok());
                if let Some(won) = won {
                    ledger.take_back(won);
                }
            }
        }

        let position = position.or_else(|| fallback_position(&tokens));
        let players = unique_actors(&tokens);
        debug!(segment = segment.index, tokens = tokens.len(), players, "parsed adda52 hand");

        Ok(ParsedHand {
            segment: segment.index,
            hand_id: hand_id.unwrap_or_else(|| segment.index.to_string()),
            hero: hero.to_string(),
            hole_cards,
            big_blind,
            small_blind,
            stack_bb: None,
            players,
            position,
            tokens,
            flop: None,
            padding_folds: 0,
            amount_won: ledger.net(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
***** Hand History For Game 4732918 *****
Hand ID: 4732918
Blinds: 100/200
Seat 1: alice (Button)
Seat 2: bob (S Blind)
Seat 3: hero (B Blind)
Seat 4: carol

My Cards are s(A), h(10), d(K), c(5)
carol raised 600
alice folded
bob called 600
hero called 600
----- Flop Cards -----
bob checked
hero checked
Winner is hero won 2400 with s(A) h(10) d(K) c(5)
***** Hand History For Game 4732919 *****
Hand ID: 4732919
Seat 1: alice (B Blind)
My Cards are s(2), h(3), d(4), c(5)
hero folded
";

    fn lines(s: &str) -> Vec<String> {
        s.lines().map(str::to_string).collect()
    }

    #[test]
    fn segments_on_banners_and_flushes_the_last_hand() {
        let segs = Adda52.segment(&lines(SAMPLE));
        assert_eq!(segs.len(), 2);
        assert_eq!(segs[0].index, 0);
        assert_eq!(segs[1].index, 1);
        assert_eq!(segs[0].actions.len(), 5);
        assert_eq!(segs[0].summary.len(), 1);
        assert!(segs[0].header.iter().any(|l| l.starts_with("Blinds")));
    }

    #[test]
    fn segmentation_is_repeatable() {
        let input = lines(SAMPLE);
        assert_eq!(Adda52.segment(&input), Adda52.segment(&input));
    }

    #[test]
    fn hero_comes_from_the_showdown() {
        assert_eq!(identify_hero_by_showdown(&lines(SAMPLE)).as_deref(), Some("hero"));
        let no_showdown = lines("My Cards are s(A), h(10), d(K), c(5)\ncarol raised 600\n");
        assert_eq!(identify_hero_by_showdown(&no_showdown), None);
        let other_winner = lines("My Cards are s(A), h(10), d(K), c(5)\nWinner is carol won 900 with c(2) c(3)\n");
        assert_eq!(identify_hero_by_showdown(&other_winner), None);
    }

    #[test]
    fn extracts_fields_tokens_and_amount() {
        let segs = Adda52.segment(&lines(SAMPLE));
        let hand = Adda52.extract(&segs[0], Some("hero")).unwrap();
        assert_eq!(hand.hand_id, "4732918");
        assert_eq!(hand.big_blind, 200.0);
        assert_eq!(hand.position, Some(Position::Bb));
        assert_eq!(hand.hole_cards.canonical().to_string(), "AsKdTh5c");
        assert_eq!(hand.tokens.len(), 4);
        assert_eq!(hand.tokens[3].actor, Actor::Hero);
        assert_eq!(hand.tokens[0].amount, Some(600.0));
        assert_eq!(hand.players, 4);
        assert_eq!(hand.amount_won, 1800.0);
        assert_eq!(hand.amount_won_bb(), 9.0);
    }

    #[test]
    fn missing_blinds_line_is_malformed() {
        let segs = Adda52.segment(&lines(SAMPLE));
        assert_eq!(Adda52.extract(&segs[1], Some("hero")), Err(SegmentError::MissingBigBlind));
        assert_eq!(Adda52.extract(&segs[0], None), Err(SegmentError::MissingHero));
    }

    #[test]
    fn big_blind_ignores_trailing_amounts() {
        assert_eq!(big_blind_of("Blinds: 100/200"), Some(200.0));
        assert_eq!(big_blind_of("Blinds: 1,000/2,000 Ante 250"), Some(2000.0));
        assert_eq!(big_blind_of("Blinds-Antes(50/100 -25)"), Some(100.0));
        assert_eq!(big_blind_of("Blinds: none"), None);

        let text = SAMPLE.replace("Blinds: 100/200", "Blinds: 100/200 Ante 25");
        let segs = Adda52.segment(&lines(&text));
        let hand = Adda52.extract(&segs[0], Some("hero")).unwrap();
        assert_eq!(hand.big_blind, 200.0);
        assert_eq!(hand.small_blind, 100.0);
    }

    #[test]
    fn position_falls_back_to_action_order() {
        let text = "\
***** Hand *****
Hand ID: 7
Blinds: 50/100
My Cards are s(A), h(10), d(K), c(5)
a folded
b folded
hero raised 300
c folded
d folded
e called 300
";
        let segs = Adda52.segment(&lines(text));
        let hand = Adda52.extract(&segs[0], Some("hero")).unwrap();
        assert_eq!(hand.position, Some(Position::Co));
        assert_eq!(hand.amount_won, -300.0);
    }
}
