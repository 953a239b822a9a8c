use std::cmp::{Ordering, Reverse};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::CardError;

/// Represents one of the four suits.
/// The declaration order (c < d < h < s) is the "alphabetical" suit order.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Suit {
    /// Clubs suit (c)
    Clubs,
    /// Diamonds suit (d)
    Diamonds,
    /// Hearts suit (h)
    Hearts,
    /// Spades suit (s)
    Spades,
}

impl Suit {
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn to_char(self) -> char {
        match self {
            Suit::Clubs => 'c',
            Suit::Diamonds => 'd',
            Suit::Hearts => 'h',
            Suit::Spades => 's',
        }
    }

    pub fn from_char(c: char) -> Option<Suit> {
        match c.to_ascii_lowercase() {
            'c' => Some(Suit::Clubs),
            'd' => Some(Suit::Diamonds),
            'h' => Some(Suit::Hearts),
            's' => Some(Suit::Spades),
            _ => None,
        }
    }
}

/// Represents the rank (face value) of a playing card from Two through Ace.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Rank {
    /// Rank 2
    Two = 2,
    /// Rank 3
    Three,
    /// Rank 4
    Four,
    /// Rank 5
    Five,
    /// Rank 6
    Six,
    /// Rank 7
    Seven,
    /// Rank 8
    Eight,
    /// Rank 9
    Nine,
    /// Rank 10 (T)
    Ten,
    /// Jack (11)
    Jack,
    /// Queen (12)
    Queen,
    /// King (13)
    King,
    /// Ace (14)
    Ace,
}

impl Rank {
    pub fn from_u8(v: u8) -> Rank {
        match v {
            2 => Rank::Two,
            3 => Rank::Three,
            4 => Rank::Four,
            5 => Rank::Five,
            6 => Rank::Six,
            7 => Rank::Seven,
            8 => Rank::Eight,
            9 => Rank::Nine,
            10 => Rank::Ten,
            11 => Rank::Jack,
            12 => Rank::Queen,
            13 => Rank::King,
            _ => Rank::Ace,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Rank::Two => '2',
            Rank::Three => '3',
            Rank::Four => '4',
            Rank::Five => '5',
            Rank::Six => '6',
            Rank::Seven => '7',
            Rank::Eight => '8',
            Rank::Nine => '9',
            Rank::Ten => 'T',
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::King => 'K',
            Rank::Ace => 'A',
        }
    }

    pub fn from_char(c: char) -> Option<Rank> {
        match c.to_ascii_uppercase() {
            '2'..='9' => c.to_digit(10).map(|d| Rank::from_u8(d as u8)),
            'T' => Some(Rank::Ten),
            'J' => Some(Rank::Jack),
            'Q' => Some(Rank::Queen),
            'K' => Some(Rank::King),
            'A' => Some(Rank::Ace),
            _ => None,
        }
    }
}

/// Represents a single playing card with a suit and rank.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Card {
    /// The suit of the card (Clubs, Diamonds, Hearts, or Spades)
    pub suit: Suit,
    /// The rank of the card (Two through Ace)
    pub rank: Rank,
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Self {
        Self { suit, rank }
    }

    /// Same rank, new suit.
    pub fn with_suit(self, suit: Suit) -> Self {
        Self { suit, ..self }
    }

    /// Parses the Adda52 notation: suit letter followed by the rank in
    /// parentheses, e.g. `s(A)`, `h(10)`, `d(1)`.
    pub fn parse_adda52(token: &str) -> Result<Card, CardError> {
        let invalid = || CardError::InvalidCard(token.to_string());
        let mut chars = token.trim().chars();
        let suit = chars.next().and_then(Suit::from_char).ok_or_else(invalid)?;
        let rest: String = chars.collect();
        let inner = rest
            .strip_prefix('(')
            .and_then(|r| r.strip_suffix(')'))
            .ok_or_else(invalid)?;
        let rank = match inner {
            "10" => Rank::Ten,
            "1" => Rank::Ace,
            r if r.chars().count() == 1 => r.chars().next().and_then(Rank::from_char).ok_or_else(invalid)?,
            _ => return Err(invalid()),
        };
        Ok(Card::new(rank, suit))
    }

    /// Rank descending, then c < d < h < s.
    pub fn cmp_alphabetical(&self, other: &Card) -> Ordering {
        (Reverse(self.rank), self.suit).cmp(&(Reverse(other.rank), other.suit))
    }

    /// Rank descending, then s > h > d > c.
    pub fn cmp_anti_alphabetical(&self, other: &Card) -> Ordering {
        (Reverse(self.rank), Reverse(self.suit)).cmp(&(Reverse(other.rank), Reverse(other.suit)))
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank.to_char(), self.suit.to_char())
    }
}

impl FromStr for Card {
    type Err = CardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(r), Some(su), None) => {
                let rank = Rank::from_char(r).ok_or_else(|| CardError::InvalidCard(s.into()))?;
                let suit = Suit::from_char(su).ok_or_else(|| CardError::InvalidCard(s.into()))?;
                Ok(Card::new(rank, suit))
            }
            _ => Err(CardError::InvalidCard(s.to_string())),
        }
    }
}

pub fn all_suits() -> [Suit; 4] {
    [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades]
}

/// Parses a run of two-character cards such as `AcKh9s9c` (whitespace and
/// brackets are ignored).
pub fn parse_cards(text: &str) -> Result<Vec<Card>, CardError> {
    let compact: Vec<char> = text
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '[' | ']' | ','))
        .collect();
    if compact.len() % 2 != 0 {
        return Err(CardError::InvalidCard(text.to_string()));
    }
    compact
        .chunks(2)
        .map(|pair| pair.iter().collect::<String>().parse())
        .collect()
}

fn ensure_distinct(cards: &[Card]) -> Result<(), CardError> {
    for (i, c) in cards.iter().enumerate() {
        if cards[..i].contains(c) {
            return Err(CardError::Duplicate(c.to_string()));
        }
    }
    Ok(())
}

fn join_cards(cards: &[Card]) -> String {
    cards.iter().map(Card::to_string).collect()
}

/// The four private cards of a PLO hand.
///
/// Card positions are preserved as given; [`HoleCards::canonical`] yields the
/// alphabetical ordering used as the combo key in strategy tables.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HoleCards([Card; 4]);

impl HoleCards {
    pub fn new(cards: &[Card]) -> Result<Self, CardError> {
        let arr: [Card; 4] = cards.try_into().map_err(|_| CardError::WrongCount {
            expected: 4,
            found: cards.len(),
        })?;
        ensure_distinct(&arr)?;
        Ok(Self(arr))
    }

    pub fn cards(&self) -> &[Card; 4] {
        &self.0
    }

    pub fn canonical(&self) -> Self {
        let mut cards = self.0;
        cards.sort_by(Card::cmp_alphabetical);
        Self(cards)
    }

    /// Relabels every suit through `f`; ranks and positions are untouched.
    pub fn map_suits(&self, f: impl Fn(Suit) -> Suit) -> Self {
        Self(self.0.map(|c| c.with_suit(f(c.suit))))
    }
}

impl fmt::Display for HoleCards {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&join_cards(&self.0))
    }
}

impl FromStr for HoleCards {
    type Err = CardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HoleCards::new(&parse_cards(s)?)
    }
}

impl TryFrom<String> for HoleCards {
    type Error = CardError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<HoleCards> for String {
    fn from(h: HoleCards) -> Self {
        h.to_string()
    }
}

/// Three community cards dealt on the flop.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Flop([Card; 3]);

impl Flop {
    pub fn new(cards: &[Card]) -> Result<Self, CardError> {
        let arr: [Card; 3] = cards.try_into().map_err(|_| CardError::WrongCount {
            expected: 3,
            found: cards.len(),
        })?;
        ensure_distinct(&arr)?;
        Ok(Self(arr))
    }

    pub fn cards(&self) -> &[Card; 3] {
        &self.0
    }

    /// Anti-alphabetical ordering, the form flop branches are stored under.
    pub fn canonical(&self) -> Self {
        let mut cards = self.0;
        cards.sort_by(Card::cmp_anti_alphabetical);
        Self(cards)
    }

    pub fn ranks(&self) -> [Rank; 3] {
        self.0.map(|c| c.rank)
    }

    pub fn suits(&self) -> [Suit; 3] {
        self.0.map(|c| c.suit)
    }

    pub fn map_suits(&self, f: impl Fn(Suit) -> Suit) -> Self {
        Self(self.0.map(|c| c.with_suit(f(c.suit))))
    }
}

impl fmt::Display for Flop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&join_cards(&self.0))
    }
}

impl FromStr for Flop {
    type Err = CardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Flop::new(&parse_cards(s)?)
    }
}

impl TryFrom<String> for Flop {
    type Error = CardError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Flop> for String {
    fn from(f: Flop) -> Self {
        f.to_string()
    }
}
