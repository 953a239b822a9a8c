//! Hand-history formats.
//!
//! Each format splits a file into [`HandSegment`]s and turns one segment
//! into a [`ParsedHand`]; decision extraction is shared.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::decision::ParsedHand;
use crate::errors::SegmentError;

pub mod adda52;
pub mod pokerstars;

pub use adda52::Adda52;
pub use pokerstars::PokerStars;

/// Raw lines of one hand, grouped by role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandSegment {
    pub index: usize,
    pub header: Vec<String>,
    pub seats: Vec<String>,
    pub actions: Vec<String>,
    pub summary: Vec<String>,
}

impl HandSegment {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.header.is_empty() && self.seats.is_empty() && self.actions.is_empty() && self.summary.is_empty()
    }
}

pub trait HistoryFormat {
    fn name(&self) -> &'static str;

    fn segment(&self, lines: &[String]) -> Vec<HandSegment>;

    /// File-level hero detection for formats that do not name the hero per hand.
    fn identify_hero(&self, _lines: &[String]) -> Option<String> {
        None
    }

    fn extract(&self, segment: &HandSegment, hero: Option<&str>) -> Result<ParsedHand, SegmentError>;
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatKind {
    Adda52,
    PokerStars,
}

static ADDA52: Adda52 = Adda52;
static POKERSTARS: PokerStars = PokerStars;

impl FormatKind {
    pub fn parser(self) -> &'static dyn HistoryFormat {
        match self {
            FormatKind::Adda52 => &ADDA52,
            FormatKind::PokerStars => &POKERSTARS,
        }
    }
}

impl fmt::Display for FormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.parser().name())
    }
}

impl FromStr for FormatKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "adda52" | "adda" => Ok(FormatKind::Adda52),
            "pokerstars" | "stars" | "ps" => Ok(FormatKind::PokerStars),
            other => Err(format!("Unknown format: {} (expected adda52 or pokerstars)", other)),
        }
    }
}

static NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d[\d,]*(?:\.\d+)?").expect("valid regex"));

/// Numbers in `line`, thousands separators removed.
pub(crate) fn numbers(line: &str) -> Vec<f64> {
    NUMBER
        .find_iter(line)
        .filter_map(|m| m.as_str().replace(',', "").parse().ok())
        .collect()
}
