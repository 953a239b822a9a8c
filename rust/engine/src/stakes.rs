use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::UnknownNamespace;

/// Solved-game namespaces: rake tier, effective stack and table size.
#[allow(non_camel_case_types)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum StakeNamespace {
    #[serde(rename = "PLO50_50BB_2P")]
    Plo50_50bb2p,
    #[serde(rename = "PLO50_100BB_2P")]
    Plo50_100bb2p,
    #[serde(rename = "PLO500_50BB_2P")]
    Plo500_50bb2p,
    #[serde(rename = "PLO500_100BB_2P")]
    Plo500_100bb2p,
    #[serde(rename = "PLO500_200BB_2P")]
    Plo500_200bb2p,
    #[serde(rename = "PLO5000_50BB_2P")]
    Plo5000_50bb2p,
    #[serde(rename = "PLO5000_100BB_2P")]
    Plo5000_100bb2p,
    #[serde(rename = "PLO50_30BB_6P")]
    Plo50_30bb6p,
    #[serde(rename = "PLO50_50BB_6P")]
    Plo50_50bb6p,
    #[serde(rename = "PLO50_100BB_6P")]
    Plo50_100bb6p,
    #[serde(rename = "PLO500_30BB_6P")]
    Plo500_30bb6p,
    #[serde(rename = "PLO500_50BB_6P")]
    Plo500_50bb6p,
    #[serde(rename = "PLO500_100BB_6P")]
    Plo500_100bb6p,
    #[serde(rename = "PLO500_150BB_6P")]
    Plo500_150bb6p,
}

pub const RAKE_TIERS: [u32; 3] = [50, 500, 5000];

impl StakeNamespace {
    pub const ALL: [StakeNamespace; 14] = [
        StakeNamespace::Plo50_50bb2p,
        StakeNamespace::Plo50_100bb2p,
        StakeNamespace::Plo500_50bb2p,
        StakeNamespace::Plo500_100bb2p,
        StakeNamespace::Plo500_200bb2p,
        StakeNamespace::Plo5000_50bb2p,
        StakeNamespace::Plo5000_100bb2p,
        StakeNamespace::Plo50_30bb6p,
        StakeNamespace::Plo50_50bb6p,
        StakeNamespace::Plo50_100bb6p,
        StakeNamespace::Plo500_30bb6p,
        StakeNamespace::Plo500_50bb6p,
        StakeNamespace::Plo500_100bb6p,
        StakeNamespace::Plo500_150bb6p,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StakeNamespace::Plo50_50bb2p => "PLO50_50BB_2P",
            StakeNamespace::Plo50_100bb2p => "PLO50_100BB_2P",
            StakeNamespace::Plo500_50bb2p => "PLO500_50BB_2P",
            StakeNamespace::Plo500_100bb2p => "PLO500_100BB_2P",
            StakeNamespace::Plo500_200bb2p => "PLO500_200BB_2P",
            StakeNamespace::Plo5000_50bb2p => "PLO5000_50BB_2P",
            StakeNamespace::Plo5000_100bb2p => "PLO5000_100BB_2P",
            StakeNamespace::Plo50_30bb6p => "PLO50_30BB_6P",
            StakeNamespace::Plo50_50bb6p => "PLO50_50BB_6P",
            StakeNamespace::Plo50_100bb6p => "PLO50_100BB_6P",
            StakeNamespace::Plo500_30bb6p => "PLO500_30BB_6P",
            StakeNamespace::Plo500_50bb6p => "PLO500_50BB_6P",
            StakeNamespace::Plo500_100bb6p => "PLO500_100BB_6P",
            StakeNamespace::Plo500_150bb6p => "PLO500_150BB_6P",
        }
    }

    /// Picks the namespace for a rake tier, effective stack (in big blinds)
    /// and player count. Anything but heads-up uses the 6-max trees; unknown
    /// rake tiers fall through to the 500 ladders.
    pub fn select(rake: u32, stack_bb: f64, players: usize) -> StakeNamespace {
        use StakeNamespace::*;
        let heads_up = players == 2;
        match rake {
            5000 if heads_up => {
                if stack_bb < 70.0 {
                    Plo5000_50bb2p
                } else {
                    Plo5000_100bb2p
                }
            }
            50 if heads_up => {
                if stack_bb < 70.0 {
                    Plo50_50bb2p
                } else {
                    Plo50_100bb2p
                }
            }
            50 => {
                if stack_bb < 40.0 {
                    Plo50_30bb6p
                } else if stack_bb < 70.0 {
                    Plo50_50bb6p
                } else {
                    Plo50_100bb6p
                }
            }
            _ if heads_up => {
                if stack_bb < 70.0 {
                    Plo500_50bb2p
                } else if stack_bb < 140.0 {
                    Plo500_100bb2p
                } else {
                    Plo500_200bb2p
                }
            }
            _ => {
                if stack_bb < 40.0 {
                    Plo500_30bb6p
                } else if stack_bb < 70.0 {
                    Plo500_50bb6p
                } else if stack_bb < 120.0 {
                    Plo500_100bb6p
                } else {
                    Plo500_150bb6p
                }
            }
        }
    }
}

impl fmt::Display for StakeNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StakeNamespace {
    type Err = UnknownNamespace;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StakeNamespace::ALL
            .into_iter()
            .find(|ns| ns.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownNamespace(s.to_string()))
    }
}
