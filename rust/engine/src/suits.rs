//! Suit relabelling over the symmetric group S4.
//!
//! A [`SuitPermutation`] maps clubs, diamonds, hearts and spades (in that
//! order) to their images. The 24 permutations are numbered 0..24 in
//! lexicographic order of the image tuple, so id 0 is the identity. The group
//! tables are generated on first use.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::cards::{all_suits, Flop, HoleCards, Suit};

pub const GROUP_ORDER: usize = 24;
pub const COSET_SIZE: usize = 6;

/// One bijection over the four suits, identified by its position in the group.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct SuitPermutation {
    id: u8,
    images: [Suit; 4],
}

impl SuitPermutation {
    pub fn identity() -> Self {
        GROUP.perms[0]
    }

    pub fn from_id(id: usize) -> Option<Self> {
        GROUP.perms.get(id).copied()
    }

    pub fn all() -> &'static [SuitPermutation] {
        &GROUP.perms
    }

    pub fn id(&self) -> usize {
        self.id as usize
    }

    pub fn is_identity(&self) -> bool {
        self.id == 0
    }

    /// Image of `suit` under this permutation.
    pub fn map(&self, suit: Suit) -> Suit {
        self.images[suit.index()]
    }

    pub fn inverse(&self) -> Self {
        GROUP.perms[GROUP.inverse[self.id()]]
    }

    /// `self ∘ other`: apply `other` first, then `self`.
    pub fn compose(&self, other: &SuitPermutation) -> Self {
        let images = all_suits().map(|s| self.map(other.map(s)));
        GROUP.lookup(images)
    }

    /// Relabels the suits of `hole` forward; ranks and card order are kept.
    pub fn apply(&self, hole: &HoleCards) -> HoleCards {
        hole.map_suits(|s| self.map(s))
    }

    pub fn apply_flop(&self, flop: &Flop) -> Flop {
        flop.map_suits(|s| self.map(s))
    }
}

struct SuitGroup {
    perms: Vec<SuitPermutation>,
    inverse: Vec<usize>,
    // cosets[src][dst] = ids of every permutation sending src to dst
    cosets: [[BTreeSet<usize>; 4]; 4],
}

static GROUP: Lazy<SuitGroup> = Lazy::new(SuitGroup::generate);

impl SuitGroup {
    fn generate() -> Self {
        let suits = all_suits();
        let mut perms = Vec::with_capacity(GROUP_ORDER);
        // nested ascending loops enumerate image tuples lexicographically
        for a in suits {
            for b in suits {
                for c in suits {
                    for d in suits {
                        let images = [a, b, c, d];
                        let distinct: BTreeSet<Suit> = images.iter().copied().collect();
                        if distinct.len() == 4 {
                            perms.push(SuitPermutation {
                                id: perms.len() as u8,
                                images,
                            });
                        }
                    }
                }
            }
        }

        let inverse = perms
            .iter()
            .map(|p| {
                let mut images = suits;
                for s in suits {
                    images[p.map(s).index()] = s;
                }
                Self::position(&perms, images)
            })
            .collect();

        let mut cosets: [[BTreeSet<usize>; 4]; 4] = Default::default();
        for p in &perms {
            for s in suits {
                cosets[s.index()][p.map(s).index()].insert(p.id());
            }
        }

        Self {
            perms,
            inverse,
            cosets,
        }
    }

    fn position(perms: &[SuitPermutation], images: [Suit; 4]) -> usize {
        perms.iter().position(|p| p.images == images).unwrap_or(0)
    }

    fn lookup(&self, images: [Suit; 4]) -> SuitPermutation {
        self.perms[Self::position(&self.perms, images)]
    }
}

/// Ids of the six permutations that send `src` to `dst`.
pub fn coset(src: Suit, dst: Suit) -> &'static BTreeSet<usize> {
    &GROUP.cosets[src.index()][dst.index()]
}

/// Finds a relabelling that turns `src` into `dst` card by card.
///
/// Flops are only related when their rank sequences are identical position
/// by position; no rank reordering is attempted. When several permutations
/// agree on the observed suits the lowest id is returned.
pub fn find_transform(src: &Flop, dst: &Flop) -> Option<SuitPermutation> {
    if src.ranks() != dst.ranks() {
        return None;
    }
    let mut survivors: BTreeSet<usize> = (0..GROUP_ORDER).collect();
    for (s, d) in src.suits().into_iter().zip(dst.suits()) {
        survivors = survivors.intersection(coset(s, d)).copied().collect();
        if survivors.is_empty() {
            return None;
        }
    }
    survivors.first().and_then(|id| SuitPermutation::from_id(*id))
}

pub fn apply(perm: &SuitPermutation, hole: &HoleCards) -> HoleCards {
    perm.apply(hole)
}
