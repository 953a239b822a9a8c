//! Action prefix to strategy table.
//!
//! Walks the document tree one level per path segment, ending at the hero
//! marker. Flops are reconciled with the stored branches: the canonical flop
//! is tried first, then any stored flop with the same ranks reachable through
//! a suit permutation, which is carried over to the hole cards.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::debug;

use crate::cards::{Flop, HoleCards};
use crate::errors::ResolveError;
use crate::moves::{ActionPath, MoveCode, PathSegment};
use crate::stakes::StakeNamespace;
use crate::store::DocumentTree;
use crate::suits::{find_transform, SuitPermutation};

/// A strategy node resolved against the document tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableHandle {
    pub namespace: StakeNamespace,
    /// Node keys from the root down to the hero marker.
    pub path: Vec<String>,
    /// Hero moves available at the node.
    pub moves: BTreeSet<MoveCode>,
    /// Canonical combo to query, relabelled when the flop was transformed.
    pub combo: HoleCards,
    pub permutation: Option<SuitPermutation>,
    /// Stored flop branch the path went through.
    pub flop: Option<Flop>,
}

impl TableHandle {
    pub fn path_key(&self) -> String {
        self.path.join("_")
    }

    /// Storage name of the table holding rows for `mv` at this node.
    pub fn table_name(&self, mv: MoveCode) -> String {
        format!("{}_{}", self.path_key(), mv.code())
    }
}

pub struct Resolver<'a> {
    tree: &'a dyn DocumentTree,
}

impl<'a> Resolver<'a> {
    pub fn new(tree: &'a dyn DocumentTree) -> Self {
        Self { tree }
    }

    /// Resolves `prefix` followed by the hero marker, one tree query per
    /// level. A flop segment whose canonical key is absent is matched to a
    /// stored branch with the same ranks through a suit transform, which is
    /// then applied to the combo.
    pub fn resolve(
        &self,
        namespace: StakeNamespace,
        prefix: &ActionPath,
        hole_cards: &HoleCards,
    ) -> Result<TableHandle, ResolveError> {
        let mut keys: Vec<String> = Vec::with_capacity(prefix.len() + 1);
        let mut combo = hole_cards.canonical();
        let mut permutation = None;
        let mut branch = None;

        let hero = PathSegment::Move(MoveCode::Hero);
        for segment in prefix.segments().iter().chain(std::iter::once(&hero)) {
            let continuations = self.continuations(namespace, &keys)?;
            let key = match segment {
                PathSegment::Move(m) => {
                    let key = m.key();
                    if !continuations.contains(&key) {
                        keys.push(key);
                        return Err(unresolved(namespace, &keys));
                    }
                    key
                }
                PathSegment::Flop(flop) => {
                    let (stored, perm) = self.match_flop(namespace, &keys, flop, &continuations)?;
                    if let Some(p) = perm {
                        combo = p.apply(&combo).canonical();
                        permutation = Some(p);
                    }
                    branch = Some(stored);
                    stored.to_string()
                }
            };
            keys.push(key);
        }

        let moves: BTreeSet<MoveCode> = self
            .continuations(namespace, &keys)?
            .iter()
            .filter_map(|k| MoveCode::from_key(k))
            .filter(|m| m.is_player_move())
            .collect();
        if moves.is_empty() {
            return Err(unresolved(namespace, &keys));
        }

        debug!(
            namespace = %namespace,
            path = %keys.join("_"),
            combo = %combo,
            transformed = permutation.is_some(),
            "resolved strategy node"
        );
        Ok(TableHandle {
            namespace,
            path: keys,
            moves,
            combo,
            permutation,
            flop: branch,
        })
    }

    fn continuations(
        &self,
        namespace: StakeNamespace,
        keys: &[String],
    ) -> Result<BTreeSet<String>, ResolveError> {
        self.tree
            .legal_continuations(namespace, keys)?
            .ok_or_else(|| unresolved(namespace, keys))
    }

    fn match_flop(
        &self,
        namespace: StakeNamespace,
        keys: &[String],
        flop: &Flop,
        continuations: &BTreeSet<String>,
    ) -> Result<(Flop, Option<SuitPermutation>), ResolveError> {
        let query = flop.canonical();
        if continuations.contains(&query.to_string()) {
            return Ok((query, None));
        }
        let candidate = continuations
            .iter()
            .filter_map(|k| k.parse::<Flop>().ok())
            .filter(|stored| stored.ranks() == query.ranks())
            .find_map(|stored| find_transform(&query, &stored).map(|p| (stored, p)));
        match candidate {
            Some((stored, p)) => {
                debug!(query = %query, stored = %stored, permutation = p.id(), "flop matched by suit transform");
                Ok((stored, Some(p)))
            }
            None => Err(ResolveError::NoIsomorphicFlop {
                namespace: namespace.to_string(),
                path: keys.join("_"),
                flop: query.to_string(),
            }),
        }
    }
}

fn unresolved(namespace: StakeNamespace, keys: &[String]) -> ResolveError {
    ResolveError::UnresolvedTable {
        namespace: namespace.to_string(),
        path: keys.join("_"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use serde_json::json;

    const NS: StakeNamespace = StakeNamespace::Plo500_100bb6p;

    fn path(codes: &[MoveCode]) -> ActionPath {
        codes.iter().copied().collect()
    }

    #[test]
    fn preflop_path_resolves_to_hero_node() {
        let store = MemoryStore::new().with_tree(NS, json!({"r": {"c": {"h": ["f", "c", "r", "v"]}}}));
        let hole: HoleCards = "9sAcKh9c".parse().unwrap();
        let handle = Resolver::new(&store)
            .resolve(NS, &path(&[MoveCode::Raise, MoveCode::Call]), &hole)
            .unwrap();
        assert_eq!(handle.path_key(), "r_c_h");
        assert_eq!(handle.table_name(MoveCode::Fold), "r_c_h_f");
        assert_eq!(handle.combo.to_string(), "AcKh9c9s");
        assert_eq!(handle.moves.len(), 3);
        assert!(handle.permutation.is_none());
    }

    #[test]
    fn missing_level_names_the_prefix() {
        let store = MemoryStore::new().with_tree(NS, json!({"r": {"h": ["f"]}}));
        let hole: HoleCards = "AcKh9c9s".parse().unwrap();
        let err = Resolver::new(&store)
            .resolve(NS, &path(&[MoveCode::Raise, MoveCode::Raise]), &hole)
            .unwrap_err();
        assert_eq!(
            err,
            ResolveError::UnresolvedTable {
                namespace: "PLO500_100BB_6P".into(),
                path: "r_r".into()
            }
        );
    }

    #[test]
    fn literal_flop_branch_is_used_directly() {
        let store = MemoryStore::new().with_tree(NS, json!({"r": {"c": {"4d3s2s": {"h": ["x", "b"]}}}}));
        let mut p = path(&[MoveCode::Raise, MoveCode::Call]);
        p.push_flop("2s3s4d".parse().unwrap());
        let hole: HoleCards = "AsKs9d8c".parse().unwrap();
        let handle = Resolver::new(&store).resolve(NS, &p, &hole).unwrap();
        assert_eq!(handle.path_key(), "r_c_4d3s2s_h");
        assert_eq!(handle.combo.to_string(), "AsKs9d8c");
        assert!(handle.permutation.is_none());
    }

    #[test]
    fn isomorphic_flop_transforms_the_combo() {
        let store = MemoryStore::new().with_tree(
            NS,
            json!({"r": {"c": {"5s3d2d": {"h": ["x"]}, "4s3d2d": {"h": ["x", "b", "v"]}}}}),
        );
        let mut p = path(&[MoveCode::Raise, MoveCode::Call]);
        p.push_flop("2s3s4d".parse().unwrap());
        let hole: HoleCards = "AsKs9d8c".parse().unwrap();
        let handle = Resolver::new(&store).resolve(NS, &p, &hole).unwrap();
        assert_eq!(handle.path_key(), "r_c_4s3d2d_h");
        assert_eq!(handle.combo.to_string(), "AdKd9s8c");
        assert_eq!(handle.flop.map(|f| f.to_string()).as_deref(), Some("4s3d2d"));
        assert!(handle.permutation.is_some());
        assert_eq!(handle.moves, [MoveCode::Bet, MoveCode::Check].into_iter().collect());
    }

    #[test]
    fn flop_without_rank_match_is_unresolved() {
        let store = MemoryStore::new().with_tree(NS, json!({"r": {"c": {"5s3d2d": {"h": ["x"]}}}}));
        let mut p = path(&[MoveCode::Raise, MoveCode::Call]);
        p.push_flop("2s3s4d".parse().unwrap());
        let hole: HoleCards = "AsKs9d8c".parse().unwrap();
        let err = Resolver::new(&store).resolve(NS, &p, &hole).unwrap_err();
        assert!(matches!(err, ResolveError::NoIsomorphicFlop { .. }));
    }
}
