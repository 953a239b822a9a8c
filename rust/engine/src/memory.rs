use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cards::HoleCards;
use crate::errors::StoreError;
use crate::stakes::StakeNamespace;
use crate::store::{CategoryStore, DocumentTree, EquityRow, EquityStore, HandCategory};

/// A solved-game store held entirely in memory.
///
/// Trees are nested JSON objects keyed by path segment; a hero node (`h`)
/// holds the list of hero moves. The JSON layout is:
///
/// ```json
/// {
///   "trees": { "PLO500_100BB_6P": { "r": { "h": ["f", "c", "r", "v"] } } },
///   "tables": { "PLO500_100BB_6P": { "r_h_c": [{ "combo": "AcKh9c9s", "weight": 0.6, "ev": 1.2 }] } },
///   "categories": { "AcKh9c9s": { "pairing": "Pair", "suiting": "Single", "category": "Pair+" } }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryStore {
    #[serde(default)]
    trees: BTreeMap<StakeNamespace, Value>,
    #[serde(default)]
    tables: BTreeMap<StakeNamespace, BTreeMap<String, Vec<EquityRow>>>,
    #[serde(default)]
    categories: BTreeMap<String, HandCategory>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(s: &str) -> Result<Self, StoreError> {
        serde_json::from_str(s).map_err(|e| StoreError::Document(e.to_string()))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let text = fs::read_to_string(path.as_ref())
            .map_err(|e| StoreError::Backend(format!("{}: {}", path.as_ref().display(), e)))?;
        Self::from_json_str(&text)
    }

    pub fn with_tree(mut self, namespace: StakeNamespace, tree: Value) -> Self {
        self.trees.insert(namespace, tree);
        self
    }

    pub fn with_row(mut self, namespace: StakeNamespace, table: &str, row: EquityRow) -> Self {
        self.tables
            .entry(namespace)
            .or_default()
            .entry(table.to_string())
            .or_default()
            .push(row);
        self
    }

    pub fn with_category(mut self, cards: &str, category: HandCategory) -> Self {
        self.categories.insert(cards.to_string(), category);
        self
    }

    pub fn namespaces(&self) -> impl Iterator<Item = &StakeNamespace> {
        self.trees.keys()
    }
}

impl DocumentTree for MemoryStore {
    fn legal_continuations(
        &self,
        namespace: StakeNamespace,
        prefix: &[String],
    ) -> Result<Option<BTreeSet<String>>, StoreError> {
        let Some(mut node) = self.trees.get(&namespace) else {
            return Ok(None);
        };
        for key in prefix {
            match node.get(key.as_str()) {
                Some(next) => node = next,
                None => return Ok(None),
            }
        }
        let keys = match node {
            Value::Object(map) => map.keys().cloned().collect(),
            Value::Array(items) => items
                .iter()
                .filter_map(Value::as_str)
                .filter(|k| *k != "v")
                .map(str::to_string)
                .collect(),
            _ => return Ok(None),
        };
        Ok(Some(keys))
    }
}

impl EquityStore for MemoryStore {
    fn query_combo(
        &self,
        namespace: StakeNamespace,
        table: &str,
        combo: &str,
    ) -> Result<Vec<EquityRow>, StoreError> {
        Ok(self
            .tables
            .get(&namespace)
            .and_then(|t| t.get(table))
            .map(|rows| rows.iter().filter(|r| r.combo == combo).cloned().collect())
            .unwrap_or_default())
    }
}

impl CategoryStore for MemoryStore {
    fn lookup_category(&self, cards: &HoleCards) -> Result<Option<HandCategory>, StoreError> {
        Ok(self.categories.get(&cards.canonical().to_string()).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const NS: StakeNamespace = StakeNamespace::Plo500_100bb6p;

    fn keys(path: &[&str]) -> Vec<String> {
        path.iter().map(|s| s.to_string()).collect()
    }

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn walks_nested_nodes_and_strips_villain_marker() {
        let store = MemoryStore::new().with_tree(NS, json!({"r": {"c": {"h": ["f", "c", "r", "v"]}, "h": ["f"]}}));
        assert_eq!(store.legal_continuations(NS, &[]).unwrap(), Some(set(&["r"])));
        assert_eq!(store.legal_continuations(NS, &keys(&["r"])).unwrap(), Some(set(&["c", "h"])));
        assert_eq!(
            store.legal_continuations(NS, &keys(&["r", "c", "h"])).unwrap(),
            Some(set(&["c", "f", "r"]))
        );
        assert_eq!(store.legal_continuations(NS, &keys(&["x"])).unwrap(), None);
        assert_eq!(
            store.legal_continuations(StakeNamespace::Plo50_30bb6p, &[]).unwrap(),
            None
        );
    }

    #[test]
    fn equity_rows_filter_by_exact_combo() {
        let store = MemoryStore::new()
            .with_row(NS, "r_h_f", EquityRow { combo: "AcKh9c9s".into(), weight: 0.4, ev: 0.0 })
            .with_row(NS, "r_h_f", EquityRow { combo: "AdKh9c9s".into(), weight: 0.1, ev: 0.0 });
        assert_eq!(store.query_combo(NS, "r_h_f", "AcKh9c9s").unwrap().len(), 1);
        assert!(store.query_combo(NS, "r_h_c", "AcKh9c9s").unwrap().is_empty());
    }

    #[test]
    fn loads_from_json_document() {
        let doc = r#"{
            "trees": {"PLO500_100BB_6P": {"h": ["r", "f"]}},
            "tables": {"PLO500_100BB_6P": {"h_r": [{"combo": "AcKh9c9s", "weight": 1.0, "ev": 2.5}]}},
            "categories": {"AcKh9c9s": {"pairing": "Pair", "suiting": "Single", "category": "Pair+"}}
        }"#;
        let store = MemoryStore::from_json_str(doc).unwrap();
        let hole: HoleCards = "9s9cKhAc".parse().unwrap();
        assert_eq!(store.lookup_category(&hole).unwrap().unwrap().pairing, "Pair");
        assert_eq!(store.query_combo(NS, "h_r", "AcKh9c9s").unwrap()[0].ev, 2.5);
        assert!(MemoryStore::from_json_str("{").is_err());
    }
}
