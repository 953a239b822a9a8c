//! Solved-game store back ends reachable from the command line.
//!
//! A store path ending in `.json` is loaded into the engine's
//! [`MemoryStore`]; anything else is opened as a SQLite database with the
//! layout created by [`SqliteStore::init_schema`].

use std::collections::BTreeSet;
use std::path::Path;

use gtolens_engine::cards::HoleCards;
use gtolens_engine::errors::StoreError;
use gtolens_engine::memory::MemoryStore;
use gtolens_engine::stakes::StakeNamespace;
use gtolens_engine::store::{CategoryStore, DocumentTree, EquityRow, EquityStore, HandCategory};
use rusqlite::{Connection, OptionalExtension, params};
use serde_json::Value;
use tracing::debug;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS tree (
    namespace TEXT NOT NULL,
    prefix TEXT NOT NULL,
    next TEXT NOT NULL,
    PRIMARY KEY (namespace, prefix, next)
);
CREATE TABLE IF NOT EXISTS equity (
    namespace TEXT NOT NULL,
    table_name TEXT NOT NULL,
    combo TEXT NOT NULL,
    weight REAL NOT NULL,
    ev REAL NOT NULL
);
CREATE INDEX IF NOT EXISTS equity_lookup ON equity (namespace, table_name, combo);
CREATE TABLE IF NOT EXISTS card_ranges (
    cards TEXT NOT NULL PRIMARY KEY,
    pairing TEXT NOT NULL,
    suiting TEXT NOT NULL,
    category TEXT NOT NULL
);
";

fn backend(e: rusqlite::Error) -> StoreError {
    StoreError::Backend(e.to_string())
}

/// Strategy tree, equity tables and hand categories in one SQLite file.
///
/// `tree` holds one row per edge: the `_`-joined path of the parent node
/// (empty for the root) and the key of the child. A hero node lists the
/// hero's moves as its children.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path.as_ref()).map_err(backend)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(backend)?;
        Ok(Self { conn })
    }

    pub fn init_schema(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(SCHEMA).map_err(backend)
    }

    pub fn insert_node(
        &self,
        namespace: StakeNamespace,
        prefix: &[String],
        next: &str,
    ) -> Result<(), StoreError> {
        self.conn
            .execute(
                "INSERT OR IGNORE INTO tree (namespace, prefix, next) VALUES (?1, ?2, ?3)",
                params![namespace.as_str(), prefix.join("_"), next],
            )
            .map_err(backend)?;
        Ok(())
    }

    /// Stores a nested JSON tree in the layout [`MemoryStore`] reads.
    pub fn insert_tree(&self, namespace: StakeNamespace, tree: &Value) -> Result<(), StoreError> {
        let mut prefix = Vec::new();
        self.insert_subtree(namespace, &mut prefix, tree)
    }

    fn insert_subtree(
        &self,
        namespace: StakeNamespace,
        prefix: &mut Vec<String>,
        node: &Value,
    ) -> Result<(), StoreError> {
        match node {
            Value::Object(map) => {
                for (key, child) in map {
                    self.insert_node(namespace, prefix, key)?;
                    prefix.push(key.clone());
                    self.insert_subtree(namespace, prefix, child)?;
                    prefix.pop();
                }
            }
            Value::Array(items) => {
                for key in items.iter().filter_map(Value::as_str) {
                    self.insert_node(namespace, prefix, key)?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    pub fn insert_row(
        &self,
        namespace: StakeNamespace,
        table: &str,
        row: &EquityRow,
    ) -> Result<(), StoreError> {
        self.conn
            .execute(
                "INSERT INTO equity (namespace, table_name, combo, weight, ev)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![namespace.as_str(), table, row.combo, row.weight, row.ev],
            )
            .map_err(backend)?;
        Ok(())
    }

    pub fn insert_category(&self, cards: &str, category: &HandCategory) -> Result<(), StoreError> {
        self.conn
            .execute(
                "INSERT OR REPLACE INTO card_ranges (cards, pairing, suiting, category)
                 VALUES (?1, ?2, ?3, ?4)",
                params![cards, category.pairing, category.suiting, category.category],
            )
            .map_err(backend)?;
        Ok(())
    }
}

impl DocumentTree for SqliteStore {
    fn legal_continuations(
        &self,
        namespace: StakeNamespace,
        prefix: &[String],
    ) -> Result<Option<BTreeSet<String>>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT next FROM tree WHERE namespace = ?1 AND prefix = ?2")
            .map_err(backend)?;
        let rows = stmt
            .query_map(params![namespace.as_str(), prefix.join("_")], |r| {
                r.get::<_, String>(0)
            })
            .map_err(backend)?;
        let mut keys = BTreeSet::new();
        let mut seen = false;
        for key in rows {
            let key = key.map_err(backend)?;
            seen = true;
            if key != "v" {
                keys.insert(key);
            }
        }
        Ok(seen.then_some(keys))
    }
}

impl EquityStore for SqliteStore {
    fn query_combo(
        &self,
        namespace: StakeNamespace,
        table: &str,
        combo: &str,
    ) -> Result<Vec<EquityRow>, StoreError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT combo, weight, ev FROM equity
                 WHERE namespace = ?1 AND table_name = ?2 AND combo = ?3",
            )
            .map_err(backend)?;
        let rows = stmt
            .query_map(params![namespace.as_str(), table, combo], |r| {
                Ok(EquityRow {
                    combo: r.get(0)?,
                    weight: r.get(1)?,
                    ev: r.get(2)?,
                })
            })
            .map_err(backend)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(backend)
    }
}

impl CategoryStore for SqliteStore {
    fn lookup_category(&self, cards: &HoleCards) -> Result<Option<HandCategory>, StoreError> {
        self.conn
            .query_row(
                "SELECT pairing, suiting, category FROM card_ranges WHERE cards = ?1",
                params![cards.canonical().to_string()],
                |r| {
                    Ok(HandCategory {
                        pairing: r.get(0)?,
                        suiting: r.get(1)?,
                        category: r.get(2)?,
                    })
                },
            )
            .optional()
            .map_err(backend)
    }
}

/// Whichever back end the configured store path names.
#[derive(Debug)]
pub enum StoreBackend {
    Memory(MemoryStore),
    Sqlite(SqliteStore),
}

impl StoreBackend {
    pub fn open(path: &str) -> Result<Self, StoreError> {
        let p = Path::new(path);
        if p.extension().is_some_and(|e| e.eq_ignore_ascii_case("json")) {
            debug!(store = path, "loading JSON document store");
            return MemoryStore::load(p).map(StoreBackend::Memory);
        }
        if !p.exists() {
            return Err(StoreError::Backend(format!("store not found: {}", path)));
        }
        debug!(store = path, "opening SQLite store");
        SqliteStore::open(p).map(StoreBackend::Sqlite)
    }
}

impl DocumentTree for StoreBackend {
    fn legal_continuations(
        &self,
        namespace: StakeNamespace,
        prefix: &[String],
    ) -> Result<Option<BTreeSet<String>>, StoreError> {
        match self {
            StoreBackend::Memory(s) => s.legal_continuations(namespace, prefix),
            StoreBackend::Sqlite(s) => s.legal_continuations(namespace, prefix),
        }
    }
}

impl EquityStore for StoreBackend {
    fn query_combo(
        &self,
        namespace: StakeNamespace,
        table: &str,
        combo: &str,
    ) -> Result<Vec<EquityRow>, StoreError> {
        match self {
            StoreBackend::Memory(s) => s.query_combo(namespace, table, combo),
            StoreBackend::Sqlite(s) => s.query_combo(namespace, table, combo),
        }
    }
}

impl CategoryStore for StoreBackend {
    fn lookup_category(&self, cards: &HoleCards) -> Result<Option<HandCategory>, StoreError> {
        match self {
            StoreBackend::Memory(s) => s.lookup_category(cards),
            StoreBackend::Sqlite(s) => s.lookup_category(cards),
        }
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

    fn seeded() -> SqliteStore {
        let store = SqliteStore::open_in_memory().unwrap();
        store.init_schema().unwrap();
        store
            .insert_tree(NS, &json!({ "r": { "c": { "h": ["f", "c", "r", "v"] } } }))
            .unwrap();
        store
    }

    #[test]
    fn continuations_follow_the_tree() {
        let store = seeded();
        let root = store.legal_continuations(NS, &[]).unwrap().unwrap();
        assert_eq!(root, ["r".to_string()].into_iter().collect());
        let hero = store
            .legal_continuations(NS, &keys(&["r", "c", "h"]))
            .unwrap()
            .unwrap();
        assert_eq!(hero.len(), 3);
        assert!(!hero.contains("v"));
    }

    #[test]
    fn unknown_node_and_namespace_are_none() {
        let store = seeded();
        assert!(store
            .legal_continuations(NS, &keys(&["f"]))
            .unwrap()
            .is_none());
        assert!(store
            .legal_continuations(StakeNamespace::Plo50_100bb6p, &[])
            .unwrap()
            .is_none());
    }

    #[test]
    fn equity_rows_are_filtered_by_combo() {
        let store = seeded();
        let row = |combo: &str, w: f64| EquityRow {
            combo: combo.into(),
            weight: w,
            ev: 1.5,
        };
        store.insert_row(NS, "r_c_h_c", &row("AcKh9c9s", 0.6)).unwrap();
        store.insert_row(NS, "r_c_h_c", &row("AdKd9s8c", 0.2)).unwrap();
        let rows = store.query_combo(NS, "r_c_h_c", "AcKh9c9s").unwrap();
        assert_eq!(rows, vec![row("AcKh9c9s", 0.6)]);
        assert!(store.query_combo(NS, "r_c_h_f", "AcKh9c9s").unwrap().is_empty());
    }

    #[test]
    fn category_lookup_uses_canonical_cards() {
        let store = seeded();
        let cat = HandCategory {
            pairing: "Pair".into(),
            suiting: "Single".into(),
            category: "Pair+".into(),
        };
        store.insert_category("AcKh9c9s", &cat).unwrap();
        let hole: HoleCards = "9s9cKhAc".parse().unwrap();
        assert_eq!(store.lookup_category(&hole).unwrap(), Some(cat));
    }

    #[test]
    fn missing_schema_is_a_backend_error() {
        let store = SqliteStore::open_in_memory().unwrap();
        let err = store.legal_continuations(NS, &[]).unwrap_err();
        assert!(matches!(err, StoreError::Backend(_)));
    }

    #[test]
    fn backend_rejects_missing_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.db");
        assert!(StoreBackend::open(path.to_str().unwrap()).is_err());
    }
}
