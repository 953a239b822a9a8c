//! Collaborator interfaces the pipeline reads from.
//!
//! Every back end is injected as a trait object; the engine never holds a
//! global connection. Implementations must be safe for concurrent reads.

use std::collections::BTreeSet;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cards::HoleCards;
use crate::errors::{SourceError, StoreError};
use crate::stakes::StakeNamespace;

pub trait TextSource {
    fn read_lines(&self, path: &Path) -> Result<Vec<String>, SourceError>;
}

/// Plain file reader. A leading UTF-8 BOM is dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsSource;

impl TextSource for FsSource {
    fn read_lines(&self, path: &Path) -> Result<Vec<String>, SourceError> {
        let text = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => SourceError::NotFound(path.display().to_string()),
            _ => SourceError::Io {
                path: path.display().to_string(),
                message: e.to_string(),
            },
        })?;
        Ok(split_lines(&text))
    }
}

pub fn split_lines(text: &str) -> Vec<String> {
    text.strip_prefix('\u{feff}')
        .unwrap_or(text)
        .lines()
        .map(str::to_string)
        .collect()
}

/// Decision tree of a solved game: which keys follow a node.
pub trait DocumentTree {
    /// Keys under the node reached by `prefix`, or `None` when the node does
    /// not exist. At a hero node the villain marker is not reported.
    fn legal_continuations(
        &self,
        namespace: StakeNamespace,
        prefix: &[String],
    ) -> Result<Option<BTreeSet<String>>, StoreError>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityRow {
    pub combo: String,
    pub weight: f64,
    pub ev: f64,
}

pub trait EquityStore {
    fn query_combo(
        &self,
        namespace: StakeNamespace,
        table: &str,
        combo: &str,
    ) -> Result<Vec<EquityRow>, StoreError>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandCategory {
    pub pairing: String,
    pub suiting: String,
    pub category: String,
}

pub trait CategoryStore {
    /// Looks up by the canonical (alphabetical) text of `cards`.
    fn lookup_category(&self, cards: &HoleCards) -> Result<Option<HandCategory>, StoreError>;
}
