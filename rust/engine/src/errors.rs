use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CardError {
    #[error("Invalid card: {0}")]
    InvalidCard(String),
    #[error("Expected {expected} cards, found {found}")]
    WrongCount { expected: usize, found: usize },
    #[error("Duplicate card: {0}")]
    Duplicate(String),
}

/// Reasons a hand segment cannot produce decision points.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SegmentError {
    #[error("No big blind found")]
    MissingBigBlind,
    #[error("Hero could not be identified")]
    MissingHero,
    #[error("Hero hole cards not found")]
    MissingHoleCards,
    #[error("Hero stack size not found")]
    MissingStack,
    #[error("Bad cards: {0}")]
    Card(#[from] CardError),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Store backend failure: {0}")]
    Backend(String),
    #[error("Malformed store document: {0}")]
    Document(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("No strategy node for {path} in {namespace}")]
    UnresolvedTable { namespace: String, path: String },
    #[error("No flop branch isomorphic to {flop} under {path} in {namespace}")]
    NoIsomorphicFlop {
        namespace: String,
        path: String,
        flop: String,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EvalError {
    #[error("No equity rows for {combo} at {path} in {namespace}")]
    EmptyEquityResult {
        namespace: String,
        path: String,
        combo: String,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("Source not found: {0}")]
    NotFound(String),
    #[error("Failed to read {path}: {message}")]
    Io { path: String, message: String },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown stake namespace: {0}")]
pub struct UnknownNamespace(pub String);

/// Errors that abort a whole file. Everything else is recorded and skipped.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error("Cannot read hand history: {0}")]
    SourceNotFound(#[from] SourceError),
}
