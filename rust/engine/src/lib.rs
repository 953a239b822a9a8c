//! # gtolens-engine: PLO decision review core
//!
//! Reads pot-limit Omaha hand histories, rebuilds every decision the hero
//! made and scores each one against a precomputed solved-game strategy.
//!
//! ## Core Modules
//!
//! - [`cards`] - Card, HoleCards and Flop values with both canonical orders
//! - [`suits`] - The 24 suit relabellings and flop-to-flop transforms
//! - [`moves`] - Action-path alphabet, tokens and opportunity classification
//! - [`decision`] - Positions, chip ledger and decision-point extraction
//! - [`formats`] - Adda52 and PokerStars segmenters and parsers
//! - [`stakes`] - Solved-game namespaces and the stake selector
//! - [`store`] - Store interfaces the engine reads from
//! - [`memory`] - In-memory store loadable from JSON
//! - [`resolver`] - Maps an action path onto a strategy node
//! - [`evaluator`] - Per-move weights and EVs, best move, verdict
//! - [`pipeline`] - Batch orchestration with per-item failure records
//! - [`logger`] - EvaluationResult and its JSONL writer
//! - [`errors`] - Error types
//!
//! ## Quick Start
//!
//! ```rust
//! use gtolens_engine::formats::FormatKind;
//! use gtolens_engine::memory::MemoryStore;
//! use gtolens_engine::pipeline::{Pipeline, PipelineSettings};
//!
//! let store = MemoryStore::new();
//! let pipeline = Pipeline::new(&store, PipelineSettings::default());
//! let lines: Vec<String> = Vec::new();
//! let report = pipeline.evaluate_lines(FormatKind::PokerStars.parser(), &lines);
//! assert_eq!(report.segments, 0);
//! ```
//!
//! ## Suit Isomorphism
//!
//! ```rust
//! use gtolens_engine::cards::{Flop, HoleCards};
//! use gtolens_engine::suits::find_transform;
//!
//! let query: Flop = "4d3s2s".parse().unwrap();
//! let stored: Flop = "4s3d2d".parse().unwrap();
//! let p = find_transform(&query, &stored).unwrap();
//! let hole: HoleCards = "AsKs9d8c".parse().unwrap();
//! assert_eq!(p.apply(&hole).to_string(), "AdKd9s8c");
//! ```

pub mod cards;
pub mod decision;
pub mod errors;
pub mod evaluator;
pub mod formats;
pub mod logger;
pub mod memory;
pub mod moves;
pub mod pipeline;
pub mod resolver;
pub mod stakes;
pub mod store;
pub mod suits;
