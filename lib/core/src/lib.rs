//! # taxomatch Core
//!
//! The matching engine: assigns catalog product rows to leaves of a fixed
//! hierarchical taxonomy using text similarity, and refuses to guess when
//! the evidence is weak.
//!
//! The moving parts, in dependency order:
//!
//! - [`VectorSpaceModel`] - vocabulary + IDF weights fitted on the category
//!   corpus; two independent instances (word-stem axis, char-n-gram axis)
//! - [`HybridScorer`] - combines both axes with overlap and Jaccard signals
//!   into one ranked [`CandidateMatch`] list per product
//! - [`gate`] - ordered admission rules deciding mapped / not-mapped
//!
//! Models are rebuilt fresh per run - a scorer is a pure function of the
//! category corpus handed to [`HybridScorer::build`], and categories alone
//! define the vector-space basis (product text is only projected onto it).

pub mod config;
pub mod error;
pub mod gate;
pub mod scorer;
pub mod types;
pub mod vsm;

pub use config::MatchConfig;
pub use error::{Error, Result};
pub use gate::{evaluate, GateDecision, GateRule, GateSignals, JACCARD_FLOOR};
pub use scorer::{
    HybridScorer, CHAR_AXIS_WEIGHT, JACCARD_BOOST, LEGACY_OVERLAP_BOOST, WORD_AXIS_WEIGHT,
};
pub use types::{
    confidence_percent, CandidateMatch, CategoryNode, MappingOutcome, MatchStatus, ProductRecord,
    RunReport, RunStats, PATH_DELIMITER,
};
pub use vsm::VectorSpaceModel;
