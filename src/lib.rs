//! # taxomatch
//!
//! Assigns catalog product rows to leaves of a fixed hierarchical taxonomy
//! using text similarity, and refuses to guess when evidence is weak: every
//! product gets either a mapped category path or an explicit not-mapped
//! verdict with the scores that drove the decision.
//!
//! ## How it matches
//!
//! Two independent TF-IDF vector spaces are built per run from the category
//! corpus alone - one over Russian word stems, one over character n-grams.
//! Each product is projected onto both axes; a hybrid scorer blends the two
//! cosines with legacy-category and Jaccard boosts, and an ordered set of
//! admission rules decides the verdict. Products the gate rejects can
//! optionally be retried through an external embedding service, strictly
//! upgrade-only.
//!
//! ## Quick Start
//!
//! ```rust
//! use taxomatch::prelude::*;
//!
//! let categories = vec![
//!     "Тормозные системы///Пневматические тормоза".to_string(),
//!     "Системы безопасности///Аварийные тормоза".to_string(),
//! ];
//! let products = vec![ProductRecord::new(
//!     "row-1",
//!     "Клапан",
//!     Some("Пневматика".to_string()),
//!     "пневматический тормозной клапан",
//!     None,
//! )];
//!
//! let report = run_lexical(&categories, &products, &MatchConfig::default()).unwrap();
//! assert_eq!(report.outcomes[0].status, MatchStatus::Mapped);
//! ```
//!
//! ## Crate Structure
//!
//! - `taxomatch-text` - tokenizer, stemmer, stopwords, char n-grams
//! - `taxomatch-core` - vector space models, hybrid scorer, acceptance gate
//! - `taxomatch-rerank` - embedding capability and upgrade-only reranker
//!
//! The session/request layer, spreadsheet parsing and any UI are external
//! collaborators; this crate is the matching engine only.

pub mod pipeline;

pub use pipeline::{run, run_lexical, run_with_embedder, TOP_CANDIDATES};

// Re-export the core data model and engine
pub use taxomatch_core::{
    CandidateMatch, CategoryNode, Error, GateDecision, GateRule, HybridScorer, MappingOutcome,
    MatchConfig, MatchStatus, ProductRecord, Result, RunReport, RunStats, VectorSpaceModel,
    PATH_DELIMITER,
};

// Re-export the embedding capability
pub use taxomatch_rerank::{
    EmbedError, EmbeddingProvider, HttpEmbeddingClient, SemanticReranker, RERANK_TOP_K,
};

// Re-export text primitives
pub use taxomatch_text::{char_ngrams, normalize_text, tokenize};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        run, run_lexical, run_with_embedder, CandidateMatch, CategoryNode, EmbeddingProvider,
        Error, HttpEmbeddingClient, HybridScorer, MappingOutcome, MatchConfig, MatchStatus,
        ProductRecord, Result, RunReport, RunStats,
    };
}
