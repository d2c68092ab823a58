//! # taxomatch Rerank
//!
//! Optional semantic rescue pass for products the lexical gate rejected.
//!
//! The external embedding dependency is modeled as an injected capability
//! ([`EmbeddingProvider`], one operation: batch-embed texts to vectors), so
//! the rerank logic has zero direct network coupling. A production
//! implementation over OpenAI-compatible endpoints is provided by
//! [`HttpEmbeddingClient`].
//!
//! The pass is strictly upgrade-only: it may turn a not-mapped verdict into
//! mapped under stricter thresholds, and never revisits a lexical accept.
//! Any service failure is absorbed into the product's reason trail; a run
//! never aborts because the embedding service misbehaved.

pub mod http;
pub mod provider;
pub mod rerank;

pub use http::{HttpEmbeddingClient, DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT};
pub use provider::{EmbedError, EmbedResult, EmbeddingProvider};
pub use rerank::{SemanticReranker, RERANK_MIN_GAP, RERANK_SCORE_FLOOR, RERANK_TOP_K};
