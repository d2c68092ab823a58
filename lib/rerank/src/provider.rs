//! The embedding-service capability.
//!
//! The reranker talks to the external service only through
//! [`EmbeddingProvider`], so the scoring and gating logic carries zero
//! network coupling and tests can inject a deterministic stand-in.

use thiserror::Error;

pub type EmbedResult<T> = std::result::Result<T, EmbedError>;

/// Failures of a batch-embed call. Distinguishes "service unreachable or
/// erroring" from "malformed response"; both are absorbed per product and
/// never abort a run.
#[derive(Error, Debug)]
pub enum EmbedError {
    /// Transport failure: connect error, timeout, broken body.
    #[error("embedding service unreachable: {0}")]
    Unreachable(String),

    /// The service answered with an error status.
    #[error("embedding service returned status {status}: {message}")]
    Service { status: u16, message: String },

    /// The service answered, but not with usable embeddings.
    #[error("malformed embedding response: {0}")]
    Malformed(String),

    /// The client could not be constructed from the given settings.
    #[error("invalid embedding client configuration: {0}")]
    Config(String),
}

/// Batch text embedding: given N input texts, yields N embedding vectors of
/// identical dimensionality, in input order.
#[allow(async_fn_in_trait)]
pub trait EmbeddingProvider {
    async fn embed_batch(&self, texts: &[String]) -> EmbedResult<Vec<Vec<f32>>>;
}
