//! Vector search over development records.
//!
//! The store is an external collaborator: records are produced and owned by
//! it, and this crate only reads the ranked snapshots it returns per query.
pub mod memory;
pub mod models;
pub mod qdrant;

use async_trait::async_trait;
use thiserror::Error;

pub use models::{FieldKey, Record, ScoredRecord};

/// Errors returned by vector store implementations.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("bad status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("collection not found: {0}")]
    CollectionNotFound(String),

    #[error("vector dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// Similarity search over a named collection.
///
/// Results are ordered by descending score and hold at most `top_k` entries.
#[async_trait]
pub trait VectorStore: Send + Sync {
    async fn search(
        &self,
        collection: &str,
        vector: &[f32],
        top_k: usize,
    ) -> Result<Vec<ScoredRecord>, StoreError>;
}
