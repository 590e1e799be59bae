//! Retrieval-augmented query pipeline.
//!
//! query → embed → search → classify → project → assemble → complete.
pub mod assembler;
pub mod intent;
pub mod policy;
pub mod projector;
pub mod synthesizer;

use thiserror::Error;

use crate::embedder::EmbedderError;
use crate::llm::LlmError;
use crate::store::StoreError;

pub use assembler::{AssembledPrompt, ConversationTurn, HistoryWindow, TurnRole, assemble};
pub use intent::{AggregateKind, Intent, classify};
pub use policy::Policy;
pub use projector::{ContextBlock, SENTINEL, project};
pub use synthesizer::{Answer, AnswerSynthesizer, RetrievalSettings};

/// The only failure text a caller ever sees.
pub const FAILURE_MESSAGE: &str = "Erro ao buscar resposta. Tente novamente.";

/// A failed request, tagged with the stage that failed.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("malformed request: {0}")]
    MalformedRequest(String),

    #[error("embedding failed: {0}")]
    Embedding(#[from] EmbedderError),

    #[error("vector search failed: {0}")]
    Search(#[from] StoreError),

    #[error("completion failed: {0}")]
    Completion(#[from] LlmError),
}

impl PipelineError {
    #[must_use]
    pub fn stage(&self) -> &'static str {
        match self {
            PipelineError::MalformedRequest(_) => "request",
            PipelineError::Embedding(_) => "embedding",
            PipelineError::Search(_) => "search",
            PipelineError::Completion(_) => "completion",
        }
    }

    /// Message shown to the user. Identical for every cause.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        FAILURE_MESSAGE
    }
}
