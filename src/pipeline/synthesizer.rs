/// Answer synthesis: runs the retrieval chain and the final completion.
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use super::assembler::{AssembledPrompt, ConversationTurn, assemble};
use super::intent::{AggregateKind, Intent, classify};
use super::policy::Policy;
use super::projector::{ContextBlock, project};
use super::PipelineError;
use crate::embedder::{Embedder, EmbedderError};
use crate::llm::{ChatModel, GenerationParams};
use crate::store::VectorStore;

const DEVELOPMENTS_TOTAL: &str = "Atualmente, 52 empreendimentos fazem parte da campanha.";
const BUILDERS_TOTAL: &str = "36 construtoras participam da campanha Mês das Construtoras.";

/// Where and how much to retrieve per query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievalSettings {
    pub collection: String,
    pub top_k: usize,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            collection: "empreendimentos".to_string(),
            top_k: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    pub text: String,
    pub intent: Intent,
}

/// The fixed answer for an aggregate question.
#[must_use]
pub fn canned_total(kind: AggregateKind) -> &'static str {
    match kind {
        AggregateKind::Developments => DEVELOPMENTS_TOTAL,
        AggregateKind::Builders => BUILDERS_TOTAL,
    }
}

/// Holds the three external clients plus the fixed policy and parameters.
///
/// Stateless across requests; share it behind `Arc`.
pub struct AnswerSynthesizer {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn VectorStore>,
    chat: Arc<dyn ChatModel>,
    policy: Policy,
    retrieval: RetrievalSettings,
    params: GenerationParams,
}

impl AnswerSynthesizer {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        store: Arc<dyn VectorStore>,
        chat: Arc<dyn ChatModel>,
        policy: Policy,
    ) -> Self {
        Self {
            embedder,
            store,
            chat,
            policy,
            retrieval: RetrievalSettings::default(),
            params: GenerationParams::default(),
        }
    }

    #[must_use]
    pub fn with_retrieval(mut self, retrieval: RetrievalSettings) -> Self {
        self.retrieval = retrieval;
        self
    }

    #[must_use]
    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    /// Run one completion over an already assembled prompt. No retries.
    pub async fn synthesize(&self, prompt: &AssembledPrompt) -> Result<String, PipelineError> {
        let started = Instant::now();
        let text = self.chat.complete(&prompt.messages, &self.params).await?;
        debug!(
            "completion: {} messages in, {} chars out, {:?}",
            prompt.messages.len(),
            text.len(),
            started.elapsed()
        );
        Ok(text)
    }

    /// Embed and search, then project every hit for `intent`.
    pub async fn retrieve(
        &self,
        question: &str,
        intent: Intent,
    ) -> Result<Vec<ContextBlock>, PipelineError> {
        let started = Instant::now();
        let vector = self.embedder.embed(question).await?;
        if vector.len() != self.embedder.dimensions() {
            return Err(EmbedderError::DimensionMismatch {
                expected: self.embedder.dimensions(),
                actual: vector.len(),
            }
            .into());
        }
        debug!("embedding: {} dims, {:?}", vector.len(), started.elapsed());

        let started = Instant::now();
        let hits = self
            .store
            .search(&self.retrieval.collection, &vector, self.retrieval.top_k)
            .await?;
        debug!(
            "search: {} hits from {}, {:?}",
            hits.len(),
            self.retrieval.collection,
            started.elapsed()
        );

        Ok(hits.iter().map(|hit| project(&hit.record, intent)).collect())
    }

    /// Answer `question` given the caller's prior turns.
    pub async fn answer(
        &self,
        question: &str,
        history: &[ConversationTurn],
    ) -> Result<Answer, PipelineError> {
        if question.trim().is_empty() {
            return Err(PipelineError::MalformedRequest(
                "prompt is empty".to_string(),
            ));
        }

        let intent = classify(question);
        info!("answering query, intent {intent:?}, {} prior turns", history.len());

        if let Intent::AggregateCount(kind) = intent {
            return Ok(Answer {
                text: canned_total(kind).to_string(),
                intent,
            });
        }

        let blocks = self.retrieve(question, intent).await?;
        let prompt = assemble(history, &blocks, question, &self.policy);
        let text = self.synthesize(&prompt).await?;

        Ok(Answer { text, intent })
    }
}
