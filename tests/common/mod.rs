//! Test doubles shared by the integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use imobrag::embedder::mock::MockEmbedder;
use imobrag::embedder::{Embedder, EmbedderError};
use imobrag::llm::{ChatMessage, ChatModel, GenerationParams, LlmError};
use imobrag::pipeline::{AnswerSynthesizer, Policy};
use imobrag::store::memory::InMemoryStore;
use imobrag::store::{Record, ScoredRecord, StoreError, VectorStore};
use serde_json::json;

pub const COLLECTION: &str = "empreendimentos";
pub const DIMS: usize = 64;

pub const AURORA_QUERY: &str = "quero o link do tabelão do Residencial Aurora";
pub const JADE_QUERY: &str = "qual a metragem do Edifício Jade?";

/// Replies with the final user message, i.e. a model that only restates
/// its context.
#[derive(Default)]
pub struct EchoChat {
    pub seen: Mutex<Vec<Vec<ChatMessage>>>,
}

#[async_trait]
impl ChatModel for EchoChat {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        _params: &GenerationParams,
    ) -> Result<String, LlmError> {
        self.seen.lock().unwrap().push(messages.to_vec());
        messages
            .last()
            .map(|m| m.content.clone())
            .ok_or(LlmError::EmptyCompletion)
    }
}

pub struct FailingChat;

#[async_trait]
impl ChatModel for FailingChat {
    async fn complete(
        &self,
        _messages: &[ChatMessage],
        _params: &GenerationParams,
    ) -> Result<String, LlmError> {
        Err(LlmError::Status {
            status: 429,
            body: "rate limited".to_string(),
        })
    }
}

pub struct FailingEmbedder;

#[async_trait]
impl Embedder for FailingEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbedderError> {
        Err(EmbedderError::Status {
            status: 401,
            body: "invalid api key".to_string(),
        })
    }

    fn dimensions(&self) -> usize {
        DIMS
    }
}

/// Claims `DIMS` but returns a truncated vector.
pub struct ShortEmbedder;

#[async_trait]
impl Embedder for ShortEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbedderError> {
        Ok(vec![0.1; DIMS / 2])
    }

    fn dimensions(&self) -> usize {
        DIMS
    }
}

pub struct FailingStore;

#[async_trait]
impl VectorStore for FailingStore {
    async fn search(
        &self,
        collection: &str,
        _vector: &[f32],
        _top_k: usize,
    ) -> Result<Vec<ScoredRecord>, StoreError> {
        Err(StoreError::CollectionNotFound(collection.to_string()))
    }
}

pub fn aurora() -> Record {
    Record::from_payload(&json!({
        "EMPREENDIMENTO": "Residencial Aurora",
        "CONSTRUTORA": "Construtora Horizonte",
        "BAIRRO": "Cambuí",
        "METRAGEM": "52 a 74 m²",
        "DRIVE DAS CONSTRUTORAS": "https://drive.example/aurora",
        "LINK DOS VIDEOS": "https://video.example/aurora",
        "LINK DOS CARDS": "https://cards.example/aurora",
        "LINK TABELÃO": "",
        "LINK TABELA": "https://tabela.example/aurora",
    }))
}

pub fn jade() -> Record {
    Record::from_payload(&json!({
        "EMPREENDIMENTO": "Edifício Jade",
        "CONSTRUTORA": "Pedra Alta Incorporadora",
        "BAIRRO": "Taquaral",
        "SITUAÇÃO": "Em construção",
        "METRAGEM": "68 m²",
        "DORMS/SUITES": "2 dorms / 1 suíte",
        "VAGAS": "1",
        "PREV. ENTREGA": "Dez/2026",
        "VALOR A PARTIR DE": "R$ 480.000",
        "DRIVE DAS CONSTRUTORAS": "https://drive.example/jade",
        "LINK TABELA": "https://tabela.example/jade",
        "CONTATO COMERCIAL 1": "Marcos (19) 98888-1111",
    }))
}

/// A store where each record sits exactly on the embedding of the query that
/// should find it, so it ranks first for that query.
pub async fn seeded_store() -> InMemoryStore {
    let embedder = MockEmbedder::new(DIMS);
    let mut store = InMemoryStore::new();
    store.insert(COLLECTION, embedder.embed(AURORA_QUERY).await.unwrap(), aurora());
    store.insert(COLLECTION, embedder.embed(JADE_QUERY).await.unwrap(), jade());
    store
}

pub async fn echo_synthesizer() -> (AnswerSynthesizer, Arc<EchoChat>) {
    let chat = Arc::new(EchoChat::default());
    let synthesizer = AnswerSynthesizer::new(
        Arc::new(MockEmbedder::new(DIMS)),
        Arc::new(seeded_store().await),
        chat.clone(),
        Policy::default(),
    );
    (synthesizer, chat)
}
