//! # imobrag — grounded answers over real-estate development records
//!
//! Answers natural-language questions about the developments of a sales
//! campaign by retrieving their records from a Qdrant collection and having a
//! language model phrase the answer strictly from those records.
//!
//! ## Architecture
//!
//! - **[`config`]** — Configuration loading, validation, environment overlay
//! - **[`embedder`]** — Query embedding (OpenAI-compatible API, mock)
//! - **[`store`]** — Canonical record model and vector search (Qdrant, in-memory)
//! - **[`llm`]** — Chat completion client and message types
//! - **[`pipeline`]** — Intent classification, context projection, prompt
//!   assembly and answer synthesis
//! - **[`server`]** — HTTP front door (`POST /api/bot`) via axum

pub mod config;
pub mod embedder;
pub mod llm;
pub mod pipeline;
pub mod server;
pub mod store;
