/// In-memory vector store ranking records by cosine similarity.
///
/// Used for offline runs and tests; the production path is [`super::qdrant`].
use std::collections::HashMap;

use async_trait::async_trait;

use super::{Record, ScoredRecord, StoreError, VectorStore};

struct Point {
    vector: Vec<f32>,
    record: Record,
}

#[derive(Default)]
pub struct InMemoryStore {
    collections: HashMap<String, Vec<Point>>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a point to `collection`, creating the collection if needed.
    pub fn insert(&mut self, collection: &str, vector: Vec<f32>, record: Record) {
        self.collections
            .entry(collection.to_string())
            .or_default()
            .push(Point { vector, record });
    }
}

/// Cosine similarity of two equal-length vectors; zero vectors score 0.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|v| v * v).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[async_trait]
impl VectorStore for InMemoryStore {
    async fn search(
        &self,
        collection: &str,
        vector: &[f32],
        top_k: usize,
    ) -> Result<Vec<ScoredRecord>, StoreError> {
        let points = self
            .collections
            .get(collection)
            .ok_or_else(|| StoreError::CollectionNotFound(collection.to_string()))?;

        let mut scored = Vec::with_capacity(points.len());
        for p in points {
            if p.vector.len() != vector.len() {
                return Err(StoreError::DimensionMismatch {
                    expected: p.vector.len(),
                    actual: vector.len(),
                });
            }
            scored.push(ScoredRecord {
                record: p.record.clone(),
                score: cosine_similarity(&p.vector, vector),
            });
        }

        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(top_k);
        Ok(scored)
    }
}
