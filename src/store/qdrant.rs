/// Qdrant REST client for the points search endpoint.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

use super::{Record, ScoredRecord, StoreError, VectorStore};

#[derive(Deserialize)]
struct SearchResponse {
    result: Vec<SearchHit>,
}

#[derive(Deserialize)]
struct SearchHit {
    score: f32,
    #[serde(default)]
    payload: Value,
}

#[derive(Clone)]
pub struct QdrantStore {
    base_url: Url,
    api_key: Option<String>,
    client: Client,
}

impl std::fmt::Debug for QdrantStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QdrantStore")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish_non_exhaustive()
    }
}

impl QdrantStore {
    pub fn new(
        base_url: &str,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, StoreError> {
        let base_url =
            Url::parse(base_url).map_err(|e| StoreError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(StoreError::InvalidUrl(base_url.to_string()));
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url,
            api_key: api_key.filter(|k| !k.is_empty()),
            client,
        })
    }

    /// `{base}/collections/{collection}/points/search`, with the collection
    /// name encoded as a single path segment.
    fn search_url(&self, collection: &str) -> Result<Url, StoreError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| StoreError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(["collections", collection, "points", "search"]);
        Ok(url)
    }
}

#[async_trait]
impl VectorStore for QdrantStore {
    async fn search(
        &self,
        collection: &str,
        vector: &[f32],
        top_k: usize,
    ) -> Result<Vec<ScoredRecord>, StoreError> {
        let url = self.search_url(collection)?;
        let body = json!({
            "vector": vector,
            "limit": top_k,
            "with_payload": true,
        });

        let mut req = self.client.post(url).json(&body);
        if let Some(key) = &self.api_key {
            req = req.header("api-key", key);
        }

        let res = req.send().await?;
        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(StoreError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: SearchResponse = res
            .json()
            .await
            .map_err(|e| StoreError::MalformedResponse(e.to_string()))?;

        debug!("qdrant returned {} hits from {collection}", parsed.result.len());

        let mut records: Vec<ScoredRecord> = parsed
            .result
            .into_iter()
            .map(|hit| ScoredRecord {
                record: Record::from_payload(&hit.payload),
                score: hit.score,
            })
            .collect();
        // Callers rely on descending score order.
        records.sort_by(|a, b| b.score.total_cmp(&a.score));
        records.truncate(top_k);
        Ok(records)
    }
}
