//! Vector index client for the hosted Pinecone service.
//!
//! Defines the [`VectorIndex`] seam and its production implementation,
//! [`PineconeIndex`]. The index is the system of record for knowledge
//! chunks — nothing is kept locally after an upsert. Chunk text rides
//! along in the vector metadata so retrieval needs no second store.
//!
//! Two Pinecone surfaces are involved:
//! - the control plane (`https://api.pinecone.io`) for creating and
//!   describing the index, and
//! - the per-index data plane host (returned by describe) for upsert
//!   and query.
//!
//! The data-plane host is resolved once per client and reused. Retries
//! follow the same backoff discipline as the embedding client.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tokio::sync::OnceCell;

use crate::config::IndexConfig;
use crate::models::{KnowledgeChunk, RetrievedChunk};

const CONTROL_PLANE_URL: &str = "https://api.pinecone.io";
const API_VERSION: &str = "2025-01";

/// How long to wait for a freshly created index to become ready.
const READY_POLL_ATTEMPTS: u32 = 30;
const READY_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Seam over the hosted vector index.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Create the backing index if it does not exist yet. Reuses an
    /// existing index untouched.
    async fn ensure_index(&self) -> Result<()>;

    /// Write chunks to the index. Chunks with the same id overwrite in
    /// place.
    async fn upsert(&self, chunks: &[KnowledgeChunk]) -> Result<()>;

    /// Top-k nearest chunks whose `customer_id` tag equals the given id.
    /// The tag filter is mandatory — there is no unfiltered query.
    async fn query(
        &self,
        embedding: &[f32],
        top_k: usize,
        customer_id: &str,
    ) -> Result<Vec<RetrievedChunk>>;
}

#[derive(Debug, Deserialize)]
struct DescribeIndexResponse {
    host: String,
    #[serde(default)]
    status: IndexStatus,
}

#[derive(Debug, Deserialize, Default)]
struct IndexStatus {
    #[serde(default)]
    ready: bool,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

#[derive(Debug, Deserialize)]
struct QueryMatch {
    id: String,
    #[serde(default)]
    score: f32,
    #[serde(default)]
    metadata: Option<serde_json::Value>,
}

/// Vector index client backed by Pinecone.
///
/// Requires the `PINECONE_API_KEY` environment variable.
pub struct PineconeIndex {
    client: reqwest::Client,
    api_key: String,
    config: IndexConfig,
    host: OnceCell<String>,
}

impl PineconeIndex {
    pub fn new(config: &IndexConfig) -> Result<Self> {
        let api_key = std::env::var("PINECONE_API_KEY")
            .map_err(|_| anyhow::anyhow!("PINECONE_API_KEY environment variable not set"))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key,
            config: config.clone(),
            host: OnceCell::new(),
        })
    }

    /// Send a request, retrying 429/5xx and network errors with the
    /// standard backoff. Other statuses are returned to the caller for
    /// inspection (describe treats 404 as "index absent").
    async fn send_with_retry(&self, req: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        let mut last_err = None;

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                let delay = Duration::from_secs(1 << (attempt - 1).min(5));
                tokio::time::sleep(delay).await;
            }

            let cloned = req
                .try_clone()
                .ok_or_else(|| anyhow::anyhow!("Request body is not cloneable"))?;

            match cloned.send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.as_u16() == 429 || status.is_server_error() {
                        let body_text = response.text().await.unwrap_or_default();
                        last_err = Some(anyhow::anyhow!(
                            "Vector index error {}: {}",
                            status,
                            body_text
                        ));
                        continue;
                    }
                    return Ok(response);
                }
                Err(e) => {
                    last_err = Some(e.into());
                    continue;
                }
            }
        }

        Err(last_err.unwrap_or_else(|| anyhow::anyhow!("Vector index request failed after retries")))
    }

    /// Describe the index on the control plane. `None` means it does not
    /// exist yet.
    async fn describe(&self) -> Result<Option<DescribeIndexResponse>> {
        let url = format!("{}/indexes/{}", CONTROL_PLANE_URL, self.config.name);
        let req = self
            .client
            .get(&url)
            .header("Api-Key", &self.api_key)
            .header("X-Pinecone-API-Version", API_VERSION);

        let response = self.send_with_retry(req).await?;
        let status = response.status();

        if status.as_u16() == 404 {
            return Ok(None);
        }
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            bail!("Vector index describe error {}: {}", status, body_text);
        }

        let described: DescribeIndexResponse = response
            .json()
            .await
            .context("Invalid describe-index response")?;
        Ok(Some(described))
    }

    /// The data-plane host, resolved once. Fails if the index does not
    /// exist — `inbox ingest` creates it.
    async fn data_host(&self) -> Result<&str> {
        let host = self
            .host
            .get_or_try_init(|| async {
                match self.describe().await? {
                    Some(described) => Ok(described.host),
                    None => Err(anyhow::anyhow!(
                        "Vector index '{}' not found — run `inbox ingest` to create it",
                        self.config.name
                    )),
                }
            })
            .await?;
        Ok(host.as_str())
    }
}

#[async_trait]
impl VectorIndex for PineconeIndex {
    async fn ensure_index(&self) -> Result<()> {
        if self.describe().await?.is_some() {
            return Ok(());
        }

        let body = serde_json::json!({
            "name": self.config.name,
            "dimension": self.config.dimension,
            "metric": self.config.metric,
            "spec": {
                "serverless": {
                    "cloud": self.config.cloud,
                    "region": self.config.region,
                }
            }
        });

        let req = self
            .client
            .post(format!("{}/indexes", CONTROL_PLANE_URL))
            .header("Api-Key", &self.api_key)
            .header("X-Pinecone-API-Version", API_VERSION)
            .json(&body);

        let response = self.send_with_retry(req).await?;
        let status = response.status();

        // 409 means another run created it between describe and create.
        if !status.is_success() && status.as_u16() != 409 {
            let body_text = response.text().await.unwrap_or_default();
            bail!("Vector index create error {}: {}", status, body_text);
        }

        // A fresh serverless index takes a moment before it accepts writes.
        for _ in 0..READY_POLL_ATTEMPTS {
            if let Some(described) = self.describe().await? {
                if described.status.ready {
                    return Ok(());
                }
            }
            tokio::time::sleep(READY_POLL_INTERVAL).await;
        }

        bail!(
            "Vector index '{}' was created but did not become ready",
            self.config.name
        )
    }

    async fn upsert(&self, chunks: &[KnowledgeChunk]) -> Result<()> {
        if chunks.is_empty() {
            return Ok(());
        }

        let host = self.data_host().await?;
        let body = upsert_body(chunks);

        let req = self
            .client
            .post(format!("https://{}/vectors/upsert", host))
            .header("Api-Key", &self.api_key)
            .header("X-Pinecone-API-Version", API_VERSION)
            .json(&body);

        let response = self.send_with_retry(req).await?;
        let status = response.status();

        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            bail!("Vector index upsert error {}: {}", status, body_text);
        }

        Ok(())
    }

    async fn query(
        &self,
        embedding: &[f32],
        top_k: usize,
        customer_id: &str,
    ) -> Result<Vec<RetrievedChunk>> {
        let host = self.data_host().await?;
        let body = query_body(embedding, top_k, customer_id);

        let req = self
            .client
            .post(format!("https://{}/query", host))
            .header("Api-Key", &self.api_key)
            .header("X-Pinecone-API-Version", API_VERSION)
            .json(&body);

        let response = self.send_with_retry(req).await?;
        let status = response.status();

        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            bail!("Vector index query error {}: {}", status, body_text);
        }

        let parsed: QueryResponse = response.json().await.context("Invalid query response")?;

        let mut chunks = Vec::with_capacity(parsed.matches.len());
        for m in parsed.matches {
            let text = m
                .metadata
                .as_ref()
                .and_then(|meta| meta.get("text"))
                .and_then(|t| t.as_str());
            match text {
                Some(text) => chunks.push(RetrievedChunk {
                    text: text.to_string(),
                    score: m.score,
                }),
                None => eprintln!("Warning: match {} has no text metadata, skipping", m.id),
            }
        }

        Ok(chunks)
    }
}

/// Upsert request body. Text and tags travel in metadata.
fn upsert_body(chunks: &[KnowledgeChunk]) -> serde_json::Value {
    let vectors: Vec<serde_json::Value> = chunks
        .iter()
        .map(|chunk| {
            serde_json::json!({
                "id": chunk.id,
                "values": chunk.embedding,
                "metadata": {
                    "customer_id": chunk.customer_id,
                    "kind": chunk.kind.as_str(),
                    "text": chunk.text,
                }
            })
        })
        .collect();

    serde_json::json!({ "vectors": vectors })
}

/// Query request body. The `customer_id` equality filter is built here,
/// unconditionally, so no query path can reach another client's chunks.
fn query_body(embedding: &[f32], top_k: usize, customer_id: &str) -> serde_json::Value {
    serde_json::json!({
        "vector": embedding,
        "topK": top_k,
        "filter": { "customer_id": { "$eq": customer_id } },
        "includeMetadata": true,
    })
}
