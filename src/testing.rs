//! In-memory fakes for the hosted-service seams, shared by the unit
//! tests. Each fake records the calls it receives so tests can assert
//! that a rejected request never reached a service.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Mutex;

use crate::embedding::Embedder;
use crate::index::VectorIndex;
use crate::llm::ChatModel;
use crate::models::{KnowledgeChunk, ProjectRecord, RetrievedChunk};

/// Three-record store fixture used across the orchestration tests:
/// D505 owns C01 (Acme) and C02 (Globex); D777 owns C03 (Initech).
pub fn sample_records() -> Vec<ProjectRecord> {
    serde_json::from_str(
        r#"[
        {"customer_id": "C01", "client_name": "Acme", "developer_id": "D505",
         "project_details": "migration", "milestones": "phase1 done", "security": "confidential"},
        {"customer_id": "C02", "client_name": "Globex", "developer_id": "D505",
         "project_details": "storefront", "milestones": "design approved", "budget": "120k"},
        {"customer_id": "C03", "client_name": "Initech", "developer_id": "D777",
         "project_details": "reporting", "milestones": "kickoff", "budget": "40k"}
    ]"#,
    )
    .unwrap()
}

pub struct MockEmbedder {
    pub dims: usize,
    /// Each embed() call's input batch, in call order.
    pub calls: Mutex<Vec<Vec<String>>>,
}

impl MockEmbedder {
    pub fn new(dims: usize) -> Self {
        Self {
            dims,
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Embedder for MockEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.calls.lock().unwrap().push(texts.to_vec());
        Ok(texts
            .iter()
            .enumerate()
            .map(|(i, _)| vec![i as f32 + 1.0; self.dims])
            .collect())
    }

    fn model_name(&self) -> &str {
        "mock-embedder"
    }

    fn dims(&self) -> usize {
        self.dims
    }
}

pub struct MockIndex {
    pub ensure_calls: Mutex<u32>,
    /// Each upsert() call's chunk batch, in call order.
    pub upserts: Mutex<Vec<Vec<KnowledgeChunk>>>,
    /// Each query() call's (top_k, customer_id), in call order.
    pub queries: Mutex<Vec<(usize, String)>>,
    results: Vec<RetrievedChunk>,
}

impl MockIndex {
    pub fn new() -> Self {
        Self::with_results(Vec::new())
    }

    pub fn with_results(results: Vec<RetrievedChunk>) -> Self {
        Self {
            ensure_calls: Mutex::new(0),
            upserts: Mutex::new(Vec::new()),
            queries: Mutex::new(Vec::new()),
            results,
        }
    }
}

#[async_trait]
impl VectorIndex for MockIndex {
    async fn ensure_index(&self) -> Result<()> {
        *self.ensure_calls.lock().unwrap() += 1;
        Ok(())
    }

    async fn upsert(&self, chunks: &[KnowledgeChunk]) -> Result<()> {
        self.upserts.lock().unwrap().push(chunks.to_vec());
        Ok(())
    }

    async fn query(
        &self,
        _embedding: &[f32],
        top_k: usize,
        customer_id: &str,
    ) -> Result<Vec<RetrievedChunk>> {
        self.queries
            .lock()
            .unwrap()
            .push((top_k, customer_id.to_string()));
        Ok(self.results.clone())
    }
}

pub struct MockChat {
    /// Each complete() call's prompt, in call order.
    pub prompts: Mutex<Vec<String>>,
    reply: String,
}

impl MockChat {
    pub fn new(reply: &str) -> Self {
        Self {
            prompts: Mutex::new(Vec::new()),
            reply: reply.to_string(),
        }
    }
}

#[async_trait]
impl ChatModel for MockChat {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.reply.clone())
    }

    fn model_name(&self) -> &str {
        "mock-chat"
    }
}
