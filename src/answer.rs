//! Client question answering.
//!
//! A client logs in with their access key (their `customer_id`), asks a
//! free-text question, and gets back the model's reply verbatim. The
//! flow is one stateless pass: embed the question, pull the top-k
//! nearest chunks restricted to the client's tag, fill the fixed prompt
//! template, send one deterministic completion.
//!
//! The access check runs before anything else — an unknown key fails
//! without a vector or chat call — and a question that retrieves zero
//! chunks stops before the model is ever contacted.

use anyhow::{bail, Result};

use crate::config::Config;
use crate::embedding::{self, Embedder, OpenAiEmbedder};
use crate::index::{PineconeIndex, VectorIndex};
use crate::llm::{ChatModel, GroqChat};
use crate::models::ProjectRecord;
use crate::prompt;
use crate::records;

/// Answer one client question from the knowledge store.
pub async fn answer_question(
    all_records: &[ProjectRecord],
    embedder: &dyn Embedder,
    index: &dyn VectorIndex,
    chat: &dyn ChatModel,
    top_k: usize,
    customer_id: &str,
    question: &str,
) -> Result<String> {
    let record = records::find_by_customer(all_records, customer_id)
        .ok_or_else(|| anyhow::anyhow!("invalid access key: '{}'", customer_id))?;

    if question.trim().is_empty() {
        bail!("question must not be empty");
    }

    let query_vector = embedding::embed_one(embedder, question).await?;

    let chunks = index
        .query(&query_vector, top_k, &record.customer_id)
        .await?;

    if chunks.is_empty() {
        bail!("no context found for '{}'", customer_id);
    }

    let context = prompt::join_context(&chunks);
    let filled = prompt::build_prompt(&context, question);

    chat.complete(&filled).await
}

/// CLI entry point for `inbox ask`.
pub async fn run_ask(config: &Config, customer_id: &str, question: &str) -> Result<()> {
    let all_records = records::load_records(&config.records.path)?;
    let embedder = OpenAiEmbedder::new(&config.embedding)?;
    let index = PineconeIndex::new(&config.index)?;
    let chat = GroqChat::new(&config.llm)?;

    let answer = answer_question(
        &all_records,
        &embedder,
        &index,
        &chat,
        config.retrieval.top_k,
        customer_id,
        question,
    )
    .await?;

    println!("{}", answer);
    Ok(())
}
