//! Developer update publishing.
//!
//! A developer logs in with their id, picks one of their assigned
//! projects, and appends a free-text note. The note is stamped with a
//! human-readable timestamp inside the text itself, embedded, and
//! upserted as a single update chunk tagged with the project's
//! `customer_id`. Clients see it on their next question.
//!
//! Access and input checks run before any hosted service is touched:
//! an unknown developer, a project they don't own, or a blank note all
//! fail without an embedding or index call.

use anyhow::{bail, Result};
use chrono::Utc;
use uuid::Uuid;

use crate::config::Config;
use crate::embedding::{self, Embedder, OpenAiEmbedder};
use crate::index::{PineconeIndex, VectorIndex};
use crate::models::{ChunkKind, KnowledgeChunk, ProjectRecord};
use crate::records;

/// Label prefixed to every update chunk's text. The answer prompt tells
/// the model to prioritize snippets carrying it.
pub const UPDATE_LABEL: &str = "NEW DEVELOPER UPDATE";

/// What was published, for display.
#[derive(Debug, Clone)]
pub struct PublishReceipt {
    pub customer_id: String,
    pub client_name: String,
    pub chunk_id: String,
}

/// Publish one developer note as an update chunk.
///
/// `project` selects among the developer's assigned projects; it may be
/// omitted only when exactly one is assigned.
pub async fn publish_update(
    all_records: &[ProjectRecord],
    embedder: &dyn Embedder,
    index: &dyn VectorIndex,
    developer_id: &str,
    project: Option<&str>,
    note: &str,
) -> Result<PublishReceipt> {
    let assigned = records::assigned_to(all_records, developer_id);
    if assigned.is_empty() {
        bail!(
            "access denied: no projects found for developer id '{}'",
            developer_id
        );
    }

    let record = match project {
        Some(customer_id) => *assigned
            .iter()
            .find(|r| r.customer_id == customer_id)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "access denied: project '{}' is not assigned to developer '{}'",
                    customer_id,
                    developer_id
                )
            })?,
        None if assigned.len() == 1 => assigned[0],
        None => bail!(
            "developer '{}' has {} assigned projects — pass --project to pick one",
            developer_id,
            assigned.len()
        ),
    };

    if note.trim().is_empty() {
        bail!("update text must not be empty");
    }

    let timestamp = Utc::now().format("%Y-%m-%d %H:%M");
    let text = format!("{} logged at {}: {}", UPDATE_LABEL, timestamp, note);

    let vector = embedding::embed_one(embedder, &text).await?;

    let chunk = KnowledgeChunk {
        id: Uuid::new_v4().to_string(),
        text,
        embedding: vector,
        customer_id: record.customer_id.clone(),
        kind: ChunkKind::Update,
    };

    index.upsert(std::slice::from_ref(&chunk)).await?;

    Ok(PublishReceipt {
        customer_id: record.customer_id.clone(),
        client_name: record.client_name.clone(),
        chunk_id: chunk.id,
    })
}

/// CLI entry point for `inbox publish`.
pub async fn run_publish(
    config: &Config,
    developer_id: &str,
    project: Option<String>,
    note: &str,
) -> Result<()> {
    let all_records = records::load_records(&config.records.path)?;
    let embedder = OpenAiEmbedder::new(&config.embedding)?;
    let index = PineconeIndex::new(&config.index)?;

    let receipt = publish_update(
        &all_records,
        &embedder,
        &index,
        developer_id,
        project.as_deref(),
        note,
    )
    .await?;

    println!("publish");
    println!(
        "  project: {} ({})",
        receipt.client_name, receipt.customer_id
    );
    println!("  chunk id: {}", receipt.chunk_id);
    println!("ok");

    Ok(())
}
