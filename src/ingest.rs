//! One-shot baseline ingestion.
//!
//! Reads every project record, folds each into a single text blob,
//! embeds all blobs in one batch call, and upserts the resulting
//! baseline chunks in one batch. Creates the vector index on first run.
//!
//! Baseline chunks carry the stable id `baseline:{customer_id}`, so
//! re-running ingestion overwrites each record's chunk in place instead
//! of accumulating duplicates. Update chunks are unaffected.

use anyhow::Result;

use crate::config::Config;
use crate::embedding::{Embedder, OpenAiEmbedder};
use crate::index::{PineconeIndex, VectorIndex};
use crate::models::{ChunkKind, KnowledgeChunk, ProjectRecord};
use crate::records;

/// Embed and upsert baseline chunks for every record. Returns the
/// number of chunks written.
pub async fn ingest_records(
    all_records: &[ProjectRecord],
    embedder: &dyn Embedder,
    index: &dyn VectorIndex,
) -> Result<usize> {
    index.ensure_index().await?;

    let texts: Vec<String> = all_records.iter().map(|r| r.baseline_text()).collect();
    let vectors = embedder.embed(&texts).await?;

    let chunks: Vec<KnowledgeChunk> = all_records
        .iter()
        .zip(vectors)
        .map(|(record, embedding)| KnowledgeChunk {
            id: format!("baseline:{}", record.customer_id),
            text: record.baseline_text(),
            embedding,
            customer_id: record.customer_id.clone(),
            kind: ChunkKind::Baseline,
        })
        .collect();

    index.upsert(&chunks).await?;
    Ok(chunks.len())
}

/// CLI entry point for `inbox ingest`.
pub async fn run_ingest(config: &Config, dry_run: bool) -> Result<()> {
    let all_records = records::load_records(&config.records.path)?;

    if dry_run {
        println!("ingest (dry-run)");
        println!("  records: {}", all_records.len());
        println!("  chunks to upsert: {}", all_records.len());
        return Ok(());
    }

    if all_records.is_empty() {
        println!("ingest");
        println!("  no records to ingest");
        return Ok(());
    }

    let embedder = OpenAiEmbedder::new(&config.embedding)?;
    let index = PineconeIndex::new(&config.index)?;

    let written = ingest_records(&all_records, &embedder, &index).await?;

    println!("ingest");
    println!("  records: {}", all_records.len());
    println!("  chunks upserted: {}", written);
    println!("ok");

    Ok(())
}
