//! Prompt assembly for the client question path.
//!
//! Retrieved chunks are joined with a separator and substituted, along
//! with the question, into one fixed template. The template tells the
//! model to prioritize snippets carrying the developer-update label,
//! which is how recency wins over the baseline record without any
//! structured timestamp field.

use crate::models::RetrievedChunk;
use crate::publish::UPDATE_LABEL;

/// Separator between retrieved chunks in the prompt context.
pub const CONTEXT_SEPARATOR: &str = "\n\n---\n\n";

/// Join retrieved chunk texts into the prompt context block.
pub fn join_context(chunks: &[RetrievedChunk]) -> String {
    chunks
        .iter()
        .map(|c| c.text.as_str())
        .collect::<Vec<_>>()
        .join(CONTEXT_SEPARATOR)
}

/// Fill the fixed answer template with context and question.
pub fn build_prompt(context: &str, question: &str) -> String {
    format!(
        "You are the Living Inbox assistant.\n\
         Use the context below to answer the client's question.\n\
         PRIORITIZE snippets labeled '{label}' as they are the most current.\n\
         \n\
         CONTEXT FROM WORKSPACE:\n\
         {context}\n\
         \n\
         QUESTION: {question}\n\
         \n\
         Respond in a professional, concise tone. If the information is not present, state that.",
        label = UPDATE_LABEL,
        context = context,
        question = question,
    )
}
