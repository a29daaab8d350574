//! Core data models used throughout Living Inbox.
//!
//! These types represent the project records read from the flat record
//! store and the knowledge chunks that flow through the embedding and
//! retrieval pipeline.

use serde::{Deserialize, Serialize};

/// A single client project as stored in the flat record file.
///
/// Records are created by an external data-entry process and are
/// read-only here. Depending on the entry template a record carries
/// either a `security` or a `budget` field; use
/// [`security_or_budget`](ProjectRecord::security_or_budget) instead of
/// touching the raw fields.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProjectRecord {
    pub customer_id: String,
    pub client_name: String,
    pub developer_id: String,
    pub project_details: String,
    pub milestones: String,
    #[serde(default)]
    pub security: Option<String>,
    #[serde(default)]
    pub budget: Option<String>,
}

impl ProjectRecord {
    /// Whichever of the security or budget fields is present.
    pub fn security_or_budget(&self) -> &str {
        self.security
            .as_deref()
            .or(self.budget.as_deref())
            .unwrap_or("n/a")
    }

    /// The baseline text blob embedded for this record.
    ///
    /// All fields are folded into one blob so a question about any of
    /// them can retrieve the record.
    pub fn baseline_text(&self) -> String {
        format!(
            "Client: {}. Details: {} Milestones: {} Security/Budget: {}",
            self.client_name,
            self.project_details,
            self.milestones,
            self.security_or_budget()
        )
    }
}

/// Whether a chunk came from the one-shot baseline load or from a
/// developer update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkKind {
    Baseline,
    Update,
}

impl ChunkKind {
    /// Tag value stored in the vector index metadata.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChunkKind::Baseline => "baseline",
            ChunkKind::Update => "update",
        }
    }
}

/// A unit of text plus its embedding and metadata tag, bound for the
/// vector index. Held only transiently; the index owns storage.
#[derive(Debug, Clone)]
pub struct KnowledgeChunk {
    pub id: String,
    pub text: String,
    pub embedding: Vec<f32>,
    pub customer_id: String,
    pub kind: ChunkKind,
}

/// A chunk returned from similarity search, highest-scoring first.
#[derive(Debug, Clone)]
pub struct RetrievedChunk {
    pub text: String,
    pub score: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(security: Option<&str>, budget: Option<&str>) -> ProjectRecord {
        ProjectRecord {
            customer_id: "C01".to_string(),
            client_name: "Acme".to_string(),
            developer_id: "D505".to_string(),
            project_details: "migration".to_string(),
            milestones: "phase1 done".to_string(),
            security: security.map(str::to_string),
            budget: budget.map(str::to_string),
        }
    }

    #[test]
    fn test_security_preferred_over_budget() {
        let r = record(Some("confidential"), Some("50k"));
        assert_eq!(r.security_or_budget(), "confidential");
    }

    #[test]
    fn test_budget_fallback() {
        let r = record(None, Some("50k"));
        assert_eq!(r.security_or_budget(), "50k");
    }

    #[test]
    fn test_neither_present() {
        let r = record(None, None);
        assert_eq!(r.security_or_budget(), "n/a");
    }

    #[test]
    fn test_baseline_text_folds_all_fields() {
        let r = record(Some("confidential"), None);
        let text = r.baseline_text();
        assert_eq!(
            text,
            "Client: Acme. Details: migration Milestones: phase1 done Security/Budget: confidential"
        );
    }

    #[test]
    fn test_record_parses_with_budget_key_only() {
        let json = r#"{
            "customer_id": "C02",
            "client_name": "Globex",
            "developer_id": "D7",
            "project_details": "storefront",
            "milestones": "design approved",
            "budget": "120k"
        }"#;
        let r: ProjectRecord = serde_json::from_str(json).unwrap();
        assert!(r.security.is_none());
        assert_eq!(r.security_or_budget(), "120k");
    }
}
