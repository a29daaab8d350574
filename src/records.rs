//! Flat-file record store access.
//!
//! Project records live in a single JSON array maintained by an external
//! data-entry process. The file is small and re-read wholesale on every
//! interaction, so there is no cache and no lock to invalidate. Lookups
//! are exact and case-sensitive.

use anyhow::{Context, Result};
use std::path::Path;

use crate::config::Config;
use crate::models::ProjectRecord;

/// Load every record from the store file.
pub fn load_records(path: &Path) -> Result<Vec<ProjectRecord>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read record store: {}", path.display()))?;

    let records: Vec<ProjectRecord> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse record store: {}", path.display()))?;

    Ok(records)
}

/// The record whose `customer_id` matches exactly, if any.
pub fn find_by_customer<'a>(
    records: &'a [ProjectRecord],
    customer_id: &str,
) -> Option<&'a ProjectRecord> {
    records.iter().find(|r| r.customer_id == customer_id)
}

/// All records assigned to a developer, in store order.
pub fn assigned_to<'a>(
    records: &'a [ProjectRecord],
    developer_id: &str,
) -> Vec<&'a ProjectRecord> {
    records
        .iter()
        .filter(|r| r.developer_id == developer_id)
        .collect()
}

/// CLI entry point for `inbox records` — lists the store contents and
/// whether each hosted-service credential is present in the environment.
pub fn run_records(config: &Config) -> Result<()> {
    let records = load_records(&config.records.path)?;

    println!("{:<12} {:<24} {:<12}", "CUSTOMER", "CLIENT", "DEVELOPER");
    for record in &records {
        println!(
            "{:<12} {:<24} {:<12}",
            record.customer_id, record.client_name, record.developer_id
        );
    }
    println!();

    println!("{:<12} {:<20} STATUS", "SERVICE", "CREDENTIAL");
    println!(
        "{:<12} {:<20} {}",
        "embedding",
        "OPENAI_API_KEY",
        env_status("OPENAI_API_KEY")
    );
    println!(
        "{:<12} {:<20} {}",
        "index",
        "PINECONE_API_KEY",
        env_status("PINECONE_API_KEY")
    );
    println!(
        "{:<12} {:<20} {}",
        "llm",
        "GROQ_API_KEY",
        env_status("GROQ_API_KEY")
    );

    Ok(())
}

fn env_status(name: &str) -> &'static str {
    if std::env::var(name).is_ok() {
        "OK"
    } else {
        "MISSING"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn sample_records() -> Vec<ProjectRecord> {
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

    #[test]
    fn test_find_by_customer_exact() {
        let records = sample_records();
        assert_eq!(
            find_by_customer(&records, "C02").unwrap().client_name,
            "Globex"
        );
        assert!(find_by_customer(&records, "C99").is_none());
    }

    #[test]
    fn test_find_by_customer_case_sensitive() {
        let records = sample_records();
        assert!(find_by_customer(&records, "c01").is_none());
    }

    #[test]
    fn test_assigned_to_filters_exactly() {
        let records = sample_records();
        let mine = assigned_to(&records, "D505");
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|r| r.developer_id == "D505"));
        assert!(assigned_to(&records, "D999").is_empty());
    }

    #[test]
    fn test_load_records_missing_file() {
        let err = load_records(Path::new("/nonexistent/data.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read record store"));
    }

    #[test]
    fn test_load_records_rejects_malformed_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{not valid json").unwrap();
        let err = load_records(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse record store"));
    }
}
