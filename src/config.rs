use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub records: RecordsConfig,
    pub index: IndexConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    pub server: ServerConfig,
}

/// Location of the flat record store file.
#[derive(Debug, Deserialize, Clone)]
pub struct RecordsConfig {
    pub path: PathBuf,
}

/// Hosted vector index settings. The index is created by `inbox ingest`
/// if it does not exist yet; all other paths require it to be present.
#[derive(Debug, Deserialize, Clone)]
pub struct IndexConfig {
    pub name: String,
    #[serde(default = "default_dimension")]
    pub dimension: usize,
    #[serde(default = "default_metric")]
    pub metric: String,
    #[serde(default = "default_cloud")]
    pub cloud: String,
    #[serde(default = "default_region")]
    pub region: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_dimension() -> usize {
    1536
}
fn default_metric() -> String {
    "cosine".to_string()
}
fn default_cloud() -> String {
    "aws".to_string()
}
fn default_region() -> String {
    "us-east-1".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_max_retries() -> u32 {
    5
}

#[derive(Debug, Deserialize, Clone)]
pub struct EmbeddingConfig {
    #[serde(default = "default_embedding_model")]
    pub model: String,
    #[serde(default = "default_dimension")]
    pub dims: usize,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: default_embedding_model(),
            dims: default_dimension(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct LlmConfig {
    #[serde(default = "default_llm_model")]
    pub model: String,
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,
    /// Decoding temperature. Answers must be deterministic, so this
    /// defaults to zero.
    #[serde(default)]
    pub temperature: f32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: default_llm_model(),
            base_url: default_llm_base_url(),
            temperature: 0.0,
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

fn default_llm_model() -> String {
    "llama-3.3-70b-versatile".to_string()
}
fn default_llm_base_url() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct RetrievalConfig {
    /// Nearest chunks pulled per question. 5 is enough to cover the
    /// baseline record plus the recent developer updates.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
        }
    }
}

fn default_top_k() -> usize {
    5
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub bind: String,
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.index.dimension == 0 {
        anyhow::bail!("index.dimension must be > 0");
    }

    if config.index.dimension != config.embedding.dims {
        anyhow::bail!(
            "index.dimension ({}) must match embedding.dims ({})",
            config.index.dimension,
            config.embedding.dims
        );
    }

    match config.index.metric.as_str() {
        "cosine" | "dotproduct" | "euclidean" => {}
        other => anyhow::bail!(
            "Unknown index metric: '{}'. Must be cosine, dotproduct, or euclidean.",
            other
        ),
    }

    if config.retrieval.top_k < 1 {
        anyhow::bail!("retrieval.top_k must be >= 1");
    }

    if !(0.0..=2.0).contains(&config.llm.temperature) {
        anyhow::bail!("llm.temperature must be in [0.0, 2.0]");
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    const MINIMAL: &str = r#"
[records]
path = "data.json"

[index]
name = "inbox-index"

[server]
bind = "127.0.0.1:7878"
"#;

    #[test]
    fn test_minimal_config_defaults() {
        let file = write_config(MINIMAL);
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.index.dimension, 1536);
        assert_eq!(config.index.metric, "cosine");
        assert_eq!(config.embedding.model, "text-embedding-3-small");
        assert_eq!(config.llm.temperature, 0.0);
        assert_eq!(config.retrieval.top_k, 5);
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let file = write_config(
            r#"
[records]
path = "data.json"

[index]
name = "inbox-index"
dimension = 768

[server]
bind = "127.0.0.1:7878"
"#,
        );
        let err = load_config(file.path()).unwrap_err();
        assert!(err.to_string().contains("must match embedding.dims"));
    }

    #[test]
    fn test_unknown_metric_rejected() {
        let file = write_config(
            r#"
[records]
path = "data.json"

[index]
name = "inbox-index"
metric = "manhattan"

[server]
bind = "127.0.0.1:7878"
"#,
        );
        let err = load_config(file.path()).unwrap_err();
        assert!(err.to_string().contains("Unknown index metric"));
    }

    #[test]
    fn test_zero_top_k_rejected() {
        let file = write_config(
            r#"
[records]
path = "data.json"

[index]
name = "inbox-index"

[retrieval]
top_k = 0

[server]
bind = "127.0.0.1:7878"
"#,
        );
        let err = load_config(file.path()).unwrap_err();
        assert!(err.to_string().contains("top_k"));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = load_config(Path::new("/nonexistent/inbox.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/inbox.toml"));
    }
}
