//! # Living Inbox CLI (`inbox`)
//!
//! The `inbox` binary is the primary interface for Living Inbox. It
//! provides commands for baseline ingestion, developer updates, client
//! questions, record-store inspection, and starting the dashboard
//! server.
//!
//! ## Usage
//!
//! ```bash
//! inbox --config ./config/inbox.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `inbox ingest` | Create the vector index and load baseline chunks |
//! | `inbox publish <dev> <note>` | Append a developer update to a project's inbox |
//! | `inbox ask <client> "<question>"` | Answer a client question from the store |
//! | `inbox records` | List the record store and credential status |
//! | `inbox serve` | Start the two-role HTTP dashboard |
//!
//! ## Credentials
//!
//! The hosted services read their API keys from the environment:
//! `OPENAI_API_KEY` (embeddings), `PINECONE_API_KEY` (vector index),
//! and `GROQ_API_KEY` (chat completions).

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use living_inbox::{answer, config, ingest, publish, records, server};

/// Living Inbox — a metadata-filtered RAG workspace that keeps clients
/// and developers in sync.
///
/// All commands accept a `--config` flag pointing to a TOML
/// configuration file. See `config/inbox.example.toml` for a full
/// example.
#[derive(Parser)]
#[command(
    name = "inbox",
    about = "Living Inbox — a metadata-filtered RAG workspace that keeps clients and developers in sync",
    version,
    long_about = "Living Inbox lets developers append progress notes to a shared knowledge store \
    and lets clients ask natural-language questions answered from it, isolated per client by a \
    metadata tag. Embeddings, vector search, and answer generation are delegated to hosted services."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/inbox.toml`. Record store, index,
    /// embedding, llm, retrieval, and server settings are read from
    /// this file. API credentials come from the environment only.
    #[arg(long, global = true, default_value = "./config/inbox.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Load every project record into the vector index.
    ///
    /// Creates the index if it does not exist (fixed dimension, cosine
    /// metric), folds each record into one baseline text blob, embeds
    /// all blobs in one batch, and upserts the chunks in one batch.
    /// Baseline chunks have stable ids, so re-running overwrites them
    /// in place.
    Ingest {
        /// Show record and chunk counts without calling any service.
        #[arg(long)]
        dry_run: bool,
    },

    /// Append a developer update to a project's inbox.
    ///
    /// Verifies the developer id against the record store, stamps the
    /// note with a timestamp, embeds it, and upserts a single update
    /// chunk tagged with the project's customer id.
    Publish {
        /// Developer id (exact, case-sensitive).
        developer_id: String,

        /// The progress note to publish.
        note: String,

        /// Customer id of the target project. May be omitted when the
        /// developer has exactly one assigned project.
        #[arg(long)]
        project: Option<String>,
    },

    /// Answer a client question from the knowledge store.
    ///
    /// Verifies the client id, retrieves the top-k nearest chunks
    /// restricted to that client's tag, and prints the model's reply
    /// verbatim.
    Ask {
        /// Client access key (customer id, exact).
        customer_id: String,

        /// The natural-language question.
        question: String,
    },

    /// List the record store and hosted-service credential status.
    Records,

    /// Start the two-role HTTP dashboard.
    ///
    /// Binds to the address configured in `[server].bind` and serves
    /// the dashboard page plus the JSON API.
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Ingest { dry_run } => {
            ingest::run_ingest(&cfg, dry_run).await?;
        }
        Commands::Publish {
            developer_id,
            note,
            project,
        } => {
            publish::run_publish(&cfg, &developer_id, project, &note).await?;
        }
        Commands::Ask {
            customer_id,
            question,
        } => {
            answer::run_ask(&cfg, &customer_id, &question).await?;
        }
        Commands::Records => {
            records::run_records(&cfg)?;
        }
        Commands::Serve => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| "living_inbox=info".into()),
                )
                .init();
            server::run_server(&cfg).await?;
        }
    }

    Ok(())
}
