//! # Living Inbox
//!
//! A metadata-filtered RAG workspace that keeps clients and developers
//! in sync.
//!
//! Developers append free-text progress notes to a shared knowledge
//! store; clients ask natural-language questions answered from that
//! store, isolated per client by a `customer_id` tag. The heavy lifting
//! — embeddings, nearest-neighbor search, and answer generation — is
//! delegated to hosted services; this crate supplies the orchestration:
//! record lookup, tagging, prompt construction, and role dispatch.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌───────────────┐
//! │ Record Store │──▶│ Embed + Tag  │──▶│ Vector Index   │
//! │ (flat JSON)  │   │  (hosted)    │   │   (hosted)     │
//! └──────────────┘   └──────────────┘   └──────┬────────┘
//!                                              │ top-k, tag filter
//!                        ┌─────────────────────┤
//!                        ▼                     ▼
//!                  ┌───────────┐        ┌────────────┐
//!                  │    CLI    │        │  Dashboard  │
//!                  │  (inbox)  │        │  (HTTP)     │
//!                  └───────────┘        └─────┬──────┘
//!                                             ▼
//!                                       ┌────────────┐
//!                                       │ Chat model  │
//!                                       │  (hosted)   │
//!                                       └────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! inbox ingest                       # create the index, load baselines
//! inbox publish D505 "Phase 2 started" --project C01
//! inbox ask C01 "what is the status?"
//! inbox serve                        # start the two-role dashboard
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`records`] | Flat-file record store access |
//! | [`embedding`] | Hosted embedding client |
//! | [`index`] | Hosted vector index client |
//! | [`llm`] | Hosted chat-completion client |
//! | [`prompt`] | Prompt template assembly |
//! | [`ingest`] | One-shot baseline ingestion |
//! | [`publish`] | Developer update publishing |
//! | [`answer`] | Client question answering |
//! | [`server`] | HTTP dashboard and JSON API |
//! | [`ui`] | Dashboard page rendering |

pub mod answer;
pub mod config;
pub mod embedding;
pub mod index;
pub mod ingest;
pub mod llm;
pub mod models;
pub mod prompt;
pub mod publish;
pub mod records;
pub mod server;
pub mod ui;

#[cfg(test)]
pub(crate) mod testing;
