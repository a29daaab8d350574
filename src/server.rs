//! HTTP dashboard and JSON API.
//!
//! Serves the two-role dashboard page and three JSON endpoints, all
//! sharing one [`AppState`] of dependency-injected service clients.
//! The record store file is re-read on every request, so edits to it
//! show up without a restart.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/` | Two-role dashboard page |
//! | `POST` | `/api/projects` | Developer login: list assigned projects |
//! | `POST` | `/api/publish` | Developer note submission |
//! | `POST` | `/api/ask` | Client question |
//! | `GET`  | `/health` | Health check (returns version) |
//!
//! # Error Contract
//!
//! All error responses share one JSON shape:
//!
//! ```json
//! { "error": { "code": "access_denied", "message": "..." } }
//! ```
//!
//! Codes: `access_denied` (403), `bad_request` (400), `no_context`
//! (404), `upstream_error` (502), `internal` (500).
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted.

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::answer::answer_question;
use crate::config::Config;
use crate::embedding::{Embedder, OpenAiEmbedder};
use crate::index::{PineconeIndex, VectorIndex};
use crate::llm::{ChatModel, GroqChat};
use crate::publish::publish_update;
use crate::records;
use crate::ui;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
struct AppState {
    config: Arc<Config>,
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
    chat: Arc<dyn ChatModel>,
}

/// Start the server with production service clients.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let embedder: Arc<dyn Embedder> = Arc::new(OpenAiEmbedder::new(&config.embedding)?);
    let index: Arc<dyn VectorIndex> = Arc::new(PineconeIndex::new(&config.index)?);
    let chat: Arc<dyn ChatModel> = Arc::new(GroqChat::new(&config.llm)?);

    run_server_with_clients(config, embedder, index, chat).await
}

/// Start the server with caller-supplied service clients. Split out so
/// alternative clients can be injected without touching the routes.
pub async fn run_server_with_clients(
    config: &Config,
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
    chat: Arc<dyn ChatModel>,
) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();

    let state = AppState {
        config: Arc::new(config.clone()),
        embedder,
        index,
        chat,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/", get(handle_dashboard))
        .route("/api/projects", post(handle_projects))
        .route("/api/publish", post(handle_publish))
        .route("/api/ask", post(handle_ask))
        .route("/health", get(handle_health))
        .layer(cors)
        .with_state(state);

    tracing::info!(addr = %bind_addr, "dashboard listening");
    println!("Living Inbox listening on http://{}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

struct AppError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code.to_string(),
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

/// Map an orchestration error onto the taxonomy: authorization
/// failures, empty-input failures, empty-result failures, and
/// everything else (external-service failures) as upstream errors.
fn classify_error(err: anyhow::Error) -> AppError {
    let message = err.to_string();

    if message.contains("access denied") || message.contains("invalid access key") {
        AppError {
            status: StatusCode::FORBIDDEN,
            code: "access_denied",
            message,
        }
    } else if message.contains("must not be empty") || message.contains("pass --project") {
        AppError {
            status: StatusCode::BAD_REQUEST,
            code: "bad_request",
            message,
        }
    } else if message.contains("no context found") {
        AppError {
            status: StatusCode::NOT_FOUND,
            code: "no_context",
            message,
        }
    } else {
        AppError {
            status: StatusCode::BAD_GATEWAY,
            code: "upstream_error",
            message,
        }
    }
}

fn internal_error(err: anyhow::Error) -> AppError {
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code: "internal",
        message: err.to_string(),
    }
}

// ============ GET / ============

async fn handle_dashboard() -> Html<String> {
    Html(ui::dashboard_page(&ui::DARK))
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ POST /api/projects ============

#[derive(Deserialize)]
struct ProjectsRequest {
    developer_id: String,
}

#[derive(Serialize)]
struct ProjectSummary {
    customer_id: String,
    client_name: String,
}

#[derive(Serialize)]
struct ProjectsResponse {
    projects: Vec<ProjectSummary>,
}

async fn handle_projects(
    State(state): State<AppState>,
    Json(req): Json<ProjectsRequest>,
) -> Result<Json<ProjectsResponse>, AppError> {
    let all_records =
        records::load_records(&state.config.records.path).map_err(internal_error)?;

    let assigned = records::assigned_to(&all_records, &req.developer_id);
    if assigned.is_empty() {
        tracing::warn!(developer_id = %req.developer_id, "developer login denied");
        return Err(AppError {
            status: StatusCode::FORBIDDEN,
            code: "access_denied",
            message: format!(
                "access denied: no projects found for developer id '{}'",
                req.developer_id
            ),
        });
    }

    let projects = assigned
        .iter()
        .map(|r| ProjectSummary {
            customer_id: r.customer_id.clone(),
            client_name: r.client_name.clone(),
        })
        .collect();

    Ok(Json(ProjectsResponse { projects }))
}

// ============ POST /api/publish ============

#[derive(Deserialize)]
struct PublishRequest {
    developer_id: String,
    customer_id: String,
    note: String,
}

#[derive(Serialize)]
struct PublishResponse {
    customer_id: String,
    client_name: String,
    chunk_id: String,
}

async fn handle_publish(
    State(state): State<AppState>,
    Json(req): Json<PublishRequest>,
) -> Result<Json<PublishResponse>, AppError> {
    let all_records =
        records::load_records(&state.config.records.path).map_err(internal_error)?;

    let receipt = publish_update(
        &all_records,
        state.embedder.as_ref(),
        state.index.as_ref(),
        &req.developer_id,
        Some(&req.customer_id),
        &req.note,
    )
    .await
    .map_err(classify_error)?;

    tracing::info!(
        developer_id = %req.developer_id,
        customer_id = %receipt.customer_id,
        chunk_id = %receipt.chunk_id,
        "update published"
    );

    Ok(Json(PublishResponse {
        customer_id: receipt.customer_id,
        client_name: receipt.client_name,
        chunk_id: receipt.chunk_id,
    }))
}

// ============ POST /api/ask ============

#[derive(Deserialize)]
struct AskRequest {
    customer_id: String,
    question: String,
}

#[derive(Serialize)]
struct AskResponse {
    answer: String,
}

async fn handle_ask(
    State(state): State<AppState>,
    Json(req): Json<AskRequest>,
) -> Result<Json<AskResponse>, AppError> {
    let all_records =
        records::load_records(&state.config.records.path).map_err(internal_error)?;

    let answer = answer_question(
        &all_records,
        state.embedder.as_ref(),
        state.index.as_ref(),
        state.chat.as_ref(),
        state.config.retrieval.top_k,
        &req.customer_id,
        &req.question,
    )
    .await
    .map_err(classify_error)?;

    tracing::info!(customer_id = %req.customer_id, "question answered");

    Ok(Json(AskResponse { answer }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_denied_maps_to_403() {
        let err = classify_error(anyhow::anyhow!(
            "access denied: no projects found for developer id 'D999'"
        ));
        assert_eq!(err.status, StatusCode::FORBIDDEN);
        assert_eq!(err.code, "access_denied");
    }

    #[test]
    fn test_invalid_access_key_maps_to_403() {
        let err = classify_error(anyhow::anyhow!("invalid access key: 'C99'"));
        assert_eq!(err.status, StatusCode::FORBIDDEN);
        assert_eq!(err.code, "access_denied");
    }

    #[test]
    fn test_empty_input_maps_to_400() {
        let err = classify_error(anyhow::anyhow!("question must not be empty"));
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.code, "bad_request");
    }

    #[test]
    fn test_no_context_maps_to_404() {
        let err = classify_error(anyhow::anyhow!("no context found for 'C01'"));
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.code, "no_context");
    }

    #[test]
    fn test_service_failures_map_to_502() {
        let err = classify_error(anyhow::anyhow!("Embedding API error 500: boom"));
        assert_eq!(err.status, StatusCode::BAD_GATEWAY);
        assert_eq!(err.code, "upstream_error");
    }
}
