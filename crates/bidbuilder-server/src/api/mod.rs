//! HTTP surface.
//!
//! Handlers extract the caller, take the database lock, call one service
//! function and release the lock before anything is awaited.

mod accounts;
mod analytics;
mod notifications;
mod proposals;
mod sections;
mod summaries;
mod templates;

use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    extract::DefaultBodyLimit,
    http::Method,
    routing::{get, post, put},
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use bidbuilder_shared::constants::APP_NAME;
use bidbuilder_shared::token::TokenIssuer;
use bidbuilder_store::Database;
use bidbuilder_summarizer::Summarizer;

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::service::analytics::Aggregator;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Mutex<Database>>,
    pub tokens: Arc<TokenIssuer>,
    pub summarizer: Summarizer,
    pub analytics: Aggregator,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(
        db: Database,
        tokens: TokenIssuer,
        summarizer: Summarizer,
        config: ServerConfig,
    ) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
            tokens: Arc::new(tokens),
            summarizer,
            analytics: Aggregator::new(config.analytics_window_months),
            config: Arc::new(config),
        }
    }

    /// Lock the shared connection. Never hold the guard across `.await`.
    pub fn db(&self) -> Result<MutexGuard<'_, Database>, ServerError> {
        self.db
            .lock()
            .map_err(|_| ServerError::Internal("database lock poisoned".into()))
    }
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any);

    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health_check))
        .route("/register", post(accounts::register))
        .route("/login", post(accounts::login))
        .route("/me", get(accounts::me))
        .route("/users", get(accounts::list_users))
        .route("/proposals", get(proposals::list).post(proposals::create))
        .route("/proposals/search", get(proposals::search))
        .route("/proposals/from-template", post(proposals::create_from_template))
        .route(
            "/proposals/:id",
            get(proposals::get)
                .put(proposals::update)
                .delete(proposals::delete),
        )
        .route("/proposals/:id/status", put(proposals::update_status))
        .route("/proposals/:id/reassign", post(proposals::reassign))
        .route("/proposals/:id/return", post(proposals::return_to_manager))
        .route(
            "/proposals/:id/sections",
            get(sections::list).post(sections::add),
        )
        .route(
            "/proposals/:id/comments",
            get(proposals::list_comments).post(proposals::add_comment),
        )
        .route(
            "/proposals/:id/chat",
            get(proposals::list_chat).post(proposals::send_chat),
        )
        .route("/proposals/:id/summary", get(summaries::proposal_summary))
        .route("/sections/:id", get(sections::fetch))
        .route("/sections/:id/assign", put(sections::assign))
        .route("/sections/:id/comments", post(sections::comment))
        .route("/templates", get(templates::list).post(templates::create))
        .route(
            "/templates/:id",
            get(templates::get)
                .put(templates::update)
                .delete(templates::delete),
        )
        .route("/notifications", get(notifications::list))
        .route("/notifications/:id/read", post(notifications::mark_read))
        .route("/analytics", get(analytics::fetch))
        .route("/summarize/pdf", post(summaries::summarize_pdf))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: APP_NAME,
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Run the one-off startup pass: seed analytics placeholders and recompute
/// the aggregates in a single transaction.
pub fn prepare(state: &AppState) -> Result<(), ServerError> {
    let db = state.db()?;
    let tx = db.transaction()?;
    state.analytics.seed_placeholders(&db)?;
    state.analytics.recompute(&db)?;
    tx.commit()?;
    Ok(())
}

pub async fn serve(state: AppState, addr: std::net::SocketAddr) -> anyhow::Result<()> {
    let app = build_router(state);

    info!(addr = %addr, "Starting HTTP API server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
