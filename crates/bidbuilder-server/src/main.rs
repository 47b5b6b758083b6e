use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use bidbuilder_server::{api, AppState, ServerConfig};
use bidbuilder_shared::constants::APP_NAME;
use bidbuilder_shared::token::TokenIssuer;
use bidbuilder_store::Database;
use bidbuilder_summarizer::{OllamaBackend, Summarizer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // -----------------------------------------------------------------------
    // 1. Initialize tracing (respects RUST_LOG env var)
    // -----------------------------------------------------------------------
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,bidbuilder_server=debug")),
        )
        .init();

    info!("Starting {} server v{}", APP_NAME, env!("CARGO_PKG_VERSION"));

    // -----------------------------------------------------------------------
    // 2. Load configuration
    // -----------------------------------------------------------------------
    let config = ServerConfig::from_env();
    info!(?config, "Loaded configuration");

    // -----------------------------------------------------------------------
    // 3. Initialize subsystems
    // -----------------------------------------------------------------------

    // Opening runs any pending migrations
    let db = Database::open_at(&config.database_path)
        .with_context(|| format!("opening {}", config.database_path.display()))?;

    let tokens = TokenIssuer::new(
        &config.secret_key,
        &config.token_algorithm,
        config.token_lifetime(),
    )?;

    let backend = OllamaBackend::new(config.ollama())?;
    let summarizer = Summarizer::new(Arc::new(backend), config.splitter());
    info!(
        model = %summarizer.model(),
        base_url = %config.llm_base_url,
        timeout_secs = config.llm_timeout.as_secs(),
        "Summarizer configured"
    );

    let http_addr = config.http_addr;
    let state = AppState::new(db, tokens, summarizer, config);

    // -----------------------------------------------------------------------
    // 4. Startup pass: analytics placeholders and a fresh recompute
    // -----------------------------------------------------------------------
    api::prepare(&state)?;
    info!("Analytics recomputed");

    // -----------------------------------------------------------------------
    // 5. Run the HTTP API server (blocks until shutdown)
    // -----------------------------------------------------------------------
    tokio::select! {
        result = api::serve(state, http_addr) => {
            if let Err(e) = result {
                tracing::error!(error = %e, "HTTP server failed");
                return Err(e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
        }
    }

    Ok(())
}
