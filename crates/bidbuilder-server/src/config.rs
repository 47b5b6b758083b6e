//! Server configuration loaded from environment variables.
//!
//! Every setting except the signing secret has a default suitable for local
//! development.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use bidbuilder_shared::constants::{
    DEFAULT_ANALYTICS_WINDOW_MONTHS, DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE,
    DEFAULT_HTTP_PORT, DEFAULT_TOKEN_TTL_MINUTES, MAX_ANALYTICS_WINDOW_MONTHS,
};
use bidbuilder_summarizer::{OllamaConfig, TextSplitter};

/// Used when `SECRET_KEY` is unset. Development only.
const DEV_SECRET_KEY: &str = "bidbuilder-dev-secret-change-me";

#[derive(Clone)]
pub struct ServerConfig {
    /// Env: `HTTP_ADDR`. Default: `0.0.0.0:8000`
    pub http_addr: SocketAddr,

    /// SQLite database file.
    /// Env: `DATABASE_PATH`. Default: `./bidbuilder.db`
    pub database_path: PathBuf,

    /// Token signing secret.
    /// Env: `SECRET_KEY`. Default: a fixed development value (logged as a warning).
    pub secret_key: String,

    /// Env: `ALGORITHM`. Default: `HS256`
    pub token_algorithm: String,

    /// Env: `ACCESS_TOKEN_EXPIRE_MINUTES`. Default: `60`
    pub token_ttl_minutes: i64,

    /// Env: `LLM_BASE_URL`. Default: `http://localhost:11434`
    pub llm_base_url: String,

    /// Env: `LLM_MODEL`. Default: `llama3:latest`
    pub llm_model: String,

    /// Env: `LLM_TEMPERATURE`. Default: `0.1`
    pub llm_temperature: f32,

    /// Upper bound on one generation call.
    /// Env: `LLM_TIMEOUT_SECS`. Default: `120`
    pub llm_timeout: Duration,

    /// Env: `CHUNK_SIZE` / `CHUNK_OVERLAP`. Default: `1500` / `150`
    pub chunk_size: usize,
    pub chunk_overlap: usize,

    /// Request body cap, PDF uploads included.
    /// Env: `MAX_UPLOAD_BYTES`. Default: 20 MiB
    pub max_upload_bytes: usize,

    /// Months covered by the monthly creation series.
    /// Env: `ANALYTICS_WINDOW_MONTHS`. Default: `6`
    pub analytics_window_months: u32,
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("http_addr", &self.http_addr)
            .field("database_path", &self.database_path)
            .field("secret_key", &"<redacted>")
            .field("token_algorithm", &self.token_algorithm)
            .field("token_ttl_minutes", &self.token_ttl_minutes)
            .field("llm_base_url", &self.llm_base_url)
            .field("llm_model", &self.llm_model)
            .field("llm_temperature", &self.llm_temperature)
            .field("llm_timeout", &self.llm_timeout)
            .field("chunk_size", &self.chunk_size)
            .field("chunk_overlap", &self.chunk_overlap)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("analytics_window_months", &self.analytics_window_months)
            .finish()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        let llm = OllamaConfig::default();
        Self {
            http_addr: ([0, 0, 0, 0], DEFAULT_HTTP_PORT).into(),
            database_path: PathBuf::from("./bidbuilder.db"),
            secret_key: DEV_SECRET_KEY.to_string(),
            token_algorithm: "HS256".to_string(),
            token_ttl_minutes: DEFAULT_TOKEN_TTL_MINUTES,
            llm_base_url: llm.base_url,
            llm_model: llm.model,
            llm_temperature: llm.temperature,
            llm_timeout: llm.timeout,
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            max_upload_bytes: 20 * 1024 * 1024, // 20 MiB
            analytics_window_months: DEFAULT_ANALYTICS_WINDOW_MONTHS,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reads values through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        parse_into(&lookup, "HTTP_ADDR", &mut config.http_addr);

        if let Some(path) = lookup("DATABASE_PATH") {
            config.database_path = PathBuf::from(path);
        }

        match lookup("SECRET_KEY") {
            Some(secret) if !secret.is_empty() => config.secret_key = secret,
            _ => tracing::warn!("SECRET_KEY not set, using the development secret"),
        }

        if let Some(alg) = lookup("ALGORITHM") {
            config.token_algorithm = alg;
        }

        parse_into(&lookup, "ACCESS_TOKEN_EXPIRE_MINUTES", &mut config.token_ttl_minutes);

        if let Some(url) = lookup("LLM_BASE_URL") {
            config.llm_base_url = url;
        }

        if let Some(model) = lookup("LLM_MODEL") {
            config.llm_model = model;
        }

        parse_into(&lookup, "LLM_TEMPERATURE", &mut config.llm_temperature);

        let mut timeout_secs = config.llm_timeout.as_secs();
        parse_into(&lookup, "LLM_TIMEOUT_SECS", &mut timeout_secs);
        config.llm_timeout = Duration::from_secs(timeout_secs);

        parse_into(&lookup, "CHUNK_SIZE", &mut config.chunk_size);
        parse_into(&lookup, "CHUNK_OVERLAP", &mut config.chunk_overlap);
        parse_into(&lookup, "MAX_UPLOAD_BYTES", &mut config.max_upload_bytes);
        parse_into(&lookup, "ANALYTICS_WINDOW_MONTHS", &mut config.analytics_window_months);
        if !(1..=MAX_ANALYTICS_WINDOW_MONTHS).contains(&config.analytics_window_months) {
            tracing::warn!(
                value = config.analytics_window_months,
                max = MAX_ANALYTICS_WINDOW_MONTHS,
                "ANALYTICS_WINDOW_MONTHS out of range, using default"
            );
            config.analytics_window_months = DEFAULT_ANALYTICS_WINDOW_MONTHS;
        }

        // RUST_LOG is handled directly by tracing-subscriber's EnvFilter.

        config
    }

    pub fn token_lifetime(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.token_ttl_minutes)
    }

    pub fn ollama(&self) -> OllamaConfig {
        OllamaConfig {
            base_url: self.llm_base_url.clone(),
            model: self.llm_model.clone(),
            temperature: self.llm_temperature,
            timeout: self.llm_timeout,
        }
    }

    pub fn splitter(&self) -> TextSplitter {
        TextSplitter::new(self.chunk_size, self.chunk_overlap)
    }
}

/// Overwrite `slot` with the parsed value of `key`, keeping the default and
/// warning when the value does not parse.
fn parse_into<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, slot: &mut T) {
    let Some(raw) = lookup(key) else {
        return;
    };
    match raw.trim().parse::<T>() {
        Ok(value) => *slot = value,
        Err(_) => tracing::warn!(key, value = %raw, "Invalid value, using default"),
    }
}
