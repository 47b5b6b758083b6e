//! Ollama text-generation backend.
//!
//! Talks to the `/api/generate` endpoint with streaming disabled, so each
//! call is a single request/response bounded by the configured timeout.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::backend::TextGenerator;
use crate::error::SummarizeError;

/// Connection settings for an Ollama server.
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    /// Base URL, e.g. `http://localhost:11434`.
    pub base_url: String,
    /// Model tag, e.g. `llama3:latest`.
    pub model: String,
    pub temperature: f32,
    /// Upper bound on a single generation call.
    pub timeout: Duration,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "llama3:latest".to_string(),
            temperature: 0.1,
            timeout: Duration::from_secs(120),
        }
    }
}

pub struct OllamaBackend {
    client: Client,
    config: OllamaConfig,
}

impl OllamaBackend {
    pub fn new(config: OllamaConfig) -> Result<Self, SummarizeError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SummarizeError::Unavailable(format!("HTTP client setup failed: {e}")))?;

        Ok(Self { client, config })
    }

    fn generate_url(&self) -> String {
        format!("{}/api/generate", self.config.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

#[async_trait]
impl TextGenerator for OllamaBackend {
    fn model(&self) -> &str {
        &self.config.model
    }

    async fn generate(&self, prompt: &str) -> Result<String, SummarizeError> {
        let body = GenerateRequest {
            model: &self.config.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: self.config.temperature,
            },
        };

        debug!(model = %self.config.model, prompt_chars = prompt.len(), "calling text generator");

        let response = self
            .client
            .post(self.generate_url())
            .json(&body)
            .send()
            .await
            .map_err(|e| SummarizeError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(SummarizeError::RequestFailed(format!("HTTP {status}: {text}")));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| SummarizeError::RequestFailed(format!("unreadable response: {e}")))?;

        Ok(parsed.response.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn backend_for(server: &MockServer) -> OllamaBackend {
        OllamaBackend::new(OllamaConfig {
            base_url: server.uri(),
            model: "test-model".into(),
            temperature: 0.0,
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn generate_posts_non_streaming_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .and(body_partial_json(serde_json::json!({
                "model": "test-model",
                "stream": false,
                "prompt": "hello"
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "response": "  world \n" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let out = backend_for(&server).generate("hello").await.unwrap();
        assert_eq!(out, "world");
    }

    #[tokio::test]
    async fn error_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("model not loaded"))
            .mount(&server)
            .await;

        let err = backend_for(&server).generate("x").await.unwrap_err();
        assert!(matches!(err, SummarizeError::RequestFailed(_)));
    }

    #[tokio::test]
    async fn unreachable_server_is_unavailable() {
        let backend = OllamaBackend::new(OllamaConfig {
            base_url: "http://127.0.0.1:9".into(),
            timeout: Duration::from_secs(2),
            ..Default::default()
        })
        .unwrap();

        let err = backend.generate("x").await.unwrap_err();
        assert!(matches!(err, SummarizeError::Unavailable(_)));
    }

    #[tokio::test]
    async fn slow_server_hits_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "response": "late" }))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let backend = OllamaBackend::new(OllamaConfig {
            base_url: server.uri(),
            timeout: Duration::from_millis(200),
            ..Default::default()
        })
        .unwrap();

        let err = backend.generate("x").await.unwrap_err();
        assert!(matches!(err, SummarizeError::Unavailable(_)));
    }
}
