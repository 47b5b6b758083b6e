//! The text-generation seam.

use async_trait::async_trait;

use crate::error::SummarizeError;

/// A synchronous request/response text-generation service.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Identifier of the model behind this generator, for logging.
    fn model(&self) -> &str;

    /// Generate a completion for `prompt`.
    async fn generate(&self, prompt: &str) -> Result<String, SummarizeError>;
}
