//! Summarization entry points.

use std::sync::Arc;

use tracing::{debug, info};

use crate::backend::TextGenerator;
use crate::error::SummarizeError;
use crate::prompts;
use crate::splitter::TextSplitter;

/// Front door of the gateway. Holds the generator and the chunking policy.
#[derive(Clone)]
pub struct Summarizer {
    generator: Arc<dyn TextGenerator>,
    splitter: TextSplitter,
}

impl Summarizer {
    pub fn new(generator: Arc<dyn TextGenerator>, splitter: TextSplitter) -> Self {
        Self {
            generator,
            splitter,
        }
    }

    pub fn model(&self) -> &str {
        self.generator.model()
    }

    /// One-sentence summary of a proposal.
    pub async fn summarize(&self, title: &str, description: &str) -> Result<String, SummarizeError> {
        let prompt = prompts::proposal_summary(title, description);
        self.generator.generate(&prompt).await
    }

    /// Answer `question` about `raw_text` by summarising each chunk against
    /// the question and then combining the partial summaries.
    ///
    /// A blank question falls back to a general summary request. A document
    /// that fits in one chunk skips the combine step.
    pub async fn summarize_document(
        &self,
        raw_text: &str,
        question: &str,
    ) -> Result<String, SummarizeError> {
        let question = match question.trim() {
            "" => prompts::DEFAULT_DOCUMENT_QUESTION,
            q => q,
        };

        let chunks = self.splitter.split(raw_text);
        if chunks.is_empty() {
            return Err(SummarizeError::EmptyDocument);
        }

        info!(
            chunks = chunks.len(),
            model = %self.generator.model(),
            "summarizing document"
        );

        let mut partials = Vec::with_capacity(chunks.len());
        for (idx, chunk) in chunks.iter().enumerate() {
            let partial = self
                .generator
                .generate(&prompts::chunk_summary(question, chunk))
                .await?;
            debug!(chunk = idx, chars = partial.len(), "chunk summarized");
            partials.push(partial);
        }

        if partials.len() == 1 {
            return Ok(partials.remove(0));
        }

        self.generator
            .generate(&prompts::combine_summaries(question, &partials))
            .await
    }
}
