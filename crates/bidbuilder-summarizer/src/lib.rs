//! # bidbuilder-summarizer
//!
//! Summarization gateway. Proposal text and uploaded documents are handed to
//! an external text-generation service (an Ollama server by default) through
//! the [`TextGenerator`] trait.
//!
//! Documents are split into bounded, overlapping chunks; each chunk is
//! summarised against the caller's question and the partial answers are then
//! combined into one (map-reduce).

pub mod backend;
pub mod ollama;
pub mod pdf;
pub mod prompts;
pub mod splitter;
pub mod summarizer;

mod error;

pub use backend::TextGenerator;
pub use error::SummarizeError;
pub use ollama::{OllamaBackend, OllamaConfig};
pub use splitter::TextSplitter;
pub use summarizer::Summarizer;
