use thiserror::Error;

#[derive(Debug, Error)]
pub enum SummarizeError {
    /// The generation service could not be reached or timed out.
    #[error("Text generation service unavailable: {0}")]
    Unavailable(String),

    /// The service answered with an error status or an unreadable body.
    #[error("Text generation request failed: {0}")]
    RequestFailed(String),

    /// Text could not be extracted from an uploaded document.
    #[error("Could not read document: {0}")]
    Document(String),

    /// Nothing to summarise.
    #[error("Document contains no extractable text")]
    EmptyDocument,
}
