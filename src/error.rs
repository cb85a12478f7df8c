/// Errors that can occur while converting between Markdown and the document tree.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConvertError {
    /// The Markdown/MDX tokenizer rejected the input (e.g. an unclosed component tag).
    #[error("markdown parse error: {0}")]
    Parse(String),
    /// Document JSON could not be read or written.
    #[error("document JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
