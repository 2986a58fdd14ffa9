use thiserror::Error;

/// Errors that can occur during Khabar retrieval.
#[derive(Debug, Error)]
pub enum KhabarError {
    /// The query text is empty or contains only whitespace.
    #[error("input is empty or whitespace-only")]
    EmptyInput,

    /// No candidate could be produced, even without the language filter.
    #[error("no article found in the store (language: {language})")]
    NotFound {
        /// The language the search was first narrowed to.
        language: String,
    },

    /// The embedding collaborator failed.
    #[error("embedding error: {0}")]
    Embedding(String),

    /// The vector or article store failed.
    #[error("store error: {0}")]
    Store(String),

    /// The lexicon configuration is unusable.
    #[error("invalid lexicon: {0}")]
    Lexicon(String),

    /// A regex pattern failed to compile.
    #[error("regex compilation error: {0}")]
    RegexError(#[from] regex::Error),

    /// Reading a configuration file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration document is not valid JSON.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for Khabar operations.
pub type Result<T> = std::result::Result<T, KhabarError>;
