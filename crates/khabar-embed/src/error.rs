use khabar_core::KhabarError;
use thiserror::Error;

/// Errors raised while loading or running the embedding model.
#[derive(Debug, Error)]
pub enum EmbedError {
    /// A model file is missing or unusable.
    #[error("model load error: {0}")]
    ModelLoad(String),

    #[error("tokenizer error: {0}")]
    Tokenizer(String),

    #[error("candle error: {0}")]
    Candle(#[from] candle_core::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid model config: {0}")]
    Json(#[from] serde_json::Error),

    /// The tokenizer produced no tokens for the input.
    #[error("text encodes to no tokens")]
    EmptyEncoding,
}

pub type Result<T> = std::result::Result<T, EmbedError>;

impl From<EmbedError> for KhabarError {
    fn from(err: EmbedError) -> Self {
        KhabarError::Embedding(err.to_string())
    }
}
