use khabar_core::KhabarError;
use thiserror::Error;

/// Errors raised by the record and article stores.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON Lines file has a malformed line.
    #[error("json error at line {line}: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, StoreError>;

impl From<StoreError> for KhabarError {
    fn from(err: StoreError) -> Self {
        KhabarError::Store(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_into_core_store_error() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = StoreError::Json { line: 5, source };
        let core: KhabarError = err.into();
        assert!(matches!(core, KhabarError::Store(ref msg) if msg.contains("line 5")));
    }
}
