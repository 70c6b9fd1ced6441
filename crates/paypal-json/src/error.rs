//! JSON facade errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum JsonError {
    #[error("JSON encoding error: {0}")]
    Encoding(#[source] serde_json::Error),

    #[error("JSON decoding error: {0}")]
    Decoding(#[source] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl JsonError {
    pub fn is_encoding(&self) -> bool {
        matches!(self, JsonError::Encoding(_))
    }

    pub fn is_decoding(&self) -> bool {
        matches!(self, JsonError::Decoding(_))
    }
}
