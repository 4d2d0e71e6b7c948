use thiserror::Error;

#[derive(Debug, Error)]
pub enum PrimexError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Collection '{key}' is corrupt: {reason}")]
    CorruptCollection { key: String, reason: String },
}

impl PrimexError {
    /// Returns `true` when the error was caused by bad user input rather than
    /// by the store or the network.
    pub fn is_user_error(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}

pub type Result<T> = std::result::Result<T, PrimexError>;
