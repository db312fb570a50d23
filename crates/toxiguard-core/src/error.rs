//! Error types for Toxiguard

/// Result type alias using Toxiguard's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for Toxiguard operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Rejected user input (empty or whitespace-only text)
    #[error("validation error: {0}")]
    Validation(String),

    /// The classifier could not produce a label; nothing was stored
    #[error("classification unavailable: {0}")]
    ClassificationUnavailable(String),

    /// The comment store refused or failed a write
    #[error("could not save comment: {0}")]
    StoreWrite(String),

    /// The comment store could not be read
    #[error("store read error: {0}")]
    StoreRead(String),

    /// No pending draft with the given id
    #[error("draft not found: {0}")]
    DraftNotFound(String),

    /// Classifier execution errors
    #[error("classifier error: {0}")]
    Classifier(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a new validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a new classification-unavailable error
    pub fn classification_unavailable(msg: impl Into<String>) -> Self {
        Self::ClassificationUnavailable(msg.into())
    }

    /// Create a new store write error
    pub fn store_write(msg: impl Into<String>) -> Self {
        Self::StoreWrite(msg.into())
    }

    /// Create a new store read error
    pub fn store_read(msg: impl Into<String>) -> Self {
        Self::StoreRead(msg.into())
    }

    /// Create a new draft-not-found error
    pub fn draft_not_found(id: impl Into<String>) -> Self {
        Self::DraftNotFound(id.into())
    }

    /// Create a new classifier error
    pub fn classifier(msg: impl Into<String>) -> Self {
        Self::Classifier(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether the error is caused by user input rather than the system
    pub fn is_user_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::DraftNotFound(_))
    }
}
