use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),
    #[error("failed to serialize history entry: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("unsupported history store type: {0}")]
    Unsupported(String),
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("chat model is not configured: {0}")]
    NotConfigured(String),
    #[error("chat provider error: {0}")]
    Provider(String),
    #[error("chat provider returned no text")]
    EmptyResponse,
}

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("messaging client is not configured: {0}")]
    NotConfigured(&'static str),
    #[error("request to messaging API failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("messaging API rejected the message with {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Failures inside the relay's message branch.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}
