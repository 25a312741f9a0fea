use crate::provider::ProviderError;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("{0}")]
    Validation(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
