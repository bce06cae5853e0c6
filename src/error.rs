use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid {field} '{value}'")]
    InvalidEnumValue { field: &'static str, value: String },
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),
    #[error("entry contents cannot be empty")]
    EmptyEntry,
    #[error("unknown workspace '{id}'")]
    UnknownWorkspace { id: u32 },
    #[error("a ticket needs at least one entry")]
    NoEntries,
    #[error("malformed backend response: {raw:?}")]
    MalformedResponse { raw: String },
    #[error("backend rejected the submission: {raw:?}")]
    BackendRejected { raw: String },
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("http error: {0}")]
    Http(String),
    #[error("tls error: {0}")]
    Tls(String),
    #[error("timed out connecting to {0}")]
    Timeout(String),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl AppError {
    pub(crate) fn invalid(field: &'static str, value: &str) -> Self {
        AppError::InvalidEnumValue {
            field,
            value: value.to_string(),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
