use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotasError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Template not found: {0}")]
    NotFound(String),

    /// Reserved for title and filename checks; also used for API misuse.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Save already in progress: {}", .0.display())]
    SaveInProgress(PathBuf),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Logging error: {0}")]
    Logging(String),
}

pub type Result<T> = std::result::Result<T, NotasError>;
