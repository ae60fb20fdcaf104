// src/domain/error.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid date tag: {0}")]
    InvalidDateTag(String),

    #[error("Link not found: {0}")]
    LinkNotFound(String),

    #[error("Link operation failed: {0}")]
    LinkOperationFailed(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Snapshot error: {0}")]
    Snapshot(String),

    #[error("Repository error: {0}")]
    RepositoryError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    Other(String),
}

impl DomainError {
    /// Prefix the error message with additional context.
    pub fn context<C: Into<String>>(self, context: C) -> Self {
        match self {
            DomainError::Other(msg) => DomainError::Other(format!("{}: {}", context.into(), msg)),
            DomainError::LinkOperationFailed(msg) => {
                DomainError::LinkOperationFailed(format!("{}: {}", context.into(), msg))
            }
            err => DomainError::Other(format!("{}: {}", context.into(), err)),
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
