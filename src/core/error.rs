//! Error types shared by the profile builder and the persona service.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Persona error type.
#[derive(Error, Debug)]
pub enum PersonaError {
    /// No stored record exists for the persona name
    #[error("persona not found: {name}")]
    NotFound { name: String },

    /// Operation attempted in a state that cannot serve it
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Completion service errored or was unreachable
    #[error("completion service error: {0}")]
    Upstream(String),

    /// Persona record could not be written, read, or validated
    #[error("storage error: {0}")]
    Storage(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PersonaError {
    /// Classify the error for client-visible reporting.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PersonaError::NotFound { .. } => ErrorKind::NotFound,
            PersonaError::InvalidState(_) => ErrorKind::InvalidState,
            PersonaError::Upstream(_) => ErrorKind::Upstream,
            PersonaError::Storage(_) | PersonaError::Io(_) | PersonaError::Serialization(_) => {
                ErrorKind::Storage
            }
        }
    }
}

/// Client-visible error classes reported across the service boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    InvalidState,
    Upstream,
    Storage,
}

impl ErrorKind {
    /// Rebuild a typed error from a kind and the message reported with it.
    ///
    /// `NotFound` carries the message as the persona name, so round-tripping a
    /// `NotFound` error yields the name it was raised for.
    pub fn into_error(self, message: impl Into<String>) -> PersonaError {
        let message = message.into();
        match self {
            ErrorKind::NotFound => PersonaError::NotFound { name: message },
            ErrorKind::InvalidState => PersonaError::InvalidState(message),
            ErrorKind::Upstream => PersonaError::Upstream(message),
            ErrorKind::Storage => PersonaError::Storage(message),
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::NotFound => write!(f, "not_found"),
            ErrorKind::InvalidState => write!(f, "invalid_state"),
            ErrorKind::Upstream => write!(f, "upstream"),
            ErrorKind::Storage => write!(f, "storage"),
        }
    }
}

/// Result type alias for persona operations.
pub type Result<T> = std::result::Result<T, PersonaError>;
