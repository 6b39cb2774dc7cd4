//! Error types and error handling for chunkdex.
//!
//! This module defines the error type used throughout the crate
//! and its wire form, `IndexError`, which is what a failed
//! indexing request reports back across the worker boundary.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for chunkdex operations
pub type Result<T> = std::result::Result<T, ChunkdexError>;

/// Main error type for chunkdex
#[derive(Error, Debug)]
pub enum ChunkdexError {
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("Invalid vocabulary: {0}")]
    InvalidVocabulary(String),

    #[error("Protocol violation: {0}")]
    ProtocolViolation(String),

    #[error("Worker unavailable: {0}")]
    WorkerUnavailable(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl ChunkdexError {
    /// Get user-friendly error message
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Check if the caller can fix this by correcting its input and
    /// resubmitting
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ChunkdexError::SchemaMismatch(_)
                | ChunkdexError::InvalidDocument(_)
                | ChunkdexError::InvalidVocabulary(_)
        )
    }

    /// Check if this error takes down the worker that raised it
    pub fn is_fatal(&self) -> bool {
        matches!(self, ChunkdexError::ProtocolViolation(_))
    }
}

/// Category of a failed indexing request, as reported on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    SchemaMismatch,
    SerializationFailure,
    InvalidInput,
    Internal,
}

/// Serializable error carried by a failed `IndexResult`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexError {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&ChunkdexError> for IndexError {
    fn from(err: &ChunkdexError) -> Self {
        let kind = match err {
            ChunkdexError::SchemaMismatch(_) => ErrorKind::SchemaMismatch,
            ChunkdexError::SerializationFailed(_) => ErrorKind::SerializationFailure,
            ChunkdexError::InvalidDocument(_) | ChunkdexError::InvalidVocabulary(_) => {
                ErrorKind::InvalidInput
            }
            _ => ErrorKind::Internal,
        };

        Self {
            kind,
            message: err.message(),
        }
    }
}

impl From<ChunkdexError> for IndexError {
    fn from(err: ChunkdexError) -> Self {
        Self::from(&err)
    }
}
