//! Messages crossing the worker boundary.
//!
//! Requests travel to a worker as encoded JSON envelopes, so the
//! worker owns its own copy of every input. Anything a worker
//! cannot decode into a known request is a protocol violation.

use crate::core::error::{ChunkdexError, IndexError, Result};
use crate::core::storage::SerializedChunk;
use crate::core::types::IndexStats;
use serde::{Deserialize, Serialize};

/// Request to index one resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexRequest {
    /// Correlation id echoed in the result
    pub resource_id: String,

    /// Attribute vocabulary as a JSON object
    pub attribute_vocabulary: String,

    /// Document tree as JSON
    pub document_content: String,
}

/// Every request a worker understands
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WorkerRequest {
    Index(IndexRequest),
}

impl WorkerRequest {
    /// Encode for transfer to a worker
    pub fn encode(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| ChunkdexError::ProtocolViolation(format!("Unencodable request: {e}")))
    }

    /// Decode a transferred request.
    ///
    /// # Errors
    ///
    /// Any malformed or unrecognized envelope is a
    /// `ProtocolViolation`.
    pub fn decode(raw: &str) -> Result<Self> {
        serde_json::from_str(raw)
            .map_err(|e| ChunkdexError::ProtocolViolation(format!("Unrecognized request: {e}")))
    }
}

/// Outcome of one indexing request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum IndexResult {
    Indexed {
        resource_id: String,
        serialized_index: Vec<SerializedChunk>,
        stats: IndexStats,
    },
    Failed {
        resource_id: String,
        error: IndexError,
    },
}

impl IndexResult {
    pub fn resource_id(&self) -> &str {
        match self {
            IndexResult::Indexed { resource_id, .. } | IndexResult::Failed { resource_id, .. } => {
                resource_id
            }
        }
    }

    pub fn is_indexed(&self) -> bool {
        matches!(self, IndexResult::Indexed { .. })
    }

    pub fn serialized_index(&self) -> Option<&[SerializedChunk]> {
        match self {
            IndexResult::Indexed {
                serialized_index, ..
            } => Some(serialized_index),
            IndexResult::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&IndexError> {
        match self {
            IndexResult::Failed { error, .. } => Some(error),
            IndexResult::Indexed { .. } => None,
        }
    }
}

/// A worker stopped after a protocol violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerFault {
    pub worker_id: usize,
    pub message: String,
}

/// Everything a worker sends back
#[derive(Debug, Clone, PartialEq)]
pub enum WorkerResponse {
    Result(IndexResult),
    Fault(WorkerFault),
}
