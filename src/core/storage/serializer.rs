//! Chunk index serialization.
//!
//! Each chunk index becomes one self-contained JSON blob carrying a
//! format version. Blobs are deterministic for a given index and can
//! be loaded one at a time at query time.

use crate::core::error::{ChunkdexError, Result};
use crate::core::search::InvertedIndex;
use serde::{Deserialize, Serialize};

/// Current blob format version
pub const FORMAT_VERSION: u32 = 1;

/// A storable, independently parseable chunk index
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SerializedChunk(String);

impl SerializedChunk {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for SerializedChunk {
    fn from(blob: String) -> Self {
        Self(blob)
    }
}

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    version: u32,
    index: &'a InvertedIndex,
}

#[derive(Deserialize)]
struct Envelope {
    version: u32,
    index: InvertedIndex,
}

#[derive(Deserialize)]
struct VersionProbe {
    version: u32,
}

/// Converts chunk indexes to and from their stored form
#[derive(Debug, Clone, Copy, Default)]
pub struct ChunkSerializer;

impl ChunkSerializer {
    pub fn new() -> Self {
        Self
    }

    /// Serialize one chunk index.
    pub fn serialize(&self, index: &InvertedIndex) -> Result<SerializedChunk> {
        let envelope = EnvelopeRef {
            version: FORMAT_VERSION,
            index,
        };

        serde_json::to_string(&envelope)
            .map(SerializedChunk)
            .map_err(|e| ChunkdexError::SerializationFailed(format!("Failed to encode chunk: {e}")))
    }

    /// Serialize every chunk of a document, failing on the first
    /// error so that no partial index is ever returned.
    pub fn serialize_all(&self, indexes: &[InvertedIndex]) -> Result<Vec<SerializedChunk>> {
        indexes.iter().map(|index| self.serialize(index)).collect()
    }

    /// Load one chunk index.
    pub fn deserialize(&self, chunk: &SerializedChunk) -> Result<InvertedIndex> {
        let probe: VersionProbe = serde_json::from_str(chunk.as_str()).map_err(|e| {
            ChunkdexError::SerializationFailed(format!("Malformed chunk header: {e}"))
        })?;

        if probe.version != FORMAT_VERSION {
            return Err(ChunkdexError::SerializationFailed(format!(
                "Unsupported chunk format version {} (expected {FORMAT_VERSION})",
                probe.version
            )));
        }

        let envelope: Envelope = serde_json::from_str(chunk.as_str())
            .map_err(|e| ChunkdexError::SerializationFailed(format!("Malformed chunk: {e}")))?;

        Ok(envelope.index)
    }

    /// Load every chunk of a document, in order.
    pub fn deserialize_all(&self, chunks: &[SerializedChunk]) -> Result<Vec<InvertedIndex>> {
        chunks.iter().map(|chunk| self.deserialize(chunk)).collect()
    }
}
