//! Storable form of chunk indexes.
//!
//! Persisting the blobs is the host's concern; this module only
//! produces and loads them.

mod serializer;

pub use serializer::{ChunkSerializer, SerializedChunk, FORMAT_VERSION};
