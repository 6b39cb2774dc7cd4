//! chunkdex - chunked exact-match indexing for markup documents
//!
//! Builds bounded-size inverted indexes over hierarchical markup
//! documents (typed element trees with attributes) so that large
//! documents can be searched chunk by chunk, off the editing
//! thread.
//!
//! # Architecture
//!
//! Everything lives under **core**:
//!
//! - indexer: field schema, document walker, chunk allocator,
//!   pipeline
//! - search: exact-match tokenizer, per-chunk inverted index
//! - storage: chunk index serialization
//! - worker: request/response protocol and coordinator
//!
//! # Key Features
//!
//! - No stemming or stop words: every literal token is searchable
//! - Per-document field schema shared by all chunks
//! - Independently loadable chunk blobs
//! - Worker threads with resource-id correlated results

// Core domain logic
pub mod core;

// Re-export commonly used types for convenience
pub use crate::core::config::Config;
pub use crate::core::error::{ChunkdexError, ErrorKind, IndexError, Result};
pub use crate::core::indexer::{FieldSchema, IndexingPipeline};
pub use crate::core::logging::init_logging;
pub use crate::core::schema::{ElementRegistry, SchemaAdapter};
pub use crate::core::search::{search_chunks, InvertedIndex, QueryHit};
pub use crate::core::storage::{ChunkSerializer, SerializedChunk};
pub use crate::core::types::*;
pub use crate::core::worker::{AsyncIndexCoordinator, IndexResult, ResponseStream, WorkerResponse};
