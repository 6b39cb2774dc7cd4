//! Core domain logic
//!
//! # Architecture
//!
//! - **config**: Configuration loading (TOML + environment)
//! - **error**: Error types and Result alias
//! - **logging**: Tracing subscriber setup
//! - **types**: Document tree, schema vocabulary, entries and chunks
//! - **schema**: Element definition lookup
//! - **xdg**: XDG directory handling
//! - **indexer**: Walking, chunking and pipeline orchestration
//! - **search**: Exact-match inverted index and term queries
//! - **storage**: Chunk index serialization
//! - **worker**: Asynchronous indexing coordinator

pub mod config;
pub mod error;
pub mod indexer;
pub mod logging;
pub mod schema;
pub mod search;
pub mod storage;
pub mod types;
pub mod worker;
pub mod xdg;

// Re-export key types for convenience
pub use config::Config;
pub use error::{ChunkdexError, Result};
pub use worker::{AsyncIndexCoordinator, ResponseStream};
