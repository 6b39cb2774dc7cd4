//! Exact-match inverted indexing.
//!
//! This module provides the token pipeline and the per-chunk
//! inverted index, along with the field-scoped term query that
//! search features run against it.

pub mod index;
pub mod tokenizer;

pub use index::{
    search_chunks, ChunkSpan, InvertedIndex, InvertedIndexBuilder, Postings, QueryHit,
};
pub use tokenizer::{normalize_query_term, ExactAnalyzer};
