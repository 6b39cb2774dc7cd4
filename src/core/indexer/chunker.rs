//! Bounded, order-preserving entry chunking.
//!
//! Splits a document's entry sequence into chunks that can be
//! indexed, serialized and loaded independently. Entries are never
//! split, dropped or duplicated: concatenating the chunks gives back
//! the input.
//!
//! # Rollover
//!
//! The size check runs after each append and rolls over only when
//! the current chunk is strictly larger than `max_chunk_size`, so a
//! full chunk holds `max_chunk_size + 1` entries. Existing stored
//! indexes were cut this way; keep it.
//!
//! # Example
//!
//! ```
//! use chunkdex::core::indexer::ChunkAllocator;
//!
//! let allocator = ChunkAllocator::new(2);
//! let chunks = allocator.allocate(vec![10, 20, 30, 40, 50]);
//!
//! assert_eq!(chunks, vec![vec![10, 20, 30], vec![40, 50]]);
//! ```

use crate::core::types::{IndexChunk, IndexEntry};

/// Default maximum entries per chunk (before rollover)
pub const DEFAULT_MAX_CHUNK_SIZE: usize = 2000;

/// Partitions entries into bounded chunks.
#[derive(Debug, Clone)]
pub struct ChunkAllocator {
    /// Rollover threshold; chunks hold at most `max_chunk_size + 1`
    max_chunk_size: usize,
}

impl ChunkAllocator {
    /// Create a new allocator.
    ///
    /// # Panics
    ///
    /// Panics if `max_chunk_size` is 0.
    pub fn new(max_chunk_size: usize) -> Self {
        assert!(max_chunk_size > 0, "max_chunk_size must be > 0");

        Self { max_chunk_size }
    }

    /// Get the rollover threshold.
    pub fn max_chunk_size(&self) -> usize {
        self.max_chunk_size
    }

    /// Partition `items` into ordered chunks.
    ///
    /// Empty input yields exactly one empty chunk. Non-empty input
    /// never yields a trailing empty chunk.
    pub fn allocate<T>(&self, items: Vec<T>) -> Vec<Vec<T>> {
        let mut chunks = Vec::new();
        let mut current = Vec::new();

        for item in items {
            current.push(item);
            if current.len() > self.max_chunk_size {
                chunks.push(std::mem::take(&mut current));
            }
        }

        if !current.is_empty() || chunks.is_empty() {
            chunks.push(current);
        }

        chunks
    }

    /// Partition index entries into [`IndexChunk`]s.
    pub fn chunk_entries(&self, entries: Vec<IndexEntry>) -> Vec<IndexChunk> {
        self.allocate(entries)
            .into_iter()
            .map(|entries| IndexChunk { entries })
            .collect()
    }
}

impl Default for ChunkAllocator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CHUNK_SIZE)
    }
}
