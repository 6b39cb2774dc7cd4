//! Indexing pipeline orchestration.
//!
//! Coordinates the end-to-end indexing of one resource:
//! 1. Derive the field schema from the attribute vocabulary
//! 2. Walk the document tree into entries
//! 3. Allocate entries to bounded chunks
//! 4. Build one inverted index per chunk
//! 5. Serialize every chunk index
//!
//! The result is all-or-nothing: any failure discards every chunk
//! built so far.

use std::time::Instant;

use chrono::Utc;

use crate::core::error::{ChunkdexError, Result};
use crate::core::indexer::{ChunkAllocator, DocumentWalker, FieldSchemaBuilder};
use crate::core::schema::SchemaAdapter;
use crate::core::search::InvertedIndexBuilder;
use crate::core::storage::{ChunkSerializer, SerializedChunk};
use crate::core::types::{AttributeVocabulary, DocumentNode, IndexStats};

/// Orchestrates the indexing pipeline
pub struct IndexingPipeline {
    allocator: ChunkAllocator,
    fields: FieldSchemaBuilder,
    builder: InvertedIndexBuilder,
    serializer: ChunkSerializer,
}

impl IndexingPipeline {
    /// Create a new indexing pipeline
    ///
    /// # Arguments
    ///
    /// * `max_chunk_size` - Chunk rollover threshold (must be > 0)
    pub fn new(max_chunk_size: usize) -> Result<Self> {
        if max_chunk_size == 0 {
            return Err(ChunkdexError::ConfigError(
                "Max chunk size must be non-zero".to_string(),
            ));
        }

        Ok(Self {
            allocator: ChunkAllocator::new(max_chunk_size),
            fields: FieldSchemaBuilder::new(),
            builder: InvertedIndexBuilder::new(),
            serializer: ChunkSerializer::new(),
        })
    }

    /// Index a resource from its JSON interchange form.
    ///
    /// # Arguments
    ///
    /// * `resource_id` - Identifier echoed into the stats
    /// * `schema` - Element definitions for the document's types
    /// * `vocabulary_json` - Attribute vocabulary as a JSON object
    /// * `document_json` - Document tree as JSON
    pub fn index_json<S: SchemaAdapter>(
        &mut self,
        resource_id: &str,
        schema: &S,
        vocabulary_json: &str,
        document_json: &str,
    ) -> Result<(Vec<SerializedChunk>, IndexStats)> {
        let vocabulary: AttributeVocabulary = serde_json::from_str(vocabulary_json)
            .map_err(|e| ChunkdexError::InvalidVocabulary(e.to_string()))?;
        let document: DocumentNode = serde_json::from_str(document_json)
            .map_err(|e| ChunkdexError::InvalidDocument(e.to_string()))?;

        self.index_document(resource_id, schema, &vocabulary, &document)
    }

    /// Index a parsed document and return its serialized chunks
    /// plus stats.
    pub fn index_document<S: SchemaAdapter>(
        &mut self,
        resource_id: &str,
        schema: &S,
        vocabulary: &AttributeVocabulary,
        document: &DocumentNode,
    ) -> Result<(Vec<SerializedChunk>, IndexStats)> {
        let start = Instant::now();

        // The field schema must exist before any chunk is built
        let field_schema = self.fields.build(vocabulary)?;

        let walked = DocumentWalker::new(schema).walk(document)?;
        let entries_indexed = walked.entries.len();
        if walked.skipped_nodes > 0 {
            tracing::debug!(
                "{}: skipped {} node(s) with no element definition",
                resource_id,
                walked.skipped_nodes
            );
        }

        let chunks = self.allocator.chunk_entries(walked.entries);

        let mut serialized = Vec::with_capacity(chunks.len());
        for (idx, chunk) in chunks.iter().enumerate() {
            let index = self.builder.build(chunk, &field_schema)?;
            tracing::debug!(
                "{}: chunk {} indexed ({} entries, {} terms)",
                resource_id,
                idx,
                index.entry_count(),
                index.term_count()
            );
            serialized.push(self.serializer.serialize(&index)?);
        }

        let duration_ms = start.elapsed().as_millis() as u64;

        tracing::info!(
            "Indexing complete for {}: {} entries in {} chunks, \
             {} skipped nodes, {}ms",
            resource_id,
            entries_indexed,
            serialized.len(),
            walked.skipped_nodes,
            duration_ms
        );

        let stats = IndexStats {
            resource_id: resource_id.to_string(),
            entries_indexed,
            chunks_created: serialized.len(),
            skipped_nodes: walked.skipped_nodes,
            duration_ms,
            indexed_at: Utc::now(),
        };

        Ok((serialized, stats))
    }
}
