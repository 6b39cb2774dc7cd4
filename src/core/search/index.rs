//! Per-chunk inverted index.
//!
//! Each entry of a chunk is indexed as one document keyed by its
//! position. Postings are kept in ordered maps so that an index
//! (and therefore its serialized form) is a pure function of its
//! input.

use crate::core::error::{ChunkdexError, Result};
use crate::core::indexer::fields::{
    FieldSchema, CONTENTS_FIELD, ELEMENT_NAME_FIELD, SOFT_NODE_FIELD,
};
use crate::core::search::tokenizer::{self, ExactAnalyzer};
use crate::core::types::{IndexChunk, IndexEntry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// term → field → position → term frequency
pub type Postings = BTreeMap<String, BTreeMap<String, BTreeMap<u64, u32>>>;

/// First and last position covered by a chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkSpan {
    pub start: u64,
    pub end: u64,
}

/// A single query match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryHit {
    pub position: u64,
    pub frequency: u32,
}

/// Inverted index over one chunk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvertedIndex {
    schema: FieldSchema,
    span: Option<ChunkSpan>,
    entry_count: usize,
    postings: Postings,
}

impl InvertedIndex {
    pub fn schema(&self) -> &FieldSchema {
        &self.schema
    }

    pub fn span(&self) -> Option<ChunkSpan> {
        self.span
    }

    /// Number of entries indexed
    pub fn entry_count(&self) -> usize {
        self.entry_count
    }

    pub fn postings(&self) -> &Postings {
        &self.postings
    }

    /// Number of distinct terms across all fields
    pub fn term_count(&self) -> usize {
        self.postings.len()
    }

    /// Whether `position` falls inside this chunk's span
    pub fn contains_position(&self, position: u64) -> bool {
        self.span
            .is_some_and(|span| span.start <= position && position <= span.end)
    }

    /// Field-scoped exact-term query.
    ///
    /// The term goes through the field's pipeline first: lower-cased
    /// single token for `contents`, literal for every other field.
    /// Hits are ordered by descending frequency, then ascending
    /// position. Unknown fields match nothing.
    pub fn query(&self, field: &str, term: &str) -> Vec<QueryHit> {
        match normalize_query_term(field, term) {
            Some(term) => {
                let mut hits = self.lookup(field, &term);
                rank(&mut hits);
                hits
            }
            None => Vec::new(),
        }
    }

    /// Raw postings for an already-normalized term, in position order
    fn lookup(&self, field: &str, term: &str) -> Vec<QueryHit> {
        self.postings
            .get(term)
            .and_then(|fields| fields.get(field))
            .map(|positions| {
                positions
                    .iter()
                    .map(|(&position, &frequency)| QueryHit {
                        position,
                        frequency,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Query every chunk of a document and merge the hits.
///
/// The merged hits follow the same ordering as
/// [`InvertedIndex::query`].
pub fn search_chunks(indexes: &[InvertedIndex], field: &str, term: &str) -> Vec<QueryHit> {
    let Some(term) = normalize_query_term(field, term) else {
        return Vec::new();
    };

    let mut hits: Vec<QueryHit> = indexes
        .iter()
        .flat_map(|index| index.lookup(field, &term))
        .collect();
    rank(&mut hits);
    hits
}

fn normalize_query_term(field: &str, term: &str) -> Option<String> {
    if field == CONTENTS_FIELD {
        tokenizer::normalize_query_term(term)
    } else {
        Some(term.to_string())
    }
}

fn rank(hits: &mut [QueryHit]) {
    hits.sort_by(|a, b| {
        b.frequency
            .cmp(&a.frequency)
            .then(a.position.cmp(&b.position))
    });
}

/// Builds one [`InvertedIndex`] per chunk
#[derive(Debug, Clone, Default)]
pub struct InvertedIndexBuilder {
    analyzer: ExactAnalyzer,
}

impl InvertedIndexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every entry of `chunk` against the document's schema.
    ///
    /// # Errors
    ///
    /// Returns `SchemaMismatch` if any entry carries an attribute
    /// field the schema does not declare. The schema must have been
    /// built from the full vocabulary before any chunk is indexed.
    pub fn build(&mut self, chunk: &IndexChunk, schema: &FieldSchema) -> Result<InvertedIndex> {
        for entry in chunk.iter() {
            check_fields(entry, schema)?;
        }

        let mut postings = Postings::new();
        for entry in chunk.iter() {
            self.index_entry(&mut postings, entry);
        }

        let span = match (chunk.entries.first(), chunk.entries.last()) {
            (Some(first), Some(last)) => Some(ChunkSpan {
                start: first.position,
                end: last.position,
            }),
            _ => None,
        };

        Ok(InvertedIndex {
            schema: schema.clone(),
            span,
            entry_count: chunk.len(),
            postings,
        })
    }

    fn index_entry(&mut self, postings: &mut Postings, entry: &IndexEntry) {
        let position = entry.position;

        add_posting(postings, &entry.element_name, ELEMENT_NAME_FIELD, position);
        add_posting(
            postings,
            if entry.is_soft { "true" } else { "false" },
            SOFT_NODE_FIELD,
            position,
        );

        if let Some(contents) = &entry.contents {
            for token in self.analyzer.tokenize(contents) {
                add_posting(postings, &token, CONTENTS_FIELD, position);
            }
        }

        for (field, value) in &entry.attribute_fields {
            add_posting(postings, value, field, position);
        }
    }
}

fn check_fields(entry: &IndexEntry, schema: &FieldSchema) -> Result<()> {
    match entry
        .attribute_fields
        .keys()
        .find(|field| !schema.contains(field))
    {
        Some(field) => Err(ChunkdexError::SchemaMismatch(format!(
            "field '{field}' on <{}> at position {} is not in the document's field schema",
            entry.element_name, entry.position
        ))),
        None => Ok(()),
    }
}

fn add_posting(postings: &mut Postings, term: &str, field: &str, position: u64) {
    *postings
        .entry(term.to_string())
        .or_default()
        .entry(field.to_string())
        .or_default()
        .entry(position)
        .or_insert(0) += 1;
}
