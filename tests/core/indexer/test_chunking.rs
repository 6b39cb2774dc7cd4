// Chunking properties against the walker's standalone output.

use crate::common::{book_registry, TestDocument};
use chunkdex::core::indexer::{ChunkAllocator, DocumentWalker};
use chunkdex::ElementRegistry;
use chunkdex::ElementDefinition;

#[test]
fn test_chunking_is_lossless_and_ordered() {
    let doc = TestDocument::book(4, 5);
    let entries = DocumentWalker::new(book_registry()).walk(&doc.root).unwrap().entries;

    for max in [1, 2, 3, 7, 50, 2000] {
        let chunks = ChunkAllocator::new(max).chunk_entries(entries.clone());
        let rejoined: Vec<_> = chunks.iter().flat_map(|c| c.iter().cloned()).collect();

        assert_eq!(rejoined, entries, "max_chunk_size = {max}");
        assert!(chunks.iter().all(|c| c.len() <= max + 1));
    }
}

#[test]
fn test_sequential_paras_split_in_two() {
    let registry = ElementRegistry::new().with("para", ElementDefinition::hard());
    let doc = TestDocument::flat_paras(5);

    let entries = DocumentWalker::new(registry).walk(&doc.root).unwrap().entries;
    let positions: Vec<u64> = entries.iter().map(|e| e.position).collect();
    assert_eq!(positions, vec![0, 1, 2, 3, 4]);

    let chunks = ChunkAllocator::new(2).chunk_entries(entries);
    let layout: Vec<Vec<u64>> = chunks
        .iter()
        .map(|c| c.iter().map(|e| e.position).collect())
        .collect();
    assert_eq!(layout, vec![vec![0, 1, 2], vec![3, 4]]);
}

#[test]
fn test_empty_document_single_empty_chunk() {
    let doc = TestDocument::flat_paras(0);
    let entries = DocumentWalker::new(book_registry()).walk(&doc.root).unwrap().entries;

    let chunks = ChunkAllocator::default().chunk_entries(entries);
    assert_eq!(chunks.len(), 1);
    assert!(chunks[0].is_empty());
}

#[test]
fn test_full_chunks_hold_limit_plus_one() {
    let doc = TestDocument::flat_paras(10);
    let registry = ElementRegistry::new().with("para", ElementDefinition::hard());
    let entries = DocumentWalker::new(registry).walk(&doc.root).unwrap().entries;

    let sizes: Vec<usize> = ChunkAllocator::new(3)
        .chunk_entries(entries)
        .iter()
        .map(|c| c.len())
        .collect();
    assert_eq!(sizes, vec![4, 4, 2]);
}
