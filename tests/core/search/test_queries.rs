// End-to-end query behaviour over serialized chunk indexes.

use crate::common::{book_registry, book_vocabulary, load_chunks, TestDocument};
use chunkdex::core::indexer::{ChunkAllocator, DocumentWalker, FieldSchemaBuilder};
use chunkdex::core::search::InvertedIndexBuilder;
use chunkdex::{
    search_chunks, AttributeVocabulary, ChunkSerializer, ElementDefinition, ElementRegistry,
    IndexingPipeline,
};

fn index_book(max_chunk_size: usize) -> Vec<chunkdex::InvertedIndex> {
    let doc = TestDocument::book(3, 4);
    let (chunks, _) = IndexingPipeline::new(max_chunk_size)
        .unwrap()
        .index_json("book", &book_registry(), &book_vocabulary(), &doc.to_json())
        .unwrap();
    load_chunks(&chunks)
}

#[test]
fn test_serialized_indexes_answer_like_fresh_ones() {
    let doc = TestDocument::book(2, 2);
    let vocabulary: AttributeVocabulary = serde_json::from_str(&book_vocabulary()).unwrap();
    let schema = FieldSchemaBuilder::new().build(&vocabulary).unwrap();
    let entries = DocumentWalker::new(book_registry()).walk(&doc.root).unwrap().entries;

    let mut builder = InvertedIndexBuilder::new();
    let fresh: Vec<_> = ChunkAllocator::new(4)
        .chunk_entries(entries)
        .iter()
        .map(|chunk| builder.build(chunk, &schema).unwrap())
        .collect();

    let serializer = ChunkSerializer::new();
    let loaded = serializer
        .deserialize_all(&serializer.serialize_all(&fresh).unwrap())
        .unwrap();

    assert_eq!(loaded, fresh);
    for (field, term) in [
        ("elementName", "section"),
        ("softNode", "true"),
        ("contents", "appendix"),
        ("attr_role", "strong"),
    ] {
        assert_eq!(
            search_chunks(&loaded, field, term),
            search_chunks(&fresh, field, term),
            "{field}:{term}"
        );
    }
}

#[test]
fn test_element_name_hits_cover_every_chunk() {
    let indexes = index_book(5);
    assert!(indexes.len() > 1);

    // 3 chapters * 4 sections
    let sections = search_chunks(&indexes, "elementName", "section");
    assert_eq!(sections.len(), 12);
    assert!(sections.iter().all(|hit| hit.frequency == 1));

    for hit in &sections {
        let owners = indexes
            .iter()
            .filter(|index| index.contains_position(hit.position))
            .count();
        assert_eq!(owners, 1, "position {} owned by one chunk", hit.position);
    }
}

#[test]
fn test_contents_query_is_case_insensitive() {
    let indexes = index_book(2000);
    assert_eq!(indexes.len(), 1);

    let upper = search_chunks(&indexes, "contents", "APPENDIX");
    let lower = search_chunks(&indexes, "contents", "appendix");
    assert_eq!(upper, lower);
    assert_eq!(upper.len(), 12);
}

#[test]
fn test_stop_words_are_searchable() {
    let indexes = index_book(2000);
    // every footnote reads "See the appendix for the details."
    let hits = search_chunks(&indexes, "contents", "the");
    assert_eq!(hits.len(), 12);
    assert!(hits.iter().all(|hit| hit.frequency == 2));
}

#[test]
fn test_hard_node_text_is_not_searchable() {
    let indexes = index_book(2000);
    // "markup" only appears as loose text inside hard paras
    assert!(search_chunks(&indexes, "contents", "markup").is_empty());
}

#[test]
fn test_attribute_values_match_exactly() {
    let indexes = index_book(7);

    let hits = search_chunks(&indexes, "attr_xmlid", "ch1-s2");
    assert_eq!(hits.len(), 1);
    assert!(search_chunks(&indexes, "attr_xmlid", "CH1-S2").is_empty());
    // the chapter and its title share an id
    assert_eq!(search_chunks(&indexes, "attr_xmlid", "ch1").len(), 2);

    let langs = search_chunks(&indexes, "attr_xmllang", "en");
    assert_eq!(langs.len(), 1);
}

#[test]
fn test_soft_node_flag_partitions_entries() {
    let indexes = index_book(2000);
    let soft = search_chunks(&indexes, "softNode", "true").len();
    let hard = search_chunks(&indexes, "softNode", "false").len();
    let total: usize = indexes.iter().map(|index| index.entry_count()).sum();

    assert_eq!(soft + hard, total);
    // chapter titles + (section title, emphasis, footnote) per section
    assert_eq!(soft, 3 + 3 * 4 * 3);
}

#[test]
fn test_unknown_field_matches_nothing() {
    let indexes = index_book(2000);
    assert!(search_chunks(&indexes, "attr_missing", "x").is_empty());
    assert!(search_chunks(&indexes, "contents", "").is_empty());
}

#[test]
fn test_single_soft_title_is_searchable() {
    // One soft title: the title sits at 0 and its text is searchable
    let registry = ElementRegistry::new().with("title", ElementDefinition::soft());
    let doc = r#"{"type": "doc", "content": [
        {"type": "title", "content": [{"type": "text", "text": "Hello World"}]}
    ]}"#;

    let (chunks, stats) = IndexingPipeline::new(10)
        .unwrap()
        .index_json("title-doc", &registry, "{}", doc)
        .unwrap();
    assert_eq!(stats.entries_indexed, 1);

    let indexes = load_chunks(&chunks);
    let hits = search_chunks(&indexes, "contents", "world");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].position, 0);
    assert_eq!(hits[0].frequency, 1);

    let hits = search_chunks(&indexes, "contents", "hello");
    assert_eq!(hits.len(), 1);
}

#[test]
fn test_reindexing_is_idempotent() {
    let doc = TestDocument::book(2, 3).to_json();
    let mut pipeline = IndexingPipeline::new(6).unwrap();

    let (first, _) = pipeline
        .index_json("book", &book_registry(), &book_vocabulary(), &doc)
        .unwrap();
    let (second, _) = pipeline
        .index_json("book", &book_registry(), &book_vocabulary(), &doc)
        .unwrap();

    assert_eq!(first, second);
}
