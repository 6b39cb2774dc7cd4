// Coordinator behaviour: correlation, failure reporting and faults.

use crate::common::{
    book_registry, book_vocabulary, index_result_chunks, load_chunks, start_coordinator,
    TestDocument,
};
use chunkdex::{
    search_chunks, ChunkdexError, ElementDefinition, ElementRegistry, ErrorKind, WorkerResponse,
};

fn para_registry() -> ElementRegistry {
    ElementRegistry::new().with("para", ElementDefinition::hard())
}

#[tokio::test]
async fn test_sequential_paras_through_worker() {
    let (coordinator, mut stream) = start_coordinator(para_registry(), 1, 2);
    let doc = TestDocument::flat_paras(5).to_json();

    coordinator.index_resource("doc-a", "{}", doc).await.unwrap();
    let result = stream.recv_for("doc-a").await.unwrap();

    let chunks = index_result_chunks(&result);
    assert_eq!(chunks.len(), 2);

    let indexes = load_chunks(&chunks);
    let counts: Vec<usize> = indexes.iter().map(|i| i.entry_count()).collect();
    assert_eq!(counts, vec![3, 2]);

    let positions: Vec<u64> = search_chunks(&indexes, "elementName", "para")
        .iter()
        .map(|hit| hit.position)
        .collect();
    assert_eq!(positions, vec![0, 1, 2, 3, 4]);

    coordinator.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_schema_mismatch_reports_failure() {
    let registry =
        ElementRegistry::new().with("para", ElementDefinition::hard().with_attrs(["foo"]));
    let (coordinator, mut stream) = start_coordinator(registry, 1, 10);
    let doc = r#"{"type": "doc", "content": [{"type": "para", "attrs": {"foo": "x"}}]}"#;

    coordinator.index_resource("doc-c", "{}", doc).await.unwrap();
    let result = stream.recv_for("doc-c").await.unwrap();

    assert!(!result.is_indexed());
    assert!(result.serialized_index().is_none());
    assert_eq!(result.error().unwrap().kind, ErrorKind::SchemaMismatch);
    assert!(result.error().unwrap().message.contains("attr_foo"));

    coordinator.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_malformed_document_is_invalid_input() {
    let (coordinator, mut stream) = start_coordinator(para_registry(), 1, 10);

    coordinator
        .index_resource("broken", "{}", "{not json")
        .await
        .unwrap();
    let result = stream.recv_for("broken").await.unwrap();
    assert_eq!(result.error().unwrap().kind, ErrorKind::InvalidInput);

    // the worker keeps serving after an input error
    coordinator
        .index_resource("fine", "{}", TestDocument::flat_paras(1).to_json())
        .await
        .unwrap();
    assert!(stream.recv_for("fine").await.unwrap().is_indexed());

    coordinator.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_overflowing_node_size_is_invalid_input() {
    let (coordinator, mut stream) = start_coordinator(para_registry(), 1, 10);
    let doc = r#"{"type": "doc", "content": [
        {"type": "para", "nodeSize": 18446744073709551615},
        {"type": "para", "nodeSize": 18446744073709551615},
        {"type": "para"}
    ]}"#;

    coordinator.index_resource("huge", "{}", doc).await.unwrap();
    let result = stream.recv_for("huge").await.unwrap();

    assert!(result.serialized_index().is_none());
    assert_eq!(result.error().unwrap().kind, ErrorKind::InvalidInput);

    coordinator.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_concurrent_requests_correlate_by_resource_id() {
    let (coordinator, mut stream) = start_coordinator(book_registry(), 3, 8);

    let sizes = [(1, 1), (4, 6), (2, 2), (3, 1), (1, 5), (2, 3)];
    for (idx, (chapters, sections)) in sizes.iter().enumerate() {
        let doc = TestDocument::book(*chapters, *sections).to_json();
        coordinator
            .index_resource(format!("book-{idx}"), book_vocabulary(), doc)
            .await
            .unwrap();
    }

    // ask in reverse to force buffering of early arrivals
    for (idx, (chapters, sections)) in sizes.iter().enumerate().rev() {
        let result = stream.recv_for(&format!("book-{idx}")).await.unwrap();
        let indexes = load_chunks(&index_result_chunks(&result));

        let found = search_chunks(&indexes, "elementName", "section").len();
        assert_eq!(found, chapters * sections, "book-{idx}");
    }

    coordinator.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_identical_requests_give_identical_results() {
    let (coordinator, mut stream) = start_coordinator(book_registry(), 2, 5);
    let doc = TestDocument::book(2, 2).to_json();

    coordinator
        .index_resource("first", book_vocabulary(), doc.clone())
        .await
        .unwrap();
    coordinator
        .index_resource("second", book_vocabulary(), doc)
        .await
        .unwrap();

    let first = stream.recv_for("first").await.unwrap();
    let second = stream.recv_for("second").await.unwrap();
    assert_eq!(index_result_chunks(&first), index_result_chunks(&second));

    coordinator.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_protocol_violation_faults_worker() {
    let (coordinator, mut stream) = start_coordinator(para_registry(), 1, 10);

    coordinator
        .submit_raw(r#"{"kind": "compact"}"#.to_string())
        .await
        .unwrap();

    match stream.recv().await.unwrap() {
        WorkerResponse::Fault(fault) => {
            assert_eq!(fault.worker_id, 0);
            assert!(fault.message.contains("Protocol violation"));
        }
        WorkerResponse::Result(result) => panic!("unexpected result: {result:?}"),
    }

    // the only worker is gone; once its queue closes, nothing is accepted
    assert!(stream.recv().await.is_none());
    assert_eq!(coordinator.live_workers(), 0);

    let err = coordinator
        .index_resource("late", "{}", TestDocument::flat_paras(1).to_json())
        .await
        .unwrap_err();
    assert!(matches!(err, ChunkdexError::WorkerUnavailable(_)));
}

#[tokio::test]
async fn test_fault_leaves_other_workers_serving() {
    let (coordinator, mut stream) = start_coordinator(para_registry(), 2, 10);

    coordinator.submit_raw("garbage".to_string()).await.unwrap();
    match stream.recv().await.unwrap() {
        WorkerResponse::Fault(_) => {}
        WorkerResponse::Result(result) => panic!("unexpected result: {result:?}"),
    }

    for id in ["a", "b", "c"] {
        coordinator
            .index_resource(id, "{}", TestDocument::flat_paras(2).to_json())
            .await
            .unwrap();
    }
    for id in ["a", "b", "c"] {
        assert!(stream.recv_for(id).await.unwrap().is_indexed());
    }

    coordinator.shutdown().await.unwrap();
}
