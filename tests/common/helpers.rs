// Test helper functions

use chunkdex::{
    AsyncIndexCoordinator, ChunkSerializer, Config, ElementRegistry, IndexResult, InvertedIndex,
    ResponseStream, SerializedChunk,
};

/// Start a coordinator with the given pool size and chunk size
#[allow(dead_code)]
pub fn start_coordinator(
    registry: ElementRegistry,
    num_workers: usize,
    max_chunk_size: usize,
) -> (AsyncIndexCoordinator, ResponseStream) {
    let mut config = Config::default();
    config.worker.num_workers = num_workers;
    config.indexing.max_chunk_size = max_chunk_size;

    AsyncIndexCoordinator::start(&config, registry).expect("Failed to start coordinator")
}

/// Serialized chunks of a successful result
#[allow(dead_code)]
pub fn index_result_chunks(result: &IndexResult) -> Vec<SerializedChunk> {
    match result.serialized_index() {
        Some(chunks) => chunks.to_vec(),
        None => panic!("Expected indexed result, got {:?}", result.error()),
    }
}

/// Load every chunk of a serialized index
#[allow(dead_code)]
pub fn load_chunks(chunks: &[SerializedChunk]) -> Vec<InvertedIndex> {
    ChunkSerializer::new()
        .deserialize_all(chunks)
        .expect("Failed to load chunks")
}
