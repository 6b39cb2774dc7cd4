//! Document indexing module.
//!
//! Turns a document tree into serialized chunk indexes:
//!
//! - Field schema derived once per document from its vocabulary
//! - Depth-first walk classifying nodes as hard, soft or unknown
//! - Bounded, order-preserving chunk allocation
//! - Pipeline orchestration with all-or-nothing results

pub mod chunker;
pub mod fields;
pub mod pipeline;
pub mod walker;

pub use chunker::ChunkAllocator;
pub use fields::{FieldSchema, FieldSchemaBuilder};
pub use pipeline::IndexingPipeline;
pub use walker::{DocumentWalker, WalkOutput};
