//! Worker boundary.
//!
//! Typed request/response messages and the coordinator that runs
//! indexing requests on worker threads.

pub mod coordinator;
pub mod protocol;

pub use coordinator::{AsyncIndexCoordinator, ResponseStream};
pub use protocol::{IndexRequest, IndexResult, WorkerFault, WorkerRequest, WorkerResponse};
