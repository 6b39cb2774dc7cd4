//! Asynchronous indexing coordinator.
//!
//! Indexing runs on dedicated worker threads so that large documents
//! never block the caller. Each worker owns a FIFO request queue and
//! finishes one request before taking the next. Requests are handed
//! over as encoded envelopes and results come back as owned values,
//! so no document data is shared across the boundary.
//!
//! ```text
//! caller ──index_resource──▶ [queue 0] ──▶ worker 0 ─┐
//!        (round-robin)       [queue 1] ──▶ worker 1 ─┼──▶ ResponseStream
//!                            [queue n] ──▶ worker n ─┘
//! ```
//!
//! Results are tagged with their resource id, which is the only
//! correlation key: workers in a pool give no ordering guarantee
//! relative to each other. There are no retries, no cancellation
//! and no internal timeout.

use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::{self, JoinHandle};

use tokio::sync::mpsc;

use crate::core::config::Config;
use crate::core::error::{ChunkdexError, ErrorKind, IndexError, Result};
use crate::core::indexer::IndexingPipeline;
use crate::core::schema::SchemaAdapter;
use crate::core::worker::protocol::{
    IndexRequest, IndexResult, WorkerFault, WorkerRequest, WorkerResponse,
};

struct WorkerHandle {
    id: usize,
    requests: mpsc::Sender<String>,
    thread: JoinHandle<()>,
}

/// Dispatches indexing requests to a pool of worker threads
pub struct AsyncIndexCoordinator {
    workers: Vec<WorkerHandle>,
    next_worker: AtomicUsize,
}

impl std::fmt::Debug for AsyncIndexCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncIndexCoordinator")
            .field("workers", &self.workers.len())
            .finish()
    }
}

impl AsyncIndexCoordinator {
    /// Start the worker pool.
    ///
    /// Every worker gets its own clone of `schema`. Returns the
    /// coordinator and the stream on which all results arrive.
    pub fn start<S>(config: &Config, schema: S) -> Result<(Self, ResponseStream)>
    where
        S: SchemaAdapter + Clone + Send + 'static,
    {
        config.validate()?;

        let (response_tx, response_rx) = mpsc::unbounded_channel();
        let mut workers = Vec::with_capacity(config.worker.num_workers);

        for id in 0..config.worker.num_workers {
            let pipeline = IndexingPipeline::new(config.indexing.max_chunk_size)?;
            let (request_tx, request_rx) = mpsc::channel(config.worker.queue_depth);
            let responses = response_tx.clone();
            let schema = schema.clone();

            let thread = thread::Builder::new()
                .name(format!("chunkdex-worker-{id}"))
                .spawn(move || run_worker(id, schema, pipeline, request_rx, responses))?;

            workers.push(WorkerHandle {
                id,
                requests: request_tx,
                thread,
            });
        }

        tracing::info!(
            "Started {} indexing worker(s), max chunk size {}",
            workers.len(),
            config.indexing.max_chunk_size
        );

        let coordinator = Self {
            workers,
            next_worker: AtomicUsize::new(0),
        };
        let stream = ResponseStream {
            responses: response_rx,
            backlog: VecDeque::new(),
        };

        Ok((coordinator, stream))
    }

    /// Queue a resource for indexing.
    ///
    /// Returns once the request is queued; the result arrives later
    /// on the [`ResponseStream`], tagged with `resource_id`. Waits
    /// while the chosen worker's queue is full.
    pub async fn index_resource(
        &self,
        resource_id: impl Into<String>,
        attribute_vocabulary: impl Into<String>,
        document_content: impl Into<String>,
    ) -> Result<()> {
        let request = WorkerRequest::Index(IndexRequest {
            resource_id: resource_id.into(),
            attribute_vocabulary: attribute_vocabulary.into(),
            document_content: document_content.into(),
        });

        self.submit_raw(request.encode()?).await
    }

    /// Forward an already-encoded request envelope.
    ///
    /// Used by hosts that relay messages from elsewhere. An envelope
    /// the worker cannot decode faults that worker.
    pub async fn submit_raw(&self, message: String) -> Result<()> {
        let worker = self.pick_worker()?;

        worker.requests.send(message).await.map_err(|_| {
            ChunkdexError::WorkerUnavailable(format!("worker {} stopped", worker.id))
        })
    }

    /// Number of workers still accepting requests
    pub fn live_workers(&self) -> usize {
        self.workers
            .iter()
            .filter(|w| !w.requests.is_closed())
            .count()
    }

    /// Round-robin over workers that have not stopped
    fn pick_worker(&self) -> Result<&WorkerHandle> {
        let count = self.workers.len();
        let start = self.next_worker.fetch_add(1, Ordering::Relaxed);

        (0..count)
            .map(|offset| &self.workers[(start + offset) % count])
            .find(|worker| !worker.requests.is_closed())
            .ok_or_else(|| ChunkdexError::WorkerUnavailable("no live workers".to_string()))
    }

    /// Stop accepting requests and wait for workers to drain their
    /// queues.
    pub async fn shutdown(self) -> Result<()> {
        let threads: Vec<JoinHandle<()>> = self
            .workers
            .into_iter()
            .map(|worker| {
                drop(worker.requests);
                worker.thread
            })
            .collect();

        tokio::task::spawn_blocking(move || {
            for thread in threads {
                if thread.join().is_err() {
                    tracing::error!("Indexing worker panicked during shutdown");
                }
            }
        })
        .await
        .map_err(|e| ChunkdexError::WorkerUnavailable(format!("Shutdown join failed: {e}")))?;

        tracing::info!("Indexing workers stopped");
        Ok(())
    }
}

/// Receiving side of the coordinator
#[derive(Debug)]
pub struct ResponseStream {
    responses: mpsc::UnboundedReceiver<WorkerResponse>,
    backlog: VecDeque<WorkerResponse>,
}

impl ResponseStream {
    /// Next response in arrival order.
    ///
    /// Returns `None` once every worker has stopped and all
    /// responses have been consumed.
    pub async fn recv(&mut self) -> Option<WorkerResponse> {
        match self.backlog.pop_front() {
            Some(response) => Some(response),
            None => self.responses.recv().await,
        }
    }

    /// Wait for the result of one resource.
    ///
    /// Responses for other resources (and worker faults) received
    /// meanwhile are kept for later `recv` calls.
    pub async fn recv_for(&mut self, resource_id: &str) -> Option<IndexResult> {
        let buffered = self.backlog.iter().position(|response| {
            matches!(response, WorkerResponse::Result(result) if result.resource_id() == resource_id)
        });
        if let Some(idx) = buffered {
            if let Some(WorkerResponse::Result(result)) = self.backlog.remove(idx) {
                return Some(result);
            }
        }

        while let Some(response) = self.responses.recv().await {
            match response {
                WorkerResponse::Result(result) if result.resource_id() == resource_id => {
                    return Some(result);
                }
                other => self.backlog.push_back(other),
            }
        }

        None
    }
}

fn run_worker<S: SchemaAdapter>(
    id: usize,
    schema: S,
    mut pipeline: IndexingPipeline,
    mut requests: mpsc::Receiver<String>,
    responses: mpsc::UnboundedSender<WorkerResponse>,
) {
    tracing::debug!("Worker {} started", id);

    while let Some(raw) = requests.blocking_recv() {
        let request = match WorkerRequest::decode(&raw) {
            Ok(request) => request,
            Err(e) => {
                tracing::error!("Worker {} fault: {}", id, e);
                // Closed before reporting, so nothing is dispatched
                // here once the fault is visible
                requests.close();
                let _ = responses.send(WorkerResponse::Fault(WorkerFault {
                    worker_id: id,
                    message: e.message(),
                }));
                reject_pending(id, &mut requests, &responses);
                return;
            }
        };

        let result = match request {
            WorkerRequest::Index(request) => index_one(&mut pipeline, &schema, request),
        };

        if responses.send(WorkerResponse::Result(result)).is_err() {
            tracing::debug!("Response stream closed, worker {} exiting", id);
            return;
        }
    }

    tracing::debug!("Worker {} stopped", id);
}

fn index_one<S: SchemaAdapter>(
    pipeline: &mut IndexingPipeline,
    schema: &S,
    request: IndexRequest,
) -> IndexResult {
    let IndexRequest {
        resource_id,
        attribute_vocabulary,
        document_content,
    } = request;

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        pipeline.index_json(&resource_id, schema, &attribute_vocabulary, &document_content)
    }));

    match outcome {
        Ok(Ok((serialized_index, stats))) => IndexResult::Indexed {
            resource_id,
            serialized_index,
            stats,
        },
        Ok(Err(e)) => {
            tracing::warn!("Indexing failed for {}: {}", resource_id, e);
            IndexResult::Failed {
                resource_id,
                error: IndexError::from(&e),
            }
        }
        Err(_) => {
            tracing::error!("Indexing panicked for {}", resource_id);
            IndexResult::Failed {
                resource_id,
                error: IndexError {
                    kind: ErrorKind::Internal,
                    message: "indexing panicked".to_string(),
                },
            }
        }
    }
}

/// Fail every request still queued on a faulted worker so each is
/// reported exactly once.
fn reject_pending(
    id: usize,
    requests: &mut mpsc::Receiver<String>,
    responses: &mpsc::UnboundedSender<WorkerResponse>,
) {
    while let Some(raw) = requests.blocking_recv() {
        if let Ok(WorkerRequest::Index(request)) = WorkerRequest::decode(&raw) {
            let err = ChunkdexError::WorkerUnavailable(format!("worker {id} stopped"));
            let _ = responses.send(WorkerResponse::Result(IndexResult::Failed {
                resource_id: request.resource_id,
                error: IndexError::from(&err),
            }));
        }
    }
}
