//! Asynchronous instance regeneration protocol
//!
//! `move` issues a regeneration request and never blocks; a worker task
//! generates instances off the frame thread and the streamer polls for
//! completions. Completion ordering is not FIFO when requests overlap, so
//! every request carries a generation token and [`RegenState`] discards
//! results superseded by a later issuance (last-writer-wins).

use std::sync::Arc;

use tokio::runtime::Runtime;
use tokio::sync::mpsc;

use crate::core::error::Error;
use crate::core::types::Result;
use crate::decor::pipeline::GenerationPipeline;
use crate::decor::uniform::DecorStreamParams;

/// Outcome of matching a completed regeneration against the issued tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Superseded by a later request; discard silently
    Stale,
    /// Latest request produced zero instances; keep the previous front buffer
    Empty,
    /// Latest request produced instances; write back slot and publish
    Publish,
}

/// Generation token bookkeeping for in-flight regenerations
#[derive(Debug, Default)]
pub struct RegenState {
    next_token: u64,
    in_flight: Option<u64>,
}

impl RegenState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new generation token. Any previously issued token becomes stale.
    pub fn issue(&mut self) -> u64 {
        self.next_token += 1;
        self.in_flight = Some(self.next_token);
        self.next_token
    }

    /// Match a completed generation against the latest issued token
    pub fn complete(&mut self, token: u64, count: u32) -> Completion {
        if self.in_flight != Some(token) {
            return Completion::Stale;
        }
        self.in_flight = None;
        if count == 0 {
            Completion::Empty
        } else {
            Completion::Publish
        }
    }

    /// Whether a regeneration is currently in flight
    pub fn is_regenerating(&self) -> bool {
        self.in_flight.is_some()
    }
}

/// Request to regenerate instances around the current anchor
#[derive(Debug, Clone, Copy)]
pub struct RegenRequest {
    pub token: u64,
    pub params: DecorStreamParams,
    pub radius: u32,
}

/// Completed generation: token plus the produced instances
#[derive(Debug)]
pub struct RegenResult<I> {
    pub token: u64,
    pub instances: Vec<I>,
}

/// Worker that runs instance generation off the frame thread.
///
/// Requests go down an unbounded channel; the worker collapses its queue to
/// the newest request before generating, so superseded requests may never
/// be computed at all. Results come back through a second channel drained
/// by [`RegenWorker::poll_results`] (non-blocking).
pub struct RegenWorker<I> {
    request_tx: mpsc::UnboundedSender<RegenRequest>,
    result_rx: mpsc::UnboundedReceiver<RegenResult<I>>,
    /// Dedicated runtime when not reusing the caller's
    #[allow(dead_code)]
    runtime: Option<Runtime>,
}

impl<I: Send + 'static> RegenWorker<I> {
    /// Create a worker with its own tokio runtime
    pub fn new<P>(pipeline: Arc<P>) -> Result<Self>
    where
        P: GenerationPipeline<Instance = I>,
    {
        let (request_tx, request_rx) = mpsc::unbounded_channel::<RegenRequest>();
        let (result_tx, result_rx) = mpsc::unbounded_channel::<RegenResult<I>>();

        let runtime = Runtime::new().map_err(|e| Error::Streaming(e.to_string()))?;
        runtime.spawn(Self::worker_loop(pipeline, request_rx, result_tx));

        Ok(Self {
            request_tx,
            result_rx,
            runtime: Some(runtime),
        })
    }

    /// Create a worker on the current tokio runtime.
    ///
    /// Panics if called outside a tokio runtime context.
    pub fn new_with_current_runtime<P>(pipeline: Arc<P>) -> Self
    where
        P: GenerationPipeline<Instance = I>,
    {
        let (request_tx, request_rx) = mpsc::unbounded_channel::<RegenRequest>();
        let (result_tx, result_rx) = mpsc::unbounded_channel::<RegenResult<I>>();

        tokio::spawn(Self::worker_loop(pipeline, request_rx, result_tx));

        Self {
            request_tx,
            result_rx,
            runtime: None,
        }
    }

    async fn worker_loop<P>(
        pipeline: Arc<P>,
        mut request_rx: mpsc::UnboundedReceiver<RegenRequest>,
        result_tx: mpsc::UnboundedSender<RegenResult<I>>,
    ) where
        P: GenerationPipeline<Instance = I>,
    {
        while let Some(mut request) = request_rx.recv().await {
            // Collapse the queue to the newest request; superseded
            // requests are never generated
            while let Ok(newer) = request_rx.try_recv() {
                request = newer;
            }

            let token = request.token;
            let generator = pipeline.clone();
            let generated = tokio::task::spawn_blocking(move || {
                generator.populate(&request.params, request.radius)
            })
            .await;

            match generated {
                Ok(instances) => {
                    if result_tx.send(RegenResult { token, instances }).is_err() {
                        // Streamer dropped; shut down
                        break;
                    }
                }
                Err(e) => {
                    log::error!("instance generation task panicked: {e}");
                }
            }
        }
    }

    /// Queue a regeneration request (never blocks)
    pub fn request(&self, token: u64, params: DecorStreamParams, radius: u32) {
        let request = RegenRequest {
            token,
            params,
            radius,
        };
        if self.request_tx.send(request).is_err() {
            log::error!("regen worker unavailable; request {token} dropped");
        }
    }

    /// Drain all completed generations (non-blocking)
    pub fn poll_results(&mut self) -> Vec<RegenResult<I>> {
        let mut results = Vec::new();
        while let Ok(result) = self.result_rx.try_recv() {
            results.push(result);
        }
        results
    }
}
