//! Channel-backed provider: message-passing plumbing to an engine running in
//! a background execution context.
//!
//! Requests cross an `mpsc` channel to an opaque worker; each request carries
//! its own event sender, so the worker never needs to know about the
//! orchestration loop. One request is in flight at a time per channel: the
//! returned event stream holds the in-flight permit until it is dropped.

use std::sync::Arc;
use tokio::sync::{mpsc, watch, Mutex};

use crate::types::events::ProviderEvent;
use crate::{BoxStream, Error, ErrorContext, Result};

use super::{CompletionProvider, CompletionRequest};

/// Handle for out-of-band interruption of an in-flight request.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl CancelHandle {
    /// Signal the worker to terminate the in-flight generation early. The
    /// worker is expected to finish its event stream with whatever partial
    /// text it produced.
    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    pub(crate) fn reset(&self) {
        let _ = self.tx.send(false);
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

/// Create an interrupt handle and the receiver a worker watches.
pub fn cancel_pair() -> (CancelHandle, watch::Receiver<bool>) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx: Arc::new(tx) }, rx)
}

/// One completion request as seen by the worker side of the channel.
pub struct WorkerRequest {
    pub request: CompletionRequest,
    /// Per-request event sink. Dropping it ends the request's stream.
    pub events: mpsc::Sender<ProviderEvent>,
    /// Becomes `true` when the caller interrupts this request.
    pub interrupted: watch::Receiver<bool>,
}

/// [`CompletionProvider`] backed by a worker on the far side of an `mpsc`
/// channel.
pub struct ChannelProvider {
    requests: mpsc::Sender<WorkerRequest>,
    inflight: Arc<Mutex<()>>,
    cancel: CancelHandle,
}

impl ChannelProvider {
    /// Create the provider and the request receiver the worker consumes.
    pub fn new(buffer: usize) -> (Self, mpsc::Receiver<WorkerRequest>) {
        let (requests, rx) = mpsc::channel(buffer);
        let (cancel, _watch_rx) = cancel_pair();
        (
            Self {
                requests,
                inflight: Arc::new(Mutex::new(())),
                cancel,
            },
            rx,
        )
    }

    /// Interrupt handle usable from another task.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }
}

#[async_trait::async_trait]
impl CompletionProvider for ChannelProvider {
    async fn complete_stream(
        &self,
        request: CompletionRequest,
    ) -> Result<BoxStream<'static, ProviderEvent>> {
        // Serialize requests: the permit lives inside the returned stream and
        // is released only when the stream is dropped.
        let permit = Arc::clone(&self.inflight).lock_owned().await;
        self.cancel.reset();

        let (events, event_rx) = mpsc::channel(32);
        let worker_request = WorkerRequest {
            request,
            events,
            interrupted: self.cancel.subscribe(),
        };

        self.requests.send(worker_request).await.map_err(|_| {
            Error::provider_with_context(
                "worker request channel closed",
                ErrorContext::new().with_source("channel_provider"),
            )
        })?;

        let stream = futures::stream::unfold((event_rx, permit), |(mut rx, permit)| async move {
            rx.recv().await.map(|event| (Ok(event), (rx, permit)))
        });
        Ok(Box::pin(stream))
    }

    fn interrupt(&self) {
        tracing::debug!("interrupting in-flight completion request");
        self.cancel.cancel();
    }
}
