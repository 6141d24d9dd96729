//! Completion provider boundary.
//!
//! The engine that actually turns a conversation into text is external to
//! this crate (typically living on the far side of a worker or thread
//! boundary). It is consumed through [`CompletionProvider`]: one request in,
//! one stream of tagged [`ProviderEvent`]s out. The orchestration loop's only
//! suspension points are awaiting the next event on that stream.

pub mod channel;

use async_trait::async_trait;

use crate::types::events::ProviderEvent;
use crate::types::message::Message;
use crate::{BoxStream, Error, Result};

pub use channel::{cancel_pair, CancelHandle, ChannelProvider, WorkerRequest};

/// Completion request parameters (developer-friendly, small surface).
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub messages: Vec<Message>,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
}

impl CompletionRequest {
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            temperature: None,
            max_tokens: None,
        }
    }

    pub fn temperature(mut self, temp: f64) -> Self {
        self.temperature = Some(temp);
        self
    }

    pub fn max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }
}

/// An opaque chat-completion engine.
///
/// Implementations deliver zero or more `Progress` / `PartialContentDelta`
/// events followed by exactly one `FinalText` (or `StreamError`). An
/// interrupted request may end early with partial or empty text; the caller
/// treats whatever text arrived as the completion result.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete_stream(
        &self,
        request: CompletionRequest,
    ) -> Result<BoxStream<'static, ProviderEvent>>;

    /// Out-of-band interrupt for the in-flight request. Default: no-op.
    fn interrupt(&self) {}
}

/// Drain one request's event stream down to its final text.
///
/// Every event is forwarded to `observe` before being interpreted. Resolves
/// at `FinalText`; a stream that ends without one (e.g. after an interrupt)
/// resolves to the accumulated partial deltas. `StreamError` maps to
/// [`Error::Provider`].
pub async fn collect_final<F>(
    mut stream: BoxStream<'static, ProviderEvent>,
    mut observe: F,
) -> Result<String>
where
    F: FnMut(&ProviderEvent),
{
    use futures::StreamExt;

    let mut accumulated = String::new();
    while let Some(event) = stream.next().await {
        let event = event?;
        observe(&event);
        match event {
            ProviderEvent::Progress { .. } => {}
            ProviderEvent::PartialContentDelta { content } => accumulated.push_str(&content),
            ProviderEvent::FinalText { text } => return Ok(text),
            ProviderEvent::StreamError { message } => {
                return Err(Error::provider_with_context(
                    message,
                    crate::ErrorContext::new().with_source("completion_provider"),
                ));
            }
        }
    }
    Ok(accumulated)
}
