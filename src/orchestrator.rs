//! The bounded generate→parse→execute→append loop.

use serde_json::Value;
use std::sync::Arc;

use crate::parse::{classify_response, CallOutcome};
use crate::prompt::build_system_prompt_with_tools;
use crate::provider::{collect_final, CompletionProvider, CompletionRequest};
use crate::registry::{Tool, ToolRegistry};
use crate::types::events::ProviderEvent;
use crate::types::message::Message;
use crate::Result;

/// Default upper bound on tool dispatches per orchestration call.
pub const DEFAULT_MAX_TOOL_CALLS: u32 = 5;

/// Options for one orchestration call.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
    /// Hard bound on tool dispatches; once reached, one final completion is
    /// issued and returned verbatim.
    pub max_tool_calls: u32,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            temperature: None,
            max_tokens: None,
            max_tool_calls: DEFAULT_MAX_TOOL_CALLS,
        }
    }
}

impl GenerateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn temperature(mut self, temp: f64) -> Self {
        self.temperature = Some(temp);
        self
    }

    pub fn max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    pub fn max_tool_calls(mut self, max: u32) -> Self {
        self.max_tool_calls = max;
        self
    }
}

/// Observer hooks for one orchestration call. All hooks default to no-ops.
pub trait ToolObserver: Send + Sync {
    /// Incremental completion text, as streamed by the provider.
    fn on_token(&self, _chunk: &str) {}
    /// Model readiness / loading progress forwarded from the provider.
    fn on_progress(&self, _percent: f32, _status: Option<&str>) {}
    /// The model requested a tool call (before dispatch).
    fn on_tool_call(&self, _name: &str, _params: &Value) {}
    /// A tool dispatch succeeded (before its result rejoins the conversation).
    fn on_tool_result(&self, _name: &str, _result: &Value) {}
}

struct NoopObserver;

impl ToolObserver for NoopObserver {}

/// Outcome of one orchestration call: the final answer plus the transcript it
/// grew. The final answer is never appended to the transcript; callers decide
/// whether to retain it.
#[derive(Debug, Clone)]
pub struct GenerateResult {
    pub text: String,
    pub messages: Vec<Message>,
    /// Number of tool dispatches performed.
    pub tool_calls: u32,
}

/// Drives a conversation against an opaque completion provider, transparently
/// handling zero or more tool invocations requested by the model.
///
/// The registry is owned per orchestrator; independent orchestrators never
/// share tool state. Registration requires `&mut self`, so tools cannot be
/// swapped under an in-flight loop.
pub struct ToolCallOrchestrator<P> {
    provider: Arc<P>,
    registry: ToolRegistry,
}

impl<P: CompletionProvider> ToolCallOrchestrator<P> {
    pub fn new(provider: Arc<P>) -> Self {
        Self {
            provider,
            registry: ToolRegistry::new(),
        }
    }

    pub fn with_registry(provider: Arc<P>, registry: ToolRegistry) -> Self {
        Self { provider, registry }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn register_tool(&mut self, tool: Arc<dyn Tool>) {
        self.registry.register(tool);
    }

    pub fn register_fn<F, Fut>(&mut self, definition: crate::types::tool::ToolDefinition, f: F)
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<Value>> + Send + 'static,
    {
        self.registry.register_fn(definition, f);
    }

    pub fn unregister_tool(&mut self, name: &str) -> Option<Arc<dyn Tool>> {
        self.registry.unregister(name)
    }

    /// Render a `system` message body advertising the registered tools, in
    /// registration order.
    pub fn system_prompt(&self, base_prompt: &str) -> String {
        build_system_prompt_with_tools(base_prompt, &self.registry.definitions())
    }

    /// Direct dispatch, bypassing the loop. Unlike the loop, failures here
    /// propagate to the caller.
    pub async fn execute_tool(&self, name: &str, params: Value) -> Result<Value> {
        self.registry.execute(name, params).await
    }

    /// Run the bounded loop without observer hooks.
    pub async fn generate_with_tools(
        &self,
        messages: Vec<Message>,
        options: GenerateOptions,
    ) -> Result<GenerateResult> {
        self.generate_with_tools_observed(messages, options, &NoopObserver)
            .await
    }

    /// Run the bounded loop: request a completion, parse a call envelope out
    /// of it, dispatch, append the result, repeat. Returns at the first
    /// completion with no call, or after `max_tool_calls` dispatches plus one
    /// final unconditional completion.
    pub async fn generate_with_tools_observed(
        &self,
        messages: Vec<Message>,
        options: GenerateOptions,
        observer: &dyn ToolObserver,
    ) -> Result<GenerateResult> {
        let mut messages = messages;
        let mut calls: u32 = 0;

        while calls < options.max_tool_calls {
            let text = self.request_completion(&messages, &options, observer).await?;

            let call = match classify_response(&text) {
                CallOutcome::Call(call) => call,
                outcome => {
                    if outcome == CallOutcome::Malformed {
                        tracing::warn!(
                            "call envelope present but body unparseable; \
                             returning raw text as the answer"
                        );
                    }
                    return Ok(GenerateResult {
                        text,
                        messages,
                        tool_calls: calls,
                    });
                }
            };

            calls += 1;
            tracing::debug!(tool = %call.name, call = calls, "model requested tool call");
            observer.on_tool_call(&call.name, &call.parameters);

            // The raw envelope text stays in the transcript so the model can
            // see its own call on the next turn.
            messages.push(Message::assistant(text));

            let content = match self.registry.execute(&call.name, call.parameters).await {
                Ok(result) => {
                    observer.on_tool_result(&call.name, &result);
                    render_tool_result(&result)
                }
                Err(e) => {
                    // Keep the conversation alive: the model gets the error
                    // text and may recover on its next turn.
                    tracing::warn!(tool = %call.name, error = %e, "tool dispatch failed");
                    format!("Error: {}", e)
                }
            };
            messages.push(Message::tool(content, calls.to_string()));
        }

        // Bound reached. One last completion with the accumulated sequence;
        // whatever comes back is returned verbatim, envelope or not.
        tracing::warn!(
            max_tool_calls = options.max_tool_calls,
            "tool call bound reached; issuing final completion"
        );
        let text = self.request_completion(&messages, &options, observer).await?;
        Ok(GenerateResult {
            text,
            messages,
            tool_calls: calls,
        })
    }

    async fn request_completion(
        &self,
        messages: &[Message],
        options: &GenerateOptions,
        observer: &dyn ToolObserver,
    ) -> Result<String> {
        let request = CompletionRequest {
            messages: messages.to_vec(),
            temperature: options.temperature,
            max_tokens: options.max_tokens,
        };
        let stream = self.provider.complete_stream(request).await?;
        collect_final(stream, |event| match event {
            ProviderEvent::PartialContentDelta { content } => observer.on_token(content),
            ProviderEvent::Progress { percent, status } => {
                observer.on_progress(*percent, status.as_deref())
            }
            _ => {}
        })
        .await
    }
}

/// Tool results rejoin the conversation as text: strings verbatim, anything
/// else as compact JSON.
fn render_tool_result(result: &Value) -> String {
    match result {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
