//! # tool-loop
//!
//! Bounded text-envelope tool calling over an opaque chat-completion
//! provider.
//!
//! ## Overview
//!
//! This crate is a thin convenience layer: it implements no model loading,
//! tokenization, or inference. The engine that turns a conversation into
//! text is external (often on the far side of a worker boundary) and is
//! consumed through the [`CompletionProvider`] trait. What this crate adds is
//! ergonomics — a tool registry, system-prompt rendering of tool
//! declarations, call-envelope parsing, and a bounded
//! generate→parse→dispatch→append loop.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tool_loop::{
//!     GenerateOptions, Message, ToolCallOrchestrator, ToolDefinition,
//! };
//! # use tool_loop::provider::{ChannelProvider};
//!
//! # #[tokio::main]
//! # async fn main() -> tool_loop::Result<()> {
//! let (provider, _worker_rx) = ChannelProvider::new(8);
//! let mut orchestrator = ToolCallOrchestrator::new(Arc::new(provider));
//!
//! orchestrator.register_fn(
//!     ToolDefinition::new("get_time", "Current time as an ISO string"),
//!     |_params| async { Ok(serde_json::json!("2026-08-30T12:00:00Z")) },
//! );
//!
//! let messages = vec![
//!     Message::system(orchestrator.system_prompt("You are a helpful assistant.")),
//!     Message::user("What time is it?"),
//! ];
//! let result = orchestrator
//!     .generate_with_tools(messages, GenerateOptions::default())
//!     .await?;
//! println!("{}", result.text);
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`types`] | Core type definitions (messages, tool declarations, provider events) |
//! | [`provider`] | Completion provider trait and channel-backed worker plumbing |
//! | [`prompt`] | System prompt construction from tool declarations |
//! | [`parse`] | Call envelope parsing |
//! | [`registry`] | Tool registry and the [`Tool`](registry::Tool) trait |
//! | [`orchestrator`] | The bounded tool-calling loop |

pub mod error;
pub mod orchestrator;
pub mod parse;
pub mod prompt;
pub mod provider;
pub mod registry;
pub mod types;

// Re-export main types for convenience
pub use error::{Error, ErrorContext};
pub use orchestrator::{
    GenerateOptions, GenerateResult, ToolCallOrchestrator, ToolObserver, DEFAULT_MAX_TOOL_CALLS,
};
pub use parse::{classify_response, parse_function_call, CallOutcome};
pub use prompt::build_system_prompt_with_tools;
pub use provider::{CancelHandle, ChannelProvider, CompletionProvider, CompletionRequest};
pub use registry::{FunctionTool, Tool, ToolRegistry};
pub use types::{
    events::ProviderEvent,
    message::{Message, MessageRole},
    tool::{ParsedFunctionCall, ToolDefinition},
};

use futures::Stream;
use std::pin::Pin;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// A unified pinned, boxed stream that emits `Result<T>`
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = Result<T>> + Send + 'a>>;
