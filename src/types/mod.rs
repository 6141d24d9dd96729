//! Core type definitions: messages, tool declarations, provider events.

pub mod events;
pub mod message;
pub mod tool;

pub use events::ProviderEvent;
pub use message::{Message, MessageRole};
pub use tool::{ParsedFunctionCall, PropertySchema, ToolDefinition, ToolParameters};
