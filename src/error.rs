use thiserror::Error;

/// Structured error context for better error handling and debugging.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ErrorContext {
    /// Field path or key that caused the error (e.g., "request.messages[0].content")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., expected shape, actual value)
    pub details: Option<String>,
    /// Source of the error (e.g., "channel_provider", "tool_loop")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// Unified error type for the orchestration layer.
///
/// Tool-level failures (`ToolNotRegistered`, `ToolFailed`) only escape through
/// direct [`execute_tool`](crate::ToolCallOrchestrator::execute_tool) calls;
/// inside the automatic loop they are absorbed into the conversation as
/// `tool`-role error messages. Provider failures always propagate.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Completion provider error: {message}{}", format_context(.context))]
    Provider {
        message: String,
        context: ErrorContext,
    },

    #[error("Tool not registered: {name}")]
    ToolNotRegistered { name: String },

    #[error("Tool '{name}' failed: {message}")]
    ToolFailed { name: String, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

// Helper function to format error context for display
fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    /// Create a provider error with structured context
    pub fn provider_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Provider {
            message: msg.into(),
            context,
        }
    }

    /// Create a provider error with a bare message
    pub fn provider(msg: impl Into<String>) -> Self {
        Error::Provider {
            message: msg.into(),
            context: ErrorContext::new(),
        }
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Provider { context, .. } => Some(context),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_displays_its_context() {
        let err = Error::provider_with_context(
            "worker gone",
            ErrorContext::new()
                .with_details("channel closed")
                .with_source("channel_provider"),
        );
        let text = err.to_string();
        assert!(text.contains("worker gone"));
        assert!(text.contains("details: channel closed"));
        assert!(text.contains("source: channel_provider"));
    }

    #[test]
    fn context_accessor_covers_provider_errors_only() {
        let err = Error::provider_with_context(
            "x",
            ErrorContext::new().with_field_path("request.messages"),
        );
        assert_eq!(
            err.context().and_then(|c| c.field_path.as_deref()),
            Some("request.messages")
        );

        let err = Error::ToolNotRegistered { name: "f".into() };
        assert!(err.context().is_none());
    }

    #[test]
    fn bare_provider_error_displays_without_context_suffix() {
        assert_eq!(
            Error::provider("timeout").to_string(),
            "Completion provider error: timeout"
        );
    }
}
