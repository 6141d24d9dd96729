//! Tool registry: named, schema-described capabilities backed by
//! caller-supplied executable logic.
//!
//! The registry is an explicit owned mapping held by each orchestrator, never
//! a process-wide singleton, so independent orchestrations can run with
//! different tool sets without interference. Registration takes `&mut self`
//! while dispatch only reads, so a registry borrowed by an in-flight loop
//! cannot be mutated under it.

use async_trait::async_trait;
use futures::future::BoxFuture;
use serde_json::Value;
use std::sync::Arc;

use crate::types::tool::ToolDefinition;
use crate::{Error, Result};

/// A tool the model may invoke.
///
/// Exposes a [`ToolDefinition`] (name, description, parameter schema) used
/// for prompt construction, and an async [`call`](Tool::call) carrying the
/// executable behavior.
#[async_trait]
pub trait Tool: Send + Sync {
    fn definition(&self) -> ToolDefinition;

    /// Execute with the parameter object parsed from the call envelope.
    async fn call(&self, params: Value) -> Result<Value>;
}

type ToolFn = dyn Fn(Value) -> BoxFuture<'static, Result<Value>> + Send + Sync;

/// Adapts a definition plus an async closure into a [`Tool`].
pub struct FunctionTool {
    definition: ToolDefinition,
    f: Box<ToolFn>,
}

impl FunctionTool {
    pub fn new<F, Fut>(definition: ToolDefinition, f: F) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<Value>> + Send + 'static,
    {
        Self {
            definition,
            f: Box::new(move |params| Box::pin(f(params))),
        }
    }
}

#[async_trait]
impl Tool for FunctionTool {
    fn definition(&self) -> ToolDefinition {
        self.definition.clone()
    }

    async fn call(&self, params: Value) -> Result<Value> {
        (self.f)(params).await
    }
}

/// Registry of callable tools, keyed by definition name.
///
/// Registration order is preserved; [`definitions`](ToolRegistry::definitions)
/// returns declarations in that order, which fixes their order in the system
/// prompt.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool. Re-registering an existing name replaces the
    /// implementation in place, keeping its position.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.definition().name;
        match self.position(&name) {
            Some(idx) => self.tools[idx] = tool,
            None => self.tools.push(tool),
        }
    }

    /// Register an async closure under a definition.
    pub fn register_fn<F, Fut>(&mut self, definition: ToolDefinition, f: F)
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<Value>> + Send + 'static,
    {
        self.register(Arc::new(FunctionTool::new(definition, f)));
    }

    /// Remove a tool by name, returning it if it was registered.
    pub fn unregister(&mut self, name: &str) -> Option<Arc<dyn Tool>> {
        self.position(name).map(|idx| self.tools.remove(idx))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Declarations in registration order.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.definition()).collect()
    }

    /// Look up and invoke a tool by name.
    ///
    /// `Error::ToolNotRegistered` when the name is unknown; implementation
    /// failures surface as `Error::ToolFailed`.
    pub async fn execute(&self, name: &str, params: Value) -> Result<Value> {
        let tool = self
            .position(name)
            .map(|idx| Arc::clone(&self.tools[idx]))
            .ok_or_else(|| Error::ToolNotRegistered {
                name: name.to_string(),
            })?;

        tool.call(params).await.map_err(|e| match e {
            err @ Error::ToolFailed { .. } => err,
            other => Error::ToolFailed {
                name: name.to_string(),
                message: other.to_string(),
            },
        })
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.tools.iter().position(|t| t.definition().name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn echo_def() -> ToolDefinition {
        ToolDefinition::new("echo", "Echo the input back").parameter(
            "text",
            "string",
            "Text to echo",
            true,
        )
    }

    #[tokio::test]
    async fn execute_dispatches_to_registered_impl() {
        let mut registry = ToolRegistry::new();
        registry.register_fn(echo_def(), |params| async move { Ok(params) });

        let out = registry.execute("echo", json!({"text": "hi"})).await.unwrap();
        assert_eq!(out, json!({"text": "hi"}));
    }

    #[tokio::test]
    async fn unknown_name_rejects_with_not_registered() {
        let registry = ToolRegistry::new();
        let err = registry.execute("missing", json!({})).await.unwrap_err();
        assert!(matches!(err, Error::ToolNotRegistered { name } if name == "missing"));
    }

    #[tokio::test]
    async fn unregister_removes_the_tool() {
        let mut registry = ToolRegistry::new();
        registry.register_fn(echo_def(), |params| async move { Ok(params) });
        assert!(registry.contains("echo"));

        assert!(registry.unregister("echo").is_some());
        assert!(!registry.contains("echo"));
        let err = registry.execute("echo", json!({})).await.unwrap_err();
        assert!(matches!(err, Error::ToolNotRegistered { .. }));
    }

    #[tokio::test]
    async fn impl_failure_surfaces_as_tool_failed() {
        let mut registry = ToolRegistry::new();
        registry.register_fn(ToolDefinition::new("boom", "Always fails"), |_| async {
            Err(Error::provider("backend unavailable"))
        });

        let err = registry.execute("boom", json!({})).await.unwrap_err();
        assert!(matches!(err, Error::ToolFailed { name, .. } if name == "boom"));
    }

    #[test]
    fn definitions_preserve_registration_order() {
        let mut registry = ToolRegistry::new();
        registry.register_fn(ToolDefinition::new("b", ""), |p| async move { Ok(p) });
        registry.register_fn(ToolDefinition::new("a", ""), |p| async move { Ok(p) });

        let names: Vec<String> = registry.definitions().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn reregistering_replaces_in_place() {
        let mut registry = ToolRegistry::new();
        registry.register_fn(ToolDefinition::new("a", "v1"), |p| async move { Ok(p) });
        registry.register_fn(ToolDefinition::new("b", ""), |p| async move { Ok(p) });
        registry.register_fn(ToolDefinition::new("a", "v2"), |p| async move { Ok(p) });

        let defs = registry.definitions();
        assert_eq!(defs.len(), 2);
        assert_eq!(defs[0].name, "a");
        assert_eq!(defs[0].description, "v2");
    }
}
