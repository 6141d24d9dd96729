//! Tool declarations and parsed call intents.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A declared callable capability advertised to the model.
///
/// Immutable once built; serialized verbatim (compact JSON) into the system
/// prompt so the model knows what it may call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: ToolParameters,
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: ToolParameters::default(),
        }
    }

    /// Declare a parameter. `required` adds it to the required list.
    pub fn parameter(
        mut self,
        name: impl Into<String>,
        prop_type: impl Into<String>,
        description: impl Into<String>,
        required: bool,
    ) -> Self {
        let name = name.into();
        if required {
            self.parameters.required.push(name.clone());
        }
        self.parameters.properties.insert(
            name,
            PropertySchema {
                prop_type: prop_type.into(),
                description: description.into(),
            },
        );
        self
    }
}

/// JSON-schema-like parameter declaration: typed property map plus the
/// required-field list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolParameters {
    #[serde(rename = "type")]
    pub schema_type: String,
    pub properties: BTreeMap<String, PropertySchema>,
    pub required: Vec<String>,
}

impl Default for ToolParameters {
    fn default() -> Self {
        Self {
            schema_type: "object".to_string(),
            properties: BTreeMap::new(),
            required: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertySchema {
    #[serde(rename = "type")]
    pub prop_type: String,
    #[serde(default)]
    pub description: String,
}

/// The decoded intent extracted from one assistant turn.
///
/// Derived transiently from the raw completion text; discarded after dispatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedFunctionCall {
    pub name: String,
    /// Always a JSON object; empty when the envelope carried no parameters.
    pub parameters: serde_json::Value,
}
