//! System prompt construction.

use crate::types::tool::ToolDefinition;

/// Fixed instruction block appended beneath the tool declarations. Tells the
/// model the exact textual envelope it must use to signal a call.
const CALL_INSTRUCTIONS: &str = "\
To call a function, respond with a single line of the form \
<function>{\"name\": \"function_name\", \"parameters\": {...}}</function> \
and no other content in that message. After receiving the tool result, \
answer the user in natural language. If no function is needed, answer \
directly.";

/// Render a base instruction plus tool declarations into one `system` message
/// body.
///
/// Pure string construction: each definition is serialized to compact JSON on
/// its own line, in input order, followed by the envelope instructions.
/// Identical inputs yield identical output.
pub fn build_system_prompt_with_tools(base_prompt: &str, tools: &[ToolDefinition]) -> String {
    if tools.is_empty() {
        return base_prompt.to_string();
    }

    let mut prompt = String::from(base_prompt);
    prompt.push_str("\n\nYou have access to the following functions:\n");
    for tool in tools {
        // ToolDefinition serialization cannot fail: all fields are strings
        // and string maps.
        let line = serde_json::to_string(tool).unwrap_or_default();
        prompt.push_str(&line);
        prompt.push('\n');
    }
    prompt.push('\n');
    prompt.push_str(CALL_INSTRUCTIONS);
    prompt
}
