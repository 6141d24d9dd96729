//! Call envelope parsing.
//!
//! Models signal a tool invocation by emitting a single tagged line such as
//! `<function>{"name": "f", "parameters": {...}}</function>`. Some models
//! prefer a `<tool_call>...</tool_call>` wrapper and an `arguments` field;
//! both are accepted. Envelope conventions are checked in fixed priority
//! order: `<function>` first, then `<tool_call>`.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::tool::ParsedFunctionCall;

static FUNCTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<function>\s*(.*?)\s*</function>").unwrap());
static TOOL_CALL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<tool_call>\s*(.*?)\s*</tool_call>").unwrap());

/// Explicit three-way parse outcome.
///
/// The default loop treats [`Malformed`](CallOutcome::Malformed) the same as
/// [`Absent`](CallOutcome::Absent) (the raw text becomes an ordinary answer),
/// but callers doing manual control can tell a model that never attempted a
/// call apart from one that attempted and produced a corrupt body.
#[derive(Debug, Clone, PartialEq)]
pub enum CallOutcome {
    /// An envelope was found and its body decoded.
    Call(ParsedFunctionCall),
    /// An envelope was found but its body failed to decode.
    Malformed,
    /// No envelope present.
    Absent,
}

impl CallOutcome {
    pub fn into_call(self) -> Option<ParsedFunctionCall> {
        match self {
            CallOutcome::Call(call) => Some(call),
            _ => None,
        }
    }
}

/// Classify one assistant turn's raw text.
pub fn classify_response(text: &str) -> CallOutcome {
    let inner = match FUNCTION_RE
        .captures(text)
        .or_else(|| TOOL_CALL_RE.captures(text))
    {
        Some(caps) => caps.get(1).map(|m| m.as_str()).unwrap_or_default(),
        None => return CallOutcome::Absent,
    };

    let body: serde_json::Value = match serde_json::from_str(inner) {
        Ok(v) => v,
        Err(_) => return CallOutcome::Malformed,
    };

    let name = match body.get("name").and_then(|n| n.as_str()) {
        Some(n) => n.to_string(),
        None => return CallOutcome::Malformed,
    };

    // `parameters` with fallback to `arguments`; missing means no-arg call.
    // Anything other than an object is a corrupt body.
    let parameters = match body.get("parameters").or_else(|| body.get("arguments")) {
        Some(value) if value.is_object() => value.clone(),
        Some(_) => return CallOutcome::Malformed,
        None => serde_json::Value::Object(serde_json::Map::new()),
    };

    CallOutcome::Call(ParsedFunctionCall { name, parameters })
}

/// Locate a tagged call in raw completion text.
///
/// Returns `None` both when no envelope is present and when an envelope's
/// body is unparseable; malformed output degrades silently to "no call
/// detected" rather than erroring. Use [`classify_response`] to distinguish
/// the two cases.
pub fn parse_function_call(text: &str) -> Option<ParsedFunctionCall> {
    classify_response(text).into_call()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_function_envelope() {
        let call =
            parse_function_call(r#"<function>{"name":"f","parameters":{"a":1}}</function>"#)
                .unwrap();
        assert_eq!(call.name, "f");
        assert_eq!(call.parameters, json!({"a": 1}));
    }

    #[test]
    fn tool_call_envelope_falls_back_to_arguments() {
        let call =
            parse_function_call(r#"<tool_call>{"name":"g","arguments":{"b":2}}</tool_call>"#)
                .unwrap();
        assert_eq!(call.name, "g");
        assert_eq!(call.parameters, json!({"b": 2}));
    }

    #[test]
    fn function_envelope_takes_priority() {
        let text = concat!(
            r#"<tool_call>{"name":"second"}</tool_call>"#,
            r#"<function>{"name":"first"}</function>"#,
        );
        assert_eq!(parse_function_call(text).unwrap().name, "first");
    }

    #[test]
    fn missing_parameters_defaults_to_empty_object() {
        let call = parse_function_call(r#"<function>{"name":"ping"}</function>"#).unwrap();
        assert_eq!(call.parameters, json!({}));
    }

    #[test]
    fn plain_text_is_absent() {
        assert_eq!(classify_response("hello, no calls here"), CallOutcome::Absent);
        assert!(parse_function_call("hello, no calls here").is_none());
    }

    #[test]
    fn malformed_body_degrades_without_error() {
        assert_eq!(
            classify_response("<function>not json</function>"),
            CallOutcome::Malformed
        );
        assert!(parse_function_call("<function>not json</function>").is_none());
    }

    #[test]
    fn non_object_parameters_are_malformed() {
        assert_eq!(
            classify_response(r#"<function>{"name":"f","parameters":"x"}</function>"#),
            CallOutcome::Malformed
        );
        assert_eq!(
            classify_response(r#"<tool_call>{"name":"g","arguments":[1,2]}</tool_call>"#),
            CallOutcome::Malformed
        );
    }

    #[test]
    fn body_without_name_is_malformed() {
        assert_eq!(
            classify_response(r#"<function>{"parameters":{}}</function>"#),
            CallOutcome::Malformed
        );
    }

    #[test]
    fn envelope_inside_surrounding_prose_is_found() {
        let text = "Let me check.\n<function>{\"name\":\"lookup\",\"parameters\":{}}</function>\n";
        assert_eq!(parse_function_call(text).unwrap().name, "lookup");
    }
}
