//! Provider events crossing the worker boundary.

use serde::{Deserialize, Serialize};

/// Closed set of tagged messages a completion provider may deliver for one
/// in-flight request. Exactly one `FinalText` or `StreamError` terminates a
/// request; `Progress` and `PartialContentDelta` may precede it in any number.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event_type")]
pub enum ProviderEvent {
    /// Model readiness / loading progress. Surfaced to observers only; the
    /// orchestration loop ignores it.
    #[serde(rename = "Progress")]
    Progress {
        percent: f32,
        #[serde(skip_serializing_if = "Option::is_none")]
        status: Option<String>,
    },

    /// Partial content delta (text streaming).
    #[serde(rename = "PartialContentDelta")]
    PartialContentDelta { content: String },

    /// Final full text for the request.
    #[serde(rename = "FinalText")]
    FinalText { text: String },

    /// Provider-side failure; terminates the request.
    #[serde(rename = "StreamError")]
    StreamError { message: String },
}
