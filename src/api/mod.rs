use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body keys that may carry the reply text, in priority order.
pub const REPLY_FIELDS: [&str; 3] = ["message", "response", "answer"];

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct ChatRequest {
    pub message: String,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Returns the first non-empty string found under one of [`REPLY_FIELDS`].
///
/// Non-string values are skipped, and a body that is not a JSON object never
/// matches.
pub fn extract_reply(body: &Value) -> Option<&str> {
    REPLY_FIELDS
        .iter()
        .filter_map(|field| body.get(field).and_then(Value::as_str))
        .find(|text| !text.is_empty())
}

/// Reply text for a successful exchange; an unrecognized body yields `""`.
pub fn reply_text(body: &Value) -> String {
    extract_reply(body).unwrap_or_default().to_string()
}

/// The service reports some failures in-band as `{"error": "..."}` with a
/// success status.
pub fn service_error(body: &Value) -> Option<&str> {
    match body.get("error")? {
        Value::String(text) => Some(text.as_str()),
        Value::Object(map) => map.get("message").and_then(Value::as_str),
        _ => None,
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct HealthReport {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub tools: Vec<String>,
    #[serde(default)]
    pub openrouter_configured: bool,
    #[serde(default)]
    pub newsdata_configured: bool,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}
