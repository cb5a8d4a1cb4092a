//! Turns failed calls into [`ApiError`]s.
//!
//! Two entry points: [`network_error`] for calls that never got a response,
//! and [`normalize_response`] for responses with a non-success status. Both
//! are pure and never fail.
//!
//! The human-readable message is pulled out of the body by trying each
//! [`MessageStrategy`] in [`MESSAGE_STRATEGIES`] order, falling back to
//! `"Request failed: <status>"`.

use crate::error::ApiError;
use serde_json::{json, Value};
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageStrategy {
    /// `{"detail": "Email already registered"}`
    DetailString,
    /// `{"detail": [{"loc": [...], "msg": "field required", "type": "..."}]}`
    DetailValidationMsg,
    /// `{"message": "..."}`
    MessageField,
    /// Body was not JSON; use the raw text.
    PlainText,
}

pub const MESSAGE_STRATEGIES: [MessageStrategy; 4] = [
    MessageStrategy::DetailString,
    MessageStrategy::DetailValidationMsg,
    MessageStrategy::MessageField,
    MessageStrategy::PlainText,
];

fn non_blank(value: &Value) -> Option<String> {
    value
        .as_str()
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}

impl MessageStrategy {
    pub fn extract(&self, body: &Value) -> Option<String> {
        match self {
            MessageStrategy::DetailString => body.get("detail").and_then(non_blank),
            MessageStrategy::DetailValidationMsg => body
                .get("detail")
                .and_then(Value::as_array)
                .and_then(|items| items.first())
                .and_then(|first| first.get("msg"))
                .and_then(non_blank),
            MessageStrategy::MessageField => body.get("message").and_then(non_blank),
            MessageStrategy::PlainText => non_blank(body),
        }
    }
}

pub fn extract_message(body: &Value) -> Option<String> {
    MESSAGE_STRATEGIES
        .iter()
        .find_map(|strategy| strategy.extract(body))
}

/// Decodes a response body as JSON, or keeps it as a JSON string when it isn't.
pub fn decode_body(body: &[u8]) -> Value {
    serde_json::from_slice(body)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned()))
}

pub fn normalize_response(status: u16, body: &[u8]) -> ApiError {
    let detail = decode_body(body);
    let message = extract_message(&detail).unwrap_or_else(|| format!("Request failed: {status}"));
    ApiError::new(message, status, detail)
}

pub fn network_error(base_url: &str, cause: &dyn Display) -> ApiError {
    ApiError::new(
        format!("Can't connect right now (API: {base_url}). Please try again in a moment."),
        0,
        json!({
            "kind": "network_error",
            "message": cause.to_string(),
        }),
    )
}
