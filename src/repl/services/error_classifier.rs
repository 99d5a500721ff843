//! # Error Classifier
//!
//! Reduces a raw transport failure to the one line shown in the error panel.
//! The rules form a decision table: the first matching row wins.

use crate::repl::models::{RawResult, TransportFailure};

/// Shown when the service never answered
pub const NO_RESPONSE_MESSAGE: &str = "No response from server. Is the backend running?";

/// Shown when the request exceeded its time budget
pub const TIMEOUT_MESSAGE: &str = "Request timed out. Please try again.";

/// Produce the display message for a failure
pub fn classify_failure(failure: &TransportFailure) -> String {
    match failure {
        TransportFailure::ServerError {
            status,
            status_text,
            body,
        } => match body {
            Some(body) if !body.is_null() && body.as_str() != Some("") => message_from_body(body),
            _ => format!("Server Error: {status} - {status_text}"),
        },
        TransportFailure::NoResponse => NO_RESPONSE_MESSAGE.to_string(),
        TransportFailure::Timeout => TIMEOUT_MESSAGE.to_string(),
        TransportFailure::SetupError { message } => format!("Request error: {message}"),
    }
}

fn message_from_body(body: &RawResult) -> String {
    if let RawResult::String(text) = body {
        return text.clone();
    }
    if let Some(detail) = non_empty_field(body, "detail") {
        return detail;
    }
    if let Some(message) = non_empty_field(body, "message") {
        return message;
    }
    body.to_string()
}

/// Read `key` from an object body. Strings are used as-is; other values
/// (FastAPI validation errors put a list in `detail`) are stringified.
/// Null, false, empty strings and zero count as absent.
fn non_empty_field(body: &RawResult, key: &str) -> Option<String> {
    let value = body.as_object()?.get(key)?;
    match value {
        RawResult::Null | RawResult::Bool(false) => None,
        RawResult::String(text) if text.is_empty() => None,
        RawResult::String(text) => Some(text.clone()),
        RawResult::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}
