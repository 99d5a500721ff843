//! # Analysis Request Model
//!
//! Turns the current buffers and the active mode into the body the service expects.

use super::mode::Mode;
use serde::Serialize;
use std::borrow::Cow;

/// Fields of a request body, shaped by the mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RequestFields {
    /// `{code}` for single-buffer modes
    Single { code: String },
    /// `{old_code, new_code}` for two-buffer modes
    Pair { old_code: String, new_code: String },
}

/// A normalized request ready for dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    mode: Mode,
    fields: RequestFields,
}

impl AnalysisRequest {
    /// Build a request for `mode` from the primary and secondary buffer text.
    ///
    /// Both buffers are normalized even when the mode only sends the primary one.
    pub fn build(mode: Mode, primary: &str, secondary: &str) -> Self {
        let primary = normalize_line_endings(primary).into_owned();
        let secondary = normalize_line_endings(secondary).into_owned();

        let fields = if mode.requires_secondary_buffer() {
            RequestFields::Pair {
                old_code: primary,
                new_code: secondary,
            }
        } else {
            RequestFields::Single { code: primary }
        };

        Self { mode, fields }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn fields(&self) -> &RequestFields {
        &self.fields
    }

    /// Path of the endpoint this request goes to
    pub fn endpoint_path(&self) -> &'static str {
        self.mode.endpoint_path()
    }
}

/// Replace `\r\n` and lone `\r` with `\n`.
///
/// Applying this twice yields the same text as applying it once.
pub fn normalize_line_endings(text: &str) -> Cow<'_, str> {
    if !text.contains('\r') {
        return Cow::Borrowed(text);
    }

    let mut normalized = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\r' {
            if chars.peek() == Some(&'\n') {
                chars.next();
            }
            normalized.push('\n');
        } else {
            normalized.push(ch);
        }
    }
    Cow::Owned(normalized)
}
