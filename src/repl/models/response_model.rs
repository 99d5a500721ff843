//! Response model for MVVM architecture
//!
//! Holds what comes back from the analysis service: the untyped success
//! payload, the raw failure descriptor, and the tagged outcome of the most
//! recent analyze attempt.

use super::mode::Mode;

/// Unvalidated structured data returned by the service
pub type RawResult = serde_json::Value;

/// Raw failure descriptor produced by the transport
#[derive(Debug, Clone, PartialEq)]
pub enum TransportFailure {
    /// The service answered with a non-2xx status
    ServerError {
        status: u16,
        status_text: String,
        /// Decoded body; a non-JSON body arrives as a JSON string, an empty one as `None`
        body: Option<RawResult>,
    },
    /// The request was sent but nothing came back
    NoResponse,
    /// The request exceeded its time budget
    Timeout,
    /// The request could not be constructed or sent
    SetupError { message: String },
}

impl TransportFailure {
    /// Short tag used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            TransportFailure::ServerError { .. } => "server_error",
            TransportFailure::NoResponse => "no_response",
            TransportFailure::Timeout => "timeout",
            TransportFailure::SetupError { .. } => "setup_error",
        }
    }
}

/// Result of one transport invocation
pub type TransportResult = Result<RawResult, TransportFailure>;

/// Tagged outcome of the most recent analyze attempt.
///
/// Each variant remembers the mode the request was dispatched under.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    Pending { mode: Mode },
    Success { mode: Mode, payload: RawResult },
    Failure { mode: Mode, message: String },
}

impl AnalysisOutcome {
    /// Mode the request was dispatched under
    pub fn mode(&self) -> Mode {
        match self {
            AnalysisOutcome::Pending { mode }
            | AnalysisOutcome::Success { mode, .. }
            | AnalysisOutcome::Failure { mode, .. } => *mode,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, AnalysisOutcome::Pending { .. })
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            AnalysisOutcome::Failure { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn payload(&self) -> Option<&RawResult> {
        match self {
            AnalysisOutcome::Success { payload, .. } => Some(payload),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn outcome_should_remember_dispatch_mode() {
        let outcome = AnalysisOutcome::Success {
            mode: Mode::Indent,
            payload: json!({}),
        };
        assert_eq!(outcome.mode(), Mode::Indent);
        assert_eq!(outcome.payload(), Some(&json!({})));
        assert!(outcome.error_message().is_none());
    }

    #[test]
    fn failure_outcome_should_expose_message() {
        let outcome = AnalysisOutcome::Failure {
            mode: Mode::Syntax,
            message: "boom".to_string(),
        };
        assert_eq!(outcome.error_message(), Some("boom"));
        assert!(!outcome.is_pending());
    }

    #[test]
    fn transport_failure_kind_should_tag_each_variant() {
        assert_eq!(TransportFailure::Timeout.kind(), "timeout");
        assert_eq!(TransportFailure::NoResponse.kind(), "no_response");
        assert_eq!(
            TransportFailure::SetupError {
                message: String::new()
            }
            .kind(),
            "setup_error"
        );
    }
}
