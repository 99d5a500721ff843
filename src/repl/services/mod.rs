//! # Services Layer
//!
//! Talking to the analysis backend and turning its failures into messages.
//!
//! - [`HttpService`] is the production [`AnalysisTransport`]
//! - [`ScriptedTransport`] replays canned answers in tests and demos
//! - [`classify_failure`] reduces any [`TransportFailure`](crate::repl::models::TransportFailure)
//!   to one user-facing string

pub mod error_classifier;
pub mod http;
pub mod scripted;

pub use error_classifier::{classify_failure, NO_RESPONSE_MESSAGE, TIMEOUT_MESSAGE};
pub use http::{AnalysisTransport, HttpService};
pub use scripted::ScriptedTransport;
