//! # Models Module
//!
//! Plain data: modes, buffers, requests and transport answers.

pub mod buffer_model;
pub mod mode;
pub mod request_model;
pub mod response_model;

pub use buffer_model::{CodeBuffer, LogicalPosition, Pane};
pub use mode::{Mode, ModeSpec};
pub use request_model::{normalize_line_endings, AnalysisRequest, RequestFields};
pub use response_model::{AnalysisOutcome, RawResult, TransportFailure, TransportResult};
