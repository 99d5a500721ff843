//! # View Models
//!
//! Renderer-ready shapes derived from raw analysis results.

pub mod prose;
pub mod result_view;

pub use prose::{render_prose, ProseLine, ProseStyle};
pub use result_view::{
    render_result, DiffCounters, DiffLine, DiffLineKind, DiffView, FallbackView, IndentIssue,
    IssuesView, RenderedResult, ResultView, SummaryView, SyntaxVerdict, NO_SUMMARY_PLACEHOLDER,
};
