//! # Result Rendering
//!
//! Narrows an untyped service payload into a view model the terminal can draw.
//! Rendering is pure and total: any payload shape yields some view, and a
//! payload that matches nothing expected becomes an opaque dump.

use super::prose::{render_prose, ProseLine};
use crate::repl::models::{Mode, RawResult};
use serde_json::Map;

/// Shown when an AI summary payload carries no summary text
pub const NO_SUMMARY_PLACEHOLDER: &str = "No summary available.";

/// Classification of a diff line by its leading marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffLineKind {
    Addition,
    Deletion,
    HunkHeader,
    Context,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
    pub kind: DiffLineKind,
    pub text: String,
}

impl DiffLine {
    pub fn classify(text: &str) -> Self {
        let kind = if text.starts_with("@@") {
            DiffLineKind::HunkHeader
        } else if text.starts_with('+') {
            DiffLineKind::Addition
        } else if text.starts_with('-') {
            DiffLineKind::Deletion
        } else {
            DiffLineKind::Context
        };
        Self {
            kind,
            text: text.to_string(),
        }
    }
}

/// Change counters; anything the payload leaves out reads as zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DiffCounters {
    pub additions: u64,
    pub deletions: u64,
    pub total_changes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffView {
    pub lines: Vec<DiffLine>,
    pub counters: DiffCounters,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryView {
    pub summary: String,
    pub prose: Vec<ProseLine>,
    pub stats: DiffCounters,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndentIssue {
    pub line: u64,
    pub issue: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuesView {
    pub issues: Vec<IndentIssue>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxVerdict {
    pub valid: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackView {
    pub dump: String,
}

impl FallbackView {
    pub fn from_raw(raw: &RawResult) -> Self {
        let dump = serde_json::to_string_pretty(raw).unwrap_or_else(|_| raw.to_string());
        Self { dump }
    }
}

/// Renderer-ready representation of a successful result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultView {
    Diff(DiffView),
    Summary(SummaryView),
    Issues(IssuesView),
    Syntax(SyntaxVerdict),
    Fallback(FallbackView),
}

/// A rendered result together with the mode whose request produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedResult {
    pub mode: Mode,
    pub view: ResultView,
}

impl RenderedResult {
    pub fn new(mode: Mode, raw: &RawResult) -> Self {
        Self {
            mode,
            view: render_result(mode, raw),
        }
    }
}

/// Narrow `raw` into the view for `mode`
pub fn render_result(mode: Mode, raw: &RawResult) -> ResultView {
    let narrowed = match mode {
        Mode::AiSummary => summary_view(raw).map(ResultView::Summary),
        Mode::Compare | Mode::Indent | Mode::Syntax => diff_view(raw)
            .map(ResultView::Diff)
            .or_else(|| issues_view(raw).map(ResultView::Issues))
            .or_else(|| syntax_verdict(raw).map(ResultView::Syntax)),
    };
    narrowed.unwrap_or_else(|| ResultView::Fallback(FallbackView::from_raw(raw)))
}

fn counter(object: &Map<String, RawResult>, key: &str) -> u64 {
    object.get(key).and_then(RawResult::as_u64).unwrap_or(0)
}

fn diff_view(raw: &RawResult) -> Option<DiffView> {
    let object = raw.as_object()?;
    let lines = object
        .get("diff")?
        .as_array()?
        .iter()
        .map(|line| line.as_str().map(DiffLine::classify))
        .collect::<Option<Vec<_>>>()?;

    Some(DiffView {
        lines,
        counters: DiffCounters {
            additions: counter(object, "additions_count"),
            deletions: counter(object, "deletions_count"),
            total_changes: counter(object, "total_changes"),
        },
    })
}

fn summary_view(raw: &RawResult) -> Option<SummaryView> {
    let object = raw.as_object()?;
    let summary = object
        .get("summary")
        .and_then(RawResult::as_str)
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(NO_SUMMARY_PLACEHOLDER)
        .to_string();

    let stats = object
        .get("diff_stats")
        .and_then(RawResult::as_object)
        .map(|stats| DiffCounters {
            additions: counter(stats, "additions"),
            deletions: counter(stats, "deletions"),
            total_changes: counter(stats, "total_changes"),
        })
        .unwrap_or_default();

    Some(SummaryView {
        prose: render_prose(&summary),
        summary,
        stats,
    })
}

fn issues_view(raw: &RawResult) -> Option<IssuesView> {
    let issues = raw
        .as_object()?
        .get("indentation_issues")?
        .as_array()?
        .iter()
        .filter_map(RawResult::as_object)
        .map(|issue| IndentIssue {
            line: counter(issue, "line"),
            issue: issue
                .get("issue")
                .and_then(RawResult::as_str)
                .unwrap_or_default()
                .to_string(),
        })
        .collect();
    Some(IssuesView { issues })
}

fn syntax_verdict(raw: &RawResult) -> Option<SyntaxVerdict> {
    let object = raw.as_object()?;
    let valid = object.get("valid")?.as_bool()?;
    let error = object
        .get("error")
        .and_then(RawResult::as_str)
        .map(str::to_string);
    Some(SyntaxVerdict { valid, error })
}
