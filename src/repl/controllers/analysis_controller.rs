//! # Analysis Controller
//!
//! Owns the session state (buffers, active mode, outcome) and moves it through
//! `Idle -> Loading -> {Success, Failure}`. The transport call is the only
//! suspension point: [`AnalysisController::start_analyze`] hands back a
//! [`PendingAnalysis`] future and the caller feeds its [`Completion`] into
//! [`AnalysisController::finish`], staying free to edit buffers in between.

use crate::repl::models::{
    AnalysisOutcome, AnalysisRequest, CodeBuffer, Mode, Pane, TransportResult,
};
use crate::repl::services::{classify_failure, AnalysisTransport};
use crate::repl::view_models::RenderedResult;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Sample text the primary buffer starts with
pub const PRIMARY_SEED: &str =
    "// Enter your first code here\nfunction example() {\n  console.log(\"Hello, world!\");\n}";

/// Sample text the secondary buffer starts with
pub const SECONDARY_SEED: &str = "// Enter your second code here\nfunction example() {\n  console.log(\"Hello, updated world!\");\n}";

/// Coarse state of the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisPhase {
    Idle,
    Loading,
    Success,
    Failure,
}

/// Transport answer tagged with the mode it was dispatched under
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub mode: Mode,
    pub result: TransportResult,
}

/// Type alias for the boxed transport future
type TransportFuture = Pin<Box<dyn Future<Output = TransportResult> + Send>>;

/// An in-flight analysis. Resolves to a [`Completion`] for [`AnalysisController::finish`].
pub struct PendingAnalysis {
    mode: Mode,
    future: TransportFuture,
}

impl PendingAnalysis {
    pub fn mode(&self) -> Mode {
        self.mode
    }
}

impl Future for PendingAnalysis {
    type Output = Completion;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mode = self.mode;
        self.future
            .as_mut()
            .poll(cx)
            .map(|result| Completion { mode, result })
    }
}

/// State machine behind the analyze action
pub struct AnalysisController<T: AnalysisTransport> {
    transport: T,
    mode: Mode,
    primary: CodeBuffer,
    secondary: CodeBuffer,
    focus: Pane,
    outcome: Option<AnalysisOutcome>,
    rendered: Option<RenderedResult>,
    result_scroll: usize,
}

impl<T: AnalysisTransport> AnalysisController<T> {
    /// Create a controller in Compare mode with the sample buffers
    pub fn new(transport: T) -> Self {
        Self::with_mode(transport, Mode::default())
    }

    pub fn with_mode(transport: T, mode: Mode) -> Self {
        Self {
            transport,
            mode,
            primary: CodeBuffer::from_text(PRIMARY_SEED),
            secondary: CodeBuffer::from_text(SECONDARY_SEED),
            focus: Pane::Primary,
            outcome: None,
            rendered: None,
            result_scroll: 0,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn phase(&self) -> AnalysisPhase {
        match &self.outcome {
            None => AnalysisPhase::Idle,
            Some(AnalysisOutcome::Pending { .. }) => AnalysisPhase::Loading,
            Some(AnalysisOutcome::Success { .. }) => AnalysisPhase::Success,
            Some(AnalysisOutcome::Failure { .. }) => AnalysisPhase::Failure,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.phase() == AnalysisPhase::Loading
    }

    pub fn outcome(&self) -> Option<&AnalysisOutcome> {
        self.outcome.as_ref()
    }

    /// View model of the last successful analysis
    pub fn rendered(&self) -> Option<&RenderedResult> {
        self.rendered.as_ref()
    }

    /// First result panel row shown; the renderer clamps it to the content
    pub fn result_scroll(&self) -> usize {
        self.result_scroll
    }

    /// Move the result panel by `delta` rows, staying within `0..=max`
    pub fn scroll_result(&mut self, delta: isize, max: usize) {
        self.result_scroll = self.result_scroll.saturating_add_signed(delta).min(max);
    }

    pub fn error_message(&self) -> Option<&str> {
        self.outcome.as_ref().and_then(AnalysisOutcome::error_message)
    }

    /// Label of the analyze action for the current state
    pub fn action_label(&self) -> &'static str {
        if self.is_loading() {
            "Analyzing..."
        } else {
            self.mode.spec().action_label
        }
    }

    pub fn buffer(&self, pane: Pane) -> &CodeBuffer {
        match pane {
            Pane::Primary => &self.primary,
            Pane::Secondary => &self.secondary,
        }
    }

    /// Buffers stay editable in every phase, including while a request is in flight
    pub fn buffer_mut(&mut self, pane: Pane) -> &mut CodeBuffer {
        match pane {
            Pane::Primary => &mut self.primary,
            Pane::Secondary => &mut self.secondary,
        }
    }

    pub fn focus(&self) -> Pane {
        self.focus
    }

    pub fn focused_buffer_mut(&mut self) -> &mut CodeBuffer {
        self.buffer_mut(self.focus)
    }

    /// Move focus to the other buffer when the mode shows two
    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Pane::Primary if self.mode.requires_secondary_buffer() => Pane::Secondary,
            _ => Pane::Primary,
        };
    }

    /// Switch the active mode.
    ///
    /// A finished result or error belongs to the old mode and is discarded.
    /// An in-flight request is left alone; its answer keeps its dispatch mode.
    pub fn set_mode(&mut self, mode: Mode) {
        if mode == self.mode {
            return;
        }
        tracing::debug!("Mode change {} -> {}", self.mode, mode);
        self.mode = mode;
        if !mode.requires_secondary_buffer() {
            self.focus = Pane::Primary;
        }
        if matches!(self.phase(), AnalysisPhase::Success | AnalysisPhase::Failure) {
            self.clear_outcome();
        }
    }

    /// Drop a finished result or error and return to Idle
    pub fn dismiss(&mut self) {
        if matches!(self.phase(), AnalysisPhase::Success | AnalysisPhase::Failure) {
            self.clear_outcome();
        }
    }

    fn clear_outcome(&mut self) {
        self.outcome = None;
        self.rendered = None;
        self.result_scroll = 0;
    }

    /// Begin an analysis of the current buffers under the current mode.
    ///
    /// Returns `None` and changes nothing while another analysis is in flight.
    pub fn start_analyze(&mut self) -> Option<PendingAnalysis> {
        if self.is_loading() {
            tracing::debug!("Analyze ignored: a request is already in flight");
            return None;
        }

        let mode = self.mode;
        self.clear_outcome();
        self.outcome = Some(AnalysisOutcome::Pending { mode });

        let request = AnalysisRequest::build(mode, &self.primary.text(), &self.secondary.text());
        let future = self.transport.send(&request);
        tracing::debug!("Analysis started under {}", mode);

        Some(PendingAnalysis {
            mode,
            future: Box::pin(future),
        })
    }

    /// Apply the answer of the in-flight analysis.
    ///
    /// The result is rendered for the mode it was dispatched under, whatever
    /// mode is active now. A completion arriving when nothing is in flight is dropped.
    pub fn finish(&mut self, completion: Completion) {
        if !self.is_loading() {
            tracing::warn!("Dropping {} completion: no analysis in flight", completion.mode);
            return;
        }

        let Completion { mode, result } = completion;
        self.result_scroll = 0;
        match result {
            Ok(payload) => {
                self.rendered = Some(RenderedResult::new(mode, &payload));
                self.outcome = Some(AnalysisOutcome::Success { mode, payload });
                tracing::debug!("Analysis under {} succeeded", mode);
            }
            Err(failure) => {
                let message = classify_failure(&failure);
                tracing::warn!("Analysis under {} failed: {}", mode, message);
                self.rendered = None;
                self.outcome = Some(AnalysisOutcome::Failure { mode, message });
            }
        }
    }

    /// Run one full analysis without interleaving other work
    pub async fn analyze(&mut self) -> AnalysisPhase {
        if let Some(pending) = self.start_analyze() {
            let completion = pending.await;
            self.finish(completion);
        }
        self.phase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repl::models::{RequestFields, TransportFailure};
    use crate::repl::services::{ScriptedTransport, TIMEOUT_MESSAGE};
    use crate::repl::view_models::{DiffLineKind, ResultView};
    use serde_json::json;

    fn controller() -> AnalysisController<ScriptedTransport> {
        AnalysisController::new(ScriptedTransport::new())
    }

    #[test]
    fn controller_should_start_idle_in_compare_mode() {
        let controller = controller();
        assert_eq!(controller.phase(), AnalysisPhase::Idle);
        assert_eq!(controller.mode(), Mode::Compare);
        assert_eq!(controller.action_label(), "Compare Code");
        assert!(controller.buffer(Pane::Primary).text().contains("Hello, world!"));
    }

    #[tokio::test]
    async fn successful_analysis_should_store_payload_and_view() {
        let mut controller = controller();
        controller
            .transport()
            .push_ready(Ok(json!({ "diff": ["+x"], "additions_count": 1 })));

        assert_eq!(controller.analyze().await, AnalysisPhase::Success);

        let rendered = controller.rendered().unwrap();
        assert_eq!(rendered.mode, Mode::Compare);
        assert!(matches!(rendered.view, ResultView::Diff(_)));
        assert!(controller.outcome().unwrap().payload().is_some());
    }

    #[tokio::test]
    async fn failed_analysis_should_store_classified_message() {
        let mut controller = controller();
        controller
            .transport()
            .push_ready(Err(TransportFailure::Timeout));

        assert_eq!(controller.analyze().await, AnalysisPhase::Failure);
        assert_eq!(controller.error_message(), Some(TIMEOUT_MESSAGE));
        assert!(controller.rendered().is_none());
    }

    #[tokio::test]
    async fn analyze_while_loading_should_be_ignored() {
        let mut controller = controller();
        let release = controller.transport().push_held();

        let pending = controller.start_analyze().unwrap();
        assert_eq!(controller.phase(), AnalysisPhase::Loading);
        assert_eq!(controller.action_label(), "Analyzing...");

        assert!(controller.start_analyze().is_none());
        assert_eq!(controller.phase(), AnalysisPhase::Loading);
        assert_eq!(controller.transport().send_count(), 1);

        release.send(Ok(json!({ "diff": [] }))).unwrap();
        controller.finish(pending.await);
        assert_eq!(controller.phase(), AnalysisPhase::Success);
    }

    #[tokio::test]
    async fn late_result_should_keep_dispatch_mode_after_mode_switch() {
        let mut controller = controller();
        let release = controller.transport().push_held();

        let pending = controller.start_analyze().unwrap();
        controller.set_mode(Mode::Syntax);
        assert_eq!(controller.phase(), AnalysisPhase::Loading);

        release
            .send(Ok(json!({ "diff": ["@@ -1 +1 @@", "-a", "+b"] })))
            .unwrap();
        controller.finish(pending.await);

        assert_eq!(controller.mode(), Mode::Syntax);
        let rendered = controller.rendered().unwrap();
        assert_eq!(rendered.mode, Mode::Compare);
        let ResultView::Diff(view) = &rendered.view else {
            panic!("expected the compare diff view");
        };
        assert_eq!(view.lines[0].kind, DiffLineKind::HunkHeader);
        assert_eq!(controller.outcome().unwrap().mode(), Mode::Compare);
    }

    #[tokio::test]
    async fn mode_switch_should_discard_finished_result() {
        let mut controller = controller();
        controller.transport().push_ready(Ok(json!({ "diff": [] })));
        controller.analyze().await;

        controller.set_mode(Mode::Indent);
        assert_eq!(controller.phase(), AnalysisPhase::Idle);
        assert!(controller.rendered().is_none());
    }

    #[tokio::test]
    async fn new_analysis_should_discard_previous_outcome() {
        let mut controller = controller();
        controller
            .transport()
            .push_ready(Err(TransportFailure::NoResponse));
        controller.analyze().await;
        assert_eq!(controller.phase(), AnalysisPhase::Failure);

        let release = controller.transport().push_held();
        let pending = controller.start_analyze().unwrap();
        assert!(controller.error_message().is_none());
        assert_eq!(controller.phase(), AnalysisPhase::Loading);
        drop(release);
        controller.finish(pending.await);
        assert_eq!(controller.phase(), AnalysisPhase::Failure);
    }

    #[tokio::test]
    async fn request_should_use_normalized_buffers_of_dispatch_mode() {
        let mut controller = AnalysisController::with_mode(ScriptedTransport::new(), Mode::Indent);
        controller.buffer_mut(Pane::Primary).set_text("if x:\r\n\tpass");
        controller.transport().push_ready(Ok(json!({ "indentation_issues": [] })));
        controller.analyze().await;

        let sent = controller.transport().sent_requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(
            sent[0].fields(),
            &RequestFields::Single {
                code: "if x:\n\tpass".to_string()
            }
        );
    }

    #[test]
    fn stray_completion_should_be_dropped() {
        let mut controller = controller();
        controller.finish(Completion {
            mode: Mode::Compare,
            result: Ok(json!({})),
        });
        assert_eq!(controller.phase(), AnalysisPhase::Idle);
    }

    #[test]
    fn focus_should_stay_primary_in_single_buffer_modes() {
        let mut controller = controller();
        controller.toggle_focus();
        assert_eq!(controller.focus(), Pane::Secondary);

        controller.set_mode(Mode::Syntax);
        assert_eq!(controller.focus(), Pane::Primary);
        controller.toggle_focus();
        assert_eq!(controller.focus(), Pane::Primary);
    }

    #[tokio::test]
    async fn result_scroll_should_clamp_and_reset_on_new_state() {
        let mut controller = controller();
        controller.transport().push_ready(Ok(json!({ "diff": ["+a", "+b"] })));
        controller.transport().push_ready(Ok(json!({ "diff": [] })));
        controller.analyze().await;

        controller.scroll_result(5, 3);
        assert_eq!(controller.result_scroll(), 3);
        controller.scroll_result(-10, 3);
        assert_eq!(controller.result_scroll(), 0);

        controller.scroll_result(2, 3);
        controller.analyze().await;
        assert_eq!(controller.result_scroll(), 0);

        controller.scroll_result(2, 3);
        controller.dismiss();
        assert_eq!(controller.result_scroll(), 0);
    }

    #[tokio::test]
    async fn dismiss_should_return_to_idle() {
        let mut controller = controller();
        controller.transport().push_ready(Ok(json!({})));
        controller.analyze().await;
        controller.dismiss();
        assert_eq!(controller.phase(), AnalysisPhase::Idle);
    }
}
