//! # Application Controller
//!
//! Runs the terminal event loop. Key presses are mapped to [`CommandEvent`]s
//! and applied to the [`AnalysisController`]; at most one analysis future is
//! driven alongside input polling, so the buffers stay editable while a
//! request is in flight.

use crate::repl::{
    commands::{map_key_event, CommandEvent, MovementDirection, ScrollAmount},
    controllers::analysis_controller::{AnalysisController, PendingAnalysis},
    io::{EventStream, RenderStream},
    services::AnalysisTransport,
    views::TerminalRenderer,
};
use anyhow::Result;
use crossterm::event::Event;
use std::time::Duration;

/// Input poll timeout while nothing is in flight
const IDLE_POLL: Duration = Duration::from_millis(100);

/// How long the in-flight request is driven before input is checked again
const FLIGHT_SLICE: Duration = Duration::from_millis(16);

/// Wires input, the analysis controller and the renderer together
pub struct AppController<T: AnalysisTransport, ES: EventStream, RS: RenderStream> {
    controller: AnalysisController<T>,
    renderer: TerminalRenderer<RS>,
    event_stream: ES,
    in_flight: Option<PendingAnalysis>,
    should_quit: bool,
}

impl<T: AnalysisTransport, ES: EventStream, RS: RenderStream> AppController<T, ES, RS> {
    /// Create the application with injected I/O streams
    pub fn with_io_streams(
        controller: AnalysisController<T>,
        server_label: impl Into<String>,
        event_stream: ES,
        render_stream: RS,
    ) -> Result<Self> {
        let renderer = TerminalRenderer::with_render_stream(render_stream, server_label)?;
        Ok(Self {
            controller,
            renderer,
            event_stream,
            in_flight: None,
            should_quit: false,
        })
    }

    pub fn controller(&self) -> &AnalysisController<T> {
        &self.controller
    }

    /// Run until the user quits. The terminal is restored even when the loop fails.
    pub async fn run(&mut self) -> Result<()> {
        self.renderer.initialize()?;
        let outcome = self.event_loop().await;
        self.renderer.cleanup()?;
        if self.in_flight.take().is_some() {
            tracing::info!("Quit with an analysis still in flight; its result is discarded");
        }
        outcome
    }

    async fn event_loop(&mut self) -> Result<()> {
        self.renderer.render_full(&self.controller)?;

        while !self.should_quit {
            let completion = match self.in_flight.as_mut() {
                Some(pending) => tokio::select! {
                    completion = pending => Some(completion),
                    _ = tokio::time::sleep(FLIGHT_SLICE) => None,
                },
                None => None,
            };
            if let Some(completion) = completion {
                self.in_flight = None;
                self.controller.finish(completion);
                self.renderer.render_full(&self.controller)?;
            }

            let timeout = if self.in_flight.is_some() {
                Duration::ZERO
            } else {
                IDLE_POLL
            };
            if !self.event_stream.poll(timeout)? {
                continue;
            }

            match self.event_stream.read()? {
                Event::Key(key_event) => {
                    tracing::debug!("Received key event: {:?}", key_event);
                    let event = map_key_event(key_event);
                    if event == CommandEvent::NoAction {
                        continue;
                    }
                    self.apply_command_event(event);
                    if !self.should_quit {
                        self.renderer.render_full(&self.controller)?;
                    }
                }
                Event::Resize(width, height) => {
                    self.renderer.update_size(width, height);
                    self.renderer.render_full(&self.controller)?;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn apply_command_event(&mut self, event: CommandEvent) {
        match event {
            CommandEvent::ModeSelectRequested { mode } => self.controller.set_mode(mode),
            CommandEvent::FocusToggleRequested => self.controller.toggle_focus(),
            CommandEvent::AnalyzeRequested => {
                if let Some(pending) = self.controller.start_analyze() {
                    self.in_flight = Some(pending);
                }
            }
            CommandEvent::DismissRequested => self.controller.dismiss(),
            CommandEvent::TextInsertRequested { ch } => {
                self.controller.focused_buffer_mut().insert_char(ch)
            }
            CommandEvent::BackspaceRequested => self.controller.focused_buffer_mut().backspace(),
            CommandEvent::CursorMoveRequested { direction } => {
                let buffer = self.controller.focused_buffer_mut();
                match direction {
                    MovementDirection::Left => buffer.move_left(),
                    MovementDirection::Right => buffer.move_right(),
                    MovementDirection::Up => buffer.move_up(),
                    MovementDirection::Down => buffer.move_down(),
                }
            }
            CommandEvent::ResultScrollRequested { amount } => {
                let window = self.renderer.result_window();
                let page = isize::try_from(window.page_rows.max(1)).unwrap_or(isize::MAX);
                let delta = match amount {
                    ScrollAmount::LineUp => -1,
                    ScrollAmount::LineDown => 1,
                    ScrollAmount::PageUp => -page,
                    ScrollAmount::PageDown => page,
                };
                self.controller.scroll_result(delta, window.max_scroll);
            }
            CommandEvent::QuitRequested => self.should_quit = true,
            CommandEvent::NoAction => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repl::controllers::AnalysisPhase;
    use crate::repl::io::{MockEventStream, MockRenderStream, RenderCommand};
    use crate::repl::models::{Mode, Pane, TransportFailure};
    use crate::repl::services::ScriptedTransport;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use serde_json::json;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::empty()))
    }

    fn quit() -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL))
    }

    fn app(
        transport: ScriptedTransport,
        events: Vec<Event>,
        stream: MockRenderStream,
    ) -> AppController<ScriptedTransport, MockEventStream, MockRenderStream> {
        AppController::with_io_streams(
            AnalysisController::new(transport),
            "http://localhost:8000",
            MockEventStream::new(events),
            stream,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn analyze_key_should_render_result_panel() {
        let transport = ScriptedTransport::new();
        transport.push_ready(Ok(json!({ "diff": ["+added"], "additions_count": 1 })));
        let stream = MockRenderStream::new();
        let observer = stream.clone();

        let mut app = app(transport, vec![key(KeyCode::F(5)), quit()], stream);
        app.run().await.unwrap();

        assert_eq!(app.controller().phase(), AnalysisPhase::Success);
        let output = observer.output_string();
        assert!(output.contains("Result - Compare Code"));
        assert!(output.contains("+added"));
        assert!(observer.has_command(&RenderCommand::LeaveAlternateScreen));
        assert!(observer.has_command(&RenderCommand::DisableRawMode));
    }

    #[tokio::test]
    async fn buffers_should_stay_editable_while_loading() {
        let transport = ScriptedTransport::new();
        let _release = transport.push_held();

        let events = vec![
            key(KeyCode::F(5)),
            key(KeyCode::F(5)),
            key(KeyCode::Char('z')),
            quit(),
        ];
        let mut app = app(transport, events, MockRenderStream::new());
        app.run().await.unwrap();

        let controller = app.controller();
        assert!(controller.is_loading());
        assert_eq!(controller.transport().send_count(), 1);
        assert!(controller.buffer(Pane::Primary).text().starts_with('z'));
    }

    #[tokio::test]
    async fn failure_should_render_error_panel_and_escape_should_dismiss() {
        let transport = ScriptedTransport::new();
        transport.push_ready(Err(TransportFailure::NoResponse));
        let stream = MockRenderStream::new();
        let observer = stream.clone();

        let mut app = app(transport, vec![key(KeyCode::F(5)), quit()], stream.clone());
        app.run().await.unwrap();
        assert!(observer.output_string().contains("Error - Compare Code"));
        assert!(observer
            .output_string()
            .contains("No response from server. Is the backend running?"));

        let transport = app.controller().transport().clone();
        transport.push_ready(Err(TransportFailure::Timeout));
        let mut app = AppController::with_io_streams(
            AnalysisController::new(transport),
            "http://localhost:8000",
            MockEventStream::new(vec![key(KeyCode::F(5)), key(KeyCode::Esc), quit()]),
            stream,
        )
        .unwrap();
        app.run().await.unwrap();
        assert_eq!(app.controller().phase(), AnalysisPhase::Idle);
    }

    #[tokio::test]
    async fn page_down_should_reach_the_last_line_of_a_long_diff() {
        let diff: Vec<String> = (0..60).map(|n| format!("+line{n:02}")).collect();
        let transport = ScriptedTransport::new();
        transport.push_ready(Ok(json!({ "diff": diff, "additions_count": 60 })));
        let stream = MockRenderStream::new();
        let observer = stream.clone();

        let mut events = vec![key(KeyCode::F(5))];
        events.extend((0..6).map(|_| key(KeyCode::PageDown)));
        events.push(quit());
        let mut app = app(transport, events, stream);
        app.run().await.unwrap();

        let output = observer.output_string();
        assert!(output.contains("+line59"));
        assert!(!output.contains("+line00"));
        assert!(output.contains("of 61, more hidden"));
        assert_eq!(
            app.controller().result_scroll(),
            app.renderer.result_window().max_scroll
        );
    }

    #[tokio::test]
    async fn long_result_should_start_at_the_top_with_a_hidden_rows_marker() {
        let diff: Vec<String> = (0..60).map(|n| format!("+line{n:02}")).collect();
        let transport = ScriptedTransport::new();
        transport.push_ready(Ok(json!({ "diff": diff })));
        let stream = MockRenderStream::new();
        let observer = stream.clone();

        let mut app = app(transport, vec![key(KeyCode::F(5)), quit()], stream);
        app.run().await.unwrap();

        let output = observer.output_string();
        assert!(output.contains("+line00"));
        assert!(!output.contains("+line59"));
        assert!(output.contains("-- rows 1-"));
    }

    #[tokio::test]
    async fn function_keys_and_tab_should_switch_mode_and_focus() {
        let events = vec![
            key(KeyCode::Tab),
            key(KeyCode::F(3)),
            key(KeyCode::Tab),
            quit(),
        ];
        let mut app = app(ScriptedTransport::new(), events, MockRenderStream::new());
        app.run().await.unwrap();

        assert_eq!(app.controller().mode(), Mode::Syntax);
        assert_eq!(app.controller().focus(), Pane::Primary);
    }
}
