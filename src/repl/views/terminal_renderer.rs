//! # Terminal Renderer
//!
//! Draws the analysis session onto a [`RenderStream`]: title, mode tabs,
//! editor panes, action row, result panel and a key help line. Every frame is
//! a full redraw; the screen is small and only changes on input or completion.

use crate::repl::controllers::AnalysisController;
use crate::repl::io::RenderStream;
use crate::repl::models::{AnalysisOutcome, CodeBuffer, Mode, Pane};
use crate::repl::services::AnalysisTransport;
use crate::repl::view_models::{DiffLineKind, ProseStyle, RenderedResult, ResultView};
use anyhow::Result;
use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
};

const TAB_WIDTH: usize = 4;
const HELP_LINE: &str =
    "F1-F4 mode | Tab focus | F5/Ctrl+R analyze | PgUp/PgDn scroll | Esc dismiss | Ctrl+Q quit";

// Helper macro to convert crossterm errors to anyhow errors
macro_rules! queue_term {
    ($($arg:expr),* $(,)?) => {
        queue!($($arg),*).map_err(anyhow::Error::from)
    };
}

/// Visual role of a result line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Dim,
    Heading,
    Code,
    Addition,
    Deletion,
    Hunk,
    Good,
    Bad,
}

impl Tone {
    fn color(self) -> Option<Color> {
        match self {
            Tone::Plain | Tone::Heading => None,
            Tone::Dim => Some(Color::DarkGrey),
            Tone::Code => Some(Color::Yellow),
            Tone::Addition | Tone::Good => Some(Color::Green),
            Tone::Deletion | Tone::Bad => Some(Color::Red),
            Tone::Hunk => Some(Color::Cyan),
        }
    }
}

/// One line of the result panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledLine {
    pub tone: Tone,
    pub text: String,
}

impl StyledLine {
    fn new(tone: Tone, text: impl Into<String>) -> Self {
        Self {
            tone,
            text: text.into(),
        }
    }
}

/// Title and body of the result panel, or `None` while idle
pub fn result_panel(
    outcome: Option<&AnalysisOutcome>,
    rendered: Option<&RenderedResult>,
    active: Mode,
) -> Option<(String, Vec<StyledLine>)> {
    let outcome = outcome?;
    let mode = outcome.mode();
    let mut title = match outcome {
        AnalysisOutcome::Failure { .. } => "Error".to_string(),
        _ => "Result".to_string(),
    };
    title.push_str(&format!(" - {}", mode.spec().title));
    if mode != active {
        title.push_str(" (earlier mode)");
    }

    let lines = match outcome {
        AnalysisOutcome::Pending { .. } => vec![StyledLine::new(Tone::Dim, "Analyzing...")],
        AnalysisOutcome::Failure { message, .. } => message
            .lines()
            .map(|line| StyledLine::new(Tone::Bad, line))
            .collect(),
        AnalysisOutcome::Success { .. } => rendered
            .map(|rendered| result_lines(&rendered.view))
            .unwrap_or_default(),
    };
    Some((title, lines))
}

/// Flatten a result view into styled lines
pub fn result_lines(view: &ResultView) -> Vec<StyledLine> {
    match view {
        ResultView::Diff(diff) => {
            let mut lines = vec![StyledLine::new(
                Tone::Dim,
                format!(
                    "Additions: {}  Deletions: {}  Total changes: {}",
                    diff.counters.additions, diff.counters.deletions, diff.counters.total_changes
                ),
            )];
            lines.extend(diff.lines.iter().map(|line| {
                let tone = match line.kind {
                    DiffLineKind::Addition => Tone::Addition,
                    DiffLineKind::Deletion => Tone::Deletion,
                    DiffLineKind::HunkHeader => Tone::Hunk,
                    DiffLineKind::Context => Tone::Plain,
                };
                StyledLine::new(tone, line.text.clone())
            }));
            lines
        }
        ResultView::Summary(summary) => {
            let mut lines: Vec<StyledLine> = summary
                .prose
                .iter()
                .map(|line| {
                    let tone = match line.style {
                        ProseStyle::Heading => Tone::Heading,
                        ProseStyle::Code => Tone::Code,
                        ProseStyle::Rule => Tone::Dim,
                        ProseStyle::Paragraph | ProseStyle::Bullet | ProseStyle::Blank => {
                            Tone::Plain
                        }
                    };
                    StyledLine::new(tone, line.text.clone())
                })
                .collect();
            lines.push(StyledLine::new(Tone::Plain, ""));
            lines.push(StyledLine::new(
                Tone::Dim,
                format!(
                    "Additions: {}  Deletions: {}  Total changes: {}",
                    summary.stats.additions, summary.stats.deletions, summary.stats.total_changes
                ),
            ));
            lines
        }
        ResultView::Issues(report) if report.issues.is_empty() => {
            vec![StyledLine::new(Tone::Good, "No indentation issues found.")]
        }
        ResultView::Issues(report) => report
            .issues
            .iter()
            .map(|issue| StyledLine::new(Tone::Bad, format!("Line {}: {}", issue.line, issue.issue)))
            .collect(),
        ResultView::Syntax(verdict) if verdict.valid => {
            vec![StyledLine::new(Tone::Good, "Syntax is valid.")]
        }
        ResultView::Syntax(verdict) => {
            let text = match &verdict.error {
                Some(error) => format!("Syntax error: {error}"),
                None => "Syntax is invalid.".to_string(),
            };
            vec![StyledLine::new(Tone::Bad, text)]
        }
        ResultView::Fallback(fallback) => fallback
            .dump
            .lines()
            .map(|line| StyledLine::new(Tone::Plain, line))
            .collect(),
    }
}

/// Expand tabs, drop carriage returns and blank out other control characters
fn sanitize(text: &str) -> String {
    let mut clean = String::with_capacity(text.len());
    let mut used = 0;
    for ch in text.chars() {
        match ch {
            '\r' => {}
            '\t' => {
                let pad = TAB_WIDTH - used % TAB_WIDTH;
                clean.extend(std::iter::repeat(' ').take(pad));
                used += pad;
            }
            _ => {
                clean.push(if ch.is_control() { ' ' } else { ch });
                used += 1;
            }
        }
    }
    clean
}

/// Cut `text` down to a single terminal row of `width` columns
fn fit(text: &str, width: usize) -> String {
    sanitize(text).chars().take(width).collect()
}

/// Break `text` into rows of at most `width` columns, at spaces where possible
fn wrap(text: &str, width: usize) -> Vec<String> {
    let chars: Vec<char> = sanitize(text).chars().collect();
    if chars.is_empty() || width == 0 {
        return vec![String::new()];
    }

    let mut rows = Vec::new();
    let mut start = 0;
    while start < chars.len() {
        let end = start + width;
        if end >= chars.len() {
            rows.push(chars[start..].iter().collect());
            break;
        }
        // a space right at `end` still lets the row fill the full width
        match chars[start..=end].iter().rposition(|ch| *ch == ' ') {
            Some(space) if space > 0 => {
                rows.push(chars[start..start + space].iter().collect());
                start += space + 1;
            }
            _ => {
                rows.push(chars[start..end].iter().collect());
                start = end;
            }
        }
    }
    rows
}

/// Wrap result lines to the panel width, keeping each line's tone
pub fn panel_rows(lines: &[StyledLine], width: usize) -> Vec<StyledLine> {
    lines
        .iter()
        .flat_map(|line| {
            wrap(&line.text, width)
                .into_iter()
                .map(move |text| StyledLine::new(line.tone, text))
        })
        .collect()
}

/// Visible slice of the result panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResultWindow {
    /// Rows available for content, excluding the hidden-lines marker
    pub page_rows: usize,
    /// Largest useful scroll offset
    pub max_scroll: usize,
}

/// Display column of `column` chars into `line`, tabs expanded
fn display_column(line: &str, column: usize) -> usize {
    line.chars().take(column).fold(0, |used, ch| match ch {
        '\t' => used + TAB_WIDTH - used % TAB_WIDTH,
        '\r' => used,
        _ => used + 1,
    })
}

/// Screen rectangle of one editor pane
#[derive(Debug, Clone, Copy)]
struct PaneArea {
    x: u16,
    y: u16,
    width: u16,
    height: u16,
}

/// crossterm renderer over an injected render stream
pub struct TerminalRenderer<RS: RenderStream> {
    render_stream: RS,
    terminal_size: (u16, u16),
    server_label: String,
    result_window: ResultWindow,
}

impl<RS: RenderStream> TerminalRenderer<RS> {
    pub fn with_render_stream(render_stream: RS, server_label: impl Into<String>) -> Result<Self> {
        let terminal_size = render_stream.get_size()?;
        Ok(Self {
            render_stream,
            terminal_size,
            server_label: server_label.into(),
            result_window: ResultWindow::default(),
        })
    }

    /// Result panel geometry as of the last frame
    pub fn result_window(&self) -> ResultWindow {
        self.result_window
    }

    pub fn terminal_size(&self) -> (u16, u16) {
        self.terminal_size
    }

    pub fn update_size(&mut self, width: u16, height: u16) {
        self.terminal_size = (width, height);
    }

    /// Take over the terminal
    pub fn initialize(&mut self) -> Result<()> {
        self.render_stream.enable_raw_mode()?;
        self.render_stream.enter_alternate_screen()?;
        self.render_stream.clear_screen()?;
        self.render_stream.hide_cursor()
    }

    /// Give the terminal back
    pub fn cleanup(&mut self) -> Result<()> {
        self.render_stream.show_cursor()?;
        self.render_stream.leave_alternate_screen()?;
        self.render_stream.disable_raw_mode()
    }

    /// Redraw the whole screen from controller state
    pub fn render_full<T: AnalysisTransport>(
        &mut self,
        controller: &AnalysisController<T>,
    ) -> Result<()> {
        let (width, height) = self.terminal_size;
        self.render_stream.hide_cursor()?;
        self.render_stream.clear_screen()?;
        if width == 0 || height < 8 {
            return self.render_stream.flush().map_err(anyhow::Error::from);
        }

        self.print_at(
            0,
            0,
            &format!("codepad | {}", self.server_label),
            Tone::Heading,
            true,
        )?;
        self.render_tabs(controller.mode())?;

        let panel = result_panel(
            controller.outcome(),
            controller.rendered(),
            controller.mode(),
        );

        // title, tabs, pane titles, action row, help line; plus the result title when shown
        let fixed = if panel.is_some() { 6 } else { 5 };
        let available = height.saturating_sub(fixed);
        let editor_rows = if panel.is_some() {
            available / 2
        } else {
            available
        };
        let result_rows = available - editor_rows;

        let cursor = self.render_panes(controller, editor_rows)?;

        let action_row = 3 + editor_rows;
        let action = format!("[F5] {}", controller.action_label());
        let action_tone = if controller.is_loading() {
            Tone::Dim
        } else {
            Tone::Heading
        };
        self.print_at(0, action_row, &action, action_tone, true)?;

        self.result_window = ResultWindow::default();
        if let Some((title, lines)) = panel {
            let title_tone = if controller.error_message().is_some() {
                Tone::Bad
            } else {
                Tone::Heading
            };
            self.print_at(0, action_row + 1, &title, title_tone, true)?;
            self.render_result_rows(
                &panel_rows(&lines, usize::from(width)),
                action_row + 2,
                result_rows,
                controller.result_scroll(),
            )?;
        }

        self.print_at(0, height - 1, HELP_LINE, Tone::Dim, false)?;

        if let Some((x, y)) = cursor {
            self.render_stream.move_cursor(x, y)?;
            self.render_stream.show_cursor()?;
        }
        self.render_stream.flush().map_err(anyhow::Error::from)
    }

    /// Draw the scrolled slice of the result panel, with a marker when rows are hidden
    fn render_result_rows(
        &mut self,
        rows: &[StyledLine],
        top: u16,
        height: u16,
        scroll: usize,
    ) -> Result<()> {
        let height = usize::from(height);
        let clipped = rows.len() > height;
        let page_rows = if clipped {
            height.saturating_sub(1)
        } else {
            height
        };
        let max_scroll = rows.len().saturating_sub(page_rows);
        let first = scroll.min(max_scroll);
        self.result_window = ResultWindow {
            page_rows,
            max_scroll,
        };

        let shown = &rows[first..(first + page_rows).min(rows.len())];
        for (offset, line) in shown.iter().enumerate() {
            // offset < page_rows, which came from a u16
            self.print_at(0, top + offset as u16, &line.text, line.tone, false)?;
        }

        if clipped {
            let marker = format!(
                "-- rows {}-{} of {}, more hidden (PgUp/PgDn, Shift+Up/Down) --",
                first + 1,
                first + shown.len(),
                rows.len()
            );
            self.print_at(0, top + page_rows as u16, &marker, Tone::Dim, false)?;
        }
        Ok(())
    }

    fn render_tabs(&mut self, active: Mode) -> Result<()> {
        let mut column: u16 = 0;
        for (index, mode) in Mode::ALL.iter().enumerate() {
            let label = format!(" [F{}] {} ", index + 1, mode.spec().title);
            let is_active = *mode == active;
            queue_term!(self.render_stream, MoveTo(column, 1))?;
            if is_active {
                queue_term!(self.render_stream, SetAttribute(Attribute::Reverse))?;
            } else {
                queue_term!(self.render_stream, SetAttribute(Attribute::Dim))?;
            }
            let room = usize::from(self.terminal_size.0.saturating_sub(column));
            let shown = fit(&label, room);
            queue_term!(
                self.render_stream,
                Print(&shown),
                SetAttribute(Attribute::Reset)
            )?;
            column = column.saturating_add(shown.chars().count() as u16);
        }
        Ok(())
    }

    /// Draw the editor panes; returns where the cursor belongs
    fn render_panes<T: AnalysisTransport>(
        &mut self,
        controller: &AnalysisController<T>,
        rows: u16,
    ) -> Result<Option<(u16, u16)>> {
        let (width, _) = self.terminal_size;
        let mode = controller.mode();

        let mut panes = vec![(Pane::Primary, mode.primary_title())];
        if mode.requires_secondary_buffer() {
            panes.push((Pane::Secondary, "Modified Code"));
        }

        let pane_width = width / panes.len() as u16;
        let mut cursor = None;
        for (index, (pane, title)) in panes.into_iter().enumerate() {
            let area = PaneArea {
                x: pane_width * index as u16,
                y: 2,
                width: pane_width.saturating_sub(1).max(1),
                height: rows,
            };
            let focused = controller.focus() == pane;
            let marker = if focused { "> " } else { "  " };
            let title_tone = if focused { Tone::Heading } else { Tone::Dim };
            self.print_clipped(
                area.x,
                area.y,
                area.width,
                &format!("{marker}{title}"),
                title_tone,
                focused,
            )?;

            let placed = self.render_buffer(controller.buffer(pane), area)?;
            if focused {
                cursor = placed;
            }
        }
        Ok(cursor)
    }

    fn render_buffer(&mut self, buffer: &CodeBuffer, area: PaneArea) -> Result<Option<(u16, u16)>> {
        if area.height == 0 {
            return Ok(None);
        }
        let rows = usize::from(area.height);
        let position = buffer.cursor();
        let first = (position.line + 1).saturating_sub(rows);

        for (offset, line) in buffer.lines().iter().skip(first).take(rows).enumerate() {
            // offset < rows, which came from a u16
            let row = area.y + 1 + offset as u16;
            self.print_clipped(area.x, row, area.width, line, Tone::Plain, false)?;
        }

        let current = buffer.lines().get(position.line).map_or("", String::as_str);
        let column = display_column(current, position.column);
        let max_column = usize::from(area.width.saturating_sub(1));
        let x = area.x + column.min(max_column) as u16;
        let y = area.y + 1 + (position.line - first) as u16;
        Ok(Some((x, y)))
    }

    fn print_at(&mut self, x: u16, y: u16, text: &str, tone: Tone, bold: bool) -> Result<()> {
        let width = self.terminal_size.0.saturating_sub(x);
        self.print_clipped(x, y, width, text, tone, bold)
    }

    fn print_clipped(
        &mut self,
        x: u16,
        y: u16,
        width: u16,
        text: &str,
        tone: Tone,
        bold: bool,
    ) -> Result<()> {
        let shown = fit(text, usize::from(width));
        queue_term!(self.render_stream, MoveTo(x, y))?;
        if bold || tone == Tone::Heading {
            queue_term!(self.render_stream, SetAttribute(Attribute::Bold))?;
        }
        if let Some(color) = tone.color() {
            queue_term!(self.render_stream, SetForegroundColor(color))?;
        }
        queue_term!(
            self.render_stream,
            Print(shown),
            ResetColor,
            SetAttribute(Attribute::Reset)
        )
    }
}
