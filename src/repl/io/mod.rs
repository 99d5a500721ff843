//! # I/O Abstraction Layer
//!
//! The analysis loop never talks to crossterm directly. Key presses come from
//! an [`EventStream`] and frames go out through a [`RenderStream`], so the whole
//! front end runs headless in tests.
//!
//! ```text
//! Production:  AppController ──▶ TerminalEventStream ──▶ crossterm::event
//!                            ──▶ TerminalRenderStream ──▶ stdout
//!
//! Testing:     AppController ──▶ MockEventStream     ──▶ VecDeque<Event>
//!                            ──▶ MockRenderStream    ──▶ Vec<RenderCommand>
//! ```

use anyhow::Result;
use crossterm::event::Event;
use std::io::Write;
use std::time::Duration;

pub mod mock;
pub mod terminal;

pub use mock::{MockEventStream, MockRenderStream, RenderCommand};
pub use terminal::{TerminalEventStream, TerminalRenderStream};

/// Type alias for terminal size (width, height)
pub type TerminalSize = (u16, u16);

/// Source of input events
pub trait EventStream: Send {
    /// Return true when an event can be read within `timeout`
    fn poll(&mut self, timeout: Duration) -> Result<bool>;

    /// Read the next event; only call after `poll` returned true
    fn read(&mut self) -> Result<Event>;
}

/// Sink for rendered frames.
///
/// Styled text is queued onto the stream through its [`Write`] impl; the
/// methods below cover the screen-level operations.
pub trait RenderStream: Write + Send {
    fn clear_screen(&mut self) -> Result<()>;

    /// Move cursor to (column, row)
    fn move_cursor(&mut self, x: u16, y: u16) -> Result<()>;

    fn hide_cursor(&mut self) -> Result<()>;

    fn show_cursor(&mut self) -> Result<()>;

    fn get_size(&self) -> Result<TerminalSize>;

    fn enter_alternate_screen(&mut self) -> Result<()>;

    fn leave_alternate_screen(&mut self) -> Result<()>;

    fn enable_raw_mode(&mut self) -> Result<()>;

    fn disable_raw_mode(&mut self) -> Result<()>;
}
