//! # Views Module
//!
//! Terminal drawing of the analysis session.

pub mod terminal_renderer;

pub use terminal_renderer::{
    panel_rows, result_lines, result_panel, ResultWindow, StyledLine, TerminalRenderer, Tone,
};
