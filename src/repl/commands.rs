//! # Commands
//!
//! Maps raw key events to the semantic requests the app controller applies.
//! Mapping is stateless; whether a request has any effect (an analyze while
//! one is in flight, say) is decided by the analysis controller.

use crate::repl::models::Mode;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Cursor movement inside the focused buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementDirection {
    Left,
    Right,
    Up,
    Down,
}

/// How far the result panel moves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollAmount {
    LineUp,
    LineDown,
    PageUp,
    PageDown,
}

/// What a key press asks the application to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandEvent {
    ModeSelectRequested { mode: Mode },
    FocusToggleRequested,
    AnalyzeRequested,
    DismissRequested,
    TextInsertRequested { ch: char },
    BackspaceRequested,
    CursorMoveRequested { direction: MovementDirection },
    ResultScrollRequested { amount: ScrollAmount },
    QuitRequested,
    NoAction,
}

/// Translate one key event
pub fn map_key_event(key: KeyEvent) -> CommandEvent {
    if key.kind == KeyEventKind::Release {
        return CommandEvent::NoAction;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);
    match key.code {
        KeyCode::PageUp => CommandEvent::ResultScrollRequested {
            amount: ScrollAmount::PageUp,
        },
        KeyCode::PageDown => CommandEvent::ResultScrollRequested {
            amount: ScrollAmount::PageDown,
        },
        KeyCode::Up if shift => CommandEvent::ResultScrollRequested {
            amount: ScrollAmount::LineUp,
        },
        KeyCode::Down if shift => CommandEvent::ResultScrollRequested {
            amount: ScrollAmount::LineDown,
        },
        KeyCode::Char('c') | KeyCode::Char('q') if ctrl => CommandEvent::QuitRequested,
        KeyCode::Char('r') if ctrl => CommandEvent::AnalyzeRequested,
        KeyCode::F(5) => CommandEvent::AnalyzeRequested,
        KeyCode::F(n @ 1..=4) => CommandEvent::ModeSelectRequested {
            mode: Mode::ALL[usize::from(n - 1)],
        },
        KeyCode::Tab | KeyCode::BackTab => CommandEvent::FocusToggleRequested,
        KeyCode::Esc => CommandEvent::DismissRequested,
        KeyCode::Enter => CommandEvent::TextInsertRequested { ch: '\n' },
        KeyCode::Backspace => CommandEvent::BackspaceRequested,
        KeyCode::Left => CommandEvent::CursorMoveRequested {
            direction: MovementDirection::Left,
        },
        KeyCode::Right => CommandEvent::CursorMoveRequested {
            direction: MovementDirection::Right,
        },
        KeyCode::Up => CommandEvent::CursorMoveRequested {
            direction: MovementDirection::Up,
        },
        KeyCode::Down => CommandEvent::CursorMoveRequested {
            direction: MovementDirection::Down,
        },
        KeyCode::Char(ch) if !ctrl => CommandEvent::TextInsertRequested { ch },
        _ => CommandEvent::NoAction,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    fn ctrl(ch: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
    }

    #[test]
    fn function_keys_should_select_modes_in_tab_order() {
        assert_eq!(
            map_key_event(key(KeyCode::F(1))),
            CommandEvent::ModeSelectRequested {
                mode: Mode::Compare
            }
        );
        assert_eq!(
            map_key_event(key(KeyCode::F(4))),
            CommandEvent::ModeSelectRequested {
                mode: Mode::AiSummary
            }
        );
    }

    #[test]
    fn analyze_should_bind_to_f5_and_ctrl_r() {
        assert_eq!(
            map_key_event(key(KeyCode::F(5))),
            CommandEvent::AnalyzeRequested
        );
        assert_eq!(map_key_event(ctrl('r')), CommandEvent::AnalyzeRequested);
    }

    #[test]
    fn ctrl_shortcuts_should_not_insert_text() {
        assert_eq!(map_key_event(ctrl('c')), CommandEvent::QuitRequested);
        assert_eq!(map_key_event(ctrl('x')), CommandEvent::NoAction);
    }

    #[test]
    fn printable_keys_and_enter_should_insert() {
        assert_eq!(
            map_key_event(key(KeyCode::Char('q'))),
            CommandEvent::TextInsertRequested { ch: 'q' }
        );
        assert_eq!(
            map_key_event(KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT)),
            CommandEvent::TextInsertRequested { ch: 'A' }
        );
        assert_eq!(
            map_key_event(key(KeyCode::Enter)),
            CommandEvent::TextInsertRequested { ch: '\n' }
        );
    }

    #[test]
    fn page_keys_and_shifted_arrows_should_scroll_result() {
        assert_eq!(
            map_key_event(key(KeyCode::PageDown)),
            CommandEvent::ResultScrollRequested {
                amount: ScrollAmount::PageDown
            }
        );
        assert_eq!(
            map_key_event(KeyEvent::new(KeyCode::Up, KeyModifiers::SHIFT)),
            CommandEvent::ResultScrollRequested {
                amount: ScrollAmount::LineUp
            }
        );
        assert_eq!(
            map_key_event(key(KeyCode::Up)),
            CommandEvent::CursorMoveRequested {
                direction: MovementDirection::Up
            }
        );
    }

    #[test]
    fn key_release_should_be_ignored() {
        let mut release = key(KeyCode::F(5));
        release.kind = KeyEventKind::Release;
        assert_eq!(map_key_event(release), CommandEvent::NoAction);
    }
}
