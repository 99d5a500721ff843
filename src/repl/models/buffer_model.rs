//! # Buffer Models
//!
//! Source text entered by the user, one buffer per editable slot.
//! Columns are counted in characters, not bytes.

/// Which code buffer an operation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pane {
    Primary,
    Secondary,
}

/// Cursor position inside a buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LogicalPosition {
    pub line: usize,
    pub column: usize,
}

impl LogicalPosition {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Editable source text with a cursor
#[derive(Debug, Clone, PartialEq)]
pub struct CodeBuffer {
    lines: Vec<String>,
    cursor: LogicalPosition,
}

impl CodeBuffer {
    /// Create new empty buffer
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
            cursor: LogicalPosition::default(),
        }
    }

    /// Create buffer from text, cursor at the start
    pub fn from_text(text: &str) -> Self {
        let mut buffer = Self::new();
        buffer.set_text(text);
        buffer
    }

    /// Replace the whole content and reset the cursor
    pub fn set_text(&mut self, text: &str) {
        self.lines = text.split('\n').map(str::to_string).collect();
        self.cursor = LogicalPosition::default();
    }

    /// Full text joined with `\n`
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn cursor(&self) -> LogicalPosition {
        self.cursor
    }

    fn line_length(&self, line: usize) -> usize {
        self.lines.get(line).map_or(0, |l| l.chars().count())
    }

    fn byte_index(line: &str, column: usize) -> usize {
        line.char_indices()
            .nth(column)
            .map_or(line.len(), |(idx, _)| idx)
    }

    /// Insert a character at the cursor; `\n` splits the line
    pub fn insert_char(&mut self, ch: char) {
        if ch == '\n' {
            self.insert_newline();
            return;
        }
        let LogicalPosition { line, column } = self.cursor;
        let current = &mut self.lines[line];
        let idx = Self::byte_index(current, column);
        current.insert(idx, ch);
        self.cursor.column += 1;
    }

    /// Insert text at the cursor, character by character
    pub fn insert_text(&mut self, text: &str) {
        for ch in text.chars() {
            self.insert_char(ch);
        }
    }

    fn insert_newline(&mut self) {
        let LogicalPosition { line, column } = self.cursor;
        let current = &mut self.lines[line];
        let idx = Self::byte_index(current, column);
        let rest = current.split_off(idx);
        self.lines.insert(line + 1, rest);
        self.cursor = LogicalPosition::new(line + 1, 0);
    }

    /// Delete the character before the cursor, joining lines at column 0
    pub fn backspace(&mut self) {
        let LogicalPosition { line, column } = self.cursor;
        if column > 0 {
            let current = &mut self.lines[line];
            let idx = Self::byte_index(current, column - 1);
            current.remove(idx);
            self.cursor.column -= 1;
        } else if line > 0 {
            let removed = self.lines.remove(line);
            let previous_len = self.line_length(line - 1);
            self.lines[line - 1].push_str(&removed);
            self.cursor = LogicalPosition::new(line - 1, previous_len);
        }
    }

    pub fn move_left(&mut self) {
        if self.cursor.column > 0 {
            self.cursor.column -= 1;
        } else if self.cursor.line > 0 {
            self.cursor.line -= 1;
            self.cursor.column = self.line_length(self.cursor.line);
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor.column < self.line_length(self.cursor.line) {
            self.cursor.column += 1;
        } else if self.cursor.line + 1 < self.lines.len() {
            self.cursor = LogicalPosition::new(self.cursor.line + 1, 0);
        }
    }

    pub fn move_up(&mut self) {
        if self.cursor.line > 0 {
            self.cursor.line -= 1;
            self.clamp_column();
        }
    }

    pub fn move_down(&mut self) {
        if self.cursor.line + 1 < self.lines.len() {
            self.cursor.line += 1;
            self.clamp_column();
        }
    }

    fn clamp_column(&mut self) {
        self.cursor.column = self.cursor.column.min(self.line_length(self.cursor.line));
    }
}

impl Default for CodeBuffer {
    fn default() -> Self {
        Self::new()
    }
}
