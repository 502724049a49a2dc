//! Live editing surface seen by the reconciler.

/// Caret position, zero-based. `column` counts characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, PartialOrd, Ord)]
pub struct Cursor {
    pub line: usize,
    pub column: usize,
}

impl Cursor {
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// A code editor showing the active file.
pub trait EditorSurface {
    fn text(&self) -> &str;
    /// Replace the whole text. The cursor may move.
    fn set_text(&mut self, text: &str);
    fn cursor(&self) -> Cursor;
    /// Move the caret, clamped to the current text.
    fn set_cursor(&mut self, cursor: Cursor);
}

/// Plain text buffer with a caret.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    text: String,
    cursor: Cursor,
}

impl TextBuffer {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            cursor: Cursor::default(),
        }
    }

    /// Nearest valid position to `cursor`.
    pub fn clamp(&self, cursor: Cursor) -> Cursor {
        let mut lines = self.text.split('\n');
        let line_count = self.text.split('\n').count();
        let line = cursor.line.min(line_count.saturating_sub(1));
        let width = lines.nth(line).map_or(0, |l| l.chars().count());
        Cursor::new(line, cursor.column.min(width))
    }
}

impl EditorSurface for TextBuffer {
    fn text(&self) -> &str {
        &self.text
    }

    fn set_text(&mut self, text: &str) {
        text.clone_into(&mut self.text);
        self.cursor = Cursor::default();
    }

    fn cursor(&self) -> Cursor {
        self.cursor
    }

    fn set_cursor(&mut self, cursor: Cursor) {
        self.cursor = self.clamp(cursor);
    }
}
