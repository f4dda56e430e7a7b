//! Cursor position model.
//!
//! A zero-based (row, column) position scoped to one session. The output
//! buffer keeps two of these: the committed position (matches what has been
//! written to the surface) and the pending position (where the cursor will
//! be once the current buffer flushes).

/// A zero-based (row, column) position on a text surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CursorPosition {
    pub row: usize,
    pub col: usize,
}

impl CursorPosition {
    /// Create a position at the given row and column.
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Advance one column, as writing a literal character does.
    pub fn advance(&mut self) {
        self.col += 1;
    }

    /// Return to column 0 on the current row (carriage return).
    pub fn carriage_return(&mut self) {
        self.col = 0;
    }

    /// Advance to the next row; the column is left unchanged (line feed).
    pub fn line_feed(&mut self) {
        self.row += 1;
    }

    /// Step back one column, clamped at column 0 (backspace).
    pub fn backspace(&mut self) {
        self.col = self.col.saturating_sub(1);
    }

    /// Move up `n` rows, clamped at row 0.
    pub fn move_up(&mut self, n: usize) {
        self.row = self.row.saturating_sub(n);
    }

    /// Move down `n` rows.
    pub fn move_down(&mut self, n: usize) {
        self.row += n;
    }

    /// Move forward `n` columns.
    pub fn move_forward(&mut self, n: usize) {
        self.col += n;
    }

    /// Move back `n` columns, clamped at column 0.
    pub fn move_back(&mut self, n: usize) {
        self.col = self.col.saturating_sub(n);
    }
}
