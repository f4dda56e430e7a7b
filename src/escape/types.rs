//! Screen operations emitted by the escape interpreter.
//!
//! One operation describes one effect of the child's byte stream on the
//! surface. Operations are produced in byte order and consumed immediately
//! by the output buffer; they are never persisted.

/// One decoded effect of the terminal byte stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenOp {
    /// A printable character to write at the pending cursor.
    Literal(char),
    /// Return the cursor to column 0 (`\r`).
    CarriageReturn,
    /// Advance to a new line (`\n`).
    LineFeed,
    /// Step the cursor back one column (`\x08`).
    Backspace,
    /// A cursor-movement or cursor-visibility sequence.
    Cursor(CursorOp),
    /// An erase sequence.
    Erase(EraseOp),
    /// A scroll sequence. Accepted but not rendered.
    Scroll(ScrollOp),
    /// Select Graphics Rendition parameters. Accepted but not rendered.
    SetGraphics(Vec<u16>),
    /// A syntactically complete sequence outside the catalog; carries the
    /// raw sequence (without the leading ESC) for diagnostics.
    Unrecognized(String),
    /// An escape sequence that never terminated within the length bound.
    Unknown,
}

/// Cursor movement and visibility operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorOp {
    /// Move up `n` rows.
    Up(u16),
    /// Move down `n` rows.
    Down(u16),
    /// Move forward `n` columns.
    Forward(u16),
    /// Move back `n` columns.
    Back(u16),
    /// Move down `n` rows, to column 0.
    NextLine(u16),
    /// Move up `n` rows, to column 0.
    PrevLine(u16),
    /// Move to an absolute 1-based column on the current row.
    Column(u16),
    /// Move to an absolute 1-based (row, column).
    MoveTo { row: u16, col: u16 },
    /// Save the current cursor position.
    Save,
    /// Restore the saved cursor position.
    Restore,
    /// Hide the cursor. Accepted but not rendered.
    Hide,
    /// Show the cursor. Accepted but not rendered.
    Show,
}

/// Erase operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EraseOp {
    /// Erase from the cursor to the end of the line.
    Line,
    /// Erase the whole surface.
    All,
}

/// Scroll operations. Accepted but not rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollOp {
    /// Scroll the viewport up `n` lines.
    Up(u16),
    /// Scroll the viewport down `n` lines.
    Down(u16),
}
