//! Buffered application of screen operations to a text surface.
//!
//! Literal characters accumulate in a pending buffer while the pending
//! cursor tracks where they will end; control operations flush the buffer
//! first so ordering is preserved, then apply their own effect. A flush is a
//! single `replace` call spanning committed cursor to pending cursor, which
//! is what keeps thousands of one-byte reads from becoming thousands of
//! surface edits.

use crate::cursor::CursorPosition;
use crate::escape::{CursorOp, EraseOp, ScreenOp};
use crate::surface::TextSurface;

/// Default pending-buffer size that forces a flush.
pub const DEFAULT_FLUSH_THRESHOLD: usize = 3000;

/// Accumulates literal output and applies screen operations to a surface.
#[derive(Debug)]
pub struct OutputBuffer {
    /// Cursor position matching what the surface currently shows.
    committed: CursorPosition,
    /// Cursor position once the pending buffer flushes. Always at or after
    /// the committed position in buffer-write order.
    pending: CursorPosition,
    /// Saved position for cursor save/restore sequences.
    saved: Option<CursorPosition>,
    buffer: String,
    buffer_len: usize,
    threshold: usize,
}

impl OutputBuffer {
    /// Create a buffer that flushes once more than `threshold` characters
    /// are pending.
    pub fn new(threshold: usize) -> Self {
        Self {
            committed: CursorPosition::default(),
            pending: CursorPosition::default(),
            saved: None,
            buffer: String::new(),
            buffer_len: 0,
            threshold,
        }
    }

    /// The committed cursor position.
    pub fn committed(&self) -> CursorPosition {
        self.committed
    }

    /// The pending cursor position.
    pub fn pending(&self) -> CursorPosition {
        self.pending
    }

    /// Number of characters buffered but not yet flushed.
    pub fn buffered(&self) -> usize {
        self.buffer_len
    }

    /// Apply one screen operation.
    pub fn accept(&mut self, op: ScreenOp, surface: &mut dyn TextSurface) {
        match op {
            ScreenOp::Literal(c) => {
                self.buffer.push(c);
                self.buffer_len += 1;
                self.pending.advance();
                if self.buffer_len > self.threshold {
                    self.flush(surface);
                }
            }
            ScreenOp::CarriageReturn => {
                // Flush first so buffered literals land before the reset.
                self.flush(surface);
                self.committed.carriage_return();
                self.pending.carriage_return();
            }
            ScreenOp::LineFeed => {
                self.flush(surface);
                surface.append("");
                self.committed.line_feed();
                self.pending.line_feed();
            }
            ScreenOp::Backspace => {
                self.flush(surface);
                self.committed.backspace();
                self.pending.backspace();
            }
            ScreenOp::Cursor(op) => {
                self.flush(surface);
                self.apply_cursor(op);
            }
            ScreenOp::Erase(op) => {
                self.flush(surface);
                self.apply_erase(op, surface);
            }
            // Accepted but not rendered.
            ScreenOp::Scroll(_)
            | ScreenOp::SetGraphics(_)
            | ScreenOp::Unrecognized(_)
            | ScreenOp::Unknown => {
                self.flush(surface);
            }
        }
    }

    /// Commit the pending buffer to the surface in one edit.
    ///
    /// After this call the buffer is empty and the committed cursor equals
    /// the pending cursor that existed before the call.
    pub fn flush(&mut self, surface: &mut dyn TextSurface) {
        if self.buffer_len == 0 {
            return;
        }

        let start = surface.offset_of(self.committed.row, self.committed.col);
        let end = surface.offset_of(self.pending.row, self.pending.col);
        surface.replace(start, end, &self.buffer);

        self.committed = self.pending;
        self.buffer.clear();
        self.buffer_len = 0;
    }

    /// Cursor operations act on both cursors; the buffer is already flushed
    /// when these run, so the two are equal.
    fn apply_cursor(&mut self, op: CursorOp) {
        match op {
            CursorOp::Up(n) => {
                self.committed.move_up(n as usize);
            }
            CursorOp::Down(n) => {
                self.committed.move_down(n as usize);
            }
            CursorOp::Forward(n) => {
                self.committed.move_forward(n as usize);
            }
            CursorOp::Back(n) => {
                self.committed.move_back(n as usize);
            }
            CursorOp::NextLine(n) => {
                self.committed.move_down(n as usize);
                self.committed.carriage_return();
            }
            CursorOp::PrevLine(n) => {
                self.committed.move_up(n as usize);
                self.committed.carriage_return();
            }
            CursorOp::Column(n) => {
                // 1-based parameter.
                self.committed.col = (n.max(1) - 1) as usize;
            }
            CursorOp::MoveTo { row, col } => {
                self.committed.row = (row.max(1) - 1) as usize;
                self.committed.col = (col.max(1) - 1) as usize;
            }
            CursorOp::Save => {
                self.saved = Some(self.committed);
            }
            CursorOp::Restore => {
                // Restore with no prior save is inert.
                if let Some(saved) = self.saved {
                    self.committed = saved;
                }
            }
            CursorOp::Hide | CursorOp::Show => {}
        }
        self.pending = self.committed;
    }

    fn apply_erase(&mut self, op: EraseOp, surface: &mut dyn TextSurface) {
        match op {
            EraseOp::Line => {
                let start = surface.offset_of(self.committed.row, self.committed.col);
                let end = surface.line_end(self.committed.row);
                if end > start {
                    surface.replace(start, end, "");
                }
            }
            EraseOp::All => {
                surface.replace(0, surface.len(), "");
                self.committed = CursorPosition::default();
                self.pending = self.committed;
            }
        }
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_FLUSH_THRESHOLD)
    }
}
