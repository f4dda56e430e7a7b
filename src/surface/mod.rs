//! The host text surface the engine writes terminal output into.
//!
//! This module provides:
//! - `TextSurface` - the capability trait the host implements
//! - `StringSurface` - an in-memory implementation for tests and embedding
//! - `SharedSurface` - a clonable handle so the host can observe a surface
//!   that the session's read loop owns
//!
//! All offsets are character offsets (not byte offsets), matching the
//! point/row-col addressing of host editors.

use std::sync::{Arc, Mutex};

/// Mutation and addressing capabilities of a host text surface.
///
/// `offset_of` clamps out-of-range positions: a row past the last line maps
/// to the end of the text, a column past the end of a line maps to the line
/// end. The output buffer's overwrite-on-carriage-return semantics depend on
/// this clamping.
pub trait TextSurface: Send {
    /// Replace the character range `start..end` with `text`.
    fn replace(&mut self, start: usize, end: usize, text: &str);

    /// Add a new line holding `text` at the end of the surface.
    fn append(&mut self, text: &str);

    /// Rename the surface (title/tab label).
    fn set_name(&mut self, name: &str);

    /// Translate a (row, column) position to a character offset, clamping.
    fn offset_of(&self, row: usize, col: usize) -> usize;

    /// Translate a character offset back to a (row, column) position.
    fn position_of(&self, offset: usize) -> (usize, usize);

    /// Character offset of the end of line `row` (before its line break).
    fn line_end(&self, row: usize) -> usize;

    /// Total length of the surface in characters.
    fn len(&self) -> usize;

    /// Whether the surface holds no text.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An in-memory text surface.
///
/// Used by the test suite and usable directly when the host wants the engine
/// to render into a plain string buffer.
#[derive(Debug, Default)]
pub struct StringSurface {
    text: String,
    name: String,
    /// Number of mutations applied, for observing write coalescing.
    pub edits: usize,
}

impl StringSurface {
    /// Create an empty surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current surface text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The current surface name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Convert a character offset to a byte index into the backing string.
    fn byte_index(&self, char_offset: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_offset)
            .map_or(self.text.len(), |(i, _)| i)
    }
}

impl TextSurface for StringSurface {
    fn replace(&mut self, start: usize, end: usize, text: &str) {
        let char_count = self.text.chars().count();
        let start = start.min(char_count);
        let end = end.clamp(start, char_count);
        let byte_start = self.byte_index(start);
        let byte_end = self.byte_index(end);
        self.text.replace_range(byte_start..byte_end, text);
        self.edits += 1;
    }

    fn append(&mut self, text: &str) {
        self.text.push('\n');
        self.text.push_str(text);
        self.edits += 1;
    }

    fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    fn offset_of(&self, row: usize, col: usize) -> usize {
        let mut offset = 0;
        for (i, line) in self.text.split('\n').enumerate() {
            let line_len = line.chars().count();
            if i == row {
                return offset + col.min(line_len);
            }
            offset += line_len + 1;
        }
        // Row past the last line: clamp to the end of the text.
        self.text.chars().count()
    }

    fn position_of(&self, offset: usize) -> (usize, usize) {
        let mut row = 0;
        let mut col = 0;
        for c in self.text.chars().take(offset) {
            if c == '\n' {
                row += 1;
                col = 0;
            } else {
                col += 1;
            }
        }
        (row, col)
    }

    fn line_end(&self, row: usize) -> usize {
        let mut offset = 0;
        for (i, line) in self.text.split('\n').enumerate() {
            let line_len = line.chars().count();
            if i == row {
                return offset + line_len;
            }
            offset += line_len + 1;
        }
        self.text.chars().count()
    }

    fn len(&self) -> usize {
        self.text.chars().count()
    }
}

/// A clonable, thread-safe handle to a `StringSurface`.
///
/// The read loop takes ownership of the surface it writes to; wrapping a
/// `StringSurface` in a `SharedSurface` lets the host keep a second handle
/// for reading what the session produced.
#[derive(Debug, Clone, Default)]
pub struct SharedSurface {
    inner: Arc<Mutex<StringSurface>>,
}

impl SharedSurface {
    /// Create a handle around an empty surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the current surface text.
    pub fn text(&self) -> String {
        self.inner.lock().unwrap().text().to_string()
    }

    /// Snapshot the current surface name.
    pub fn name(&self) -> String {
        self.inner.lock().unwrap().name().to_string()
    }

    /// Number of mutations applied so far.
    pub fn edits(&self) -> usize {
        self.inner.lock().unwrap().edits
    }
}

impl TextSurface for SharedSurface {
    fn replace(&mut self, start: usize, end: usize, text: &str) {
        self.inner.lock().unwrap().replace(start, end, text);
    }

    fn append(&mut self, text: &str) {
        self.inner.lock().unwrap().append(text);
    }

    fn set_name(&mut self, name: &str) {
        self.inner.lock().unwrap().set_name(name);
    }

    fn offset_of(&self, row: usize, col: usize) -> usize {
        self.inner.lock().unwrap().offset_of(row, col)
    }

    fn position_of(&self, offset: usize) -> (usize, usize) {
        self.inner.lock().unwrap().position_of(offset)
    }

    fn line_end(&self, row: usize) -> usize {
        self.inner.lock().unwrap().line_end(row)
    }

    fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }
}
