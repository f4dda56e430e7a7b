//! The escape interpreter state machine.
//!
//! Fed one decoded character at a time; emits at most one `ScreenOp` per
//! character, in input order. The machine holds no reference to the surface
//! and has no side effects beyond the operations it returns.

use super::codes;
use super::types::ScreenOp;

const ESC: char = '\u{1b}';
const BACKSPACE: char = '\u{8}';

/// Per-session escape parser state.
///
/// Two states: `Normal` (pass characters through as literals or control
/// operations) and in-escape (accumulate a control sequence until it
/// terminates, fails to terminate within `MAX_SEQUENCE_LEN`, or is
/// restarted by a fresh ESC).
#[derive(Debug, Default)]
pub struct EscapeInterpreter {
    in_escape: bool,
    accumulator: String,
}

impl EscapeInterpreter {
    /// Create an interpreter in the `Normal` state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an escape sequence is currently open.
    pub fn in_escape(&self) -> bool {
        self.in_escape
    }

    /// Feed one decoded character; returns the operation it completes, if
    /// any.
    pub fn feed(&mut self, c: char) -> Option<ScreenOp> {
        if self.in_escape {
            return self.feed_escape(c);
        }

        match c {
            ESC => {
                self.in_escape = true;
                self.accumulator.clear();
                None
            }
            '\r' => Some(ScreenOp::CarriageReturn),
            '\n' => Some(ScreenOp::LineFeed),
            BACKSPACE => Some(ScreenOp::Backspace),
            _ => Some(ScreenOp::Literal(c)),
        }
    }

    fn feed_escape(&mut self, c: char) -> Option<ScreenOp> {
        // A new ESC abandons the open sequence and starts over.
        if c == ESC {
            self.accumulator.clear();
            return None;
        }

        self.accumulator.push(c);

        if codes::is_terminated(&self.accumulator) {
            let op = codes::classify(&self.accumulator);
            self.reset();
            return Some(op);
        }

        if self.accumulator.chars().count() > codes::MAX_SEQUENCE_LEN {
            self.reset();
            return Some(ScreenOp::Unknown);
        }

        None
    }

    fn reset(&mut self) {
        self.in_escape = false;
        self.accumulator.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::escape::types::{CursorOp, EraseOp};

    fn feed_all(interp: &mut EscapeInterpreter, input: &str) -> Vec<ScreenOp> {
        input.chars().filter_map(|c| interp.feed(c)).collect()
    }

    #[test]
    fn literals_and_controls_emit_in_input_order() {
        let mut interp = EscapeInterpreter::new();
        let ops = feed_all(&mut interp, "ab\rc\nd\u{8}");
        assert_eq!(
            ops,
            vec![
                ScreenOp::Literal('a'),
                ScreenOp::Literal('b'),
                ScreenOp::CarriageReturn,
                ScreenOp::Literal('c'),
                ScreenOp::LineFeed,
                ScreenOp::Literal('d'),
                ScreenOp::Backspace,
            ]
        );
    }

    #[test]
    fn recognized_sequence_emits_one_typed_operation() {
        let mut interp = EscapeInterpreter::new();
        let ops = feed_all(&mut interp, "\u{1b}[2Jx");
        assert_eq!(
            ops,
            vec![ScreenOp::Erase(EraseOp::All), ScreenOp::Literal('x')]
        );
        assert!(!interp.in_escape());
    }

    #[test]
    fn terminated_uncataloged_sequence_emits_unrecognized() {
        let mut interp = EscapeInterpreter::new();
        let ops = feed_all(&mut interp, "\u{1b}[5Xy");
        assert_eq!(
            ops,
            vec![
                ScreenOp::Unrecognized("[5X".to_string()),
                ScreenOp::Literal('y'),
            ]
        );
    }

    #[test]
    fn overlong_sequence_emits_exactly_one_unknown() {
        let mut interp = EscapeInterpreter::new();
        let mut input = String::from("\u{1b}[");
        // The `[` plus this many parameter bytes pushes the accumulator
        // one past the bound.
        for _ in 0..codes::MAX_SEQUENCE_LEN {
            input.push(';');
        }
        let ops = feed_all(&mut interp, &input);
        assert_eq!(ops, vec![ScreenOp::Unknown]);
        assert!(!interp.in_escape());
    }

    #[test]
    fn fresh_esc_restarts_an_open_sequence() {
        let mut interp = EscapeInterpreter::new();
        assert_eq!(interp.feed('\u{1b}'), None);
        assert_eq!(interp.feed('['), None);
        assert_eq!(interp.feed('1'), None);
        // Abandon and start over.
        assert_eq!(interp.feed('\u{1b}'), None);
        let ops = feed_all(&mut interp, "[A");
        assert_eq!(ops, vec![ScreenOp::Cursor(CursorOp::Up(1))]);
    }

    #[test]
    fn escape_state_does_not_leak_into_literals() {
        let mut interp = EscapeInterpreter::new();
        feed_all(&mut interp, "\u{1b}[0m");
        let ops = feed_all(&mut interp, "ok");
        assert_eq!(
            ops,
            vec![ScreenOp::Literal('o'), ScreenOp::Literal('k')]
        );
    }
}
