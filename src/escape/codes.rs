//! Escape code catalog.
//!
//! Enumerates the control sequences the interpreter recognizes and maps a
//! complete sequence to its typed `ScreenOp`. Sequences arrive here without
//! their leading ESC byte. Everything syntactically complete but outside the
//! catalog classifies as `ScreenOp::Unrecognized`.

use super::types::{CursorOp, EraseOp, ScreenOp, ScrollOp};

/// Longest accumulator the interpreter will hold before giving up on a
/// sequence. Prevents unbounded growth on malformed input.
pub const MAX_SEQUENCE_LEN: usize = 32;

/// SGR (Select Graphics Rendition) parameters.
///
/// Accepted by the interpreter and surfaced via `ScreenOp::SetGraphics`;
/// none of these currently have a rendering effect on the surface.
pub mod sgr {
    pub const RESET: u16 = 0;
    pub const BOLD: u16 = 1;
    pub const FAINT: u16 = 2;
    pub const ITALIC: u16 = 3;
    pub const UNDERLINE: u16 = 4;
    pub const BLINK_SLOW: u16 = 5;
    pub const BLINK_RAPID: u16 = 6;
    pub const NEGATIVE: u16 = 7;
    pub const CONCEAL: u16 = 8;
    pub const STRIKE_OUT: u16 = 9;
    pub const NOT_BOLD_OR_FAINT: u16 = 22;
    pub const NOT_ITALIC: u16 = 23;
    pub const NO_UNDERLINE: u16 = 24;
    pub const NO_BLINK: u16 = 25;
    pub const POSITIVE: u16 = 27;
    pub const REVEAL: u16 = 28;
    pub const NO_STRIKE_OUT: u16 = 29;
    pub const FG_BLACK: u16 = 30;
    pub const FG_RED: u16 = 31;
    pub const FG_GREEN: u16 = 32;
    pub const FG_YELLOW: u16 = 33;
    pub const FG_BLUE: u16 = 34;
    pub const FG_MAGENTA: u16 = 35;
    pub const FG_CYAN: u16 = 36;
    pub const FG_WHITE: u16 = 37;
    pub const FG_EXTENDED: u16 = 38;
    pub const FG_DEFAULT: u16 = 39;
    pub const BG_BLACK: u16 = 40;
    pub const BG_RED: u16 = 41;
    pub const BG_GREEN: u16 = 42;
    pub const BG_YELLOW: u16 = 43;
    pub const BG_BLUE: u16 = 44;
    pub const BG_MAGENTA: u16 = 45;
    pub const BG_CYAN: u16 = 46;
    pub const BG_WHITE: u16 = 47;
    pub const BG_EXTENDED: u16 = 48;
    pub const BG_DEFAULT: u16 = 49;
}

/// Whether `seq` (the accumulator after ESC) forms a syntactically complete
/// sequence.
///
/// CSI sequences (`[` prefix) terminate on a final byte in `@..~` after the
/// parameter bytes. Other escapes terminate on any byte in `0..~`.
pub fn is_terminated(seq: &str) -> bool {
    let mut chars = seq.chars();
    match chars.next() {
        Some('[') => chars
            .last()
            .is_some_and(|c| ('\u{40}'..='\u{7e}').contains(&c)),
        Some(first) => {
            let last = chars.last().unwrap_or(first);
            ('\u{30}'..='\u{7e}').contains(&last)
        }
        None => false,
    }
}

/// Map a terminated sequence to its operation.
pub fn classify(seq: &str) -> ScreenOp {
    let Some(body) = seq.strip_prefix('[') else {
        // Non-CSI escapes (DECSC, RIS, ...) are outside the catalog.
        return ScreenOp::Unrecognized(seq.to_string());
    };

    let Some(final_byte) = body.chars().last() else {
        return ScreenOp::Unrecognized(seq.to_string());
    };
    let params_str = &body[..body.len() - final_byte.len_utf8()];

    // Private-mode set/reset: only cursor visibility is cataloged.
    if let Some(mode) = params_str.strip_prefix('?') {
        return match (mode, final_byte) {
            ("25", 'h') => ScreenOp::Cursor(CursorOp::Show),
            ("25", 'l') => ScreenOp::Cursor(CursorOp::Hide),
            _ => ScreenOp::Unrecognized(seq.to_string()),
        };
    }

    let params = match parse_params(params_str) {
        Some(params) => params,
        None => return ScreenOp::Unrecognized(seq.to_string()),
    };
    let first = |default: u16| params.first().copied().unwrap_or(default);

    match final_byte {
        'A' => ScreenOp::Cursor(CursorOp::Up(first(1))),
        'B' => ScreenOp::Cursor(CursorOp::Down(first(1))),
        'C' => ScreenOp::Cursor(CursorOp::Forward(first(1))),
        'D' => ScreenOp::Cursor(CursorOp::Back(first(1))),
        'E' => ScreenOp::Cursor(CursorOp::NextLine(first(1))),
        'F' => ScreenOp::Cursor(CursorOp::PrevLine(first(1))),
        'G' => ScreenOp::Cursor(CursorOp::Column(first(1))),
        'H' | 'f' => ScreenOp::Cursor(CursorOp::MoveTo {
            row: first(1),
            col: params.get(1).copied().unwrap_or(1),
        }),
        'J' => ScreenOp::Erase(EraseOp::All),
        'K' => ScreenOp::Erase(EraseOp::Line),
        'S' => ScreenOp::Scroll(ScrollOp::Up(first(1))),
        'T' => ScreenOp::Scroll(ScrollOp::Down(first(1))),
        's' => ScreenOp::Cursor(CursorOp::Save),
        'u' => ScreenOp::Cursor(CursorOp::Restore),
        'm' => {
            if params.is_empty() {
                // Bare `CSI m` means reset.
                ScreenOp::SetGraphics(vec![sgr::RESET])
            } else {
                ScreenOp::SetGraphics(params)
            }
        }
        _ => ScreenOp::Unrecognized(seq.to_string()),
    }
}

/// Parse a `;`-separated CSI parameter list. Empty fields default to 0 at
/// this layer; per-code defaults are applied in `classify`. Returns `None`
/// when the parameter bytes are not plain numbers.
fn parse_params(params_str: &str) -> Option<Vec<u16>> {
    if params_str.is_empty() {
        return Some(Vec::new());
    }
    params_str
        .split(';')
        .map(|p| {
            if p.is_empty() {
                Some(0)
            } else {
                p.parse::<u16>().ok()
            }
        })
        .collect()
}
