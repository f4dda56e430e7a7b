//! Escape-sequence interpretation.
//!
//! This module provides:
//! - `ScreenOp` and friends - the operations the byte stream decodes into
//! - the escape code catalog - which control sequences are recognized
//! - `EscapeInterpreter` - the per-session state machine that turns decoded
//!   characters into screen operations

pub mod codes;
pub mod interpreter;
pub mod types;

pub use interpreter::EscapeInterpreter;
pub use types::{CursorOp, EraseOp, ScreenOp, ScrollOp};
