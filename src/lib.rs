//! ttyview library crate.
//!
//! Embeds interactive terminal sessions inside a host application's text
//! surface: spawn a child process on a pseudo-terminal, stream its decoded
//! output into a live text buffer through a coalescing output buffer, and
//! forward keystrokes and signals back to the process.
//!
//! This library provides:
//! - PTY session lifecycle management and the read/decode loop
//! - An ANSI escape interpreter producing typed screen operations
//! - Buffered, batched application of output to a `TextSurface`
//! - A session registry and an engine facade for host command dispatch

pub mod config;
pub mod cursor;
pub mod engine;
pub mod error;
pub mod escape;
pub mod event;
pub mod output;
pub mod registry;
pub mod session;
pub mod signals;
pub mod surface;

pub use config::EngineConfig;
pub use cursor::CursorPosition;
pub use engine::TerminalEngine;
pub use error::{DispatchError, SendError, SignalError, SpawnError};
pub use escape::{EscapeInterpreter, ScreenOp};
pub use event::SessionEvent;
pub use output::OutputBuffer;
pub use registry::{SessionRegistry, SurfaceId};
pub use session::{Session, SessionHandle};
pub use surface::{SharedSurface, StringSurface, TextSurface};
