//! Session lifecycle events.
//!
//! Each session's read loop reports how it ended over an explicit channel
//! rather than printing or swallowing failures. The host passes the sender
//! to the engine at construction and drains the receiver however it likes.

use crate::registry::SurfaceId;

/// How a session's read loop ended.
#[derive(Debug)]
pub enum SessionEvent {
    /// The child exited and the loop drained and flushed its final output.
    Exited {
        surface_id: SurfaceId,
        /// Child exit code as reported by the PTY, when available.
        exit_code: Option<u32>,
    },
    /// The loop hit an unexpected error; the child was killed, the surface
    /// was tagged as errored, and the session was unregistered.
    Failed {
        surface_id: SurfaceId,
        error: anyhow::Error,
    },
}
