//! Error taxonomy for the terminal engine.
//!
//! Errors from user-directed actions (spawn, send, signal) are returned
//! synchronously. Failures inside a session's read loop are reported through
//! the session event channel instead (see `crate::event`).

use thiserror::Error;

use crate::registry::SurfaceId;

/// A spawn request could not produce a running session.
///
/// On any of these, both pseudo-terminal descriptors are closed and no
/// session is registered.
#[derive(Debug, Error)]
pub enum SpawnError {
    #[error("command line is empty")]
    EmptyCommandLine,

    #[error("failed to parse command line: {0:?}")]
    CommandParse(String),

    #[error("failed to allocate pseudo-terminal: {0}")]
    PtyAllocation(#[source] anyhow::Error),

    #[error("failed to start child process: {0}")]
    ChildStart(#[source] anyhow::Error),
}

/// Sending input to a session failed.
#[derive(Debug, Error)]
pub enum SendError {
    #[error("process finished; sending data to child process failed")]
    NotRunning,

    #[error("failed to write to pseudo-terminal: {0}")]
    Io(#[from] std::io::Error),
}

/// Delivering a signal to a session failed.
#[derive(Debug, Error)]
pub enum SignalError {
    #[error("cannot send signal; process finished")]
    NotRunning,

    #[error("no such signal: {0}")]
    UnknownSignal(String),

    #[error("failed to deliver signal: {0}")]
    Delivery(#[source] nix::Error),
}

/// A host command could not be dispatched to a session.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("surface {0} is not a terminal")]
    NotATerminal(SurfaceId),

    #[error(transparent)]
    Spawn(#[from] SpawnError),

    #[error(transparent)]
    Send(#[from] SendError),

    #[error(transparent)]
    Signal(#[from] SignalError),
}
