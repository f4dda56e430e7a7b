//! The per-session read/decode/apply loop.
//!
//! Runs on its own thread. Drains the reader channel burst by burst,
//! decodes each chunk, feeds the interpreter, and applies the resulting
//! screen operations to the surface through the output buffer. Child
//! liveness is the cancellation signal: a `terminate()` from any thread
//! kills the child, the loop observes the exit on its next poll, flushes
//! one last time, and cleans up.

use std::sync::mpsc::{Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use portable_pty::MasterPty;

use crate::escape::EscapeInterpreter;
use crate::event::SessionEvent;
use crate::output::OutputBuffer;
use crate::registry::{SessionRegistry, SurfaceId};
use crate::surface::TextSurface;

use super::SessionHandle;

/// Everything the loop thread owns.
///
/// Owning the master here guarantees the descriptor is released on every
/// exit path, normal or failed, exactly once.
pub(crate) struct ReadLoop {
    pub(crate) surface_id: SurfaceId,
    pub(crate) command_line: String,
    pub(crate) session: SessionHandle,
    pub(crate) registry: Arc<SessionRegistry>,
    pub(crate) events: Sender<SessionEvent>,
    pub(crate) output_rx: Receiver<Vec<u8>>,
    pub(crate) interpreter: EscapeInterpreter,
    pub(crate) output: OutputBuffer,
    pub(crate) surface: Box<dyn TextSurface>,
    pub(crate) poll_interval: Duration,
    /// Held for its lifetime only; dropped with the loop.
    pub(crate) _master: Box<dyn MasterPty + Send>,
    pub(crate) _reader_thread: thread::JoinHandle<()>,
}

impl ReadLoop {
    /// Drive the loop to completion and report the outcome.
    ///
    /// Cleanup is identical on both paths: mark the session not-running,
    /// remove the registry entry, emit the session event. A failure
    /// additionally kills the child and tags the surface as errored.
    pub(crate) fn run(mut self) {
        let result = self.drive();

        self.session.mark_exited();
        self.registry.remove(self.surface_id);

        match result {
            Ok(exit_code) => {
                self.surface
                    .set_name(&format!("{} <finished>", self.command_line));
                tracing::debug!(
                    surface_id = self.surface_id,
                    exit_code,
                    "terminal session finished"
                );
                let _ = self.events.send(SessionEvent::Exited {
                    surface_id: self.surface_id,
                    exit_code: Some(exit_code),
                });
            }
            Err(error) => {
                self.surface
                    .set_name(&format!("{} <error>", self.command_line));
                self.session.terminate();
                tracing::error!(
                    surface_id = self.surface_id,
                    error = %error,
                    "terminal session loop failed"
                );
                let _ = self.events.send(SessionEvent::Failed {
                    surface_id: self.surface_id,
                    error,
                });
            }
        }
        // Dropping self releases the master descriptor.
    }

    fn drive(&mut self) -> anyhow::Result<u32> {
        loop {
            // Drain the current burst, then flush whatever it produced.
            self.drain_available();
            self.output.flush(&mut *self.surface);

            let status = self
                .session
                .try_wait()
                .context("polling child process liveness")?;

            if let Some(status) = status {
                self.drain_until_eof();
                self.output.flush(&mut *self.surface);
                return Ok(status.exit_code());
            }

            thread::sleep(self.poll_interval);
        }
    }

    /// Non-blocking drain: consume every chunk already in the channel.
    fn drain_available(&mut self) {
        loop {
            match self.output_rx.try_recv() {
                Ok(chunk) => self.feed_chunk(&chunk),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => return,
            }
        }
    }

    /// Final drain after the child exits: the reader thread keeps
    /// forwarding buffered output until it sees EOF and drops its sender,
    /// so wait for the disconnect (with a timeout guarding a wedged PTY).
    fn drain_until_eof(&mut self) {
        while let Ok(chunk) = self.output_rx.recv_timeout(Duration::from_millis(500)) {
            self.feed_chunk(&chunk);
        }
    }

    /// Decode a chunk (fixed single-byte decoding) and feed it through the
    /// interpreter into the output buffer, preserving byte order.
    fn feed_chunk(&mut self, chunk: &[u8]) {
        for &byte in chunk {
            if let Some(op) = self.interpreter.feed(byte as char) {
                self.output.accept(op, &mut *self.surface);
            }
        }
    }
}
