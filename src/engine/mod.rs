//! Host-facing engine facade.
//!
//! Owns the session registry and configuration, and dispatches host
//! commands (spawn, input, signals, teardown) to sessions by surface
//! identity. One engine is created at host load and shut down exactly once
//! at unload; nothing here is global state.

use std::sync::mpsc::Sender;
use std::sync::Arc;

use crate::config::EngineConfig;
use crate::error::{DispatchError, SpawnError};
use crate::event::SessionEvent;
use crate::registry::{SessionRegistry, SurfaceId};
use crate::session::{self, SessionHandle};
use crate::signals;
use crate::surface::TextSurface;

/// The terminal engine: registry, config, and command dispatch.
pub struct TerminalEngine {
    config: EngineConfig,
    registry: Arc<SessionRegistry>,
    events: Sender<SessionEvent>,
}

impl TerminalEngine {
    /// Create an engine. `events` receives one `SessionEvent` per session
    /// when its read loop ends.
    pub fn new(config: EngineConfig, events: Sender<SessionEvent>) -> Self {
        Self {
            config,
            registry: Arc::new(SessionRegistry::new()),
            events,
        }
    }

    /// The engine's configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Turn `surface` into a terminal running `command_line`.
    ///
    /// The surface must not already be a terminal; close it first.
    pub fn spawn_terminal(
        &self,
        surface_id: SurfaceId,
        command_line: &str,
        env: &[(String, String)],
        surface: Box<dyn TextSurface>,
    ) -> Result<SessionHandle, SpawnError> {
        session::spawn(
            surface_id,
            command_line,
            env,
            surface,
            &self.config,
            self.registry.clone(),
            self.events.clone(),
        )
    }

    /// Forward raw text to the surface's session.
    pub fn send_chars(&self, surface_id: SurfaceId, text: &str) -> Result<(), DispatchError> {
        self.session(surface_id)?.send_chars(text)?;
        Ok(())
    }

    /// Forward ESC-prefixed text to the surface's session.
    pub fn send_escaped(&self, surface_id: SurfaceId, text: &str) -> Result<(), DispatchError> {
        self.session(surface_id)?.send_escaped(text)?;
        Ok(())
    }

    /// Send end-of-transmission to the surface's session.
    pub fn send_eof(&self, surface_id: SurfaceId) -> Result<(), DispatchError> {
        self.session(surface_id)?.send_eof()?;
        Ok(())
    }

    /// Deliver a named signal to the surface's session.
    pub fn send_signal(
        &self,
        surface_id: SurfaceId,
        signal_name: &str,
    ) -> Result<(), DispatchError> {
        self.session(surface_id)?.send_signal(signal_name)?;
        Ok(())
    }

    /// Ordered signal names for a selection UI.
    pub fn signal_names(&self) -> Vec<&'static str> {
        signals::signal_names()
    }

    /// Snapshot of all active sessions, for building a picker list.
    pub fn sessions(&self) -> Vec<(SurfaceId, SessionHandle)> {
        self.registry.all()
    }

    /// Whether the surface currently has a session.
    pub fn is_terminal(&self, surface_id: SurfaceId) -> bool {
        self.registry.lookup(surface_id).is_some()
    }

    /// The host closed a surface: kill its child if one is still running.
    ///
    /// The read loop observes the death and unregisters; a surface with no
    /// session is a no-op.
    pub fn close_surface(&self, surface_id: SurfaceId) {
        if let Some(session) = self.registry.lookup(surface_id) {
            if session.is_running() {
                tracing::info!(
                    surface_id,
                    pid = session.pid(),
                    command = session.command_line(),
                    "killing process running in closed terminal"
                );
                session.terminate();
            }
        }
    }

    /// Engine unload: force-terminate every still-running session and
    /// clear the registry.
    pub fn shutdown(&self) {
        self.registry.shutdown();
    }

    fn session(&self, surface_id: SurfaceId) -> Result<SessionHandle, DispatchError> {
        self.registry
            .lookup(surface_id)
            .ok_or(DispatchError::NotATerminal(surface_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::SharedSurface;
    use std::sync::mpsc::{self, Receiver};
    use std::time::Duration;

    const WAIT: Duration = Duration::from_secs(10);

    fn engine() -> (TerminalEngine, Receiver<SessionEvent>) {
        let (tx, rx) = mpsc::channel();
        (TerminalEngine::new(EngineConfig::default(), tx), rx)
    }

    #[test]
    fn commands_against_non_terminal_surfaces_are_errors() {
        let (engine, _rx) = engine();
        assert!(matches!(
            engine.send_chars(9, "x"),
            Err(DispatchError::NotATerminal(9))
        ));
        assert!(matches!(
            engine.send_eof(9),
            Err(DispatchError::NotATerminal(9))
        ));
        assert!(matches!(
            engine.send_signal(9, "SIGINT"),
            Err(DispatchError::NotATerminal(9))
        ));
        assert!(!engine.is_terminal(9));
        // Closing a non-terminal surface is a no-op, not an error.
        engine.close_surface(9);
    }

    #[test]
    fn spawned_terminal_is_listed_and_dispatchable() {
        let (engine, rx) = engine();
        let surface = SharedSurface::new();
        engine
            .spawn_terminal(3, "cat", &[], Box::new(surface.clone()))
            .expect("spawn failed");

        assert!(engine.is_terminal(3));
        let sessions = engine.sessions();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].0, 3);

        engine.send_chars(3, "ping\n").expect("send failed");
        engine.send_eof(3).expect("eof failed");

        let event = rx.recv_timeout(WAIT).expect("loop never finished");
        assert!(matches!(event, SessionEvent::Exited { surface_id: 3, .. }));
        assert!(surface.text().contains("ping"));
        assert!(!engine.is_terminal(3));
    }

    #[test]
    fn close_surface_kills_the_running_child() {
        let (engine, rx) = engine();
        engine
            .spawn_terminal(4, "sleep 30", &[], Box::new(SharedSurface::new()))
            .expect("spawn failed");

        engine.close_surface(4);
        rx.recv_timeout(WAIT).expect("loop never finished");
        assert!(!engine.is_terminal(4));
    }

    #[test]
    fn shutdown_terminates_every_running_session() {
        let (engine, rx) = engine();
        engine
            .spawn_terminal(1, "sleep 30", &[], Box::new(SharedSurface::new()))
            .expect("spawn failed");
        engine
            .spawn_terminal(2, "sleep 30", &[], Box::new(SharedSurface::new()))
            .expect("spawn failed");

        engine.shutdown();
        assert!(engine.sessions().is_empty());

        // Both loops observe the kill and report.
        rx.recv_timeout(WAIT).expect("first loop never finished");
        rx.recv_timeout(WAIT).expect("second loop never finished");
    }

    #[test]
    fn signal_names_come_from_the_catalog() {
        let (engine, _rx) = engine();
        let names = engine.signal_names();
        assert!(names.contains(&"SIGINT"));
        assert!(names.contains(&"SIGKILL"));
    }
}
