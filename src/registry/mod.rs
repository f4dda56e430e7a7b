//! Registry of active sessions, keyed by surface identity.
//!
//! One `SessionRegistry` is owned by the engine and shared (as an `Arc`)
//! with every session's read loop so the loop can remove its entry when it
//! exits. Absence of an entry means "this surface is not a terminal".

use std::collections::HashMap;
use std::sync::Mutex;

use crate::session::SessionHandle;

/// Host-assigned identity of a text surface (e.g. a buffer id).
pub type SurfaceId = u64;

/// Map from surface identity to active session handle.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<SurfaceId, SessionHandle>>,
}

impl SessionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a session for a surface.
    ///
    /// Panics if the surface already has a session; a surface is bound to
    /// at most one session at a time and re-registering is a logic error.
    pub fn register(&self, surface_id: SurfaceId, session: SessionHandle) {
        let previous = self
            .sessions
            .lock()
            .unwrap()
            .insert(surface_id, session);
        assert!(
            previous.is_none(),
            "surface {surface_id} already has a registered session"
        );
    }

    /// Remove a surface's entry, returning the session if one was present.
    ///
    /// Removal happens exactly once per session lifetime (the read loop's
    /// exit path); an engine-level shutdown may clear entries first, so a
    /// missing entry here is tolerated rather than asserted.
    pub fn remove(&self, surface_id: SurfaceId) -> Option<SessionHandle> {
        self.sessions.lock().unwrap().remove(&surface_id)
    }

    /// Look up the session bound to a surface.
    pub fn lookup(&self, surface_id: SurfaceId) -> Option<SessionHandle> {
        self.sessions.lock().unwrap().get(&surface_id).cloned()
    }

    /// Snapshot all entries, for building picker lists.
    pub fn all(&self) -> Vec<(SurfaceId, SessionHandle)> {
        self.sessions
            .lock()
            .unwrap()
            .iter()
            .map(|(id, session)| (*id, session.clone()))
            .collect()
    }

    /// Number of registered sessions.
    pub fn len(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }

    /// Whether no sessions are registered.
    pub fn is_empty(&self) -> bool {
        self.sessions.lock().unwrap().is_empty()
    }

    /// Force-terminate every still-running session and clear the registry.
    ///
    /// Called once at engine unload.
    pub fn shutdown(&self) {
        let drained: Vec<(SurfaceId, SessionHandle)> =
            self.sessions.lock().unwrap().drain().collect();
        for (surface_id, session) in drained {
            if session.is_running() {
                tracing::info!(surface_id, "killing process still running at shutdown");
                session.terminate();
            }
        }
    }
}
