//! PTY session management.
//!
//! This module provides:
//! - `Session` / `SessionHandle` - one running child process bound to a
//!   pseudo-terminal, with input and signal forwarding
//! - `spawn` - allocate the PTY, start the child, start the reader and
//!   read-loop threads, and register the session
//!
//! The read loop (see `run_loop`) is the only writer of cursor and buffer
//! state; input forwarding and signal delivery are safe to call from any
//! thread concurrently with it.

pub mod run_loop;

use std::io::{Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use nix::sys::signal;
use nix::unistd::Pid;
use portable_pty::{native_pty_system, Child, CommandBuilder, ExitStatus, PtyPair, PtySize};

use crate::config::EngineConfig;
use crate::error::{SendError, SignalError, SpawnError};
use crate::escape::EscapeInterpreter;
use crate::event::SessionEvent;
use crate::output::OutputBuffer;
use crate::registry::{SessionRegistry, SurfaceId};
use crate::signals::signal_by_name;
use crate::surface::TextSurface;

use run_loop::ReadLoop;

/// EOT, sent by `send_eof`.
const EOF_BYTE: u8 = 0x04;
/// ESC, prefixed by `send_escaped`.
const ESC_BYTE: u8 = 0x1b;

/// Shared handle to a session; cheap to clone, safe across threads.
pub type SessionHandle = Arc<Session>;

/// One running child process bound to one text surface.
///
/// While `running` is true the master writer and child handle are valid;
/// the read loop clears the flag exactly once when the child is gone.
pub struct Session {
    command_line: String,
    pid: Option<u32>,
    running: AtomicBool,
    writer: Mutex<Box<dyn Write + Send>>,
    child: Mutex<Box<dyn Child + Send + Sync>>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("command_line", &self.command_line)
            .field("pid", &self.pid)
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}

impl Session {
    /// The command line this session was spawned with.
    pub fn command_line(&self) -> &str {
        &self.command_line
    }

    /// OS process id of the child, when known.
    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    /// Whether the child is still running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Write text to the child's terminal.
    ///
    /// Fails with `SendError::NotRunning` once the child has exited; a
    /// failed send is surfaced, never queued.
    pub fn send_chars(&self, text: &str) -> Result<(), SendError> {
        if !self.is_running() {
            return Err(SendError::NotRunning);
        }

        let mut writer = self.writer.lock().unwrap();
        writer.write_all(text.as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    /// Write text prefixed with ESC, for forwarding raw control sequences.
    pub fn send_escaped(&self, text: &str) -> Result<(), SendError> {
        if !self.is_running() {
            return Err(SendError::NotRunning);
        }

        let mut bytes = Vec::with_capacity(text.len() + 1);
        bytes.push(ESC_BYTE);
        bytes.extend_from_slice(text.as_bytes());

        let mut writer = self.writer.lock().unwrap();
        writer.write_all(&bytes)?;
        writer.flush()?;
        Ok(())
    }

    /// Send end-of-transmission (EOT, 0x04).
    pub fn send_eof(&self) -> Result<(), SendError> {
        if !self.is_running() {
            return Err(SendError::NotRunning);
        }

        let mut writer = self.writer.lock().unwrap();
        writer.write_all(&[EOF_BYTE])?;
        writer.flush()?;
        Ok(())
    }

    /// Deliver a named signal to the child.
    pub fn send_signal(&self, signal_name: &str) -> Result<(), SignalError> {
        let sig = signal_by_name(signal_name)
            .ok_or_else(|| SignalError::UnknownSignal(signal_name.to_string()))?;

        if !self.is_running() {
            return Err(SignalError::NotRunning);
        }
        let Some(pid) = self.pid else {
            return Err(SignalError::NotRunning);
        };

        signal::kill(Pid::from_raw(pid as i32), sig).map_err(SignalError::Delivery)
    }

    /// Forcibly kill the child. Idempotent; safe whether or not the child
    /// is still running.
    pub fn terminate(&self) {
        // Kill on an already-dead child reports an error we don't care
        // about.
        let _ = self.child.lock().unwrap().kill();
    }

    /// Poll child liveness. Used by the read loop.
    pub(crate) fn try_wait(&self) -> std::io::Result<Option<ExitStatus>> {
        self.child.lock().unwrap().try_wait()
    }

    /// Clear the running flag. Called exactly once, by the read loop.
    pub(crate) fn mark_exited(&self) {
        self.running.store(false, Ordering::SeqCst);
    }
}

/// Spawn a child process on a fresh pseudo-terminal bound to `surface`.
///
/// The command line is tokenized with shell quoting rules; the child gets
/// the caller's environment entries plus a forced `TERM` from the config so
/// its capability detection is stable. On success the session is registered
/// under `surface_id` and both the reader thread and the read-loop thread
/// are running. On failure the PTY pair is dropped (both descriptors
/// closed) and nothing is registered.
pub fn spawn(
    surface_id: SurfaceId,
    command_line: &str,
    env: &[(String, String)],
    mut surface: Box<dyn TextSurface>,
    config: &EngineConfig,
    registry: Arc<SessionRegistry>,
    events: Sender<SessionEvent>,
) -> Result<SessionHandle, SpawnError> {
    let argv = shlex::split(command_line)
        .ok_or_else(|| SpawnError::CommandParse(command_line.to_string()))?;
    if argv.is_empty() {
        return Err(SpawnError::EmptyCommandLine);
    }

    let PtyPair { master, slave } = native_pty_system()
        .openpty(PtySize {
            rows: 24,
            cols: 80,
            pixel_width: 0,
            pixel_height: 0,
        })
        .map_err(SpawnError::PtyAllocation)?;

    let mut cmd = CommandBuilder::new(&argv[0]);
    cmd.args(&argv[1..]);
    if let Some(dir) = &config.working_dir {
        cmd.cwd(dir);
    }
    for (key, value) in env {
        cmd.env(key, value);
    }
    // Forced so the child's terminal-capability detection is stable.
    cmd.env("TERM", &config.term);

    let child = slave
        .spawn_command(cmd)
        .map_err(SpawnError::ChildStart)?;
    // The child owns its copies of the slave end; keeping ours open would
    // stop the master from reporting EOF when the child exits.
    drop(slave);

    let writer = master.take_writer().map_err(SpawnError::PtyAllocation)?;
    let mut reader = master
        .try_clone_reader()
        .map_err(SpawnError::PtyAllocation)?;

    let pid = child.process_id();
    let session: SessionHandle = Arc::new(Session {
        command_line: command_line.to_string(),
        pid,
        running: AtomicBool::new(true),
        writer: Mutex::new(writer),
        child: Mutex::new(child),
    });

    surface.set_name(command_line);

    // Reader thread: fixed-size blocking reads from the master, forwarded
    // over a channel. The read loop's try_recv is its non-blocking read.
    let (output_tx, output_rx): (Sender<Vec<u8>>, Receiver<Vec<u8>>) = mpsc::channel();
    let read_chunk = config.read_chunk.max(1);
    let reader_thread = thread::spawn(move || {
        let mut buf = vec![0u8; read_chunk];
        loop {
            match reader.read(&mut buf) {
                Ok(0) => break, // EOF
                Ok(n) => {
                    if output_tx.send(buf[..n].to_vec()).is_err() {
                        break; // Loop gone
                    }
                }
                Err(_) => break,
            }
        }
    });

    registry.register(surface_id, session.clone());
    tracing::info!(surface_id, pid, command = command_line, "spawned terminal session");

    let read_loop = ReadLoop {
        surface_id,
        command_line: command_line.to_string(),
        session: session.clone(),
        registry,
        events,
        output_rx,
        interpreter: EscapeInterpreter::new(),
        output: OutputBuffer::new(config.flush_threshold),
        surface,
        poll_interval: Duration::from_millis(config.poll_interval_ms),
        _master: master,
        _reader_thread: reader_thread,
    };
    thread::spawn(move || read_loop.run());

    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::SharedSurface;
    use std::sync::mpsc::RecvTimeoutError;

    const WAIT: Duration = Duration::from_secs(10);

    struct Spawned {
        session: SessionHandle,
        surface: SharedSurface,
        registry: Arc<SessionRegistry>,
        events: Receiver<SessionEvent>,
        surface_id: SurfaceId,
    }

    fn spawn_command(command_line: &str, config: &EngineConfig) -> Spawned {
        let registry = Arc::new(SessionRegistry::new());
        let (tx, events) = mpsc::channel();
        let surface = SharedSurface::new();
        let session = spawn(
            7,
            command_line,
            &[],
            Box::new(surface.clone()),
            config,
            registry.clone(),
            tx,
        )
        .expect("spawn failed");
        Spawned {
            session,
            surface,
            registry,
            events,
            surface_id: 7,
        }
    }

    fn wait_for_exit(spawned: &Spawned) -> SessionEvent {
        spawned.events.recv_timeout(WAIT).expect("loop never finished")
    }

    #[test]
    fn spawn_and_teardown_round_trip() {
        let spawned = spawn_command("echo hi", &EngineConfig::default());
        assert!(spawned.registry.lookup(spawned.surface_id).is_some());

        let event = wait_for_exit(&spawned);
        match event {
            SessionEvent::Exited { surface_id, .. } => assert_eq!(surface_id, 7),
            SessionEvent::Failed { error, .. } => panic!("loop failed: {error}"),
        }

        // The PTY translates the child's \n to \r\n; the engine folds that
        // back into one appended line.
        assert_eq!(spawned.surface.text(), "hi\n");
        assert!(spawned.surface.name().ends_with("<finished>"));
        assert!(spawned.registry.lookup(spawned.surface_id).is_none());
        assert!(!spawned.session.is_running());
    }

    #[test]
    fn send_after_exit_is_not_running() {
        let spawned = spawn_command("echo done", &EngineConfig::default());
        wait_for_exit(&spawned);

        assert!(matches!(
            spawned.session.send_chars("x"),
            Err(SendError::NotRunning)
        ));
        assert!(matches!(
            spawned.session.send_eof(),
            Err(SendError::NotRunning)
        ));
        assert!(matches!(
            spawned.session.send_signal("SIGTERM"),
            Err(SignalError::NotRunning)
        ));
    }

    #[test]
    fn send_chars_reaches_the_child() {
        let spawned = spawn_command("cat", &EngineConfig::default());
        spawned.session.send_chars("hello\n").expect("send failed");
        spawned.session.send_eof().expect("eof failed");

        wait_for_exit(&spawned);
        // cat echoes the line back (and the terminal may echo the input
        // too); either way the text must have round-tripped.
        assert!(spawned.surface.text().contains("hello"));
    }

    #[test]
    fn unknown_signal_is_rejected_without_delivery() {
        let spawned = spawn_command("sleep 30", &EngineConfig::default());
        assert!(matches!(
            spawned.session.send_signal("SIGNOPE"),
            Err(SignalError::UnknownSignal(name)) if name == "SIGNOPE"
        ));
        assert!(spawned.session.is_running());

        spawned.session.terminate();
        wait_for_exit(&spawned);
    }

    #[test]
    fn cataloged_signal_kills_a_running_child() {
        let spawned = spawn_command("sleep 30", &EngineConfig::default());
        assert!(spawned.session.is_running());

        spawned.session.send_signal("SIGKILL").expect("signal failed");
        let event = wait_for_exit(&spawned);
        assert!(matches!(event, SessionEvent::Exited { .. }));
        assert!(spawned.registry.is_empty());
    }

    #[test]
    fn terminate_is_idempotent() {
        let spawned = spawn_command("sleep 30", &EngineConfig::default());
        spawned.session.terminate();
        spawned.session.terminate();

        wait_for_exit(&spawned);
        spawned.session.terminate();
        assert!(!spawned.session.is_running());
    }

    #[test]
    fn spawn_rejects_bad_quoting() {
        let registry = Arc::new(SessionRegistry::new());
        let (tx, _events) = mpsc::channel();
        let result = spawn(
            1,
            "echo 'unterminated",
            &[],
            Box::new(SharedSurface::new()),
            &EngineConfig::default(),
            registry.clone(),
            tx,
        );
        assert!(matches!(result, Err(SpawnError::CommandParse(_))));
        assert!(registry.is_empty());
    }

    #[test]
    fn spawn_rejects_empty_command_line() {
        let registry = Arc::new(SessionRegistry::new());
        let (tx, _events) = mpsc::channel();
        let result = spawn(
            1,
            "   ",
            &[],
            Box::new(SharedSurface::new()),
            &EngineConfig::default(),
            registry.clone(),
            tx,
        );
        assert!(matches!(result, Err(SpawnError::EmptyCommandLine)));
        assert!(registry.is_empty());
    }

    #[test]
    fn spawn_failure_registers_nothing() {
        let registry = Arc::new(SessionRegistry::new());
        let (tx, events) = mpsc::channel();
        let result = spawn(
            1,
            "/nonexistent/binary/for/this/test",
            &[],
            Box::new(SharedSurface::new()),
            &EngineConfig::default(),
            registry.clone(),
            tx,
        );
        assert!(matches!(result, Err(SpawnError::ChildStart(_))));
        assert!(registry.is_empty());
        assert!(matches!(
            events.recv_timeout(Duration::from_millis(100)),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected)
        ));
    }

    #[test]
    fn working_dir_is_applied_to_the_child() {
        let dir = tempfile::tempdir().unwrap();
        let config = EngineConfig {
            working_dir: Some(dir.path().to_path_buf()),
            ..EngineConfig::default()
        };

        let spawned = spawn_command("pwd", &config);
        wait_for_exit(&spawned);

        let marker = dir
            .path()
            .file_name()
            .unwrap()
            .to_string_lossy()
            .to_string();
        assert!(
            spawned.surface.text().contains(&marker),
            "surface {:?} missing {marker}",
            spawned.surface.text()
        );
    }

    #[test]
    fn forced_term_reaches_the_child() {
        let config = EngineConfig {
            term: "vt220".to_string(),
            ..EngineConfig::default()
        };

        let spawned = spawn_command("sh -c 'echo term=$TERM'", &config);
        wait_for_exit(&spawned);
        assert!(spawned.surface.text().contains("term=vt220"));
    }
}
