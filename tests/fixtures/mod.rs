#![allow(dead_code)]

use anyhow::{anyhow, bail, Result};
use loqa_session_monitor::audio::{
    AudioBackend, ProcessResolver, SessionControl, SessionEnumerator,
};
use loqa_session_monitor::console::CursorControl;
use loqa_session_monitor::{SessionCatalog, SessionError, SessionState};
use std::collections::HashMap;
use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Scripted state samples; the last one repeats once the script runs out.
/// `None` entries make that sample fail.
#[derive(Clone)]
pub struct StateScript {
    samples: Arc<Mutex<(Vec<Option<SessionState>>, usize)>>,
}

impl StateScript {
    pub fn constant(state: SessionState) -> Self {
        Self::sequence(vec![state])
    }

    pub fn sequence(states: Vec<SessionState>) -> Self {
        Self::with_failures(states.into_iter().map(Some).collect())
    }

    pub fn with_failures(samples: Vec<Option<SessionState>>) -> Self {
        Self {
            samples: Arc::new(Mutex::new((samples, 0))),
        }
    }

    fn next(&self) -> Option<SessionState> {
        let mut guard = self.samples.lock().unwrap();
        let (samples, position) = &mut *guard;
        let index = (*position).min(samples.len().saturating_sub(1));
        *position += 1;
        samples.get(index).copied().flatten()
    }
}

/// One entry the fake enumerator reports
#[derive(Clone)]
pub struct FakeSession {
    /// `None` makes the process-id lookup fail
    pub pid: Option<u32>,
    /// Fail the enumerator fetch for this index
    pub fetch_fails: bool,
    pub states: StateScript,
}

impl FakeSession {
    pub fn new(pid: u32, state: SessionState) -> Self {
        Self {
            pid: Some(pid),
            fetch_fails: false,
            states: StateScript::constant(state),
        }
    }

    pub fn scripted(pid: u32, states: StateScript) -> Self {
        Self {
            pid: Some(pid),
            fetch_fails: false,
            states,
        }
    }

    pub fn without_pid() -> Self {
        Self {
            pid: None,
            fetch_fails: false,
            states: StateScript::constant(SessionState::Active),
        }
    }

    pub fn broken_fetch() -> Self {
        Self {
            pid: Some(0),
            fetch_fails: true,
            states: StateScript::constant(SessionState::Active),
        }
    }
}

/// Shared fake audio subsystem. Clones see the same sessions and counters,
/// so tests can mutate the world between catalog builds.
#[derive(Clone, Default)]
pub struct FakeAudio {
    sessions: Arc<Mutex<Vec<FakeSession>>>,
    names: Arc<Mutex<HashMap<u32, String>>>,
    endpoint_down: Arc<AtomicBool>,
    acquired: Arc<AtomicUsize>,
    released: Arc<AtomicUsize>,
}

impl FakeAudio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a session owned by a process with the given name
    pub fn with_process(self, pid: u32, name: &str, state: SessionState) -> Self {
        self.push(FakeSession::new(pid, state));
        self.name_process(pid, name);
        self
    }

    pub fn with_session(self, session: FakeSession) -> Self {
        self.push(session);
        self
    }

    pub fn push(&self, session: FakeSession) {
        self.sessions.lock().unwrap().push(session);
    }

    pub fn name_process(&self, pid: u32, name: &str) {
        self.names.lock().unwrap().insert(pid, name.to_string());
    }

    /// Drop the first session owned by `pid`
    pub fn remove_process(&self, pid: u32) {
        let mut sessions = self.sessions.lock().unwrap();
        if let Some(position) = sessions.iter().position(|s| s.pid == Some(pid)) {
            sessions.remove(position);
        }
    }

    pub fn set_endpoint_down(&self, down: bool) {
        self.endpoint_down.store(down, Ordering::SeqCst);
    }

    pub fn acquired(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    /// Handles fetched but not yet dropped
    pub fn outstanding(&self) -> usize {
        self.acquired() - self.released()
    }

    pub fn catalog(&self) -> SessionCatalog {
        SessionCatalog::new(Box::new(self.clone()), Box::new(FakeResolver(self.clone())))
    }
}

impl AudioBackend for FakeAudio {
    fn session_enumerator(&self) -> Result<Box<dyn SessionEnumerator>> {
        if self.endpoint_down.load(Ordering::SeqCst) {
            bail!("default render endpoint not found");
        }

        Ok(Box::new(FakeEnumerator {
            sessions: self.sessions.lock().unwrap().clone(),
            audio: self.clone(),
        }))
    }

    fn name(&self) -> &str {
        "fake"
    }
}

struct FakeEnumerator {
    sessions: Vec<FakeSession>,
    audio: FakeAudio,
}

impl SessionEnumerator for FakeEnumerator {
    fn count(&self) -> Result<usize> {
        Ok(self.sessions.len())
    }

    fn session(&self, index: usize) -> Result<Box<dyn SessionControl>> {
        let session = self
            .sessions
            .get(index)
            .ok_or_else(|| anyhow!("no session at {index}"))?;

        if session.fetch_fails {
            bail!("session {index} fetch failed");
        }

        self.audio.acquired.fetch_add(1, Ordering::SeqCst);

        Ok(Box::new(FakeControl {
            pid: session.pid,
            states: session.states.clone(),
            released: Arc::clone(&self.audio.released),
        }))
    }
}

struct FakeControl {
    pid: Option<u32>,
    states: StateScript,
    released: Arc<AtomicUsize>,
}

impl SessionControl for FakeControl {
    fn process_id(&self) -> Result<u32> {
        self.pid.ok_or_else(|| anyhow!("extended session control unavailable"))
    }

    fn state(&self) -> Result<SessionState> {
        self.states
            .next()
            .ok_or_else(|| anyhow!("session handle invalidated"))
    }
}

impl Drop for FakeControl {
    fn drop(&mut self) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}

struct FakeResolver(FakeAudio);

impl ProcessResolver for FakeResolver {
    fn resolve(&self, pid: u32) -> std::result::Result<String, SessionError> {
        self.0
            .names
            .lock()
            .unwrap()
            .get(&pid)
            .cloned()
            .ok_or(SessionError::ProcessUnresolvable {
                pid,
                reason: "access denied".to_string(),
            })
    }
}

/// Terminal cursor stand-in that records every visibility write
#[derive(Clone)]
pub struct RecordingCursor {
    visible: Arc<Mutex<bool>>,
    writes: Arc<Mutex<Vec<bool>>>,
}

impl RecordingCursor {
    pub fn new(visible: bool) -> Self {
        Self {
            visible: Arc::new(Mutex::new(visible)),
            writes: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn visible(&self) -> bool {
        *self.visible.lock().unwrap()
    }

    pub fn writes(&self) -> Vec<bool> {
        self.writes.lock().unwrap().clone()
    }
}

impl CursorControl for RecordingCursor {
    fn is_visible(&self) -> io::Result<bool> {
        Ok(self.visible())
    }

    fn set_visible(&self, visible: bool) -> io::Result<()> {
        *self.visible.lock().unwrap() = visible;
        self.writes.lock().unwrap().push(visible);
        Ok(())
    }
}
