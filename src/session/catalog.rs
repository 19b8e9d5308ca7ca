use tracing::debug;

use crate::audio::{AudioBackend, ProcessResolver, SessionControl, SessionEnumerator};
use crate::error::{Result, SessionError};

use super::state::SessionState;

/// One process's use of the default render endpoint, valid for one snapshot
pub struct AudioSession {
    /// Position in the snapshot (enumeration order)
    pub index: usize,
    /// Owning process identifier
    pub process_id: u32,
    /// Resolved executable name, never empty
    pub process_name: String,
    control: Box<dyn SessionControl>,
}

impl AudioSession {
    pub fn new(
        index: usize,
        process_id: u32,
        process_name: String,
        control: Box<dyn SessionControl>,
    ) -> Self {
        Self {
            index,
            process_id,
            process_name,
            control,
        }
    }

    /// Take one synchronous sample of the session's lifecycle state
    pub fn state(&self) -> Result<SessionState> {
        self.control
            .state()
            .map_err(|e| SessionError::StateQueryFailed(format!("{e:#}")))
    }
}

impl std::fmt::Debug for AudioSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioSession")
            .field("index", &self.index)
            .field("process_id", &self.process_id)
            .field("process_name", &self.process_name)
            .finish_non_exhaustive()
    }
}

/// Ordered, resolved view of the live sessions from one enumeration pass.
///
/// Dropping the snapshot releases every session handle it still owns.
#[derive(Debug, Default)]
pub struct CatalogSnapshot {
    sessions: Vec<AudioSession>,
}

impl CatalogSnapshot {
    pub fn from_sessions(sessions: Vec<AudioSession>) -> Self {
        Self { sessions }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&AudioSession> {
        self.sessions.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AudioSession> {
        self.sessions.iter()
    }

    pub fn process_names(&self) -> Vec<&str> {
        self.sessions.iter().map(|s| s.process_name.as_str()).collect()
    }

    /// Keep the session at an operator-supplied position, releasing all others
    pub fn into_selected(self, value: i64) -> Result<AudioSession> {
        let len = self.sessions.len();
        let index = usize::try_from(value)
            .ok()
            .filter(|&i| i < len)
            .ok_or_else(|| {
                SessionError::InvalidSelection(format!("{value} is not in range 0..{len}"))
            })?;

        // Remaining sessions drop (and release) with the iterator
        self.sessions
            .into_iter()
            .nth(index)
            .ok_or_else(|| SessionError::InvalidSelection(value.to_string()))
    }
}

/// Builds catalog snapshots from the default render endpoint
pub struct SessionCatalog {
    backend: Box<dyn AudioBackend>,
    resolver: Box<dyn ProcessResolver>,
}

impl SessionCatalog {
    pub fn new(backend: Box<dyn AudioBackend>, resolver: Box<dyn ProcessResolver>) -> Self {
        Self { backend, resolver }
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Enumerate and resolve the current sessions.
    ///
    /// A failure at any single index skips that index only. Fails with
    /// `EndpointUnavailable` if the endpoint can't be reached and with
    /// `NoSessionsFound` if nothing survives resolution.
    pub fn build(&self) -> Result<CatalogSnapshot> {
        let enumerator = self
            .backend
            .session_enumerator()
            .map_err(|e| SessionError::EndpointUnavailable(format!("{e:#}")))?;

        let count = enumerator
            .count()
            .map_err(|e| SessionError::EndpointUnavailable(format!("{e:#}")))?;

        let mut sessions = Vec::with_capacity(count);

        for index in 0..count {
            match self.resolve_entry(enumerator.as_ref(), index, sessions.len()) {
                Ok(session) => sessions.push(session),
                Err(e) => debug!(index, "Skipping audio session: {e:#}"),
            }
        }

        debug!(
            "Catalog built from {}: {} of {} sessions resolved",
            self.backend.name(),
            sessions.len(),
            count
        );

        if sessions.is_empty() {
            return Err(SessionError::NoSessionsFound);
        }

        Ok(CatalogSnapshot::from_sessions(sessions))
    }

    fn resolve_entry(
        &self,
        enumerator: &dyn SessionEnumerator,
        index: usize,
        position: usize,
    ) -> anyhow::Result<AudioSession> {
        let control = enumerator.session(index)?;
        let pid = control.process_id()?;
        let name = self.resolver.resolve(pid)?;

        if name.is_empty() {
            anyhow::bail!(SessionError::ProcessUnresolvable {
                pid,
                reason: "empty process name".to_string(),
            });
        }

        Ok(AudioSession::new(position, pid, name, control))
    }
}
