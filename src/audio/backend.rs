use anyhow::Result;

use crate::error::SessionError;
use crate::session::SessionState;

/// Audio subsystem boundary
///
/// Platform-specific implementations:
/// - Windows: Core Audio (WASAPI) session manager on the default render endpoint
/// - Other platforms: unsupported, the factory reports why
///
/// COM interfaces are apartment-bound, so none of these traits require `Send`.
pub trait AudioBackend {
    /// Acquire the default render endpoint's session manager and open a
    /// fresh session enumerator for one catalog pass
    fn session_enumerator(&self) -> Result<Box<dyn SessionEnumerator>>;

    /// Get backend name for logging
    fn name(&self) -> &str;
}

/// One enumeration pass over the endpoint's sessions
pub trait SessionEnumerator {
    fn count(&self) -> Result<usize>;

    /// Fetch the session at `index`. The returned control owns its platform
    /// reference and releases it on drop.
    fn session(&self, index: usize) -> Result<Box<dyn SessionControl>>;
}

/// A single session's control handle
pub trait SessionControl {
    /// Owning process identifier (requires the extended session control)
    fn process_id(&self) -> Result<u32>;

    /// Current lifecycle state
    fn state(&self) -> Result<SessionState>;
}

/// Maps a process identifier to its executable's base name
pub trait ProcessResolver {
    fn resolve(&self, pid: u32) -> std::result::Result<String, SessionError>;
}

/// Audio backend factory
pub struct AudioBackendFactory;

impl AudioBackendFactory {
    /// Create the session backend for this platform
    pub fn create() -> Result<Box<dyn AudioBackend>> {
        #[cfg(windows)]
        {
            use super::wasapi::WasapiBackend;
            let backend = WasapiBackend::new()?;
            Ok(Box::new(backend))
        }

        #[cfg(not(windows))]
        {
            anyhow::bail!("Audio session discovery is only supported on Windows")
        }
    }
}

/// Process resolver factory
pub struct ProcessResolverFactory;

impl ProcessResolverFactory {
    pub fn create() -> Result<Box<dyn ProcessResolver>> {
        #[cfg(windows)]
        {
            Ok(Box::new(super::wasapi::Win32ProcessResolver))
        }

        #[cfg(not(windows))]
        {
            anyhow::bail!("Process name resolution is only supported on Windows")
        }
    }
}
