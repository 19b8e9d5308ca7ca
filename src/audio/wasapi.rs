// Windows audio backend using Core Audio (WASAPI) session management

use anyhow::{Context, Result};
use tracing::debug;
use windows::core::Interface;
use windows::Win32::Foundation::{CloseHandle, HMODULE};
use windows::Win32::Media::Audio::{
    eConsole, eRender, AudioSessionStateActive, AudioSessionStateExpired,
    AudioSessionStateInactive, IAudioSessionControl, IAudioSessionControl2,
    IAudioSessionEnumerator, IAudioSessionManager2, IMMDeviceEnumerator, MMDeviceEnumerator,
};
use windows::Win32::System::Com::{
    CoCreateInstance, CoInitializeEx, CoUninitialize, CLSCTX_ALL, COINIT_APARTMENTTHREADED,
};
use windows::Win32::System::Console::{
    GetConsoleCursorInfo, GetStdHandle, CONSOLE_CURSOR_INFO, STD_OUTPUT_HANDLE,
};
use windows::Win32::System::ProcessStatus::GetModuleBaseNameW;
use windows::Win32::System::Threading::{OpenProcess, PROCESS_QUERY_INFORMATION, PROCESS_VM_READ};

use super::backend::{AudioBackend, ProcessResolver, SessionControl, SessionEnumerator};
use crate::error::SessionError;
use crate::session::SessionState;

/// Platform limit for a module base name, in UTF-16 code units
const MODULE_NAME_CAPACITY: usize = 1024;

/// Keeps COM initialized on the current thread
struct ComApartment;

impl ComApartment {
    fn enter() -> Result<Self> {
        unsafe { CoInitializeEx(None, COINIT_APARTMENTTHREADED) }
            .ok()
            .context("Failed to initialize COM")?;
        Ok(Self)
    }
}

impl Drop for ComApartment {
    fn drop(&mut self) {
        unsafe { CoUninitialize() };
    }
}

/// WASAPI session backend
///
/// Every catalog pass re-acquires the default render endpoint, so a change of
/// default device between passes is picked up.
pub struct WasapiBackend {
    // Released before the apartment is torn down (field order)
    devices: IMMDeviceEnumerator,
    _com: ComApartment,
}

impl WasapiBackend {
    pub fn new() -> Result<Self> {
        debug!("Initializing Windows Core Audio API");

        let com = ComApartment::enter()?;
        let devices: IMMDeviceEnumerator =
            unsafe { CoCreateInstance(&MMDeviceEnumerator, None, CLSCTX_ALL) }
                .context("Failed to create audio device enumerator")?;

        Ok(Self { devices, _com: com })
    }
}

impl AudioBackend for WasapiBackend {
    fn session_enumerator(&self) -> Result<Box<dyn SessionEnumerator>> {
        let device = unsafe { self.devices.GetDefaultAudioEndpoint(eRender, eConsole) }
            .context("Failed to get default render endpoint")?;

        let manager: IAudioSessionManager2 = unsafe { device.Activate(CLSCTX_ALL, None) }
            .context("Failed to activate audio session manager")?;

        let sessions = unsafe { manager.GetSessionEnumerator() }
            .context("Failed to get audio session enumerator")?;

        Ok(Box::new(WasapiSessionEnumerator { sessions }))
    }

    fn name(&self) -> &str {
        "Windows Core Audio"
    }
}

struct WasapiSessionEnumerator {
    sessions: IAudioSessionEnumerator,
}

impl SessionEnumerator for WasapiSessionEnumerator {
    fn count(&self) -> Result<usize> {
        let count = unsafe { self.sessions.GetCount() }.context("Failed to get session count")?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    fn session(&self, index: usize) -> Result<Box<dyn SessionControl>> {
        let index = i32::try_from(index).context("Session index out of range")?;
        let control = unsafe { self.sessions.GetSession(index) }
            .with_context(|| format!("Failed to get session {index}"))?;

        Ok(Box::new(WasapiSession { control }))
    }
}

/// Session control; the COM reference is released when this is dropped
struct WasapiSession {
    control: IAudioSessionControl,
}

impl SessionControl for WasapiSession {
    fn process_id(&self) -> Result<u32> {
        let extended: IAudioSessionControl2 = self
            .control
            .cast()
            .context("Session does not expose extended control")?;

        unsafe { extended.GetProcessId() }.context("Failed to get session process id")
    }

    fn state(&self) -> Result<SessionState> {
        let state = unsafe { self.control.GetState() }.context("Failed to get session state")?;

        Ok(match state {
            AudioSessionStateInactive => SessionState::Inactive,
            AudioSessionStateActive => SessionState::Active,
            AudioSessionStateExpired => SessionState::Expired,
            _ => SessionState::Unknown,
        })
    }
}

/// Resolves process names via `OpenProcess` + `GetModuleBaseNameW`
pub struct Win32ProcessResolver;

impl ProcessResolver for Win32ProcessResolver {
    fn resolve(&self, pid: u32) -> std::result::Result<String, SessionError> {
        let unresolvable = |reason: String| SessionError::ProcessUnresolvable { pid, reason };

        let handle =
            unsafe { OpenProcess(PROCESS_QUERY_INFORMATION | PROCESS_VM_READ, false, pid) }
                .map_err(|e| unresolvable(format!("open failed: {e}")))?;

        let mut buffer = [0u16; MODULE_NAME_CAPACITY];
        let written = unsafe { GetModuleBaseNameW(handle, HMODULE::default(), &mut buffer) };
        let read_error = (written == 0).then(windows::core::Error::from_win32);

        // Close on every path, including a failed read
        if let Err(e) = unsafe { CloseHandle(handle) } {
            debug!(pid, "Failed to close process handle: {e}");
        }

        if let Some(e) = read_error {
            return Err(unresolvable(format!("module name read failed: {e}")));
        }

        let name = decode_module_name(&buffer);
        if name.is_empty() {
            return Err(unresolvable("empty module name".to_string()));
        }

        Ok(name)
    }
}

/// Decode a UTF-16 buffer up to its first NUL
fn decode_module_name(buffer: &[u16]) -> String {
    let len = buffer.iter().position(|&c| c == 0).unwrap_or(buffer.len());
    String::from_utf16_lossy(&buffer[..len])
}

/// Query the console's cursor visibility
pub fn console_cursor_visible() -> Result<bool> {
    let handle = unsafe { GetStdHandle(STD_OUTPUT_HANDLE) }.context("No console output handle")?;
    let mut info = CONSOLE_CURSOR_INFO::default();
    unsafe { GetConsoleCursorInfo(handle, &mut info) }.context("Failed to read cursor info")?;
    Ok(info.bVisible.as_bool())
}
