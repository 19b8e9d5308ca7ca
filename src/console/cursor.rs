use crossterm::cursor::{Hide, Show};
use crossterm::execute;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::warn;

/// Terminal cursor visibility
pub trait CursorControl: Send + Sync {
    fn is_visible(&self) -> io::Result<bool>;

    fn set_visible(&self, visible: bool) -> io::Result<()>;
}

/// Cursor on the process's stdout terminal
pub struct TerminalCursor;

impl CursorControl for TerminalCursor {
    #[cfg(windows)]
    fn is_visible(&self) -> io::Result<bool> {
        crate::audio::wasapi::console_cursor_visible().map_err(io::Error::other)
    }

    // No portable query; terminals start with the cursor shown
    #[cfg(not(windows))]
    fn is_visible(&self) -> io::Result<bool> {
        Ok(true)
    }

    fn set_visible(&self, visible: bool) -> io::Result<()> {
        let mut stdout = io::stdout();
        if visible {
            execute!(stdout, Show)
        } else {
            execute!(stdout, Hide)
        }
    }
}

struct GuardState {
    control: Box<dyn CursorControl>,
    original: bool,
    restored: AtomicBool,
}

impl GuardState {
    fn restore(&self) -> io::Result<bool> {
        if self.restored.swap(true, Ordering::SeqCst) {
            return Ok(false);
        }
        self.control.set_visible(self.original)?;
        Ok(true)
    }
}

impl Drop for GuardState {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            warn!("Failed to restore cursor visibility: {e}");
        }
    }
}

/// Hides the cursor for the dashboard's lifetime.
///
/// Clones share one restoration: whichever of `restore()` (interrupt path)
/// or the last drop (error path) runs first puts the original visibility
/// back, and nothing runs it again.
#[derive(Clone)]
pub struct TerminalCursorGuard {
    state: Arc<GuardState>,
}

impl TerminalCursorGuard {
    /// Record current visibility and hide the cursor
    pub fn acquire(control: impl CursorControl + 'static) -> io::Result<Self> {
        let original = control.is_visible()?;
        control.set_visible(false)?;

        Ok(Self {
            state: Arc::new(GuardState {
                control: Box::new(control),
                original,
                restored: AtomicBool::new(false),
            }),
        })
    }

    /// Restore the original visibility. Returns `false` if it was already
    /// restored.
    pub fn restore(&self) -> io::Result<bool> {
        self.state.restore()
    }

    pub fn is_restored(&self) -> bool {
        self.state.restored.load(Ordering::SeqCst)
    }
}
