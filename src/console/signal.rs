use std::future::Future;
use std::io;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::cursor::TerminalCursorGuard;

/// Interrupt and terminate handlers, installed at construction.
///
/// Register these before changing terminal state: until a handler exists
/// the default disposition kills the process without cleanup.
pub struct ShutdownSignals {
    #[cfg(unix)]
    interrupt: tokio::signal::unix::Signal,
    #[cfg(unix)]
    terminate: tokio::signal::unix::Signal,
    #[cfg(windows)]
    interrupt: tokio::signal::windows::CtrlC,
    #[cfg(windows)]
    close: tokio::signal::windows::CtrlClose,
}

impl ShutdownSignals {
    /// Install the handlers now. Must be called inside the tokio runtime.
    pub fn register() -> io::Result<Self> {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};

            Ok(Self {
                interrupt: signal(SignalKind::interrupt())?,
                terminate: signal(SignalKind::terminate())?,
            })
        }

        #[cfg(windows)]
        {
            Ok(Self {
                interrupt: tokio::signal::windows::ctrl_c()?,
                close: tokio::signal::windows::ctrl_close()?,
            })
        }

        #[cfg(not(any(unix, windows)))]
        {
            Ok(Self {})
        }
    }

    /// Resolve on the first interrupt or terminate request
    pub async fn recv(mut self) -> io::Result<()> {
        #[cfg(unix)]
        tokio::select! {
            _ = self.interrupt.recv() => {}
            _ = self.terminate.recv() => {}
        }

        #[cfg(windows)]
        tokio::select! {
            _ = self.interrupt.recv() => {}
            _ = self.close.recv() => {}
        }

        #[cfg(not(any(unix, windows)))]
        {
            let _ = &mut self;
            tokio::signal::ctrl_c().await?;
        }

        Ok(())
    }
}

/// Wait for `shutdown`; if it fires, restore the cursor and hand exit
/// code 0 to `exit`.
pub fn spawn_listener<S, E>(shutdown: S, guard: TerminalCursorGuard, exit: E) -> JoinHandle<()>
where
    S: Future<Output = io::Result<()>> + Send + 'static,
    E: FnOnce(i32) + Send + 'static,
{
    tokio::spawn(async move {
        match shutdown.await {
            Ok(()) => {
                info!("Interrupted, restoring terminal");
                if let Err(e) = guard.restore() {
                    warn!("Failed to restore cursor visibility: {e}");
                }
                exit(0);
            }
            Err(e) => warn!("Failed to listen for interrupt signals: {e}"),
        }
    })
}

/// Listen for OS interrupts off the main loop and exit the process cleanly
/// on the first one
pub fn spawn_interrupt_listener(
    signals: ShutdownSignals,
    guard: TerminalCursorGuard,
) -> JoinHandle<()> {
    spawn_listener(signals.recv(), guard, |code| std::process::exit(code))
}
