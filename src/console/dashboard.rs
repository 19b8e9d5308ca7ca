use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};
use std::io::Write;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::Result;
use crate::session::{SessionCatalog, SessionState};

use super::cursor::TerminalCursorGuard;

/// Default dashboard redraw interval
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_millis(250);

pub const DASHBOARD_HEADER: &str = "Audio sessions (default output)";

const INDICATOR: &str = "●";

/// Mode B: redraw every live session with a state-colored indicator.
///
/// Nothing carries over between frames; each frame is a fresh catalog.
pub struct DashboardRenderer<W> {
    output: W,
    refresh_interval: Duration,
}

impl<W: Write> DashboardRenderer<W> {
    pub fn new(output: W, refresh_interval: Duration) -> Self {
        Self {
            output,
            refresh_interval,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Paint one frame, returning how many sessions were drawn
    pub fn render_frame(&mut self, catalog: &SessionCatalog) -> Result<usize> {
        queue!(self.output, Clear(ClearType::All), MoveTo(0, 0))?;

        let snapshot = catalog.build()?;

        queue!(self.output, Print(DASHBOARD_HEADER), Print("\n\n"))?;

        for session in snapshot.iter() {
            let state = session.state().unwrap_or_else(|e| {
                debug!(pid = session.process_id, "State sample failed: {e}");
                SessionState::Unknown
            });

            queue!(
                self.output,
                SetForegroundColor(state.indicator_color()),
                Print(INDICATOR),
                ResetColor,
                Print(format!(" {}\n", session.process_name))
            )?;
        }

        self.output.flush()?;

        // Frame-scoped handles are released here
        let rendered = snapshot.len();
        drop(snapshot);

        Ok(rendered)
    }

    /// Redraw forever; only an error (or the process exiting) stops it
    pub async fn run(&mut self, catalog: &SessionCatalog) -> Result<()> {
        loop {
            self.render_frame(catalog)?;
            tokio::time::sleep(self.refresh_interval).await;
        }
    }

    /// Run with the cursor hidden by `guard`. An interrupt ends the process
    /// from `listener`; if the loop fails instead, the listener is stopped
    /// and the cursor restored here before the error is returned.
    pub async fn run_guarded(
        &mut self,
        catalog: &SessionCatalog,
        guard: TerminalCursorGuard,
        listener: JoinHandle<()>,
    ) -> Result<()> {
        let result = self.run(catalog).await;

        listener.abort();
        if let Err(e) = guard.restore() {
            warn!("Failed to restore cursor visibility: {e}");
        }

        result
    }
}
