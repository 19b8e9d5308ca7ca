use std::io::{BufRead, Write};
use std::time::Duration;
use tracing::{info, warn};

use crate::error::{Result, SessionError};
use crate::session::{
    sample_states, CatalogSnapshot, MonitorOutcome, SessionCatalog, StateMonitor,
};

/// Mode A: list sessions, let the operator pick one, then follow its state
pub struct InteractiveSelector<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> InteractiveSelector<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Write the numbered session list followed by the prompt
    pub fn present(&mut self, snapshot: &CatalogSnapshot) -> Result<()> {
        for (index, session) in snapshot.iter().enumerate() {
            writeln!(self.output, "[{index}] {}", session.process_name)?;
        }
        write!(self.output, "> ")?;
        self.output.flush()?;
        Ok(())
    }

    /// Read one integer from the operator
    pub fn read_selection(&mut self) -> Result<i64> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(SessionError::InvalidSelection("no input".to_string()));
        }

        let value = line.trim();
        value
            .parse::<i64>()
            .map_err(|_| SessionError::InvalidSelection(format!("{value:?} is not a number")))
    }

    /// Build a catalog, take the operator's pick and monitor it until it
    /// expires. Blocks for the life of the session.
    pub async fn run(
        &mut self,
        catalog: &SessionCatalog,
        poll_interval: Duration,
    ) -> Result<MonitorOutcome> {
        let snapshot = catalog.build()?;
        self.present(&snapshot)?;

        let value = self.read_selection()?;
        let session = snapshot.into_selected(value)?;

        info!(
            pid = session.process_id,
            "Monitoring session {}", session.index
        );
        writeln!(self.output, "Monitoring {}", session.process_name)?;

        let output = &mut self.output;
        let mut monitor = StateMonitor::new();
        let outcome = monitor
            .run(sample_states(&session, poll_interval), |event| {
                writeln!(output, "{event}")?;
                Ok(())
            })
            .await?;

        if let MonitorOutcome::Expired { .. } = outcome {
            warn!("Audio session has expired");
            writeln!(self.output, "Audio session has expired")?;
        }

        Ok(outcome)
    }
}
