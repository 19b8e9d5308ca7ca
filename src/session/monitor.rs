use chrono::Utc;
use futures::stream::{self, Stream, StreamExt};
use std::time::Duration;
use tracing::debug;

use crate::error::Result;

use super::catalog::AudioSession;
use super::state::{SessionState, TransitionEvent};

/// Default single-session sampling interval
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// What a single sample meant to the monitor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Observation {
    /// First sample, or same as the previous one
    Unchanged,
    /// Differs from the previous sample
    Transition(TransitionEvent),
    /// Session is gone; monitoring should stop
    Expired,
}

/// How a monitor run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorOutcome {
    /// Sampled `Expired`
    Expired { transitions: usize },
    /// The sample stream ran out before the session expired
    StreamEnded { transitions: usize },
}

/// Live sample stream for one session: first sample immediately, then one
/// per `interval`. Infinite; ends only when the consumer stops polling.
pub fn sample_states(
    session: &AudioSession,
    interval: Duration,
) -> impl Stream<Item = Result<SessionState>> + '_ {
    stream::unfold(true, move |first| async move {
        if !first {
            tokio::time::sleep(interval).await;
        }
        Some((session.state(), false))
    })
}

/// Edge detector over consecutive state samples of one session
#[derive(Debug, Default)]
pub struct StateMonitor {
    previous: Option<SessionState>,
    transitions: usize,
}

impl StateMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last recorded state, if any sample has been seen
    pub fn previous(&self) -> Option<SessionState> {
        self.previous
    }

    pub fn transitions(&self) -> usize {
        self.transitions
    }

    /// Feed one sample
    pub fn observe(&mut self, state: SessionState) -> Observation {
        if state.is_terminal() {
            return Observation::Expired;
        }

        let observation = match self.previous {
            Some(previous) if previous != state => {
                self.transitions += 1;
                Observation::Transition(TransitionEvent {
                    previous,
                    current: state,
                    timestamp: Utc::now(),
                })
            }
            _ => Observation::Unchanged,
        };

        self.previous = Some(state);
        observation
    }

    /// Drive the monitor over a sample stream until the session expires.
    ///
    /// `on_transition` is called once per detected change. A failed sample
    /// ends the run with that error.
    pub async fn run<S, F>(&mut self, samples: S, mut on_transition: F) -> Result<MonitorOutcome>
    where
        S: Stream<Item = Result<SessionState>>,
        F: FnMut(&TransitionEvent) -> Result<()>,
    {
        let mut samples = std::pin::pin!(samples);

        while let Some(sample) = samples.next().await {
            match self.observe(sample?) {
                Observation::Unchanged => {}
                Observation::Transition(event) => {
                    debug!("Session state changed: {event}");
                    on_transition(&event)?;
                }
                Observation::Expired => {
                    return Ok(MonitorOutcome::Expired {
                        transitions: self.transitions,
                    });
                }
            }
        }

        Ok(MonitorOutcome::StreamEnded {
            transitions: self.transitions,
        })
    }
}
