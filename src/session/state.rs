use chrono::{DateTime, Utc};
use crossterm::style::Color;
use std::fmt;

/// Lifecycle phase of an audio session, as last sampled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// Session exists but has no active stream
    Inactive,
    /// Session is currently producing audio
    Active,
    /// Session was torn down (terminal)
    Expired,
    /// Platform reported a value we don't recognise
    Unknown,
}

impl SessionState {
    /// Display label, shared by the transition log and the dashboard
    pub fn label(&self) -> &'static str {
        match self {
            SessionState::Inactive => "Inactive",
            SessionState::Active => "Active",
            SessionState::Expired => "Expired",
            SessionState::Unknown => "Unknown",
        }
    }

    /// Dashboard indicator color
    pub fn indicator_color(&self) -> Color {
        match self {
            SessionState::Active => Color::Green,
            SessionState::Inactive => Color::Red,
            SessionState::Expired | SessionState::Unknown => Color::DarkGrey,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Expired)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A detected change between two consecutive samples of one session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionEvent {
    /// State seen on the preceding sample
    pub previous: SessionState,
    /// Newly sampled state
    pub current: SessionState,
    /// When the change was observed
    pub timestamp: DateTime<Utc>,
}

impl fmt::Display for TransitionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.previous, self.current)
    }
}
