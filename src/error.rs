use thiserror::Error;

/// Failures surfaced by session discovery and the console drivers
#[derive(Debug, Error)]
pub enum SessionError {
    /// Default render endpoint or its session manager could not be acquired
    #[error("audio endpoint unavailable: {0}")]
    EndpointUnavailable(String),

    /// Catalog build finished with zero resolvable sessions
    #[error("no audio sessions found")]
    NoSessionsFound,

    /// Owning process could not be opened or its module name read
    #[error("process {pid} unresolvable: {reason}")]
    ProcessUnresolvable { pid: u32, reason: String },

    /// Operator picked something outside the listed range
    #[error("invalid session selection: {0}")]
    InvalidSelection(String),

    /// Sampling a session's lifecycle state failed
    #[error("session state query failed: {0}")]
    StateQueryFailed(String),

    #[error("terminal I/O failed: {0}")]
    Terminal(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SessionError>;
