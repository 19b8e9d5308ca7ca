pub mod audio;
pub mod config;
pub mod console;
pub mod error;
pub mod session;

pub use audio::{AudioBackend, AudioBackendFactory, ProcessResolver, ProcessResolverFactory};
pub use config::Config;
pub use console::{DashboardRenderer, InteractiveSelector, TerminalCursor, TerminalCursorGuard};
pub use error::SessionError;
pub use session::{
    AudioSession, CatalogSnapshot, MonitorOutcome, SessionCatalog, SessionState, StateMonitor,
    TransitionEvent,
};
