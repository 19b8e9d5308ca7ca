pub mod cursor;
pub mod dashboard;
pub mod selector;
pub mod signal;

pub use cursor::{CursorControl, TerminalCursor, TerminalCursorGuard};
pub use dashboard::{DashboardRenderer, DASHBOARD_HEADER, DEFAULT_REFRESH_INTERVAL};
pub use selector::InteractiveSelector;
pub use signal::{spawn_interrupt_listener, spawn_listener, ShutdownSignals};
