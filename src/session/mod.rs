//! Audio session discovery and state monitoring
//!
//! This module provides the core engine shared by both console modes:
//! - Catalog snapshots of the default endpoint's live sessions
//! - Per-entry failure isolation during enumeration
//! - Sampled lifecycle state with edge-triggered transition detection

mod catalog;
mod monitor;
mod state;

pub use catalog::{AudioSession, CatalogSnapshot, SessionCatalog};
pub use monitor::{
    sample_states, MonitorOutcome, Observation, StateMonitor, DEFAULT_POLL_INTERVAL,
};
pub use state::{SessionState, TransitionEvent};
