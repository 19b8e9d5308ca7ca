pub mod backend;

#[cfg(windows)]
pub mod wasapi;

pub use backend::{
    AudioBackend, AudioBackendFactory, ProcessResolver, ProcessResolverFactory, SessionControl,
    SessionEnumerator,
};
