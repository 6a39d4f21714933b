//! Domain layer for cachepin.
//!
//! A session pins the cache-version snapshot a client has been shown, so that
//! later reads under the same session do not silently move to a newer
//! snapshot. This crate holds the session entity, the version resolver, the
//! request context handle and the repository traits the store adapters
//! implement.

pub mod config;
pub mod error;
pub mod request;
pub mod session;
pub mod versions;

// Re-export common error type
pub use error::CachePinError;
