//! Application layer for cachepin.
//!
//! This crate provides the session resolver use cases that coordinate between
//! the domain layer and whichever store adapters the caller wires in.

pub mod session;
pub mod session_resolver;

pub use session::SessionUpdater;
pub use session_resolver::{SessionResolver, SessionResolverConfig};
