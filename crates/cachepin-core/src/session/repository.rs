//! Session repository trait.
//!
//! Defines the interface for session persistence operations.

use super::model::Session;
use crate::error::Result;
use async_trait::async_trait;

/// An abstract repository for managing session persistence.
///
/// This trait defines the contract for persisting and retrieving sessions,
/// decoupling the application's core logic from the specific storage mechanism
/// (e.g., in-memory map, JSON files, remote key-value cache).
///
/// # Implementation Notes
///
/// Implementations own the mapping between [`Session`] and their stored
/// record shape. A record saved without an active order (or any other
/// optional part) must load back without it.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Finds a session by its ID.
    ///
    /// # Arguments
    ///
    /// * `session_id` - The ID of the session to find
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Session))`: Session found
    /// - `Ok(None)`: Session not found (a legitimate miss)
    /// - `Err(_)`: Transport or decoding error
    async fn find_by_id(&self, session_id: &str) -> Result<Option<Session>>;

    /// Saves a session, overwriting any record with the same ID.
    ///
    /// No optimistic concurrency check is made; the last writer wins.
    ///
    /// # Arguments
    ///
    /// * `session` - The session to save
    async fn save(&self, session: &Session) -> Result<()>;
}
