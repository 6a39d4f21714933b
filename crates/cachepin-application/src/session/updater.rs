//! Session updater helper for common update patterns.
//!
//! This module provides `SessionUpdater` which abstracts the common
//! "find → update → save" pattern used by the resolver's setters.

use cachepin_core::error::{CachePinError, Result};
use cachepin_core::request::RequestContext;
use cachepin_core::session::{Session, SessionRepository};
use std::sync::Arc;

/// Helper struct for updating sessions with a common pattern.
///
/// `SessionUpdater` encapsulates the common pattern of:
/// 1. Loading a session from storage
/// 2. Applying updates
/// 3. Saving back to storage
///
/// Every store call runs under the request's cancellation guard.
pub struct SessionUpdater {
    repository: Arc<dyn SessionRepository>,
}

impl SessionUpdater {
    /// Creates a new `SessionUpdater` with the given repository.
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    /// Updates a session by applying the given updater function.
    ///
    /// # Arguments
    ///
    /// * `ctx` - The request scope
    /// * `session_id` - The ID of the session to update
    /// * `updater` - A function that modifies the session
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The session doesn't exist (`NotFound`)
    /// - The updater function returns an error (nothing is saved)
    /// - Saving to storage fails
    pub async fn update<F>(
        &self,
        ctx: &RequestContext,
        session_id: &str,
        updater: F,
    ) -> Result<Session>
    where
        F: FnOnce(&mut Session) -> Result<()> + Send,
    {
        tracing::debug!(
            "[SessionUpdater] update() called for session_id: {}",
            session_id
        );

        let mut session = ctx
            .guard(self.repository.find_by_id(session_id))
            .await?
            .ok_or_else(|| CachePinError::not_found("Session", session_id))?;

        updater(&mut session)?;

        ctx.guard(self.repository.save(&session)).await?;

        tracing::debug!(
            "[SessionUpdater] Session saved successfully: id={}",
            session.id()
        );

        Ok(session)
    }
}
