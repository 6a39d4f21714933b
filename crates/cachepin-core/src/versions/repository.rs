//! Version history repository trait.

use super::model::{CollectionHistory, VersionFilter};
use crate::error::Result;
use async_trait::async_trait;

/// Read-only access to the external cache's version histories.
///
/// Histories may grow between two calls, even inside one request, because an
/// external writer keeps advancing the cache. Implementations must read the
/// current state on every call and never cache a snapshot.
#[async_trait]
pub trait VersionHistoryRepository: Send + Sync {
    /// Lists the histories of the collections selected by `filter`.
    ///
    /// Implementations may pre-filter with `filter`; the resolver applies it
    /// again, so returning extra collections is harmless.
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<CollectionHistory>)`: Histories, one per collection
    /// - `Err(_)`: Error occurred while reading the cache
    async fn version_histories(&self, filter: &VersionFilter) -> Result<Vec<CollectionHistory>>;
}
