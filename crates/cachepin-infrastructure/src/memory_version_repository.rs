//! In-memory VersionHistoryRepository implementation.
//!
//! Stands in for the external cache: histories can be appended to at any
//! time, and every read returns the histories as they are at that moment.

use async_trait::async_trait;
use cachepin_core::error::Result;
use cachepin_core::versions::{
    CollectionHistory, VersionEntry, VersionFilter, VersionHistoryRepository,
};
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

#[derive(Debug, Default)]
pub struct InMemoryVersionHistoryRepository {
    histories: RwLock<Vec<CollectionHistory>>,
}

impl InMemoryVersionHistoryRepository {
    pub fn new(histories: Vec<CollectionHistory>) -> Self {
        Self {
            histories: RwLock::new(histories),
        }
    }

    /// Adds a collection, replacing any existing history with the same name.
    pub async fn register(&self, history: CollectionHistory) {
        let mut histories = self.histories.write().await;
        match histories.iter_mut().find(|h| h.name == history.name) {
            Some(existing) => *existing = history,
            None => histories.push(history),
        }
    }

    /// Records a new version of `collection`, creating the collection if needed.
    pub async fn record_version(
        &self,
        collection: &str,
        version_id: impl Into<String>,
        valid_from: DateTime<Utc>,
    ) {
        let entry = VersionEntry::new(version_id, valid_from);
        let mut histories = self.histories.write().await;
        match histories.iter_mut().find(|h| h.name == collection) {
            Some(history) => history.push(entry),
            None => {
                let mut history = CollectionHistory::new(collection);
                history.push(entry);
                histories.push(history);
            }
        }
    }
}

#[async_trait]
impl VersionHistoryRepository for InMemoryVersionHistoryRepository {
    async fn version_histories(&self, filter: &VersionFilter) -> Result<Vec<CollectionHistory>> {
        let histories = self.histories.read().await;
        Ok(histories
            .iter()
            .filter(|h| filter.matches(h))
            .cloned()
            .collect())
    }
}
