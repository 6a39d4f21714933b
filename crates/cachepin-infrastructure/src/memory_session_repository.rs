//! In-memory SessionRepository implementation.
//!
//! Records are kept JSON-encoded, exactly as a remote key-value cache would
//! hold them, so reads always go through the session migrator and callers
//! never share state with the stored copy.

use crate::dto::{create_session_migrator, decode_session, encode_session};
use async_trait::async_trait;
use cachepin_core::error::{CachePinError, Result};
use cachepin_core::session::{Session, SessionRepository};
use std::collections::HashMap;
use tokio::sync::RwLock;
use version_migrate::Migrator;

pub struct InMemorySessionRepository {
    records: RwLock<HashMap<String, String>>,
    migrator: Migrator,
}

impl Default for InMemorySessionRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            migrator: create_session_migrator(),
        }
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Drops a record, as store-level expiry would.
    pub async fn expire(&self, session_id: &str) -> bool {
        self.records.write().await.remove(session_id).is_some()
    }

    /// Stores a raw record without validation.
    pub async fn insert_raw(&self, session_id: impl Into<String>, json: impl Into<String>) {
        self.records
            .write()
            .await
            .insert(session_id.into(), json.into());
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn find_by_id(&self, session_id: &str) -> Result<Option<Session>> {
        let records = self.records.read().await;
        match records.get(session_id) {
            Some(json) => decode_session(&self.migrator, json).map(Some),
            None => Ok(None),
        }
    }

    async fn save(&self, session: &Session) -> Result<()> {
        if session.id().is_empty() {
            return Err(CachePinError::data_access("cannot save a session without an id"));
        }
        let json = encode_session(&self.migrator, session)?;
        self.records
            .write()
            .await
            .insert(session.id().to_string(), json);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_and_find() {
        let repo = InMemorySessionRepository::new();
        let mut session = Session::new("s-1");
        session.set_customer_details("c-1", false);

        repo.save(&session).await.unwrap();
        let loaded = repo.find_by_id("s-1").await.unwrap().unwrap();
        assert_eq!(loaded, session);
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_missing_is_none() {
        let repo = InMemorySessionRepository::new();
        assert!(repo.find_by_id("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_last_writer_wins() {
        let repo = InMemorySessionRepository::new();
        let mut first = Session::new("s-1");
        first.set_lang("en");
        let mut second = Session::new("s-1");
        second.set_lang("fr");

        repo.save(&first).await.unwrap();
        repo.save(&second).await.unwrap();
        assert_eq!(repo.find_by_id("s-1").await.unwrap().unwrap().lang(), "fr");
    }

    #[tokio::test]
    async fn test_corrupt_record_is_an_error_not_a_miss() {
        let repo = InMemorySessionRepository::new();
        repo.insert_raw("s-1", "{broken").await;
        let err = repo.find_by_id("s-1").await.unwrap_err();
        assert!(err.is_serialization());
    }

    #[tokio::test]
    async fn test_raw_record_with_order_id_only() {
        let repo = InMemorySessionRepository::new();
        let record = r#"{"id":"s-1","customerId":"c-1",
            "customerStatus":"existingCustomer","activeOrderId":"o-42"}"#;
        repo.insert_raw("s-1", record).await;

        let session = repo.find_by_id("s-1").await.unwrap().unwrap();
        assert_eq!(session.active_order_id(), Some("o-42"));

        repo.save(&session).await.unwrap();
        let reloaded = repo.find_by_id("s-1").await.unwrap().unwrap();
        assert_eq!(reloaded.active_order_id(), Some("o-42"));
    }

    #[tokio::test]
    async fn test_unknown_record_version_is_an_error() {
        let repo = InMemorySessionRepository::new();
        repo.insert_raw("s-1", r#"{"version":"1.9-garbage","id":"s-1"}"#).await;
        assert!(repo.find_by_id("s-1").await.unwrap_err().is_serialization());
    }

    #[tokio::test]
    async fn test_expire() {
        let repo = InMemorySessionRepository::new();
        repo.save(&Session::new("s-1")).await.unwrap();
        assert!(repo.expire("s-1").await);
        assert!(repo.is_empty().await);
        assert!(repo.find_by_id("s-1").await.unwrap().is_none());
    }
}
