//! File-backed VersionHistoryRepository implementation.
//!
//! Reads a [`VersionHistoryDocument`] from disk on every call. Nothing is
//! cached, so an external writer replacing the file is seen by the next read.

use crate::dto::VersionHistoryDocument;
use async_trait::async_trait;
use cachepin_core::error::{CachePinError, Result};
use cachepin_core::versions::{CollectionHistory, VersionFilter, VersionHistoryRepository};
use std::path::{Path, PathBuf};
use tokio::fs;

#[derive(Debug, Clone)]
pub struct JsonFileVersionHistoryRepository {
    path: PathBuf,
}

impl JsonFileVersionHistoryRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl VersionHistoryRepository for JsonFileVersionHistoryRepository {
    async fn version_histories(&self, filter: &VersionFilter) -> Result<Vec<CollectionHistory>> {
        let content = fs::read_to_string(&self.path).await.map_err(|e| {
            CachePinError::data_access(format!(
                "failed to read version history {}: {}",
                self.path.display(),
                e
            ))
        })?;
        let document: VersionHistoryDocument = serde_json::from_str(&content)?;
        Ok(document
            .collections
            .into_iter()
            .filter(|h| filter.matches(h))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const HISTORY: &str = r#"{
        "collections": [
            { "name": "prices",
              "entries": [
                { "versionId": "v1", "validFrom": "2024-01-01T00:00:00Z" },
                { "versionId": "v2", "validFrom": "2024-06-01T00:00:00Z" }
              ],
              "lockVersionUpon": ["checkout"],
              "cacheType": "pricing" },
            { "name": "catalog",
              "entries": [ { "versionId": "c1", "validFrom": "2024-01-01T00:00:00Z" } ] }
        ]
    }"#;

    #[tokio::test]
    async fn test_reads_document() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("history.json");
        std::fs::write(&path, HISTORY).unwrap();

        let repo = JsonFileVersionHistoryRepository::new(&path);
        let all = repo.version_histories(&VersionFilter::all()).await.unwrap();
        assert_eq!(all.len(), 2);

        let pricing = repo
            .version_histories(&VersionFilter::all().with_cache_type("pricing"))
            .await
            .unwrap();
        assert_eq!(pricing.len(), 1);
        assert_eq!(pricing[0].entries[1].version_id, "v2");
    }

    #[tokio::test]
    async fn test_rereads_on_every_call() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("history.json");
        std::fs::write(&path, r#"{"collections":[]}"#).unwrap();

        let repo = JsonFileVersionHistoryRepository::new(&path);
        assert!(repo.version_histories(&VersionFilter::all()).await.unwrap().is_empty());

        std::fs::write(&path, HISTORY).unwrap();
        assert_eq!(
            repo.version_histories(&VersionFilter::all()).await.unwrap().len(),
            2
        );
    }

    #[tokio::test]
    async fn test_missing_file_is_data_access_error() {
        let repo = JsonFileVersionHistoryRepository::new("/nonexistent/history.json");
        let err = repo.version_histories(&VersionFilter::all()).await.unwrap_err();
        assert!(matches!(err, CachePinError::DataAccess(_)));
    }
}
