//! AsyncDirStorage-based SessionRepository implementation.
//!
//! Directory structure:
//! ```text
//! base_dir/
//! └── sessions/            # configurable collection name
//!     ├── session-id-1.json
//!     └── session-id-2.json
//! ```
//!
//! Records are versioned and migrated on load by the session migrator.
//! AsyncDirStorage writes each file atomically, so readers see either the
//! previous record or the new one.

use crate::dto::{SESSION_ENTITY, check_restored_session, create_session_migrator};
use async_trait::async_trait;
use cachepin_core::error::{CachePinError, Result};
use cachepin_core::session::{Session, SessionRepository};
use std::path::Path;
use tokio::fs;
use version_migrate::{
    AppPaths, AsyncDirStorage, DirStorageStrategy, FilenameEncoding, FormatStrategy, PathStrategy,
};

pub struct JsonDirSessionRepository {
    storage: AsyncDirStorage,
}

impl JsonDirSessionRepository {
    /// Creates a repository storing records under `base_dir/collection`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the storage
    /// cannot be initialized.
    pub async fn new(base_dir: impl AsRef<Path>, collection: &str) -> Result<Self> {
        validate_name(collection)?;
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir).await?;

        let paths =
            AppPaths::new("cachepin").data_strategy(PathStrategy::CustomBase(base_dir.clone()));
        let strategy = DirStorageStrategy::default()
            .with_format(FormatStrategy::Json)
            .with_filename_encoding(FilenameEncoding::Direct);

        let storage = AsyncDirStorage::new(paths, collection, create_session_migrator(), strategy)
            .await
            .map_err(|e| {
                CachePinError::data_access(format!(
                    "failed to open session store at '{}': {}",
                    base_dir.display(),
                    e
                ))
            })?;

        tracing::debug!(dir = %storage.base_path().display(), "opened session directory");

        Ok(Self { storage })
    }

    /// Returns the directory session files are stored in.
    ///
    /// This is the path AsyncDirStorage resolved, not necessarily
    /// `base_dir/collection` verbatim.
    pub fn sessions_dir(&self) -> &Path {
        self.storage.base_path()
    }
}

/// Rejects names that would escape the sessions directory.
fn validate_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && !name.starts_with('.')
        && !name.contains(['/', '\\', '\0']);
    if valid {
        Ok(())
    } else {
        Err(CachePinError::data_access(format!(
            "invalid session store key '{}'",
            name
        )))
    }
}

#[async_trait]
impl SessionRepository for JsonDirSessionRepository {
    async fn find_by_id(&self, session_id: &str) -> Result<Option<Session>> {
        validate_name(session_id)?;
        // Only a missing file is a miss; migration failures must surface.
        let path = self.sessions_dir().join(format!("{}.json", session_id));
        if !fs::try_exists(&path).await? {
            return Ok(None);
        }

        let session = self
            .storage
            .load::<Session>(SESSION_ENTITY, session_id)
            .await
            .map_err(|e| {
                CachePinError::json(format!("failed to load session '{}': {}", session_id, e))
            })?;
        check_restored_session(session).map(Some)
    }

    async fn save(&self, session: &Session) -> Result<()> {
        validate_name(session.id())?;
        self.storage
            .save(SESSION_ENTITY, session.id(), session)
            .await
            .map_err(|e| {
                CachePinError::data_access(format!(
                    "failed to save session '{}': {}",
                    session.id(),
                    e
                ))
            })?;

        tracing::debug!(session_id = session.id(), "session record written");
        Ok(())
    }
}
