//! Configuration service implementation.
//!
//! This module provides a ConfigService that loads the root configuration
//! from a TOML file (default `~/.config/cachepin/config.toml`).

use crate::paths::CachePinPaths;
use cachepin_core::config::CachePinConfig;
use cachepin_core::error::{CachePinError, Result};
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

/// Configuration service that loads and caches the root configuration.
///
/// A missing file yields the defaults. A file that exists but does not
/// parse is an error rather than a silent fallback.
#[derive(Debug, Clone)]
pub struct ConfigService {
    /// Explicit config path; the platform default is used when `None`
    path: Option<PathBuf>,
    /// Cached configuration loaded from file.
    config: Arc<RwLock<Option<CachePinConfig>>>,
}

impl ConfigService {
    pub fn new() -> Self {
        Self {
            path: None,
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Creates a service reading from `path` instead of the platform default.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Gets the configuration, loading it from file if not cached.
    pub fn get_config(&self) -> Result<CachePinConfig> {
        {
            let read_lock = self.config.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(ref cached) = *read_lock {
                return Ok(cached.clone());
            }
        }

        let loaded = self.load_config()?;

        {
            let mut write_lock = self.config.write().unwrap_or_else(PoisonError::into_inner);
            *write_lock = Some(loaded.clone());
        }

        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        let mut write_lock = self.config.write().unwrap_or_else(PoisonError::into_inner);
        *write_lock = None;
    }

    fn load_config(&self) -> Result<CachePinConfig> {
        let path = self.config_path()?;
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(CachePinConfig::default());
        }

        let content = std::fs::read_to_string(&path)?;
        toml::from_str(&content).map_err(|e| {
            CachePinError::config(format!("invalid config file {}: {}", path.display(), e))
        })
    }

    fn config_path(&self) -> Result<PathBuf> {
        match &self.path {
            Some(path) => Ok(path.clone()),
            None => CachePinPaths::config_file().map_err(|e| CachePinError::config(e.to_string())),
        }
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::with_path(temp_dir.path().join("config.toml"));
        assert_eq!(service.get_config().unwrap(), CachePinConfig::default());
    }

    #[test]
    fn test_loads_and_caches() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "session_id_claim = \"sid\"\nexport_now = false\n").unwrap();

        let service = ConfigService::with_path(&path);
        let config = service.get_config().unwrap();
        assert_eq!(config.session_id_claim, "sid");
        assert!(!config.export_now);

        // Cached until invalidated.
        std::fs::write(&path, "session_id_claim = \"other\"\n").unwrap();
        assert_eq!(service.get_config().unwrap().session_id_claim, "sid");
        service.invalidate_cache();
        assert_eq!(service.get_config().unwrap().session_id_claim, "other");
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "export_now = \"maybe\"").unwrap();

        let service = ConfigService::with_path(&path);
        assert!(service.get_config().unwrap_err().is_config());
    }
}
