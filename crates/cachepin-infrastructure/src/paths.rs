//! Unified path management for cachepin files.
//!
//! ```text
//! ~/.config/cachepin/          # Config directory
//! └── config.toml              # CachePinConfig
//!
//! ~/.local/share/cachepin/     # Data directory
//! └── sessions/                # JsonDirSessionRepository default base
//! ```

use std::path::PathBuf;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Platform directory could not be determined.
    DirNotFound(&'static str),
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::DirNotFound(kind) => write!(f, "Cannot find {} directory", kind),
        }
    }
}

impl std::error::Error for PathError {}

const APP_DIR: &str = "cachepin";

pub struct CachePinPaths;

impl CachePinPaths {
    /// Returns the cachepin configuration directory (e.g. `~/.config/cachepin/`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::DirNotFound("config"))
    }

    /// Returns the default config file path.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Self::config_dir().map(|dir| dir.join("config.toml"))
    }

    /// Returns the cachepin data directory (e.g. `~/.local/share/cachepin/`).
    ///
    /// Used as the session store base when no `store_dir` is configured.
    pub fn data_dir() -> Result<PathBuf, PathError> {
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::DirNotFound("data"))
    }
}
