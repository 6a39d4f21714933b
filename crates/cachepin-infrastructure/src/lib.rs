//! Store adapters for cachepin.
//!
//! Implements the core repository traits against in-memory maps, JSON files
//! and directories, and loads configuration from TOML.

pub mod config_service;
pub mod dto;
pub mod json_dir_session_repository;
pub mod json_file_version_repository;
pub mod memory_session_repository;
pub mod memory_version_repository;
pub mod paths;

pub use crate::config_service::ConfigService;
pub use crate::json_dir_session_repository::JsonDirSessionRepository;
pub use crate::json_file_version_repository::JsonFileVersionHistoryRepository;
pub use crate::memory_session_repository::InMemorySessionRepository;
pub use crate::memory_version_repository::InMemoryVersionHistoryRepository;
pub use crate::paths::CachePinPaths;
