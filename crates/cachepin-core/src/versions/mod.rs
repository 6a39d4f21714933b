//! Cache version domain module.
//!
//! - `model`: version entries, collection histories and filters
//! - `resolver`: "latest version not after now" selection
//! - `repository`: trait for reading version histories from the cache

mod model;
mod repository;
mod resolver;

pub use model::{CollectionHistory, VersionEntry, VersionFilter, VersionMap};
pub use repository::VersionHistoryRepository;
pub use resolver::{latest_version_at, overlay_fixed, resolve_versions};
