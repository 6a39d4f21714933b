//! Version history document read by the file-backed history store.

use cachepin_core::versions::CollectionHistory;
use serde::{Deserialize, Serialize};

/// A snapshot of the cache's version histories as exported to a JSON file.
///
/// ```json
/// { "collections": [
///     { "name": "prices",
///       "entries": [ { "versionId": "v1", "validFrom": "2024-01-01T00:00:00Z" } ],
///       "lockVersionUpon": ["checkout"],
///       "cacheType": "pricing" } ] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VersionHistoryDocument {
    #[serde(default)]
    pub collections: Vec<CollectionHistory>,
}
