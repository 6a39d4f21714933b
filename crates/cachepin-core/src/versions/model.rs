//! Cache version domain models.
//!
//! A collection is a named, independently versioned dataset in the external
//! cache. Its history is an unordered list of `(version_id, valid_from)`
//! entries, optionally tagged with the actions that lock it and a cache type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Collection name → version id snapshot pin.
///
/// Ordered so that exported JSON is stable across calls.
pub type VersionMap = BTreeMap<String, String>;

/// One version of a collection and the instant it became valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionEntry {
    pub version_id: String,
    pub valid_from: DateTime<Utc>,
}

impl VersionEntry {
    pub fn new(version_id: impl Into<String>, valid_from: DateTime<Utc>) -> Self {
        Self {
            version_id: version_id.into(),
            valid_from,
        }
    }
}

/// The version history of a single cache collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionHistory {
    /// Collection name (unique within one history listing)
    pub name: String,
    /// Known versions, in no particular order
    #[serde(default)]
    pub entries: Vec<VersionEntry>,
    /// Actions upon which this collection's version gets locked
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub lock_version_upon: BTreeSet<String>,
    /// Cache type of the collection, if the cache reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_type: Option<String>,
}

impl CollectionHistory {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
            lock_version_upon: BTreeSet::new(),
            cache_type: None,
        }
    }

    #[must_use]
    pub fn with_entry(mut self, version_id: impl Into<String>, valid_from: DateTime<Utc>) -> Self {
        self.push(VersionEntry::new(version_id, valid_from));
        self
    }

    #[must_use]
    pub fn with_lock_action(mut self, action: impl Into<String>) -> Self {
        self.lock_version_upon.insert(action.into());
        self
    }

    #[must_use]
    pub fn with_cache_type(mut self, cache_type: impl Into<String>) -> Self {
        self.cache_type = Some(cache_type.into());
        self
    }

    /// Appends a version to the history.
    pub fn push(&mut self, entry: VersionEntry) {
        self.entries.push(entry);
    }

    /// Returns true if the collection is locked upon `action`.
    pub fn locks_upon(&self, action: &str) -> bool {
        self.lock_version_upon.contains(action)
    }
}

/// Selects which collections take part in a resolution.
///
/// The default filter lets every collection through. Each populated field
/// narrows the selection further; all of them must hold for a collection to
/// participate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionFilter {
    /// Only collections whose tag set contains this action
    pub action: Option<String>,
    /// Only collections whose tag set does NOT contain this action
    pub excluded_action: Option<String>,
    /// Only collections of this cache type
    pub cache_type: Option<String>,
}

impl VersionFilter {
    /// A filter that selects every collection.
    pub fn all() -> Self {
        Self::default()
    }

    /// Selects the collections locked upon `action`.
    pub fn for_action(action: impl Into<String>) -> Self {
        Self {
            action: Some(action.into()),
            ..Self::default()
        }
    }

    /// Selects every collection except the ones locked upon `action`.
    pub fn excluding_action(action: impl Into<String>) -> Self {
        Self {
            excluded_action: Some(action.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_cache_type(mut self, cache_type: impl Into<String>) -> Self {
        self.cache_type = Some(cache_type.into());
        self
    }

    /// Returns true when no field narrows the selection.
    pub fn is_unfiltered(&self) -> bool {
        self.action.is_none() && self.excluded_action.is_none() && self.cache_type.is_none()
    }

    /// Returns true if `history` participates under this filter.
    pub fn matches(&self, history: &CollectionHistory) -> bool {
        if let Some(action) = &self.action {
            if !history.locks_upon(action) {
                return false;
            }
        }
        if let Some(action) = &self.excluded_action {
            if history.locks_upon(action) {
                return false;
            }
        }
        if let Some(cache_type) = &self.cache_type {
            if history.cache_type.as_deref() != Some(cache_type.as_str()) {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn promo() -> CollectionHistory {
        CollectionHistory::new("promotions")
            .with_lock_action("checkout")
            .with_cache_type("pricing")
    }

    #[test]
    fn test_all_matches_everything() {
        let filter = VersionFilter::all();
        assert!(filter.is_unfiltered());
        assert!(filter.matches(&promo()));
        assert!(filter.matches(&CollectionHistory::new("catalog")));
    }

    #[test]
    fn test_action_filters() {
        let catalog = CollectionHistory::new("catalog");

        let only = VersionFilter::for_action("checkout");
        assert!(only.matches(&promo()));
        assert!(!only.matches(&catalog));

        let except = VersionFilter::excluding_action("checkout");
        assert!(!except.matches(&promo()));
        assert!(except.matches(&catalog));
    }

    #[test]
    fn test_cache_type_filter() {
        let filter = VersionFilter::all().with_cache_type("pricing");
        assert!(!filter.is_unfiltered());
        assert!(filter.matches(&promo()));
        assert!(!filter.matches(&CollectionHistory::new("catalog")));
    }

    #[test]
    fn test_history_json_shape() {
        let json = r#"{"name":"prices",
            "entries":[{"versionId":"v1","validFrom":"2024-01-01T00:00:00Z"}]}"#;
        let history: CollectionHistory = serde_json::from_str(json).unwrap();
        assert_eq!(history.name, "prices");
        assert_eq!(history.entries[0].version_id, "v1");
        assert!(history.lock_version_upon.is_empty());
        assert!(history.cache_type.is_none());
    }
}
