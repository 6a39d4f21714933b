//! Version selection as of a reference time.
//!
//! For every participating collection the resolver picks the entry with the
//! latest `valid_from` that is not after `now`. A collection without such an
//! entry is an error: its history was never bootstrapped, and serving it
//! without a pin would read indeterminate data.

use super::model::{CollectionHistory, VersionEntry, VersionFilter, VersionMap};
use crate::error::{CachePinError, Result};
use chrono::{DateTime, Utc};

/// Returns the entry of `history` that is current at `now`.
///
/// An entry valid exactly at `now` is eligible. On equal `valid_from` the
/// first entry found is kept.
pub fn latest_version_at(history: &CollectionHistory, now: DateTime<Utc>) -> Option<&VersionEntry> {
    let mut latest: Option<&VersionEntry> = None;
    for entry in history.entries.iter().filter(|e| e.valid_from <= now) {
        match latest {
            Some(current) if entry.valid_from <= current.valid_from => {}
            _ => latest = Some(entry),
        }
    }
    latest
}

/// Resolves the version of every collection selected by `filter` as of `now`.
///
/// # Errors
///
/// Returns [`CachePinError::NoVersionFound`] naming the first selected
/// collection that has no entry valid at or before `now`.
pub fn resolve_versions(
    now: DateTime<Utc>,
    histories: &[CollectionHistory],
    filter: &VersionFilter,
) -> Result<VersionMap> {
    let mut versions = VersionMap::new();
    for history in histories.iter().filter(|h| filter.matches(h)) {
        let entry = latest_version_at(history, now)
            .ok_or_else(|| CachePinError::no_version_found(&history.name, now))?;
        versions.insert(history.name.clone(), entry.version_id.clone());
    }

    tracing::debug!(
        now = %now,
        collections = versions.len(),
        "resolved cache versions"
    );

    Ok(versions)
}

/// Lays `fixed` over `resolved`. Fixed entries always win.
pub fn overlay_fixed(mut resolved: VersionMap, fixed: &VersionMap) -> VersionMap {
    resolved.extend(fixed.iter().map(|(k, v)| (k.clone(), v.clone())));
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn prices() -> CollectionHistory {
        CollectionHistory::new("prices")
            .with_entry("v1", at(2024, 1, 1))
            .with_entry("v2", at(2024, 6, 1))
    }

    #[test]
    fn test_prices_scenario() {
        let histories = vec![prices()];
        let filter = VersionFilter::all();

        let march = resolve_versions(at(2024, 3, 1), &histories, &filter).unwrap();
        assert_eq!(march.get("prices").map(String::as_str), Some("v1"));

        let july = resolve_versions(at(2024, 7, 1), &histories, &filter).unwrap();
        assert_eq!(july.get("prices").map(String::as_str), Some("v2"));

        let err = resolve_versions(at(2023, 1, 1), &histories, &filter).unwrap_err();
        assert_eq!(err, CachePinError::no_version_found("prices", at(2023, 1, 1)));
    }

    #[test]
    fn test_entry_valid_exactly_now_is_eligible() {
        let history = prices();
        let entry = latest_version_at(&history, at(2024, 6, 1)).unwrap();
        assert_eq!(entry.version_id, "v2");
    }

    #[test]
    fn test_unordered_history() {
        let history = CollectionHistory::new("stock")
            .with_entry("v3", at(2024, 9, 1))
            .with_entry("v1", at(2024, 1, 1))
            .with_entry("v2", at(2024, 5, 1));
        let entry = latest_version_at(&history, at(2024, 8, 1)).unwrap();
        assert_eq!(entry.version_id, "v2");
    }

    #[test]
    fn test_equal_valid_from_keeps_first() {
        let history = CollectionHistory::new("stock")
            .with_entry("first", at(2024, 1, 1))
            .with_entry("second", at(2024, 1, 1));
        let entry = latest_version_at(&history, at(2024, 2, 1)).unwrap();
        assert_eq!(entry.version_id, "first");
    }

    #[test]
    fn test_never_returns_future_version() {
        let history = prices().with_entry("v9", at(2030, 1, 1));
        for now in [at(2024, 1, 1), at(2024, 5, 31), at(2025, 1, 1), at(2029, 12, 31)] {
            let entry = latest_version_at(&history, now).unwrap();
            assert!(entry.valid_from <= now);
        }
    }

    #[test]
    fn test_failure_names_only_the_future_collection() {
        let histories = vec![
            prices(),
            CollectionHistory::new("banners").with_entry("b1", at(2025, 1, 1)),
        ];
        let err = resolve_versions(at(2024, 7, 1), &histories, &VersionFilter::all()).unwrap_err();
        assert_eq!(err, CachePinError::no_version_found("banners", at(2024, 7, 1)));

        // Filtering the broken collection out resolves the rest.
        let filter = VersionFilter::all().with_cache_type("none");
        let prices_only = vec![prices().with_cache_type("none")];
        let ok = resolve_versions(at(2024, 7, 1), &prices_only, &filter).unwrap();
        assert_eq!(ok.len(), 1);
    }

    #[test]
    fn test_empty_history_is_an_error() {
        let histories = vec![CollectionHistory::new("empty")];
        let err = resolve_versions(at(2024, 1, 1), &histories, &VersionFilter::all()).unwrap_err();
        assert!(err.is_no_version_found());
    }

    #[test]
    fn test_filtered_out_collections_do_not_fail() {
        let histories = vec![
            prices().with_lock_action("checkout"),
            CollectionHistory::new("banners"),
        ];
        let versions = resolve_versions(
            at(2024, 7, 1),
            &histories,
            &VersionFilter::for_action("checkout"),
        )
        .unwrap();
        assert_eq!(versions.len(), 1);
        assert_eq!(versions["prices"], "v2");
    }

    #[test]
    fn test_fixed_wins() {
        let mut resolved = VersionMap::new();
        resolved.insert("prices".to_string(), "v2".to_string());
        resolved.insert("stock".to_string(), "v9".to_string());
        let mut fixed = VersionMap::new();
        fixed.insert("prices".to_string(), "v-pinned".to_string());

        let merged = overlay_fixed(resolved, &fixed);
        assert_eq!(merged["prices"], "v-pinned");
        assert_eq!(merged["stock"], "v9");
        assert_eq!(merged.len(), 2);
    }
}
