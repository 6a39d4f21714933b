//! Freezing cache versions onto a session.
//!
//! These functions hold the merge rule shared by freeze, unfreeze and order
//! stamping: resolve at the session's reference time, then lay the session's
//! fixed versions on top.

use super::model::Session;
use crate::error::Result;
use crate::versions::{
    CollectionHistory, VersionFilter, VersionMap, overlay_fixed, resolve_versions,
};

/// Computes the version set `session` would see right now, without mutating it.
///
/// # Errors
///
/// Returns `NoVersionFound` if a selected collection has no applicable version.
pub fn snapshot_versions(
    session: &Session,
    histories: &[CollectionHistory],
    filter: &VersionFilter,
) -> Result<VersionMap> {
    let resolved = resolve_versions(session.now(), histories, filter)?;
    Ok(overlay_fixed(resolved, session.fixed_cache_versions()))
}

/// Freezes the versions selected by `filter` onto `session`.
///
/// An unfiltered freeze replaces `current_cache_versions` wholesale. A
/// filtered freeze rewrites only the selected collections and keeps the other
/// pins. Fixed versions win in both cases. The reference time used is kept
/// as the session's `frozen_at`. The session is left untouched on error.
pub fn freeze_versions(
    session: &mut Session,
    histories: &[CollectionHistory],
    filter: &VersionFilter,
) -> Result<()> {
    let now = session.now();
    let resolved = resolve_versions(now, histories, filter)?;

    let mut versions = if filter.is_unfiltered() {
        VersionMap::new()
    } else {
        session.current_cache_versions().clone()
    };
    versions.extend(resolved);

    let versions = overlay_fixed(versions, session.fixed_cache_versions());
    session.set_current_cache_versions(versions);
    session.set_frozen_at(now);
    Ok(())
}
