use anyhow::Result;
use cachepin_core::config::CachePinConfig;
use cachepin_core::request::RequestContext;
use cachepin_core::versions::{VersionFilter, VersionHistoryRepository, resolve_versions};
use cachepin_infrastructure::JsonFileVersionHistoryRepository;
use chrono::{DateTime, SubsecRound, Utc};
use std::path::PathBuf;

use super::utils::history_path;

/// Prints the version map current at `at` as JSON.
pub async fn run(
    config: &CachePinConfig,
    history: Option<PathBuf>,
    at: Option<DateTime<Utc>>,
    action: Option<String>,
    cache_type: Option<String>,
    ctx: &RequestContext,
) -> Result<()> {
    let path = history_path(config, history)?;
    let repository = JsonFileVersionHistoryRepository::new(path);

    let mut filter = match action {
        Some(action) => VersionFilter::for_action(action),
        None => VersionFilter::all(),
    };
    if let Some(cache_type) = cache_type {
        filter = filter.with_cache_type(cache_type);
    }

    let now = at.unwrap_or_else(|| Utc::now().trunc_subsecs(0));
    let histories = ctx.guard(repository.version_histories(&filter)).await?;
    let versions = resolve_versions(now, &histories, &filter)?;

    println!("{}", serde_json::to_string_pretty(&versions)?);
    Ok(())
}
