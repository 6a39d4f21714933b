use anyhow::{Context, Result};
use cachepin_application::{SessionResolver, SessionResolverConfig};
use cachepin_core::config::CachePinConfig;
use cachepin_infrastructure::{
    CachePinPaths, InMemoryVersionHistoryRepository, JsonDirSessionRepository,
    JsonFileVersionHistoryRepository,
};
use std::path::PathBuf;
use std::sync::Arc;

/// Picks the history document: the command-line flag wins over `history_file`.
pub fn history_path(config: &CachePinConfig, flag: Option<PathBuf>) -> Result<PathBuf> {
    flag.or_else(|| config.history_file.clone()).context(
        "No version history file. Pass --history or set history_file in the config.",
    )
}

/// Base directory of the session store: `store_dir`, else the platform data dir.
pub fn store_dir(config: &CachePinConfig) -> Result<PathBuf> {
    match &config.store_dir {
        Some(dir) => Ok(dir.clone()),
        None => Ok(CachePinPaths::data_dir()?),
    }
}

/// Builds a resolver over the directory store.
///
/// Commands that never resolve versions pass `history: None` and get an empty
/// in-memory history store instead of requiring a file.
pub async fn build_resolver(
    config: &CachePinConfig,
    history: Option<PathBuf>,
) -> Result<SessionResolver> {
    let base_dir = store_dir(config)?;
    let sessions = JsonDirSessionRepository::new(&base_dir, &config.session_collection)
        .await
        .with_context(|| format!("Failed to open session store at {}", base_dir.display()))?;

    let resolver_config = SessionResolverConfig::new()
        .with_session_repository(Arc::new(sessions))
        .with_settings(config.clone());
    let resolver_config = match history {
        Some(path) => resolver_config
            .with_version_repository(Arc::new(JsonFileVersionHistoryRepository::new(path))),
        None => resolver_config
            .with_version_repository(Arc::new(InMemoryVersionHistoryRepository::new(Vec::new()))),
    };

    Ok(SessionResolver::new(resolver_config)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_flag_wins_over_config() {
        let config = CachePinConfig {
            history_file: Some(PathBuf::from("/etc/cachepin/history.json")),
            ..CachePinConfig::default()
        };
        let flag = Some(PathBuf::from("local.json"));
        assert_eq!(
            history_path(&config, flag).unwrap(),
            PathBuf::from("local.json")
        );
        assert_eq!(
            history_path(&config, None).unwrap(),
            PathBuf::from("/etc/cachepin/history.json")
        );
        assert!(history_path(&CachePinConfig::default(), None).is_err());
    }

    #[tokio::test]
    async fn test_build_resolver_in_configured_store_dir() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config = CachePinConfig {
            store_dir: Some(temp_dir.path().to_path_buf()),
            ..CachePinConfig::default()
        };
        let resolver = build_resolver(&config, None).await.unwrap();
        let ctx = cachepin_core::request::RequestContext::new();
        resolver
            .save_session(&ctx, &resolver.new_session("s-1"))
            .await
            .unwrap();

        let reopened = build_resolver(&config, None).await.unwrap();
        let loaded = reopened.get_session_by_id(&ctx, "s-1").await.unwrap();
        assert_eq!(loaded.unwrap().id(), "s-1");
    }
}
