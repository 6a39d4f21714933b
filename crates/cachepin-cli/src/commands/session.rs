use anyhow::{Context, Result};
use cachepin_core::config::CachePinConfig;
use cachepin_core::request::RequestContext;
use cachepin_infrastructure::dto::{create_session_migrator, encode_session};
use chrono::{DateTime, Utc};
use std::path::PathBuf;

use super::utils::{build_resolver, history_path};

pub async fn create(
    config: &CachePinConfig,
    id: Option<String>,
    fake_now: Option<DateTime<Utc>>,
    ctx: &RequestContext,
) -> Result<()> {
    let resolver = build_resolver(config, None).await?;
    let mut session = match id {
        Some(id) => resolver.new_session(id),
        None => resolver.new_session_with_generated_id(),
    };
    if let Some(fake_now) = fake_now {
        session.set_fake_now(fake_now);
    }

    resolver.save_session(ctx, &session).await?;
    println!("{}", session.id());
    Ok(())
}

pub async fn show(config: &CachePinConfig, id: &str, ctx: &RequestContext) -> Result<()> {
    let resolver = build_resolver(config, None).await?;
    let session = resolver
        .get_session_by_id(ctx, id)
        .await?
        .with_context(|| format!("Session not found: {}", id))?;

    let record: serde_json::Value =
        serde_json::from_str(&encode_session(&create_session_migrator(), &session)?)?;
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

/// Freezes all collections, or only the ones locked upon `action`.
pub async fn freeze(
    config: &CachePinConfig,
    id: &str,
    action: Option<String>,
    history: Option<PathBuf>,
    ctx: &RequestContext,
) -> Result<()> {
    let history = history_path(config, history)?;
    let resolver = build_resolver(config, Some(history)).await?;
    let mut session = resolver
        .get_session_by_id(ctx, id)
        .await?
        .with_context(|| format!("Session not found: {}", id))?;

    match action {
        Some(action) => {
            resolver
                .freeze_cache_versions_for_action(ctx, &mut session, &action)
                .await?
        }
        None => {
            resolver
                .freeze_cache_versions_for_session(ctx, &mut session)
                .await?
        }
    }

    println!(
        "{}",
        serde_json::to_string_pretty(session.current_cache_versions())?
    );
    Ok(())
}

pub async fn unfreeze(
    config: &CachePinConfig,
    id: &str,
    action: &str,
    history: Option<PathBuf>,
    ctx: &RequestContext,
) -> Result<()> {
    let history = history_path(config, history)?;
    let resolver = build_resolver(config, Some(history)).await?;
    let mut session = resolver
        .get_session_by_id(ctx, id)
        .await?
        .with_context(|| format!("Session not found: {}", id))?;

    resolver
        .unfreeze_cache_versions_for_session(ctx, &mut session, action)
        .await?;

    println!(
        "{}",
        serde_json::to_string_pretty(session.current_cache_versions())?
    );
    Ok(())
}

pub async fn obsolete(config: &CachePinConfig, id: &str, ctx: &RequestContext) -> Result<()> {
    let resolver = build_resolver(config, None).await?;
    println!("{}", resolver.is_obsolete(ctx, id).await?);
    Ok(())
}
