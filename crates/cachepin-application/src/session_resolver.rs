//! Session resolver: the facade other services call to resolve, mutate and
//! persist the session behind a request.
//!
//! Each call follows "load → mutate → resolve versions → save" for a single
//! request. Nothing is cached between calls; the session store is the only
//! shared state, and concurrent writers to one session id are last-writer-wins.

use crate::session::SessionUpdater;
use cachepin_core::config::CachePinConfig;
use cachepin_core::error::{CachePinError, Result};
use cachepin_core::request::RequestContext;
use cachepin_core::session::{
    OrderDetails, Session, SessionRepository, freeze_versions, snapshot_versions,
};
use cachepin_core::versions::{VersionFilter, VersionHistoryRepository, VersionMap};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

/// Everything a [`SessionResolver`] is built from.
///
/// Both repositories are required; [`SessionResolver::new`] rejects a config
/// that lacks either.
#[derive(Default)]
pub struct SessionResolverConfig {
    pub session_repository: Option<Arc<dyn SessionRepository>>,
    pub version_repository: Option<Arc<dyn VersionHistoryRepository>>,
    pub settings: CachePinConfig,
}

impl SessionResolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_session_repository(mut self, repository: Arc<dyn SessionRepository>) -> Self {
        self.session_repository = Some(repository);
        self
    }

    #[must_use]
    pub fn with_version_repository(
        mut self,
        repository: Arc<dyn VersionHistoryRepository>,
    ) -> Self {
        self.version_repository = Some(repository);
        self
    }

    #[must_use]
    pub fn with_settings(mut self, settings: CachePinConfig) -> Self {
        self.settings = settings;
        self
    }
}

/// Resolves sessions from request context and pins cache versions onto them.
pub struct SessionResolver {
    sessions: Arc<dyn SessionRepository>,
    versions: Arc<dyn VersionHistoryRepository>,
    updater: SessionUpdater,
    settings: CachePinConfig,
}

impl SessionResolver {
    /// Builds a resolver from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`CachePinError::Config`] if a repository is missing.
    pub fn new(config: SessionResolverConfig) -> Result<Self> {
        let sessions = config.session_repository.ok_or_else(|| {
            CachePinError::config("cannot initialize session resolver without a session repository")
        })?;
        let versions = config.version_repository.ok_or_else(|| {
            CachePinError::config("cannot initialize session resolver without a version repository")
        })?;
        if config.settings.session_id_claim.is_empty() {
            return Err(CachePinError::config("session_id_claim must not be empty"));
        }

        Ok(Self {
            updater: SessionUpdater::new(sessions.clone()),
            sessions,
            versions,
            settings: config.settings,
        })
    }

    pub fn settings(&self) -> &CachePinConfig {
        &self.settings
    }

    // ============================================================================
    // Lookup and persistence
    // ============================================================================

    /// Creates an empty session. Nothing is persisted.
    pub fn new_session(&self, id: impl Into<String>) -> Session {
        Session::new(id)
    }

    /// Creates an empty session under a freshly minted id.
    pub fn new_session_with_generated_id(&self) -> Session {
        Session::new(Uuid::new_v4().to_string())
    }

    /// Upserts `session`, overwriting any record with the same id.
    pub async fn save_session(&self, ctx: &RequestContext, session: &Session) -> Result<()> {
        tracing::debug!(session_id = session.id(), "saving session");
        ctx.guard(self.sessions.save(session)).await
    }

    /// Loads a session by id. A miss is `Ok(None)`, not an error.
    pub async fn get_session_by_id(
        &self,
        ctx: &RequestContext,
        id: &str,
    ) -> Result<Option<Session>> {
        ctx.guard(self.sessions.find_by_id(id)).await
    }

    /// Extracts the caller's session id from the request's token data.
    pub fn current_session_id(&self, ctx: &RequestContext) -> Result<String> {
        ctx.token_string(&self.settings.session_id_claim)
    }

    /// Loads the caller's session.
    ///
    /// Unlike [`get_session_by_id`](Self::get_session_by_id), a store miss is
    /// fatal here and fails with `NotFound`.
    pub async fn get_current_session(&self, ctx: &RequestContext) -> Result<Session> {
        let session_id = self.current_session_id(ctx)?;
        self.get_session_by_id(ctx, &session_id)
            .await?
            .ok_or_else(|| CachePinError::not_found("Session", session_id))
    }

    /// Returns true exactly when no session is stored under `session_id`.
    pub async fn is_obsolete(&self, ctx: &RequestContext, session_id: &str) -> Result<bool> {
        let obsolete = self.get_session_by_id(ctx, session_id).await?.is_none();
        if obsolete {
            tracing::debug!(session_id, "session reference is obsolete");
        }
        Ok(obsolete)
    }

    // ============================================================================
    // Mutation through the store
    // ============================================================================

    /// Loads the caller's session, applies `updater` and saves the result.
    pub async fn update_current_session<F>(
        &self,
        ctx: &RequestContext,
        updater: F,
    ) -> Result<Session>
    where
        F: FnOnce(&mut Session) -> Result<()> + Send,
    {
        let session_id = self.current_session_id(ctx)?;
        self.updater.update(ctx, &session_id, updater).await
    }

    /// Loads the session `session_id`, applies `updater` and saves the result.
    pub async fn update_session<F>(
        &self,
        ctx: &RequestContext,
        session_id: &str,
        updater: F,
    ) -> Result<Session>
    where
        F: FnOnce(&mut Session) -> Result<()> + Send,
    {
        self.updater.update(ctx, session_id, updater).await
    }

    pub async fn set_customer_details(
        &self,
        ctx: &RequestContext,
        customer_id: &str,
        is_new: bool,
    ) -> Result<Session> {
        let customer_id = customer_id.to_string();
        self.update_current_session(ctx, move |session| {
            session.set_customer_details(customer_id, is_new);
            Ok(())
        })
        .await
    }

    pub async fn set_otp_data(&self, ctx: &RequestContext, uuid: &str) -> Result<Session> {
        let uuid = uuid.to_string();
        self.update_current_session(ctx, move |session| {
            session.set_otp_data(uuid);
            Ok(())
        })
        .await
    }

    pub async fn set_fake_now(
        &self,
        ctx: &RequestContext,
        fake_now: DateTime<Utc>,
    ) -> Result<Session> {
        self.update_current_session(ctx, move |session| {
            session.set_fake_now(fake_now);
            Ok(())
        })
        .await
    }

    pub async fn set_lang(&self, ctx: &RequestContext, lang: &str) -> Result<Session> {
        let lang = lang.to_string();
        self.update_current_session(ctx, move |session| {
            session.set_lang(lang);
            Ok(())
        })
        .await
    }

    // ============================================================================
    // Freezing
    // ============================================================================

    /// Computes the version set `session` would see now (fixed versions win)
    /// without touching the session or the store.
    pub async fn resolve_versions_for_session(
        &self,
        ctx: &RequestContext,
        session: &Session,
        filter: &VersionFilter,
    ) -> Result<VersionMap> {
        let histories = ctx.guard(self.versions.version_histories(filter)).await?;
        snapshot_versions(session, &histories, filter)
    }

    /// Pins every collection's current version onto `session` and saves it.
    pub async fn freeze_cache_versions_for_session(
        &self,
        ctx: &RequestContext,
        session: &mut Session,
    ) -> Result<()> {
        self.freeze_with_filter(ctx, session, &VersionFilter::all())
            .await
    }

    /// Pins only the collections locked upon `action`, keeping other pins.
    pub async fn freeze_cache_versions_for_action(
        &self,
        ctx: &RequestContext,
        session: &mut Session,
        action: &str,
    ) -> Result<()> {
        self.freeze_with_filter(ctx, session, &VersionFilter::for_action(action))
            .await
    }

    /// Refreshes every collection except the ones locked upon `action`.
    ///
    /// Pins of `action`-locked collections stay as they are. Fixed versions
    /// still win for every collection.
    pub async fn unfreeze_cache_versions_for_session(
        &self,
        ctx: &RequestContext,
        session: &mut Session,
        action: &str,
    ) -> Result<()> {
        self.freeze_with_filter(ctx, session, &VersionFilter::excluding_action(action))
            .await
    }

    async fn freeze_with_filter(
        &self,
        ctx: &RequestContext,
        session: &mut Session,
        filter: &VersionFilter,
    ) -> Result<()> {
        let histories = ctx.guard(self.versions.version_histories(filter)).await?;
        freeze_versions(session, &histories, filter)?;

        tracing::debug!(
            session_id = session.id(),
            now = %session.now(),
            collections = session.current_cache_versions().len(),
            "froze cache versions"
        );

        self.save_session(ctx, session).await
    }

    // ============================================================================
    // Active order
    // ============================================================================

    /// Attaches an order to the caller's session, stamped with the versions
    /// current right now.
    pub async fn set_active_order(
        &self,
        ctx: &RequestContext,
        details: OrderDetails,
    ) -> Result<Session> {
        let session_id = self.current_session_id(ctx)?;
        self.set_active_order_for_session(ctx, &session_id, details)
            .await
    }

    /// Attaches an order to the session `session_id`.
    ///
    /// The order keeps its stamped versions even when the session is refrozen
    /// later.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no session is stored under `session_id`.
    pub async fn set_active_order_for_session(
        &self,
        ctx: &RequestContext,
        session_id: &str,
        details: OrderDetails,
    ) -> Result<Session> {
        let mut session = self
            .get_session_by_id(ctx, session_id)
            .await?
            .ok_or_else(|| CachePinError::not_found("Session", session_id))?;

        let versions = self
            .resolve_versions_for_session(ctx, &session, &VersionFilter::all())
            .await?;

        tracing::debug!(
            session_id,
            order_id = %details.id,
            collections = versions.len(),
            "attaching active order"
        );

        session.attach_active_order(details.stamp(versions));
        self.save_session(ctx, &session).await?;
        Ok(session)
    }

    /// Id of the caller's active order, `None` when no order is attached.
    pub async fn active_order_id(&self, ctx: &RequestContext) -> Result<Option<String>> {
        let session = self.get_current_session(ctx).await?;
        Ok(session.active_order_id().map(str::to_string))
    }

    // ============================================================================
    // Context export
    // ============================================================================

    /// The version map downstream reads should use: the session's frozen
    /// versions with the active order's stamped versions laid on top.
    pub fn exported_versions(session: &Session) -> VersionMap {
        let mut versions = session.current_cache_versions().clone();
        if let Some(order) = session.active_order() {
            versions.extend(order.versions.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        versions
    }

    /// Loads the caller's session and exports its versions into a copy of `ctx`.
    pub async fn versions_from_session_to_context(
        &self,
        ctx: &RequestContext,
    ) -> Result<RequestContext> {
        let session = self.get_current_session(ctx).await?;
        self.session_versions_to_context(ctx, &session)
    }

    /// Exports the versions of an already loaded `session` into a copy of `ctx`.
    ///
    /// Use this right after a freeze in the same request so the exported set
    /// is the one just persisted. The exported reference time is the one the
    /// versions were frozen at, falling back to `session.now()` for a session
    /// that was never frozen.
    pub fn session_versions_to_context(
        &self,
        ctx: &RequestContext,
        session: &Session,
    ) -> Result<RequestContext> {
        let exported = ctx.clone().with_versions(&Self::exported_versions(session))?;
        if self.settings.export_now {
            exported.with_now(session.frozen_at().unwrap_or_else(|| session.now()))
        } else {
            Ok(exported)
        }
    }

    /// Reads the exported version map back. `None` when nothing was exported.
    pub fn versions_from_context(&self, ctx: &RequestContext) -> Result<Option<VersionMap>> {
        ctx.versions()
    }

    /// Reads one collection's pinned version from the exported context.
    ///
    /// # Errors
    ///
    /// Returns `VersionNotInContext` if the context holds no pin for it.
    pub fn version_for_collection_from_context(
        &self,
        ctx: &RequestContext,
        collection: &str,
    ) -> Result<String> {
        self.versions_from_context(ctx)?
            .and_then(|mut versions| versions.remove(collection))
            .ok_or_else(|| CachePinError::VersionNotInContext {
                collection: collection.to_string(),
            })
    }

    /// Reads the exported reference time back.
    pub fn now_from_context(&self, ctx: &RequestContext) -> Result<Option<DateTime<Utc>>> {
        ctx.now()
    }
}
