//! Request-scoped handle threaded explicitly through resolver calls.
//!
//! The handle carries what arrives with a request (token data, cancellation)
//! and what the resolver exports for downstream collaborators (the pinned
//! version map and the reference time), each under a well-known key.

use super::token::TokenData;
use crate::error::{CachePinError, Result};
use crate::versions::VersionMap;
use chrono::{DateTime, Utc};
use std::future::Future;
use tokio_util::sync::CancellationToken;

/// Key of the raw token data set by the authentication layer.
pub const TOKEN_DATA_KEY: &str = "tokenData";
/// Key of the exported version map (JSON object, collection → version id).
pub const DATA_VERSIONS_KEY: &str = "versions";
/// Key of the exported reference time (JSON-encoded timestamp string).
pub const DATA_NOW_KEY: &str = "now";

#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    token_data: Option<String>,
    versions: Option<String>,
    now: Option<String>,
    cancellation: CancellationToken,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a context from well-known key/value pairs, e.g. forwarded
    /// headers on the receiving side. Unknown keys are ignored.
    pub fn from_values<K, V>(values: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut ctx = Self::new();
        for (key, value) in values {
            let value = Some(value.as_ref().to_string());
            match key.as_ref() {
                TOKEN_DATA_KEY => ctx.token_data = value,
                DATA_VERSIONS_KEY => ctx.versions = value,
                DATA_NOW_KEY => ctx.now = value,
                _ => {}
            }
        }
        ctx
    }

    #[must_use]
    pub fn with_token_data(mut self, token_data: impl Into<String>) -> Self {
        self.token_data = Some(token_data.into());
        self
    }

    #[must_use]
    pub fn with_cancellation(mut self, cancellation: CancellationToken) -> Self {
        self.cancellation = cancellation;
        self
    }

    // ============================================================================
    // Incoming token data
    // ============================================================================

    pub fn raw_token_data(&self) -> Option<&str> {
        self.token_data.as_deref()
    }

    pub fn token_data(&self) -> Result<TokenData> {
        TokenData::parse(self.raw_token_data())
    }

    /// Looks up a string value in the token data.
    pub fn token_string(&self, key: &str) -> Result<String> {
        self.token_data()?.string_value(key).map(str::to_string)
    }

    // ============================================================================
    // Exported versions and reference time
    // ============================================================================

    /// Returns a copy carrying `versions` under [`DATA_VERSIONS_KEY`].
    ///
    /// The value is encoded before anything is assigned, so a failure leaves
    /// no partial value behind.
    pub fn with_versions(mut self, versions: &VersionMap) -> Result<Self> {
        let encoded = serde_json::to_string(versions)?;
        self.versions = Some(encoded);
        Ok(self)
    }

    /// Returns a copy carrying `now` under [`DATA_NOW_KEY`].
    pub fn with_now(mut self, now: DateTime<Utc>) -> Result<Self> {
        let encoded = serde_json::to_string(&now)?;
        self.now = Some(encoded);
        Ok(self)
    }

    /// Decodes the exported version map, `None` if nothing was exported.
    pub fn versions(&self) -> Result<Option<VersionMap>> {
        match &self.versions {
            None => Ok(None),
            Some(raw) => Ok(Some(serde_json::from_str(raw)?)),
        }
    }

    /// Decodes the exported reference time, `None` if nothing was exported.
    pub fn now(&self) -> Result<Option<DateTime<Utc>>> {
        match &self.now {
            None => Ok(None),
            Some(raw) => Ok(Some(serde_json::from_str(raw)?)),
        }
    }

    /// The exported key/value pairs, verbatim, for handing downstream.
    pub fn exported_values(&self) -> Vec<(&'static str, &str)> {
        let mut values = Vec::new();
        if let Some(versions) = &self.versions {
            values.push((DATA_VERSIONS_KEY, versions.as_str()));
        }
        if let Some(now) = &self.now {
            values.push((DATA_NOW_KEY, now.as_str()));
        }
        values
    }

    // ============================================================================
    // Cancellation
    // ============================================================================

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// Runs a store call, failing with [`CachePinError::Cancelled`] as soon as
    /// the request scope is cancelled.
    pub async fn guard<T, F>(&self, call: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        tokio::select! {
            biased;
            _ = self.cancellation.cancelled() => {
                tracing::warn!("request cancelled while waiting on a store call");
                Err(CachePinError::Cancelled)
            }
            result = call => result,
        }
    }
}
