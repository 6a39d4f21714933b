//! Session record DTOs and migrations.

use cachepin_core::error::{CachePinError, Result};
use cachepin_core::session::{
    ActiveOrder, CustomerStatus, DeviceInfo, Otp, Session, TermsApproval,
};
use cachepin_core::versions::VersionMap;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use version_migrate::{FromDomain, IntoDomain, MigratesTo, Migrator, Versioned};

/// Entity name session records are registered under.
pub const SESSION_ENTITY: &str = "session";

/// Schema version written into every session record.
pub const SESSION_RECORD_VERSION: &str = "1.1.0";

/// Version assumed for records written before the `version` key existed.
const UNVERSIONED_RECORD_VERSION: &str = "1.0.0";

/// Session record V1.0.0.
///
/// Optional parts are omitted when absent and decode back to `None`, never to
/// a zero value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.0.0")]
#[serde(rename_all = "camelCase")]
pub struct SessionRecordV1_0_0 {
    pub id: String,
    #[serde(default)]
    pub customer_id: String,
    #[serde(default)]
    pub customer_status: CustomerStatus,
    /// May be present without `active_order`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_order_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_order: Option<ActiveOrder>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fake_now: Option<DateTime<Utc>>,
    #[serde(default)]
    pub fixed_cache_versions: VersionMap,
    #[serde(default)]
    pub current_cache_versions: VersionMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub otp_data: Option<Otp>,
    #[serde(default)]
    pub lang: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_info: Option<DeviceInfo>,
    #[serde(default)]
    pub referrer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terms_approval: Option<TermsApproval>,
}

/// Session record V1.1.0 (added `frozenAt`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.1.0")]
#[serde(rename_all = "camelCase")]
pub struct SessionRecordV1_1_0 {
    pub id: String,
    #[serde(default)]
    pub customer_id: String,
    #[serde(default)]
    pub customer_status: CustomerStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_order_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_order: Option<ActiveOrder>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fake_now: Option<DateTime<Utc>>,
    /// Reference time of the last freeze
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frozen_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub fixed_cache_versions: VersionMap,
    #[serde(default)]
    pub current_cache_versions: VersionMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub otp_data: Option<Otp>,
    #[serde(default)]
    pub lang: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_info: Option<DeviceInfo>,
    #[serde(default)]
    pub referrer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terms_approval: Option<TermsApproval>,
}

/// Type alias for the latest session record version.
pub type SessionRecord = SessionRecordV1_1_0;

// ============================================================================
// Migration implementations
// ============================================================================

/// Migration from V1.0.0 to V1.1.0: older records were never frozen with a
/// recorded reference time.
impl MigratesTo<SessionRecordV1_1_0> for SessionRecordV1_0_0 {
    fn migrate(self) -> SessionRecordV1_1_0 {
        SessionRecordV1_1_0 {
            id: self.id,
            customer_id: self.customer_id,
            customer_status: self.customer_status,
            active_order_id: self.active_order_id,
            active_order: self.active_order,
            fake_now: self.fake_now,
            frozen_at: None,
            fixed_cache_versions: self.fixed_cache_versions,
            current_cache_versions: self.current_cache_versions,
            otp_data: self.otp_data,
            lang: self.lang,
            device_info: self.device_info,
            referrer: self.referrer,
            terms_approval: self.terms_approval,
        }
    }
}

// ============================================================================
// Domain model conversions
// ============================================================================

/// Convert SessionRecordV1_1_0 to the domain model.
///
/// The customer identity is restored as stored; callers reject records whose
/// status contradicts the id (see [`decode_session`]).
impl IntoDomain<Session> for SessionRecordV1_1_0 {
    fn into_domain(self) -> Session {
        let mut session = Session::new(self.id);
        session.restore_customer(self.customer_id, self.customer_status);
        if let Some(order) = self.active_order {
            session.attach_active_order(order);
        }
        // A stored id wins over the one derived from the order details.
        if let Some(order_id) = self.active_order_id {
            session.set_active_order_id(order_id);
        }
        if let Some(fake_now) = self.fake_now {
            session.set_fake_now(fake_now);
        }
        if let Some(frozen_at) = self.frozen_at {
            session.set_frozen_at(frozen_at);
        }
        session.set_fixed_cache_versions(self.fixed_cache_versions);
        session.set_current_cache_versions(self.current_cache_versions);
        if let Some(otp) = self.otp_data {
            session.set_otp_data(otp.uuid);
        }
        session.set_lang(self.lang);
        if let Some(device_info) = self.device_info {
            session.set_device_info(device_info);
        }
        session.set_referrer(self.referrer);
        if let Some(terms_approval) = self.terms_approval {
            session.set_terms_approval(terms_approval);
        }
        session
    }
}

/// Convert the domain model to SessionRecordV1_1_0 for persistence.
impl FromDomain<Session> for SessionRecordV1_1_0 {
    fn from_domain(session: Session) -> Self {
        Self {
            id: session.id().to_string(),
            customer_id: session.customer_id().to_string(),
            customer_status: session.customer_status(),
            active_order_id: session.active_order_id().map(str::to_string),
            active_order: session.active_order().cloned(),
            fake_now: session.fake_now(),
            frozen_at: session.frozen_at(),
            fixed_cache_versions: session.fixed_cache_versions().clone(),
            current_cache_versions: session.current_cache_versions().clone(),
            otp_data: session.otp().cloned(),
            lang: session.lang().to_string(),
            device_info: session.device_info().cloned(),
            referrer: session.referrer().to_string(),
            terms_approval: session.terms_approval().cloned(),
        }
    }
}

// ============================================================================
// Migrator factory
// ============================================================================

/// Creates and configures a Migrator instance for session records.
///
/// # Migration Path
///
/// - V1.0.0 → V1.1.0: Adds `frozenAt` (absent)
/// - V1.1.0 → Session: Converts the record to the domain model
pub fn create_session_migrator() -> Migrator {
    let mut migrator = Migrator::builder().build();

    let session_path = Migrator::define(SESSION_ENTITY)
        .from::<SessionRecordV1_0_0>()
        .step::<SessionRecordV1_1_0>()
        .into_with_save::<Session>();

    migrator
        .register(session_path)
        .expect("Failed to register session migration path");

    migrator
}

/// Rejects a loaded session whose customer status contradicts its id.
pub fn check_restored_session(session: Session) -> Result<Session> {
    if session.has_consistent_customer() {
        Ok(session)
    } else {
        Err(CachePinError::json(format!(
            "session '{}' has customer status {:?} for customer id '{}'",
            session.id(),
            session.customer_status(),
            session.customer_id()
        )))
    }
}

/// Encodes a session as a flat JSON record carrying its `version`.
pub fn encode_session(migrator: &Migrator, session: &Session) -> Result<String> {
    migrator
        .save_domain_flat(SESSION_ENTITY, session)
        .map_err(|e| {
            CachePinError::json(format!("failed to encode session '{}': {}", session.id(), e))
        })
}

/// Decodes a JSON record into a session, migrating older versions.
///
/// A record without a `version` key is read as V1.0.0.
pub fn decode_session(migrator: &Migrator, json: &str) -> Result<Session> {
    let mut value: serde_json::Value = serde_json::from_str(json)?;
    if let Some(record) = value.as_object_mut() {
        record
            .entry("version")
            .or_insert_with(|| UNVERSIONED_RECORD_VERSION.into());
    }
    let session: Session = migrator
        .load_flat_from(SESSION_ENTITY, value)
        .map_err(|e| CachePinError::json(format!("failed to migrate session record: {}", e)))?;
    check_restored_session(session)
}
