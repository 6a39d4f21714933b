//! Session domain model.
//!
//! This module contains the core Session entity: the state one request or
//! customer resolves to, including the cache-version snapshot it is pinned to.

use super::customer::CustomerStatus;
use super::metadata::{DeviceInfo, TermsApproval};
use super::order::{ActiveOrder, Otp};
use crate::versions::VersionMap;
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// Represents one session in the application's domain layer.
///
/// A session contains:
/// - The customer identity and its status
/// - An optional active order with its own pinned versions
/// - An optional OTP correlation token
/// - An optional `fake_now` overriding wall-clock time
/// - Fixed (caller-pinned) and current (frozen) cache versions
/// - Independent metadata: language, referrer, device info, terms approval
///
/// Mutation never persists anything; callers save explicitly through a
/// [`SessionRepository`](super::SessionRepository).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    id: String,
    customer_id: String,
    customer_status: CustomerStatus,
    active_order_id: Option<String>,
    active_order: Option<ActiveOrder>,
    otp_data: Option<Otp>,
    fake_now: Option<DateTime<Utc>>,
    frozen_at: Option<DateTime<Utc>>,
    fixed_cache_versions: VersionMap,
    current_cache_versions: VersionMap,
    lang: String,
    referrer: String,
    device_info: Option<DeviceInfo>,
    terms_approval: Option<TermsApproval>,
}

impl Session {
    /// Creates an empty session with no customer and no order.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            customer_id: String::new(),
            customer_status: CustomerStatus::NoCustomer,
            active_order_id: None,
            active_order: None,
            otp_data: None,
            fake_now: None,
            frozen_at: None,
            fixed_cache_versions: VersionMap::new(),
            current_cache_versions: VersionMap::new(),
            lang: String::new(),
            referrer: String::new(),
            device_info: None,
            terms_approval: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    // ============================================================================
    // Customer identity
    // ============================================================================

    /// Assigns the customer and derives the status from `is_new`.
    ///
    /// An empty `customer_id` resets the session to `NoCustomer`.
    pub fn set_customer_details(&mut self, customer_id: impl Into<String>, is_new: bool) {
        self.customer_id = customer_id.into();
        self.customer_status = CustomerStatus::for_assignment(&self.customer_id, is_new);
    }

    /// Restores a stored identity as-is, without deriving the status.
    ///
    /// Store adapters use this and then check [`Self::has_consistent_customer`].
    pub fn restore_customer(&mut self, customer_id: impl Into<String>, status: CustomerStatus) {
        self.customer_id = customer_id.into();
        self.customer_status = status;
    }

    pub fn has_consistent_customer(&self) -> bool {
        self.customer_status.is_consistent_with(&self.customer_id)
    }

    pub fn customer_id(&self) -> &str {
        &self.customer_id
    }

    pub fn customer_status(&self) -> CustomerStatus {
        self.customer_status
    }

    pub fn is_no_customer(&self) -> bool {
        self.customer_status == CustomerStatus::NoCustomer
    }

    pub fn is_customer_new(&self) -> bool {
        self.customer_status == CustomerStatus::NewCustomer
    }

    // ============================================================================
    // Active order
    // ============================================================================

    /// Attaches an already stamped order, replacing any previous one.
    pub fn attach_active_order(&mut self, order: ActiveOrder) {
        self.active_order_id = Some(order.id.clone());
        self.active_order = Some(order);
    }

    pub fn clear_active_order(&mut self) {
        self.active_order_id = None;
        self.active_order = None;
    }

    /// Records the active order id alone.
    ///
    /// Some writers store only the id; the order details, if any, are left
    /// as they are.
    pub fn set_active_order_id(&mut self, order_id: impl Into<String>) {
        self.active_order_id = Some(order_id.into());
    }

    pub fn active_order(&self) -> Option<&ActiveOrder> {
        self.active_order.as_ref()
    }

    pub fn active_order_id(&self) -> Option<&str> {
        self.active_order_id.as_deref()
    }

    // ============================================================================
    // OTP
    // ============================================================================

    pub fn set_otp_data(&mut self, uuid: impl Into<String>) {
        self.otp_data = Some(Otp { uuid: uuid.into() });
    }

    /// OTP correlation token, or an empty string when none is set.
    pub fn otp_data(&self) -> &str {
        self.otp_data.as_ref().map(|o| o.uuid.as_str()).unwrap_or("")
    }

    pub fn otp(&self) -> Option<&Otp> {
        self.otp_data.as_ref()
    }

    // ============================================================================
    // Reference time
    // ============================================================================

    pub fn set_fake_now(&mut self, fake_now: DateTime<Utc>) {
        self.fake_now = Some(fake_now);
    }

    pub fn clear_fake_now(&mut self) {
        self.fake_now = None;
    }

    pub fn fake_now(&self) -> Option<DateTime<Utc>> {
        self.fake_now
    }

    pub fn has_fake_now(&self) -> bool {
        self.fake_now.is_some()
    }

    /// Reference time for version resolution.
    ///
    /// Returns `fake_now` when set. Otherwise returns wall-clock UTC truncated
    /// to whole seconds, the granularity persisted timestamps are compared at.
    pub fn now(&self) -> DateTime<Utc> {
        match self.fake_now {
            Some(fake_now) => fake_now,
            None => Utc::now().trunc_subsecs(0),
        }
    }

    /// Reference time the current versions were last frozen at.
    pub fn frozen_at(&self) -> Option<DateTime<Utc>> {
        self.frozen_at
    }

    pub fn set_frozen_at(&mut self, frozen_at: DateTime<Utc>) {
        self.frozen_at = Some(frozen_at);
    }

    // ============================================================================
    // Cache versions
    // ============================================================================

    pub fn set_fixed_cache_versions(&mut self, versions: VersionMap) {
        self.fixed_cache_versions = versions;
    }

    /// Pins one collection to `version_id`, overriding resolution from now on.
    pub fn fix_cache_version(
        &mut self,
        collection: impl Into<String>,
        version_id: impl Into<String>,
    ) {
        self.fixed_cache_versions
            .insert(collection.into(), version_id.into());
    }

    pub fn fixed_cache_versions(&self) -> &VersionMap {
        &self.fixed_cache_versions
    }

    pub fn set_current_cache_versions(&mut self, versions: VersionMap) {
        self.current_cache_versions = versions;
    }

    pub fn current_cache_versions(&self) -> &VersionMap {
        &self.current_cache_versions
    }

    // ============================================================================
    // Metadata
    // ============================================================================

    pub fn set_lang(&mut self, lang: impl Into<String>) {
        self.lang = lang.into();
    }

    pub fn lang(&self) -> &str {
        &self.lang
    }

    pub fn set_referrer(&mut self, referrer: impl Into<String>) {
        self.referrer = referrer.into();
    }

    pub fn referrer(&self) -> &str {
        &self.referrer
    }

    pub fn set_device_info(&mut self, device_info: DeviceInfo) {
        self.device_info = Some(device_info);
    }

    pub fn device_info(&self) -> Option<&DeviceInfo> {
        self.device_info.as_ref()
    }

    pub fn set_terms_approval(&mut self, terms_approval: TermsApproval) {
        self.terms_approval = Some(terms_approval);
    }

    pub fn terms_approval(&self) -> Option<&TermsApproval> {
        self.terms_approval.as_ref()
    }
}
