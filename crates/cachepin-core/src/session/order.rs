//! Active order and one-time-passcode types.

use crate::versions::VersionMap;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Order fields supplied by the caller when attaching an order to a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetails {
    pub id: String,
    pub sub_service_type: String,
    pub store_id: String,
    /// Instant until which the order stays valid
    pub time_to: DateTime<Utc>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl OrderDetails {
    /// Stamps the order with the version set current at attachment time.
    pub fn stamp(self, versions: VersionMap) -> ActiveOrder {
        ActiveOrder {
            id: self.id,
            sub_service_type: self.sub_service_type,
            store_id: self.store_id,
            time_to: self.time_to,
            tags: self.tags,
            versions,
        }
    }
}

/// An order attached to a session.
///
/// `versions` is pinned when the order is attached and does not follow later
/// freezes of the owning session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveOrder {
    pub id: String,
    pub sub_service_type: String,
    pub store_id: String,
    pub time_to: DateTime<Utc>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub versions: VersionMap,
}

/// One-time-passcode correlation token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Otp {
    pub uuid: String,
}
