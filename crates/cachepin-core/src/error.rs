//! Error types for cachepin.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// A shared error type for every cachepin crate.
///
/// Variants are classified so callers can branch on them: lookups that miss,
/// malformed request input, version resolution failures and store I/O
/// failures. None of them are retried or defaulted inside this workspace.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CachePinError {
    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// No token data was attached to the request
    #[error("tokenDataNotFound")]
    TokenDataNotFound,

    /// Token data is present but is not a JSON object
    #[error("tokenDataNotValidJSON")]
    TokenDataNotValidJson,

    /// Token data does not contain the requested key
    #[error("valueInTokenDataNotFound: '{key}'")]
    ValueInTokenDataNotFound { key: String },

    /// Token data value exists but is not a string
    #[error("valueIsNotString: '{key}'")]
    ValueIsNotString { key: String },

    /// A collection has no version valid at or before the reference time
    #[error("No version found for collection '{collection}' at {now}")]
    NoVersionFound {
        collection: String,
        now: DateTime<Utc>,
    },

    /// The exported request context carries no pin for a collection
    #[error("Latest version for collection '{collection}' not found in context")]
    VersionNotInContext { collection: String },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Data access error (repository/storage layer)
    #[error("Data access error: {0}")]
    DataAccess(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The request scope was cancelled while a store call was in flight
    #[error("Request cancelled")]
    Cancelled,
}

impl CachePinError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a NoVersionFound error
    pub fn no_version_found(collection: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self::NoVersionFound {
            collection: collection.into(),
            now,
        }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a DataAccess error
    pub fn data_access(message: impl Into<String>) -> Self {
        Self::DataAccess(message.into())
    }

    /// Creates a JSON Serialization error
    pub fn json(message: impl Into<String>) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: message.into(),
        }
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error comes from malformed or absent token data
    pub fn is_token_data(&self) -> bool {
        matches!(
            self,
            Self::TokenDataNotFound
                | Self::TokenDataNotValidJson
                | Self::ValueInTokenDataNotFound { .. }
                | Self::ValueIsNotString { .. }
        )
    }

    /// Check if version resolution failed for lack of an applicable version
    pub fn is_no_version_found(&self) -> bool {
        matches!(self, Self::NoVersionFound { .. })
    }

    /// Check if this is a serialization error
    pub fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization { .. })
    }

    /// Check if this is a config error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Check if the request was cancelled
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for CachePinError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for CachePinError {
    fn from(err: serde_json::Error) -> Self {
        Self::json(err.to_string())
    }
}

impl From<toml::de::Error> for CachePinError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, CachePinError>`.
pub type Result<T> = std::result::Result<T, CachePinError>;
