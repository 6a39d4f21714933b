//! Token data issued by the authentication layer.

use crate::error::{CachePinError, Result};
use serde_json::{Map, Value};

/// The JSON object the authentication layer attaches to a request.
///
/// Only string lookups are needed here; the token's issuance and signature
/// checks happen upstream.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenData {
    claims: Map<String, Value>,
}

impl TokenData {
    /// Parses raw token data.
    ///
    /// # Errors
    ///
    /// - [`CachePinError::TokenDataNotFound`] if `raw` is `None`
    /// - [`CachePinError::TokenDataNotValidJson`] if `raw` is not a JSON object
    pub fn parse(raw: Option<&str>) -> Result<Self> {
        let raw = raw.ok_or(CachePinError::TokenDataNotFound)?;
        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(claims)) => Ok(Self { claims }),
            _ => Err(CachePinError::TokenDataNotValidJson),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.claims.get(key)
    }

    /// Looks up a string value.
    ///
    /// # Errors
    ///
    /// - [`CachePinError::ValueInTokenDataNotFound`] if `key` is absent
    /// - [`CachePinError::ValueIsNotString`] if the value is not a string
    pub fn string_value(&self, key: &str) -> Result<&str> {
        let value = self
            .claims
            .get(key)
            .ok_or_else(|| CachePinError::ValueInTokenDataNotFound {
                key: key.to_string(),
            })?;
        value.as_str().ok_or_else(|| CachePinError::ValueIsNotString {
            key: key.to_string(),
        })
    }
}
