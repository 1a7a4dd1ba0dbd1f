//! Claims decoded from an authenticated payload.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::error::AuthError;

/// Validated claim set.
///
/// `exp` and `sub` are interpreted; `iat` is parsed when present but never
/// enforced. Every other claim is kept untouched in `extra`.
#[derive(Debug, Clone, PartialEq)]
pub struct Claims {
    pub subject: Option<String>,
    pub expires_at: DateTime<Utc>,
    pub issued_at: Option<DateTime<Utc>>,
    pub extra: Map<String, Value>,
}

impl Claims {
    /// Parse the decoded payload bytes. Must only be called on bytes whose
    /// signature has already been verified.
    pub(crate) fn from_payload(payload: &[u8]) -> Result<Self, AuthError> {
        let mut object = match serde_json::from_slice::<Value>(payload) {
            Ok(Value::Object(object)) => object,
            Ok(_) => return Err(AuthError::malformed("payload is not a JSON object")),
            Err(err) => return Err(AuthError::malformed(format!("payload: {err}"))),
        };

        let exp = object.remove("exp").ok_or(AuthError::MissingExpiryClaim)?;
        let expires_at = timestamp_claim("exp", &exp)?;

        let subject = match object.remove("sub") {
            None => None,
            Some(Value::String(subject)) => Some(subject),
            Some(_) => return Err(AuthError::malformed("'sub' claim must be a string")),
        };

        let issued_at = object
            .remove("iat")
            .map(|iat| timestamp_claim("iat", &iat))
            .transpose()?;

        Ok(Self {
            subject,
            expires_at,
            issued_at,
            extra: object,
        })
    }

    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    /// Expired only when `exp` is strictly earlier than `now`, compared at
    /// second resolution.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.timestamp() < now.timestamp()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.extra.get(name)
    }
}

fn timestamp_claim(name: &str, value: &Value) -> Result<DateTime<Utc>, AuthError> {
    let seconds = value
        .as_i64()
        .ok_or_else(|| AuthError::malformed(format!("'{name}' claim must be an integer")))?;
    DateTime::from_timestamp(seconds, 0)
        .ok_or_else(|| AuthError::malformed(format!("'{name}' claim is out of range")))
}
