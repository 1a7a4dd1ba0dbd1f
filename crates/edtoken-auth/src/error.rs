use chrono::{DateTime, Utc};
use thiserror::Error;

/// Reason a token or key was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Wrong segment count, bad Base64Url in a segment or an unusable payload.
    #[error("malformed token: {0}")]
    MalformedToken(String),
    /// Public key bytes that cannot be imported as an Ed25519 key.
    #[error("invalid key material: {0}")]
    InvalidKeyMaterial(String),
    #[error("signature must be 64 bytes, got {0}")]
    InvalidSignatureFormat(usize),
    #[error("token signature verification failed")]
    SignatureMismatch,
    #[error("token does not contain an 'exp' claim")]
    MissingExpiryClaim,
    #[error("token expired at {expired_at}")]
    TokenExpired { expired_at: DateTime<Utc> },
}

/// Payload-free discriminant of [`AuthError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MalformedToken,
    InvalidKeyMaterial,
    InvalidSignatureFormat,
    SignatureMismatch,
    MissingExpiryClaim,
    TokenExpired,
}

impl AuthError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        AuthError::MalformedToken(reason.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::MalformedToken(_) => ErrorKind::MalformedToken,
            AuthError::InvalidKeyMaterial(_) => ErrorKind::InvalidKeyMaterial,
            AuthError::InvalidSignatureFormat(_) => ErrorKind::InvalidSignatureFormat,
            AuthError::SignatureMismatch => ErrorKind::SignatureMismatch,
            AuthError::MissingExpiryClaim => ErrorKind::MissingExpiryClaim,
            AuthError::TokenExpired { .. } => ErrorKind::TokenExpired,
        }
    }
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::MalformedToken => "malformed_token",
            ErrorKind::InvalidKeyMaterial => "invalid_key_material",
            ErrorKind::InvalidSignatureFormat => "invalid_signature_format",
            ErrorKind::SignatureMismatch => "signature_mismatch",
            ErrorKind::MissingExpiryClaim => "missing_expiry_claim",
            ErrorKind::TokenExpired => "token_expired",
        }
    }
}
