//! Ed25519 public key material and its JWK descriptor.

use ed25519_dalek::{Signature, VerifyingKey, PUBLIC_KEY_LENGTH};
use serde::{Deserialize, Serialize};

use crate::base64url;
use crate::error::AuthError;

/// Descriptor of the key that signs `center` tokens.
pub const CENTER_JWK: &str = r#"{
    "kty": "OKP",
    "crv": "Ed25519",
    "kid": "center",
    "x": "YMnORlpGq-K8clpvw3Uu82yT-81CNgixZlnIwKpJVx4"
}"#;

/// JSON Web Key describing an Ed25519 public key.
///
/// Only `x` carries key material. `kty`, `crv` and `kid` are accepted as-is
/// and never validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Jwk {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kty: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crv: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
    pub x: String,
}

impl Jwk {
    /// The descriptor from [`CENTER_JWK`].
    pub fn center() -> Self {
        Self {
            kty: Some("OKP".to_string()),
            crv: Some("Ed25519".to_string()),
            kid: Some("center".to_string()),
            x: "YMnORlpGq-K8clpvw3Uu82yT-81CNgixZlnIwKpJVx4".to_string(),
        }
    }

    /// Describe raw key bytes as an OKP/Ed25519 descriptor.
    pub fn from_bytes(bytes: &[u8], kid: Option<String>) -> Self {
        Self {
            kty: Some("OKP".to_string()),
            crv: Some("Ed25519".to_string()),
            kid,
            x: base64url::encode(bytes),
        }
    }
}

/// Imported Ed25519 public key.
///
/// Construction validates length and curve membership, so a `PublicKey`
/// value is always usable for verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    key: VerifyingKey,
    kid: Option<String>,
}

impl PublicKey {
    /// Import raw key bytes. Anything other than 32 bytes encoding a valid
    /// curve point is rejected.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AuthError> {
        let raw: [u8; PUBLIC_KEY_LENGTH] = bytes.try_into().map_err(|_| {
            AuthError::InvalidKeyMaterial(format!(
                "expected {PUBLIC_KEY_LENGTH} bytes, got {}",
                bytes.len()
            ))
        })?;
        let key = VerifyingKey::from_bytes(&raw)
            .map_err(|err| AuthError::InvalidKeyMaterial(err.to_string()))?;
        Ok(Self { key, kid: None })
    }

    pub fn from_jwk(jwk: &Jwk) -> Result<Self, AuthError> {
        let bytes = base64url::decode(&jwk.x)
            .map_err(|err| AuthError::InvalidKeyMaterial(format!("'x': {err}")))?;
        let mut key = Self::from_bytes(&bytes)?;
        key.kid = jwk.kid.clone();
        Ok(key)
    }

    pub fn from_jwk_json(json: &str) -> Result<Self, AuthError> {
        let jwk: Jwk = serde_json::from_str(json)
            .map_err(|err| AuthError::InvalidKeyMaterial(format!("key descriptor: {err}")))?;
        Self::from_jwk(&jwk)
    }

    pub(crate) fn from_verifying_key(key: VerifyingKey) -> Self {
        Self { key, kid: None }
    }

    pub fn kid(&self) -> Option<&str> {
        self.kid.as_deref()
    }

    pub fn to_bytes(&self) -> [u8; PUBLIC_KEY_LENGTH] {
        self.key.to_bytes()
    }

    pub fn to_jwk(&self) -> Jwk {
        Jwk::from_bytes(&self.to_bytes(), self.kid.clone())
    }

    /// Strict Ed25519 verification of `signature` over `message`.
    pub(crate) fn verify(&self, message: &[u8], signature: &Signature) -> Result<(), AuthError> {
        self.key
            .verify_strict(message, signature)
            .map_err(|_| AuthError::SignatureMismatch)
    }
}
