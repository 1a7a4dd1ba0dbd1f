//! Token issuance with an Ed25519 signing key.

use ed25519_dalek::{Signer, SigningKey};
use serde::Serialize;

use crate::base64url;
use crate::key::PublicKey;

const HEADER: &str = r#"{"alg":"EdDSA","typ":"JWT"}"#;

/// Produces `header.payload.signature` tokens accepted by
/// [`Verifier`](crate::Verifier) for the matching public key.
pub struct TokenSigner {
    key: SigningKey,
}

impl TokenSigner {
    pub fn new(key: SigningKey) -> Self {
        Self { key }
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey::from_verifying_key(self.key.verifying_key())
    }

    /// Serialize `claims` as the payload under the default EdDSA header.
    pub fn sign<T: Serialize>(&self, claims: &T) -> Result<String, serde_json::Error> {
        let payload = serde_json::to_vec(claims)?;
        Ok(self.sign_segments(HEADER.as_bytes(), &payload))
    }

    /// Sign arbitrary header and payload bytes.
    pub fn sign_segments(&self, header: &[u8], payload: &[u8]) -> String {
        self.sign_encoded(&base64url::encode(header), &base64url::encode(payload))
    }

    /// Sign already-encoded segments verbatim.
    pub fn sign_encoded(&self, header: &str, payload: &str) -> String {
        let signing_input = format!("{header}.{payload}");
        let signature = self.key.sign(signing_input.as_bytes());
        format!(
            "{signing_input}.{}",
            base64url::encode(signature.to_bytes())
        )
    }
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner")
            .field("public_key", &self.public_key())
            .finish_non_exhaustive()
    }
}
