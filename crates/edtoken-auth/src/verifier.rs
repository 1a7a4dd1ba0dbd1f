//! Token verification against a single Ed25519 public key.
//!
//! Each call walks `split -> decode signature -> verify signature -> decode
//! payload -> check expiry` and stops at the first failure. Claim content is
//! never inspected before the signature over `header.payload` has been
//! verified.

use chrono::{DateTime, Utc};
use ed25519_dalek::{Signature, SIGNATURE_LENGTH};

use crate::base64url;
use crate::claims::Claims;
use crate::error::AuthError;
use crate::key::PublicKey;

/// Verify `token` against a borrowed `key` using the current wall-clock time.
pub fn verify(token: &str, key: &PublicKey) -> Result<Claims, AuthError> {
    verify_with(key, token, Utc::now())
}

/// Stateless verifier holding an immutable public key.
///
/// Cheap to clone and safe to share between threads; calls never block or
/// perform I/O.
#[derive(Debug, Clone)]
pub struct Verifier {
    key: PublicKey,
}

impl Verifier {
    pub fn new(key: PublicKey) -> Self {
        Self { key }
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.key
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify `token` treating `now` as the current time for the expiry check.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, AuthError> {
        verify_with(&self.key, token, now)
    }
}

fn verify_with(key: &PublicKey, token: &str, now: DateTime<Utc>) -> Result<Claims, AuthError> {
    let outcome = check(key, token, now);
    match &outcome {
        Ok(claims) => tracing::debug!(
            kid = key.kid(),
            subject = claims.subject(),
            expires_at = %claims.expires_at,
            "token accepted"
        ),
        Err(err) => tracing::debug!(
            kid = key.kid(),
            reason = err.kind().as_str(),
            error = %err,
            "token rejected"
        ),
    }
    outcome
}

fn check(key: &PublicKey, token: &str, now: DateTime<Utc>) -> Result<Claims, AuthError> {
    let segments = Segments::split(token)?;
    let signature = decode_signature(segments.signature)?;
    key.verify(segments.signing_input().as_bytes(), &signature)?;

    let payload = base64url::decode(segments.payload)
        .map_err(|err| AuthError::malformed(format!("payload segment: {err}")))?;
    let claims = Claims::from_payload(&payload)?;

    if claims.is_expired_at(now) {
        return Err(AuthError::TokenExpired {
            expired_at: claims.expires_at,
        });
    }

    Ok(claims)
}

struct Segments<'a> {
    header: &'a str,
    payload: &'a str,
    signature: &'a str,
}

impl<'a> Segments<'a> {
    fn split(token: &'a str) -> Result<Self, AuthError> {
        let parts: Vec<&str> = token.trim().split('.').collect();
        let &[header, payload, signature] = parts.as_slice() else {
            return Err(AuthError::malformed(format!(
                "expected 3 segments, found {}",
                parts.len()
            )));
        };
        if header.is_empty() || payload.is_empty() || signature.is_empty() {
            return Err(AuthError::malformed("empty segment"));
        }
        Ok(Self {
            header,
            payload,
            signature,
        })
    }

    /// The original encoded segments joined by a dot, not the decoded bytes.
    fn signing_input(&self) -> String {
        format!("{}.{}", self.header, self.payload)
    }
}

fn decode_signature(segment: &str) -> Result<Signature, AuthError> {
    let bytes = base64url::decode(segment)
        .map_err(|err| AuthError::malformed(format!("signature segment: {err}")))?;
    let raw: [u8; SIGNATURE_LENGTH] = bytes
        .as_slice()
        .try_into()
        .map_err(|_| AuthError::InvalidSignatureFormat(bytes.len()))?;
    Ok(Signature::from_bytes(&raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signer::TokenSigner;
    use ed25519_dalek::SigningKey;
    use serde_json::json;

    const NOW: i64 = 1_700_000_000;

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(NOW, 0).unwrap()
    }

    fn signer() -> TokenSigner {
        TokenSigner::new(SigningKey::from_bytes(&[42u8; 32]))
    }

    fn verifier(signer: &TokenSigner) -> Verifier {
        Verifier::new(signer.public_key())
    }

    #[test]
    fn accepts_valid_token() {
        let signer = signer();
        let token = signer
            .sign(&json!({ "sub": "center", "exp": NOW + 60 }))
            .unwrap();
        let claims = verifier(&signer).verify_at(&token, now()).unwrap();
        assert_eq!(claims.subject(), Some("center"));
        assert_eq!(claims.expires_at.timestamp(), NOW + 60);
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let signer = signer();
        let token = signer.sign(&json!({ "exp": NOW })).unwrap();
        let padded = format!("  {token}\n");
        assert!(verifier(&signer).verify_at(&padded, now()).is_ok());
    }

    #[test]
    fn rejects_bad_segment_counts() {
        let verifier = verifier(&signer());
        for token in ["", "   ", "abc", "a.b", "a.b.c.d", "..", "a..c", ".b.c", "a.b.", "a.b.c."] {
            let err = verifier.verify_at(token, now()).unwrap_err();
            assert!(
                matches!(err, AuthError::MalformedToken(_)),
                "{token:?}: {err:?}"
            );
        }
    }

    #[test]
    fn undecodable_signature_is_malformed() {
        let verifier = verifier(&signer());
        let err = verifier.verify_at("e30.e30.a", now()).unwrap_err();
        assert!(matches!(err, AuthError::MalformedToken(_)));
        let err = verifier.verify_at("e30.e30.!!!!", now()).unwrap_err();
        assert!(matches!(err, AuthError::MalformedToken(_)));
    }

    #[test]
    fn short_signature_is_invalid_format() {
        let verifier = verifier(&signer());
        let short = base64url::encode([0u8; 63]);
        let err = verifier
            .verify_at(&format!("e30.e30.{short}"), now())
            .unwrap_err();
        assert_eq!(err, AuthError::InvalidSignatureFormat(63));
    }

    #[test]
    fn signature_is_checked_before_payload() {
        let signer = signer();
        let token = signer.sign(&json!({ "exp": NOW })).unwrap();
        let (_, signature) = token.rsplit_once('.').unwrap();

        // Garbage payload that would fail to decode if it were read first.
        let forged = format!("e30.%%%%.{signature}");
        let err = verifier(&signer).verify_at(&forged, now()).unwrap_err();
        assert_eq!(err, AuthError::SignatureMismatch);
    }

    #[test]
    fn missing_exp_after_valid_signature() {
        let signer = signer();
        let token = signer.sign(&json!({ "sub": "center" })).unwrap();
        assert_eq!(
            verifier(&signer).verify_at(&token, now()),
            Err(AuthError::MissingExpiryClaim)
        );
    }

    #[test]
    fn signed_garbage_payload_is_malformed() {
        let signer = signer();
        let verifier = verifier(&signer);

        let token = signer.sign_segments(br#"{"alg":"EdDSA"}"#, b"not json");
        let err = verifier.verify_at(&token, now()).unwrap_err();
        assert!(matches!(err, AuthError::MalformedToken(_)));

        // Signed over a payload segment that is not Base64Url at all.
        let header = base64url::encode(br#"{"alg":"EdDSA"}"#);
        let token = signer.sign_encoded(&header, "a");
        let err = verifier.verify_at(&token, now()).unwrap_err();
        assert!(matches!(err, AuthError::MalformedToken(_)));
    }

    #[test]
    fn expiry_boundary() {
        let signer = signer();
        let verifier = verifier(&signer);

        let at_now = signer.sign(&json!({ "exp": NOW })).unwrap();
        assert!(verifier.verify_at(&at_now, now()).is_ok());

        let just_expired = signer.sign(&json!({ "exp": NOW - 1 })).unwrap();
        assert_eq!(
            verifier.verify_at(&just_expired, now()),
            Err(AuthError::TokenExpired {
                expired_at: DateTime::from_timestamp(NOW - 1, 0).unwrap(),
            })
        );
    }

    #[test]
    fn unreduced_scalar_is_a_mismatch() {
        // Group order l, little-endian.
        const ORDER: [u8; 32] = [
            0xed, 0xd3, 0xf5, 0x5c, 0x1a, 0x63, 0x12, 0x58, 0xd6, 0x9c, 0xf7, 0xa2, 0xde, 0xf9,
            0xde, 0x14, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x10,
        ];

        let signer = signer();
        let token = signer.sign(&json!({ "exp": NOW })).unwrap();
        let (signing_input, signature) = token.rsplit_once('.').unwrap();
        let mut raw = base64url::decode(signature).unwrap();

        // s + l is congruent to s but not canonical.
        let mut carry = 0u16;
        for (byte, order) in raw[32..].iter_mut().zip(ORDER) {
            let sum = u16::from(*byte) + u16::from(order) + carry;
            *byte = sum as u8;
            carry = sum >> 8;
        }
        assert_eq!(carry, 0);

        let forged = format!("{signing_input}.{}", base64url::encode(&raw));
        assert_eq!(
            verifier(&signer).verify_at(&forged, now()),
            Err(AuthError::SignatureMismatch)
        );
    }

    #[test]
    fn small_order_key_is_a_mismatch() {
        // The identity point decodes, but with R = identity and s = 0 any
        // message passes a non-strict check.
        let mut identity = [0u8; 32];
        identity[0] = 1;
        let verifier = Verifier::new(PublicKey::from_bytes(&identity).unwrap());

        let mut raw = [0u8; 64];
        raw[0] = 1;
        let payload = base64url::encode(format!(r#"{{"exp":{NOW}}}"#));
        let token = format!("e30.{payload}.{}", base64url::encode(raw));
        assert_eq!(
            verifier.verify_at(&token, now()),
            Err(AuthError::SignatureMismatch)
        );
    }

    #[test]
    fn free_function_uses_wall_clock() {
        let signer = signer();
        let key = signer.public_key();
        let fresh = signer
            .sign(&json!({ "exp": Utc::now().timestamp() + 3600 }))
            .unwrap();
        assert!(verify(&fresh, &key).is_ok());

        let stale = signer.sign(&json!({ "exp": 1 })).unwrap();
        assert_eq!(
            verify(&stale, &key).unwrap_err().kind(),
            crate::ErrorKind::TokenExpired
        );
    }
}
