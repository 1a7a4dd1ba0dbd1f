//! Ed25519 bearer token verification.
//!
//! A token is the usual JWT triple `header.payload.signature`, each segment
//! Base64Url-encoded without padding. [`Verifier`] authenticates the signature
//! against a single statically-known [`PublicKey`] before any claim is read,
//! then enforces the `exp` claim.
//!
//! ```no_run
//! use edtoken_auth::{PublicKey, Verifier, CENTER_JWK};
//!
//! let key = PublicKey::from_jwk_json(CENTER_JWK)?;
//! let verifier = Verifier::new(key);
//! let claims = verifier.verify("eyJhbGciOiJFZERTQSJ9.e30.c2ln")?;
//! println!("subject: {:?}", claims.subject());
//! # Ok::<(), edtoken_auth::AuthError>(())
//! ```

pub mod base64url;
pub mod claims;
pub mod error;
pub mod key;
pub mod signer;
pub mod verifier;

pub use claims::Claims;
pub use error::{AuthError, ErrorKind};
pub use key::{Jwk, PublicKey, CENTER_JWK};
pub use signer::TokenSigner;
pub use verifier::{verify, Verifier};
