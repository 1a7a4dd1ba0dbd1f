//! URL-safe, unpadded Base64 as used by every JWT segment.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use base64::Engine;
use thiserror::Error;

/// Standard alphabet that ignores the unused low bits of the final symbol.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_allow_trailing_bits(true),
);

/// Base64Url text that cannot be mapped back to bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// `len % 4 == 1` has no valid padding.
    #[error("malformed base64url: length {0} cannot be padded")]
    Length(usize),
    #[error("malformed base64url: {0}")]
    Alphabet(#[from] base64::DecodeError),
}

/// Decode Base64Url text into raw bytes.
///
/// `-` and `_` are mapped back onto `+` and `/`, the text is re-padded to a
/// multiple of four and then decoded with the standard alphabet.
pub fn decode(input: &str) -> Result<Vec<u8>, DecodeError> {
    let mut standard: String = input
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();

    match standard.len() % 4 {
        0 => {}
        2 => standard.push_str("=="),
        3 => standard.push('='),
        _ => return Err(DecodeError::Length(input.len())),
    }

    Ok(LENIENT.decode(standard)?)
}

/// Encode raw bytes as Base64Url text without trailing padding.
pub fn encode(bytes: impl AsRef<[u8]>) -> String {
    STANDARD
        .encode(bytes)
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect()
}
