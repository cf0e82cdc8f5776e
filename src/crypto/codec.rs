//! Reversible transform between a plaintext string and one stored line.
//!
//! A token is standard padded base64 of `nonce || ciphertext || tag`, so it
//! never contains a newline and fits on a single line of the vault file.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use zeroize::Zeroize;

use super::encryption::{decrypt, encrypt};
use super::keys::VaultKey;
use crate::errors::{CodecError, Result};

/// Encrypt `plaintext` and encode it as printable text.
///
/// Every call uses a fresh nonce, so encoding the same plaintext twice
/// yields different tokens.
pub fn encode(plaintext: &str, key: &VaultKey) -> Result<String> {
    let sealed = encrypt(key, plaintext.as_bytes())?;
    Ok(BASE64.encode(sealed))
}

/// Decode a token produced by `encode`.
pub fn decode(token: &str, key: &VaultKey) -> std::result::Result<String, CodecError> {
    let sealed = BASE64
        .decode(token.trim())
        .map_err(|_| CodecError::InvalidEncoding)?;

    let plaintext = decrypt(key, &sealed).map_err(|_| CodecError::Authentication)?;

    String::from_utf8(plaintext).map_err(|e| {
        let mut bad_bytes = e.into_bytes();
        bad_bytes.zeroize();
        CodecError::InvalidUtf8
    })
}
