//! The session key that encrypts every line of a vault file.
//!
//! Argon2id turns the master password into a 32-byte master key; HKDF-SHA256
//! then expands it under a fixed context string so the AES key is never the
//! raw KDF output.

use hkdf::Hkdf;
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::kdf::{derive_master_key_with_params, Argon2Params};
use crate::errors::{CredVaultError, Result};

/// Length of derived keys (256 bits).
const KEY_LEN: usize = 32;

/// HKDF context for the line-encryption key.
const RECORD_KEY_INFO: &[u8] = b"credvault-record-key";

/// Run HKDF-SHA256 expand with the given `info`.
///
/// The extract step is skipped because the input already came out of
/// Argon2id with full entropy.
fn hkdf_derive(ikm: &[u8], info: &[u8]) -> Result<[u8; KEY_LEN]> {
    let hk = Hkdf::<Sha256>::new(None, ikm);

    let mut okm = [0u8; KEY_LEN];
    hk.expand(info, &mut okm)
        .map_err(|e| CredVaultError::KeyDerivationFailed(format!("HKDF expand failed: {e}")))?;

    Ok(okm)
}

/// A 32-byte AES-256 key that zeroes its memory when dropped.
///
/// Held by an unlocked vault for the length of the session and nowhere
/// else.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct VaultKey {
    bytes: [u8; KEY_LEN],
}

impl VaultKey {
    /// Create a `VaultKey` from raw bytes.
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Derive the line-encryption key for a vault from its master password.
    pub fn derive(password: &[u8], salt: &[u8], params: &Argon2Params) -> Result<Self> {
        let mut master = derive_master_key_with_params(password, salt, params)?;
        let record_key = hkdf_derive(&master, RECORD_KEY_INFO);
        master.zeroize();
        Ok(Self::new(record_key?))
    }

    /// Access the raw key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

impl std::fmt::Debug for VaultKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("VaultKey(..)")
    }
}
