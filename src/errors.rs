use thiserror::Error;

/// Why an existing vault file could not be unlocked.
///
/// A vault that fails to unlock stays locked for the rest of its life;
/// the reason is kept so the command loop can report it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnlockError {
    /// The first line is not a recognised vault header.
    #[error("Invalid vault format: {0}")]
    InvalidFormat(String),

    /// The header is valid but the sentinel did not decrypt to the
    /// expected plaintext.
    #[error("Wrong master password: sentinel check failed")]
    WrongPassword,
}

/// Failures while decoding a single stored token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("token is not valid base64")]
    InvalidEncoding,

    #[error("token failed authentication (wrong key or tampered data)")]
    Authentication,

    #[error("decrypted token is not valid UTF-8")]
    InvalidUtf8,
}

/// All errors that can occur in CredVault.
#[derive(Debug, Error)]
pub enum CredVaultError {
    // --- Crypto errors ---
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Decryption failed: wrong password or corrupted data")]
    DecryptionFailed,

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    // --- Vault errors ---
    #[error(transparent)]
    Unlock(#[from] UnlockError),

    #[error("Vault is locked")]
    Locked,

    #[error("Invalid {field}: {reason}")]
    InvalidField {
        field: &'static str,
        reason: &'static str,
    },

    // --- Config errors ---
    #[error("Config error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),
}

/// Convenience type alias for CredVault results.
pub type Result<T> = std::result::Result<T, CredVaultError>;
