//! Cryptographic primitives for CredVault.
//!
//! This module provides:
//! - Argon2id password-based key derivation (`kdf`)
//! - The HKDF-expanded session key (`keys`)
//! - AES-256-GCM encryption and decryption (`encryption`)
//! - The text codec that turns one plaintext into one stored line (`codec`)

pub mod codec;
pub mod encryption;
pub mod kdf;
pub mod keys;

pub use codec::{decode, encode};
pub use encryption::{decrypt, encrypt};
pub use kdf::{derive_master_key_with_params, generate_salt, Argon2Params};
pub use keys::VaultKey;
