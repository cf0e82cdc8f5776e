//! Vault module: encrypted credential storage.
//!
//! This module provides:
//! - `Record`, `ListEntry` and username masking (`record`)
//! - The line-oriented vault file format (`format`)
//! - The `Vault` engine with its lock state and record operations (`store`)

pub mod format;
pub mod record;
pub mod store;

pub use format::VaultHeader;
pub use record::{mask, ListEntry, Record};
pub use store::{AddOutcome, Vault};
