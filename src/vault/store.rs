//! The vault engine: unlock state machine and record operations.
//!
//! `Vault` wraps the text format and the crypto layer so that the command
//! loop can work with simple calls like `vault.add("github", "bob", "pw")`.
//! Every mutation rewrites the whole file before it returns.

use std::path::{Path, PathBuf};

use crate::crypto::kdf::Argon2Params;
use crate::crypto::keys::VaultKey;
use crate::errors::{CredVaultError, Result, UnlockError};

use super::format::{self, VaultHeader};
use super::record::{mask, normalize_service, ListEntry, Record};

/// Whether `add` created a new record or replaced an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Created,
    Updated,
}

/// State held while the vault is unlocked.
struct Session {
    header: VaultHeader,
    key: VaultKey,
    records: Vec<Record>,
    skipped_lines: usize,
}

enum State {
    /// Terminal.  Holds the reason the unlock failed.
    Locked(UnlockError),
    Unlocked(Session),
}

/// A credential vault bound to one file.
///
/// Obtain one with [`Vault::open`] and check [`Vault::is_unlocked`] before
/// anything else: a vault that failed to unlock stays locked and every
/// operation on it returns [`CredVaultError::Locked`].
pub struct Vault {
    path: PathBuf,
    state: State,
}

impl Vault {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Open the vault at `path`, creating it if it does not exist.
    ///
    /// A new vault gets a fresh salt and `argon2_params`, and is written
    /// to disk with no records.  An existing vault uses the parameters
    /// stored in its header; if its header or sentinel does not check
    /// out, the returned vault is locked and [`Vault::lock_reason`] says
    /// why.
    ///
    /// I/O failures, an empty password, and KDF failures are returned as
    /// errors.
    pub fn open(path: &Path, password: &[u8], argon2_params: &Argon2Params) -> Result<Self> {
        if password.is_empty() {
            return Err(CredVaultError::ConfigError(
                "master password must not be empty".into(),
            ));
        }

        if !path.exists() {
            return Self::create(path, password, argon2_params);
        }

        let lines = format::read_lines(path)?;
        let state = match format::parse(&lines, password) {
            Ok(parsed) => {
                tracing::debug!(
                    path = %path.display(),
                    records = parsed.records.len(),
                    skipped = parsed.skipped,
                    "vault unlocked"
                );
                State::Unlocked(Session {
                    header: parsed.header,
                    key: parsed.key,
                    records: parsed.records,
                    skipped_lines: parsed.skipped,
                })
            }
            Err(CredVaultError::Unlock(reason)) => {
                tracing::info!(path = %path.display(), %reason, "vault locked");
                State::Locked(reason)
            }
            Err(e) => return Err(e),
        };

        Ok(Self {
            path: path.to_path_buf(),
            state,
        })
    }

    /// Write a new, empty vault: header and sentinel only.
    fn create(path: &Path, password: &[u8], argon2_params: &Argon2Params) -> Result<Self> {
        let header = VaultHeader::new(*argon2_params);
        let key = header.derive_key(password)?;

        let lines = format::serialize(&header, &key, &[])?;
        format::write_lines(path, &lines)?;
        tracing::debug!(path = %path.display(), "created new vault");

        Ok(Self {
            path: path.to_path_buf(),
            state: State::Unlocked(Session {
                header,
                key,
                records: Vec::new(),
                skipped_lines: 0,
            }),
        })
    }

    // ------------------------------------------------------------------
    // Record operations
    // ------------------------------------------------------------------

    /// Add a record, or replace the one whose service matches ignoring
    /// case.  A replaced record keeps its position.
    ///
    /// The file is rewritten before this returns.
    pub fn add(&mut self, service: &str, username: &str, password: &str) -> Result<AddOutcome> {
        let path = self.path.clone();
        let session = self.session_mut()?;

        let record = Record::new(service, username, password);
        record.validate()?;

        let mut records = session.records.clone();
        let outcome = match records.iter().position(|r| r.matches_service(service)) {
            Some(index) => {
                records[index] = record;
                AddOutcome::Updated
            }
            None => {
                records.push(record);
                AddOutcome::Created
            }
        };

        session.persist(&path, records)?;
        Ok(outcome)
    }

    /// Every record in order, with the username masked.
    pub fn list(&self) -> Result<Vec<ListEntry>> {
        Ok(self
            .session()?
            .records
            .iter()
            .map(|r| ListEntry {
                service: r.service.clone(),
                masked_username: mask(&r.username),
            })
            .collect())
    }

    /// Records whose service contains `term`, ignoring case.
    ///
    /// An empty term matches every record.
    pub fn find(&self, term: &str) -> Result<Vec<Record>> {
        let needle = normalize_service(term);
        Ok(self
            .session()?
            .records
            .iter()
            .filter(|r| normalize_service(&r.service).contains(&needle))
            .cloned()
            .collect())
    }

    /// Remove every record whose service equals `service` ignoring case.
    ///
    /// Returns whether anything was removed.  The file is only rewritten
    /// when something was.
    pub fn remove(&mut self, service: &str) -> Result<bool> {
        let path = self.path.clone();
        let session = self.session_mut()?;

        let records: Vec<Record> = session
            .records
            .iter()
            .filter(|r| !r.matches_service(service))
            .cloned()
            .collect();

        if records.len() == session.records.len() {
            return Ok(false);
        }

        session.persist(&path, records)?;
        Ok(true)
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Returns the path to the vault file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `true` once the header and sentinel have checked out.
    pub fn is_unlocked(&self) -> bool {
        matches!(self.state, State::Unlocked(_))
    }

    /// Why the vault is locked, or `None` if it is unlocked.
    pub fn lock_reason(&self) -> Option<&UnlockError> {
        match &self.state {
            State::Locked(reason) => Some(reason),
            State::Unlocked(_) => None,
        }
    }

    /// Number of malformed record lines dropped while loading the file.
    ///
    /// They are not written back on the next save.
    pub fn skipped_lines(&self) -> usize {
        match &self.state {
            State::Unlocked(session) => session.skipped_lines,
            State::Locked(_) => 0,
        }
    }

    /// Returns the number of records in the vault.
    pub fn len(&self) -> Result<usize> {
        Ok(self.session()?.records.len())
    }

    /// Returns `true` if the vault holds no records.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.session()?.records.is_empty())
    }

    fn session(&self) -> Result<&Session> {
        match &self.state {
            State::Unlocked(session) => Ok(session),
            State::Locked(_) => Err(CredVaultError::Locked),
        }
    }

    fn session_mut(&mut self) -> Result<&mut Session> {
        match &mut self.state {
            State::Unlocked(session) => Ok(session),
            State::Locked(_) => Err(CredVaultError::Locked),
        }
    }
}

impl Session {
    /// Write `records` to disk, then make them the in-memory state.
    ///
    /// If the write fails the in-memory records are left untouched.
    fn persist(&mut self, path: &Path, records: Vec<Record>) -> Result<()> {
        let lines = format::serialize(&self.header, &self.key, &records)?;
        format::write_lines(path, &lines)?;
        tracing::debug!(path = %path.display(), records = records.len(), "vault saved");
        self.records = records;
        Ok(())
    }
}
