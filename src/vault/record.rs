//! Credential records and the helpers that display or look them up.

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::errors::{CredVaultError, Result};

/// Separates the three fields inside a decoded record line.
pub const FIELD_DELIMITER: char = '|';

/// One stored credential.
///
/// `service` is the lookup key.  Comparisons go through
/// [`normalize_service`]; the original casing is what gets stored.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Record {
    pub service: String,
    pub username: String,
    pub password: String,
}

impl Record {
    pub fn new(
        service: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            service: service.into(),
            username: username.into(),
            password: password.into(),
        }
    }

    /// Check that every field survives a trip through the line format.
    pub fn validate(&self) -> Result<()> {
        if self.service.trim().is_empty() {
            return Err(CredVaultError::InvalidField {
                field: "service",
                reason: "cannot be empty",
            });
        }
        for (field, value) in [
            ("service", &self.service),
            ("username", &self.username),
            ("password", &self.password),
        ] {
            if value.contains(FIELD_DELIMITER) {
                return Err(CredVaultError::InvalidField {
                    field,
                    reason: "cannot contain '|'",
                });
            }
            if value.contains(['\n', '\r']) {
                return Err(CredVaultError::InvalidField {
                    field,
                    reason: "cannot contain line breaks",
                });
            }
        }
        Ok(())
    }

    /// Whether this record's service equals `service`, ignoring case.
    pub fn matches_service(&self, service: &str) -> bool {
        normalize_service(&self.service) == normalize_service(service)
    }

    /// The `service|username|password` plaintext of a record line.
    pub(crate) fn to_line_plaintext(&self) -> String {
        format!(
            "{}{FIELD_DELIMITER}{}{FIELD_DELIMITER}{}",
            self.service, self.username, self.password
        )
    }

    /// Split a decoded line; anything but exactly three fields is `None`.
    pub(crate) fn from_line_plaintext(line: &str) -> Option<Self> {
        let mut parts = line.split(FIELD_DELIMITER);
        let (service, username, password) = (parts.next()?, parts.next()?, parts.next()?);
        if parts.next().is_some() {
            return None;
        }
        Some(Self::new(service, username, password))
    }
}

impl std::fmt::Debug for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Record")
            .field("service", &self.service)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// A row of the `list` view: the service and a masked username.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    pub service: String,
    pub masked_username: String,
}

/// Case-folded form of a service name used for every lookup.
pub fn normalize_service(service: &str) -> String {
    service.to_lowercase()
}

/// Partially redact a username for display.
///
/// Lengths are counted in characters, not bytes.
pub fn mask(username: &str) -> String {
    let len = username.chars().count();
    match len {
        0 => "**".to_string(),
        1 | 2 => "*".repeat(len),
        _ => {
            let mut chars = username.chars();
            let first = chars.next().unwrap_or('*');
            let last = chars.next_back().unwrap_or('*');
            format!("{first}{}{last}", "*".repeat(len - 2))
        }
    }
}
