//! Text vault file format.
//!
//! A vault file is UTF-8 text, one item per line:
//!
//! ```text
//! CREDVAULT/2 argon2id m=65536 t=3 p=4 salt=<base64>    header
//! <token>                                               encoded sentinel
//! <token>                                               one encoded record per line
//! ```
//!
//! - **Header**: the tag `CREDVAULT/2` followed by the Argon2id parameters
//!   and the per-vault salt.  The tag is the versioning point of the format.
//! - **Sentinel**: the fixed plaintext `CHECK|OK`, encrypted.  Decrypting it
//!   is the only password check; the password itself is never stored.
//! - **Records**: `service|username|password`, each line encrypted on its
//!   own with a fresh nonce (see `crypto::codec`).  Blank lines are ignored.

use std::fs;
use std::io::Write;
use std::path::Path;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use subtle::ConstantTimeEq;
use tempfile::NamedTempFile;
use zeroize::Zeroizing;

use super::record::Record;
use crate::crypto::codec::{decode, encode};
use crate::crypto::kdf::{generate_salt, Argon2Params, SALT_LEN};
use crate::crypto::keys::VaultKey;
use crate::errors::{CredVaultError, Result, UnlockError};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Tag at the start of line 0 of every vault file.
pub const HEADER_TAG: &str = "CREDVAULT/2";

/// Key-derivation algorithm named in the header.
const KDF_NAME: &str = "argon2id";

/// Known plaintext stored encrypted on line 1.
pub const SENTINEL: &str = "CHECK|OK";

// ---------------------------------------------------------------------------
// VaultHeader
// ---------------------------------------------------------------------------

/// Everything needed to re-derive the key of a vault: its salt and the
/// Argon2id parameters it was created with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultHeader {
    pub salt: [u8; SALT_LEN],
    pub argon2_params: Argon2Params,
}

impl VaultHeader {
    /// Header for a brand-new vault, with a fresh random salt.
    pub fn new(argon2_params: Argon2Params) -> Self {
        Self {
            salt: generate_salt(),
            argon2_params,
        }
    }

    /// Render line 0 of the file.
    pub fn to_line(&self) -> String {
        let Argon2Params {
            memory_kib,
            iterations,
            parallelism,
        } = self.argon2_params;
        format!(
            "{HEADER_TAG} {KDF_NAME} m={memory_kib} t={iterations} p={parallelism} salt={}",
            BASE64.encode(self.salt)
        )
    }

    /// Parse line 0 of the file.
    ///
    /// A wrong tag, a missing field or a malformed value all mean the
    /// file is not a vault this version can read.
    pub fn from_line(line: &str) -> std::result::Result<Self, UnlockError> {
        let mut fields = line.split_whitespace();

        if fields.next() != Some(HEADER_TAG) {
            return Err(invalid("missing CREDVAULT/2 header tag"));
        }
        match fields.next() {
            Some(KDF_NAME) => {}
            Some(other) => return Err(invalid(&format!("unsupported KDF '{other}'"))),
            None => return Err(invalid("header has no KDF name")),
        }

        let mut memory_kib = None;
        let mut iterations = None;
        let mut parallelism = None;
        let mut salt = None;

        for field in fields {
            let (name, value) = field
                .split_once('=')
                .ok_or_else(|| invalid(&format!("malformed header field '{field}'")))?;
            match name {
                "m" => memory_kib = Some(parse_cost(name, value)?),
                "t" => iterations = Some(parse_cost(name, value)?),
                "p" => parallelism = Some(parse_cost(name, value)?),
                "salt" => salt = Some(parse_salt(value)?),
                _ => return Err(invalid(&format!("unknown header field '{name}'"))),
            }
        }

        let argon2_params = Argon2Params {
            memory_kib: memory_kib.ok_or_else(|| invalid("header is missing m="))?,
            iterations: iterations.ok_or_else(|| invalid("header is missing t="))?,
            parallelism: parallelism.ok_or_else(|| invalid("header is missing p="))?,
        };
        argon2_params
            .check()
            .map_err(|detail| invalid(&format!("header {detail}")))?;

        Ok(Self {
            salt: salt.ok_or_else(|| invalid("header is missing salt="))?,
            argon2_params,
        })
    }

    /// Derive this vault's key from a master password.
    pub fn derive_key(&self, password: &[u8]) -> Result<VaultKey> {
        VaultKey::derive(password, &self.salt, &self.argon2_params)
    }
}

fn invalid(detail: &str) -> UnlockError {
    UnlockError::InvalidFormat(detail.to_string())
}

fn parse_cost(name: &str, value: &str) -> std::result::Result<u32, UnlockError> {
    value
        .parse()
        .map_err(|_| invalid(&format!("header field {name}= is not a number")))
}

fn parse_salt(value: &str) -> std::result::Result<[u8; SALT_LEN], UnlockError> {
    BASE64
        .decode(value)
        .ok()
        .and_then(|bytes| <[u8; SALT_LEN]>::try_from(bytes).ok())
        .ok_or_else(|| invalid("header salt is malformed"))
}

// ---------------------------------------------------------------------------
// Parse / serialize
// ---------------------------------------------------------------------------

/// A successfully unlocked vault file.
#[derive(Debug)]
pub struct ParsedVault {
    pub header: VaultHeader,
    pub key: VaultKey,
    pub records: Vec<Record>,
    /// Non-blank record lines that could not be decoded or did not hold
    /// exactly three fields.
    pub skipped: usize,
}

/// Unlock and decode the lines of a vault file.
///
/// Format problems in the header surface as `UnlockError::InvalidFormat`;
/// a missing or undecryptable sentinel as `UnlockError::WrongPassword`.
/// Bad record lines are skipped and counted, never fatal.  Duplicate
/// services are kept in file order.
pub fn parse<S: AsRef<str>>(lines: &[S], password: &[u8]) -> Result<ParsedVault> {
    let first: &str = lines
        .first()
        .ok_or_else(|| invalid("file is empty"))?
        .as_ref();
    let header = VaultHeader::from_line(first)?;

    let key = header.derive_key(password)?;

    let sentinel_line: &str = lines.get(1).ok_or(UnlockError::WrongPassword)?.as_ref();
    let sentinel = decode(sentinel_line, &key).map_err(|_| UnlockError::WrongPassword)?;
    if !bool::from(sentinel.as_bytes().ct_eq(SENTINEL.as_bytes())) {
        return Err(UnlockError::WrongPassword.into());
    }

    let mut records = Vec::new();
    let mut skipped = 0;

    for (index, line) in lines.iter().enumerate().skip(2) {
        let line: &str = line.as_ref();
        if line.trim().is_empty() {
            continue;
        }

        let record = match decode(line, &key) {
            Ok(plaintext) => Record::from_line_plaintext(&Zeroizing::new(plaintext)),
            Err(e) => {
                tracing::warn!(line = index + 1, error = %e, "skipping undecodable record line");
                skipped += 1;
                continue;
            }
        };

        match record {
            Some(record) => records.push(record),
            None => {
                tracing::warn!(line = index + 1, "skipping record line without exactly 3 fields");
                skipped += 1;
            }
        }
    }

    Ok(ParsedVault {
        header,
        key,
        records,
        skipped,
    })
}

/// Encode a vault as the ordered lines of its file.
pub fn serialize(header: &VaultHeader, key: &VaultKey, records: &[Record]) -> Result<Vec<String>> {
    let mut lines = Vec::with_capacity(records.len() + 2);
    lines.push(header.to_line());
    lines.push(encode(SENTINEL, key)?);
    for record in records {
        let plaintext = Zeroizing::new(record.to_line_plaintext());
        lines.push(encode(&plaintext, key)?);
    }
    Ok(lines)
}

// ---------------------------------------------------------------------------
// Storage
// ---------------------------------------------------------------------------

/// Read a vault file as lines.
///
/// Invalid UTF-8 is replaced rather than rejected so that a non-vault
/// file fails the header check instead of surfacing as an I/O error.
pub fn read_lines(path: &Path) -> Result<Vec<String>> {
    let data = fs::read(path)?;
    Ok(String::from_utf8_lossy(&data)
        .lines()
        .map(str::to_string)
        .collect())
}

/// Write lines to `path` **atomically**.
///
/// 1. Create a temp file in the same directory (owner-only permissions).
/// 2. Write every line, flush and fsync.
/// 3. Rename the temp file over the target path.
///
/// On any failure the temp file is removed when it is dropped and the
/// previous file stays intact.
pub fn write_lines(path: &Path, lines: &[String]) -> Result<()> {
    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let mut buf = String::with_capacity(lines.iter().map(|l| l.len() + 1).sum());
    for line in lines {
        buf.push_str(line);
        buf.push('\n');
    }

    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(buf.as_bytes())?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| CredVaultError::Io(e.error))?;

    tracing::debug!(path = %path.display(), lines = lines.len(), "vault file written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_header() -> VaultHeader {
        VaultHeader::new(Argon2Params::minimum())
    }

    #[test]
    fn header_line_roundtrip() {
        let header = test_header();
        let line = header.to_line();
        assert!(line.starts_with("CREDVAULT/2 argon2id m=8192 t=1 p=1 salt="));
        assert_eq!(VaultHeader::from_line(&line).unwrap(), header);
    }

    #[test]
    fn header_rejects_wrong_tag() {
        assert!(matches!(
            VaultHeader::from_line("VAULTv1"),
            Err(UnlockError::InvalidFormat(_))
        ));
        assert!(matches!(
            VaultHeader::from_line(""),
            Err(UnlockError::InvalidFormat(_))
        ));
    }

    #[test]
    fn header_rejects_missing_or_bad_fields() {
        let salt = BASE64.encode([0u8; SALT_LEN]);
        let cases = [
            "CREDVAULT/2".to_string(),
            "CREDVAULT/2 scrypt m=8192 t=1 p=1".to_string(),
            format!("CREDVAULT/2 argon2id t=1 p=1 salt={salt}"),
            format!("CREDVAULT/2 argon2id m=lots t=1 p=1 salt={salt}"),
            "CREDVAULT/2 argon2id m=8192 t=1 p=1 salt=AAAA".to_string(),
            format!("CREDVAULT/2 argon2id m=1024 t=1 p=1 salt={salt}"),
            format!("CREDVAULT/2 argon2id m=8192 t=1 p=1 x=2 salt={salt}"),
            format!("CREDVAULT/2 argon2id m=8192 t=0 p=1 salt={salt}"),
            format!("CREDVAULT/2 argon2id m=8192 t=1 p=2048 salt={salt}"),
            format!("CREDVAULT/2 argon2id m=268435455 t=1 p=1 salt={salt}"),
            format!("CREDVAULT/2 argon2id m=8192 t=100000 p=1 salt={salt}"),
        ];
        for line in cases {
            assert!(
                matches!(VaultHeader::from_line(&line), Err(UnlockError::InvalidFormat(_))),
                "expected InvalidFormat for {line:?}"
            );
        }
    }

    #[test]
    fn serialize_then_parse_preserves_records_and_order() {
        let header = test_header();
        let key = header.derive_key(b"hunter2").unwrap();
        let records = vec![
            Record::new("zeta", "z", "1"),
            Record::new("Alpha", "alice", "2"),
            Record::new("alpha", "again", "3"),
        ];

        let lines = serialize(&header, &key, &records).unwrap();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], header.to_line());

        let parsed = parse(&lines, b"hunter2").unwrap();
        assert_eq!(parsed.records, records);
        assert_eq!(parsed.skipped, 0);
        assert_eq!(parsed.header, header);
    }

    #[test]
    fn parse_empty_input_is_invalid_format() {
        let lines: Vec<String> = Vec::new();
        let err = parse(&lines, b"pw").unwrap_err();
        assert!(matches!(
            err,
            CredVaultError::Unlock(UnlockError::InvalidFormat(_))
        ));
    }

    #[test]
    fn parse_header_only_is_wrong_password() {
        let lines = vec![test_header().to_line()];
        let err = parse(&lines, b"pw").unwrap_err();
        assert!(matches!(
            err,
            CredVaultError::Unlock(UnlockError::WrongPassword)
        ));
    }

    #[test]
    fn parse_with_wrong_password_fails_sentinel() {
        let header = test_header();
        let key = header.derive_key(b"right").unwrap();
        let lines = serialize(&header, &key, &[]).unwrap();
        let err = parse(&lines, b"wrong").unwrap_err();
        assert!(matches!(
            err,
            CredVaultError::Unlock(UnlockError::WrongPassword)
        ));
    }

    #[test]
    fn parse_rejects_sentinel_with_other_plaintext() {
        let header = test_header();
        let key = header.derive_key(b"pw").unwrap();
        let lines = vec![header.to_line(), encode("CHECK|NO", &key).unwrap()];
        assert!(parse(&lines, b"pw").is_err());
    }

    #[test]
    fn parse_skips_blank_and_counts_malformed_lines() {
        let header = test_header();
        let key = header.derive_key(b"pw").unwrap();
        let mut lines = serialize(&header, &key, &[Record::new("github", "bob", "p@ss")]).unwrap();
        lines.push(String::new());
        lines.push("   ".to_string());
        lines.push("%%% not base64 %%%".to_string());
        lines.push(encode("two|fields", &key).unwrap());
        lines.push(encode("mail|me|pw", &key).unwrap());

        let parsed = parse(&lines, b"pw").unwrap();
        assert_eq!(
            parsed.records,
            vec![
                Record::new("github", "bob", "p@ss"),
                Record::new("mail", "me", "pw")
            ]
        );
        assert_eq!(parsed.skipped, 2);
    }

    #[test]
    fn write_lines_replaces_file_and_leaves_no_temp_files() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vault.dat");
        fs::write(&path, "old contents\n").unwrap();

        write_lines(&path, &["one".to_string(), "two".to_string()]).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "one\ntwo\n");
        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn write_lines_into_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("vault.dat");
        assert!(matches!(
            write_lines(&path, &["x".to_string()]),
            Err(CredVaultError::Io(_))
        ));
    }

    #[test]
    fn read_lines_tolerates_crlf_and_binary() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vault.dat");
        fs::write(&path, b"a\r\nb\r\n").unwrap();
        assert_eq!(read_lines(&path).unwrap(), vec!["a", "b"]);

        fs::write(&path, [0xFFu8, 0xFE, b'\n', b'x']).unwrap();
        assert_eq!(read_lines(&path).unwrap().len(), 2);
    }
}
