//! `list`: print every service with a masked username.

use std::io::Write;

use crate::errors::Result;
use crate::vault::Vault;

/// Execute the `list` command.
pub fn execute<W: Write>(vault: &Vault, out: &mut W) -> Result<()> {
    for entry in vault.list()? {
        writeln!(out, "{}: {}", entry.service, entry.masked_username)?;
    }
    Ok(())
}
