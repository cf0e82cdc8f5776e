//! `remove`: delete the credential for a service.

use std::io::Write;

use super::field;
use crate::cli::prompt::Prompter;
use crate::errors::Result;
use crate::vault::Vault;

/// Execute the `remove` command.
pub fn execute<P: Prompter, W: Write>(vault: &mut Vault, prompter: &mut P, out: &mut W) -> Result<()> {
    let service = field(prompter, "Service to remove")?;

    if vault.remove(&service)? {
        writeln!(out, "Removed.")?;
    } else {
        writeln!(out, "Not found.")?;
    }
    Ok(())
}
