//! `find`: print full credentials for services matching a search term.

use std::io::Write;

use super::field;
use crate::cli::prompt::Prompter;
use crate::errors::Result;
use crate::vault::Vault;

/// Execute the `find` command.
pub fn execute<P: Prompter, W: Write>(vault: &Vault, prompter: &mut P, out: &mut W) -> Result<()> {
    let term = field(prompter, "Search term")?;

    for record in vault.find(&term)? {
        writeln!(
            out,
            "{} -> {} / {}",
            record.service, record.username, record.password
        )?;
    }
    Ok(())
}
