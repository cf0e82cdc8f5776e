//! `add`: store a credential, replacing one with the same service.

use std::io::Write;

use zeroize::Zeroizing;

use super::field;
use crate::cli::prompt::Prompter;
use crate::errors::{CredVaultError, Result};
use crate::vault::{AddOutcome, Vault};

/// Execute the `add` command.
pub fn execute<P: Prompter, W: Write>(vault: &mut Vault, prompter: &mut P, out: &mut W) -> Result<()> {
    let service = field(prompter, "Service")?;
    let username = field(prompter, "Username")?;
    let password = Zeroizing::new(prompter.secret("Password")?.unwrap_or_default());

    match vault.add(&service, &username, &password) {
        Ok(outcome) => {
            let op = match outcome {
                AddOutcome::Created => "added",
                AddOutcome::Updated => "updated",
            };
            tracing::debug!(%service, op, "record saved");
            writeln!(out, "Saved.")?;
            Ok(())
        }
        // Bad input is reported and the loop carries on.
        Err(e @ CredVaultError::InvalidField { .. }) => {
            writeln!(out, "{e}")?;
            Ok(())
        }
        Err(e) => Err(e),
    }
}
