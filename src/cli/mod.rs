//! CLI module: Clap argument parser, prompts, and the interactive loop.

pub mod commands;
pub mod output;
pub mod prompt;

use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use zeroize::Zeroizing;

use crate::config::Settings;
use crate::errors::{CredVaultError, Result};
use crate::vault::Vault;

use self::commands::{Command, COMMAND_PROMPT};
use self::prompt::Prompter;

/// CredVault CLI: local password-protected credential store.
#[derive(Parser)]
#[command(
    name = "credvault",
    about = "Local password-protected credential store",
    version
)]
pub struct Cli {
    /// Vault file (default: vault_path from .credvault.toml, or vault.dat)
    #[arg(long)]
    pub vault: Option<PathBuf>,
}

/// Start a session: load settings, unlock the vault, run the loop.
///
/// A vault that fails to unlock is returned as `CredVaultError::Unlock`
/// before the loop is entered.
pub fn run<P: Prompter, W: Write>(cli: &Cli, prompter: &mut P, out: &mut W) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let settings = Settings::load(&cwd)?;
    init_tracing(&settings.log_level);

    let path = match &cli.vault {
        Some(path) => path.clone(),
        None => settings.vault_path(&cwd),
    };

    let mut vault = {
        let password = prompt_master_password(prompter)?;
        Vault::open(&path, password.as_bytes(), &settings.argon2_params())?
    };

    if let Some(reason) = vault.lock_reason() {
        return Err(CredVaultError::Unlock(reason.clone()));
    }

    let skipped = vault.skipped_lines();
    if skipped > 0 {
        output::warning(&format!(
            "{skipped} unreadable record line(s) were skipped and will be dropped on the next save"
        ));
    }

    run_loop(&mut vault, prompter, out)
}

/// Read and dispatch commands until `exit`, `quit`, or end of input.
pub fn run_loop<P: Prompter, W: Write>(vault: &mut Vault, prompter: &mut P, out: &mut W) -> Result<()> {
    loop {
        let Some(line) = prompter.input(COMMAND_PROMPT)? else {
            return Ok(());
        };

        let command = Command::parse(&line);
        if command == Command::Exit {
            return Ok(());
        }

        commands::dispatch(&command, vault, prompter, out)?;
        out.flush()?;
    }
}

/// Ask for the master password.
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
/// End of input counts as an empty password.
pub fn prompt_master_password<P: Prompter>(prompter: &mut P) -> Result<Zeroizing<String>> {
    Ok(Zeroizing::new(
        prompter.secret("Enter master password")?.unwrap_or_default(),
    ))
}

/// Install the `tracing` subscriber.
///
/// `RUST_LOG` wins; otherwise the crate logs at `log_level` and everything
/// else at `warn`.  Events go to stderr.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("credvault={log_level},warn")));

    // A second call (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();
}
