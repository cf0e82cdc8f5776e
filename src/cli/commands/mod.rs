//! Commands understood by the interactive loop.

pub mod add;
pub mod find;
pub mod list;
pub mod remove;

use std::io::Write;

use crate::cli::prompt::Prompter;
use crate::errors::Result;
use crate::vault::Vault;

/// Prompt shown before every command.
pub const COMMAND_PROMPT: &str = "Command (add/list/find/remove/exit)";

/// One line of loop input, interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add,
    List,
    Find,
    Remove,
    Exit,
    Unknown(String),
}

impl Command {
    /// Interpret a command line.  Surrounding whitespace and case are
    /// ignored.
    pub fn parse(input: &str) -> Self {
        let normalized = input.trim().to_lowercase();
        match normalized.as_str() {
            "add" => Self::Add,
            "list" => Self::List,
            "find" => Self::Find,
            "remove" => Self::Remove,
            "exit" | "quit" => Self::Exit,
            _ => Self::Unknown(normalized),
        }
    }
}

/// Run one command against an unlocked vault.
///
/// `Exit` is handled by the caller and is a no-op here.
pub fn dispatch<P: Prompter, W: Write>(
    command: &Command,
    vault: &mut Vault,
    prompter: &mut P,
    out: &mut W,
) -> Result<()> {
    match command {
        Command::Add => add::execute(vault, prompter, out),
        Command::List => list::execute(vault, out),
        Command::Find => find::execute(vault, prompter, out),
        Command::Remove => remove::execute(vault, prompter, out),
        Command::Exit => Ok(()),
        Command::Unknown(input) => {
            tracing::debug!(%input, "unknown command");
            writeln!(out, "Unknown command.")?;
            Ok(())
        }
    }
}

/// Ask for a field; end of input counts as an empty answer.
fn field<P: Prompter>(prompter: &mut P, label: &str) -> Result<String> {
    Ok(prompter.input(label)?.unwrap_or_default())
}
