//! Reading answers from the user.
//!
//! On a terminal, prompts are drawn with `dialoguer` and secrets are read
//! without echo.  When stdin is piped, answers are read one line at a
//! time and no prompt is drawn, so the binary can be scripted.

use std::io::{self, BufRead, IsTerminal};

use crate::errors::{CredVaultError, Result};

/// Source of answers for the command loop.
pub trait Prompter {
    /// Ask for one line of input.  `None` means input has ended.
    fn input(&mut self, label: &str) -> Result<Option<String>>;

    /// Ask for a secret without echoing it.  `None` means input has ended.
    fn secret(&mut self, label: &str) -> Result<Option<String>>;
}

/// Prompter backed by the process's stdin.
pub struct TerminalPrompter {
    interactive: bool,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self {
            interactive: io::stdin().is_terminal(),
        }
    }

    fn read_piped_line() -> Result<Option<String>> {
        let mut buf = String::new();
        if io::stdin().lock().read_line(&mut buf)? == 0 {
            return Ok(None);
        }
        Ok(Some(buf.trim_end_matches(['\n', '\r']).to_string()))
    }
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for TerminalPrompter {
    fn input(&mut self, label: &str) -> Result<Option<String>> {
        if !self.interactive {
            return Self::read_piped_line();
        }
        dialoguer::Input::<String>::new()
            .with_prompt(label)
            .allow_empty(true)
            .interact_text()
            .map(Some)
            .map_err(|e| CredVaultError::CommandFailed(format!("input prompt: {e}")))
    }

    fn secret(&mut self, label: &str) -> Result<Option<String>> {
        if !self.interactive {
            return Self::read_piped_line();
        }
        dialoguer::Password::new()
            .with_prompt(label)
            .allow_empty_password(true)
            .interact()
            .map(Some)
            .map_err(|e| CredVaultError::CommandFailed(format!("password prompt: {e}")))
    }
}
