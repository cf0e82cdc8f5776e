//! Colored terminal output helpers.
//!
//! Status messages outside the command loop go through these functions so
//! styling stays consistent.

use console::style;

use crate::errors::UnlockError;

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// The message shown when a vault refuses to unlock.
pub fn lock_message(reason: &UnlockError) -> &'static str {
    match reason {
        UnlockError::InvalidFormat(_) => "Invalid vault file.",
        UnlockError::WrongPassword => "Access denied. Wrong master password.",
    }
}
