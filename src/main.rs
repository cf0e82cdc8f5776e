use clap::Parser;
use credvault::cli::output;
use credvault::cli::prompt::TerminalPrompter;
use credvault::cli::Cli;
use credvault::errors::CredVaultError;

fn main() {
    let cli = Cli::parse();

    let mut prompter = TerminalPrompter::new();
    let stdout = std::io::stdout();
    let result = credvault::cli::run(&cli, &mut prompter, &mut stdout.lock());

    match result {
        Ok(()) => {}
        Err(CredVaultError::Unlock(reason)) => {
            output::error(output::lock_message(&reason));
            std::process::exit(1);
        }
        Err(e) => {
            output::error(&e.to_string());
            std::process::exit(1);
        }
    }
}
