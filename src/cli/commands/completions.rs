//! Shell completion script generation.

use std::io::{self, Write};

use clap::CommandFactory;
use clap_complete::{generate, shells};

use crate::cli::{Cli, Shell};
use crate::error::Result;

const BIN_NAME: &str = "wt";

/// Write the completion script for `shell` to stdout.
pub fn execute(shell: &Shell) -> Result<()> {
    write_script(shell, &mut io::stdout())
}

fn write_script(shell: &Shell, out: &mut dyn Write) -> Result<()> {
    let mut cmd = Cli::command();
    match shell {
        Shell::Bash => generate(shells::Bash, &mut cmd, BIN_NAME, out),
        Shell::Zsh => generate(shells::Zsh, &mut cmd, BIN_NAME, out),
        Shell::Fish => generate(shells::Fish, &mut cmd, BIN_NAME, out),
        Shell::PowerShell => generate(shells::PowerShell, &mut cmd, BIN_NAME, out),
        Shell::Elvish => generate(shells::Elvish, &mut cmd, BIN_NAME, out),
    }
    out.flush()?;
    Ok(())
}
