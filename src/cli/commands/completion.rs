//! completion command - Generate shell completion scripts

use crate::cli::args::Cli;
use anyhow::Result;
use clap::CommandFactory;
use clap_complete::{generate, Shell};

/// Generate shell completion scripts.
pub fn completion(shell: Shell) -> Result<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut std::io::stdout());
    Ok(())
}
