use anyhow::{Context, Result};
use clap::Command;
use clap_complete::{Shell, generate};
use std::io::{self, Write};

/// Write the completion script for `shell` to stdout
pub fn execute(shell: Shell, cmd: &mut Command) -> Result<()> {
    let mut stdout = io::stdout().lock();
    write_script(shell, cmd, &mut stdout)?;
    stdout.flush().context("Failed to write completion script")?;
    Ok(())
}

/// Render the completion script for every `tabhost` subcommand into `out`
pub fn write_script(shell: Shell, cmd: &mut Command, out: &mut dyn Write) -> Result<()> {
    let bin_name = cmd.get_name().to_string();
    let subcommands: Vec<&str> = cmd.get_subcommands().map(|sub| sub.get_name()).collect();
    tracing::debug!(
        "Generating {} completions for {} ({})",
        shell,
        bin_name,
        subcommands.join(", ")
    );
    generate(shell, cmd, bin_name, out);
    Ok(())
}
