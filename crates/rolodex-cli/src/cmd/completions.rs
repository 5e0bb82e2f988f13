//! `rdx completions`: print a completion script for the chosen shell.

use clap::Args;
use clap_complete::Shell;
use std::io::{self, Write};

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for.
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Write the `rdx` completion script for `shell` to stdout.
pub fn run_completions(shell: Shell, command: &mut clap::Command) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_completions(shell, command, &mut out)?;
    Ok(())
}

fn write_completions(
    shell: Shell,
    command: &mut clap::Command,
    out: &mut dyn Write,
) -> io::Result<()> {
    clap_complete::generate(shell, command, "rdx", out);
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_command() -> clap::Command {
        clap::Command::new("rdx").subcommand(clap::Command::new("list"))
    }

    #[test]
    fn bash_script_names_the_binary() {
        let mut out = Vec::new();
        write_completions(Shell::Bash, &mut sample_command(), &mut out).expect("generate");
        let script = String::from_utf8(out).expect("utf8");
        assert!(script.contains("rdx"));
        assert!(script.contains("list"));
    }

    #[test]
    fn zsh_script_is_a_compdef() {
        let mut out = Vec::new();
        write_completions(Shell::Zsh, &mut sample_command(), &mut out).expect("generate");
        assert!(String::from_utf8(out).expect("utf8").starts_with("#compdef rdx"));
    }
}
