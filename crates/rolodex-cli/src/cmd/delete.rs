//! `rdx delete`: delete a contact after confirmation.

use crate::cmd::Context;
use crate::output::render_success;
use anyhow::Context as _;
use clap::Args;
use rolodex_core::model::ContactId;
use std::io::{BufRead, IsTerminal, Write};
use tracing::info;

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Id of the contact to delete.
    pub id: String,

    /// Skip the interactive confirmation prompt.
    #[arg(short, long)]
    pub yes: bool,
}

/// Read a yes/no answer; anything but `y`/`yes` declines.
fn read_confirmation(input: &mut dyn BufRead, prompt: &mut dyn Write) -> anyhow::Result<bool> {
    write!(prompt, "Delete this contact? [y/N] ")?;
    prompt.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    let answer = answer.trim().to_ascii_lowercase();
    Ok(answer == "y" || answer == "yes")
}

/// Ask on the terminal. Non-interactive sessions are never prompted.
fn confirm_delete() -> anyhow::Result<bool> {
    if !std::io::stdin().is_terminal() || !std::io::stderr().is_terminal() {
        return Ok(true);
    }
    read_confirmation(&mut std::io::stdin().lock(), &mut std::io::stderr())
}

pub fn run_delete(args: &DeleteArgs, ctx: &Context<'_>) -> anyhow::Result<()> {
    let id = ContactId::new(args.id.trim());

    let ask = ctx.config.confirm_delete && !args.yes;
    if ask && !confirm_delete()? {
        info!(%id, "delete declined");
        if !ctx.quiet {
            render_success(ctx.output, "Delete cancelled")?;
        }
        return Ok(());
    }

    ctx.api
        .delete_contact(&id)
        .with_context(|| format!("failed to delete contact {id}"))?;
    info!(%id, "contact deleted");

    if !ctx.quiet {
        render_success(ctx.output, &format!("Deleted contact {id}"))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer(input: &str) -> bool {
        let mut prompt = Vec::new();
        let confirmed =
            read_confirmation(&mut input.as_bytes(), &mut prompt).expect("confirmation");
        assert_eq!(
            String::from_utf8(prompt).expect("utf8"),
            "Delete this contact? [y/N] "
        );
        confirmed
    }

    #[test]
    fn yes_answers_confirm() {
        assert!(answer("y\n"));
        assert!(answer("YES\n"));
    }

    #[test]
    fn anything_else_declines() {
        assert!(!answer("\n"));
        assert!(!answer("n\n"));
        assert!(!answer("sure\n"));
        assert!(!answer(""));
    }
}
