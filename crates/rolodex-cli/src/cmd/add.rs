//! `rdx add`: create a contact.

use crate::cmd::{Context, FieldArgs};
use crate::output::render_success;
use anyhow::Context as _;
use clap::Args;
use tracing::{info, warn};

#[derive(Args, Debug)]
pub struct AddArgs {
    #[command(flatten)]
    pub fields: FieldArgs,
}

pub fn run_add(args: &AddArgs, ctx: &Context<'_>) -> anyhow::Result<()> {
    let unknown = args.fields.unknown_tags(&ctx.config.vocabulary);
    if !unknown.is_empty() {
        warn!(tags = ?unknown, "tags outside the configured vocabulary");
    }

    let fields = args.fields.to_fields();
    ctx.api
        .create_contact(&fields)
        .context("failed to add contact")?;
    info!(name = %fields.name, "contact added");

    if !ctx.quiet {
        render_success(ctx.output, &format!("Added contact '{}'", fields.name))?;
    }
    Ok(())
}
