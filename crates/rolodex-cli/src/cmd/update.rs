//! `rdx update`: replace the writable fields of an existing contact.

use crate::cmd::{Context, FieldArgs};
use crate::output::render_success;
use anyhow::Context as _;
use clap::Args;
use rolodex_core::model::ContactId;
use tracing::{info, warn};

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Id of the contact to update.
    pub id: String,

    #[command(flatten)]
    pub fields: FieldArgs,
}

pub fn run_update(args: &UpdateArgs, ctx: &Context<'_>) -> anyhow::Result<()> {
    let unknown = args.fields.unknown_tags(&ctx.config.vocabulary);
    if !unknown.is_empty() {
        warn!(tags = ?unknown, "tags outside the configured vocabulary");
    }

    let id = ContactId::new(args.id.trim());
    let fields = args.fields.to_fields();
    ctx.api
        .update_contact(&id, &fields)
        .with_context(|| format!("failed to update contact {id}"))?;
    info!(%id, "contact updated");

    if !ctx.quiet {
        render_success(ctx.output, &format!("Updated contact {id}"))?;
    }
    Ok(())
}
