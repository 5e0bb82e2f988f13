//! `rdx list`: fetch the contact list, narrow it client-side, print it.

use crate::cmd::Context;
use crate::output::{OutputMode, render_list};
use anyhow::Context as _;
use clap::Args;
use rolodex_core::filter::{FilterCriteria, apply_filter};
use rolodex_core::view::reconcile;
use std::io::{self, Write};
use tracing::debug;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Case-insensitive substring of the contact name.
    #[arg(long, default_value = "")]
    pub name: String,

    /// Exact tag the contact must carry.
    #[arg(long, default_value = "")]
    pub tag: String,
}

pub fn run_list(args: &ListArgs, ctx: &Context<'_>) -> anyhow::Result<()> {
    let contacts = ctx
        .api
        .list_contacts()
        .context("failed to load contacts")?;
    let criteria = FilterCriteria::new(args.name.clone(), args.tag.clone());
    let visible = apply_filter(&contacts, &criteria);
    debug!(
        total = contacts.len(),
        visible = visible.len(),
        "filtered contact list"
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match reconcile(&visible).placeholder() {
        Some(placeholder) if ctx.output == OutputMode::Pretty => writeln!(out, "{placeholder}")?,
        _ => render_list(&visible, ctx.output, &mut out)?,
    }
    Ok(())
}
