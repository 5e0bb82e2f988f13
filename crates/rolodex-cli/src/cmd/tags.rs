//! `rdx tags`: print the configured tag vocabulary.

use crate::cmd::Context;
use crate::output::{OutputMode, pretty_section};
use serde::Serialize;
use std::io::{self, Write};

#[derive(Debug, Serialize)]
struct TagsOutput<'a> {
    vocabulary: &'a [String],
}

pub fn run_tags(ctx: &Context<'_>) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_tags(&ctx.config.vocabulary, ctx.output, &mut out)?;
    Ok(())
}

fn write_tags(vocabulary: &[String], mode: OutputMode, out: &mut dyn Write) -> anyhow::Result<()> {
    match mode {
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut *out, &TagsOutput { vocabulary })?;
            writeln!(out)?;
        }
        OutputMode::Text => {
            for tag in vocabulary {
                writeln!(out, "{tag}")?;
            }
        }
        OutputMode::Pretty => {
            pretty_section(out, "Tag vocabulary")?;
            for tag in vocabulary {
                writeln!(out, "  [{tag}]")?;
            }
        }
    }
    Ok(())
}
