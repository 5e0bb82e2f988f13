//! One-shot subcommands. Each runs a single request synchronously and prints
//! the result in the resolved [`OutputMode`].

pub mod add;
pub mod completions;
pub mod delete;
pub mod list;
pub mod tags;
pub mod update;

use crate::output::OutputMode;
use clap::Args;
use rolodex_core::client::ContactApi;
use rolodex_core::config::ResolvedConfig;
use rolodex_core::model::{ContactFields, TagSet};

/// Everything a subcommand needs besides its own arguments.
pub struct Context<'a> {
    pub api: &'a dyn ContactApi,
    pub config: &'a ResolvedConfig,
    pub output: OutputMode,
    pub quiet: bool,
}

/// Writable contact fields shared by `add` and `update`.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct FieldArgs {
    /// Display name.
    #[arg(long)]
    pub name: String,

    /// Phone number.
    #[arg(long)]
    pub phone: String,

    /// Postal address (omit to leave blank).
    #[arg(long)]
    pub address: Option<String>,

    /// Email address (omit to leave blank).
    #[arg(long)]
    pub email: Option<String>,

    /// Tag to attach; repeat for several, or pass a comma-joined list.
    #[arg(long = "tag", value_name = "TAG")]
    pub tags: Vec<String>,
}

impl FieldArgs {
    pub fn to_fields(&self) -> ContactFields {
        ContactFields {
            name: self.name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            address: self.address.as_deref().unwrap_or("").trim().to_string(),
            email: self.email.as_deref().unwrap_or("").trim().to_string(),
            tags: self.tags.iter().collect::<TagSet>(),
        }
    }

    /// Tags not offered by the configured vocabulary.
    pub fn unknown_tags(&self, vocabulary: &[String]) -> Vec<String> {
        self.to_fields()
            .tags
            .iter()
            .filter(|tag| !vocabulary.iter().any(|known| known == tag))
            .map(str::to_string)
            .collect()
    }
}
