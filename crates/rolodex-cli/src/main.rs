#![forbid(unsafe_code)]

mod cmd;
mod output;
mod tui;

use anyhow::Context as _;
use clap::{CommandFactory, Parser, Subcommand};
use cmd::Context;
use output::{CliError, OutputMode, render_error, resolve_output_mode};
use rolodex_core::client::{ContactApi, HttpContactClient};
use rolodex_core::config::{API_URL_ENV, load_config, resolve_config};
use std::env;
use std::fs;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use tracing::debug;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "rdx: terminal client for a REST contact book",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Base URL of the contact service (overrides ROLODEX_API_URL and config).
    #[arg(long, global = true, value_name = "URL")]
    api_url: Option<String>,

    /// Path to the config file.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Output format.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Shorthand for `--format json`.
    #[arg(long, global = true, hide = true)]
    json: bool,

    /// Suppress non-essential output.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Defaults to `tui` when omitted.
    #[command(subcommand)]
    command: Option<Commands>,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        resolve_output_mode(self.format, self.json)
    }

    const fn is_tui(&self) -> bool {
        matches!(self.command, None | Some(Commands::Tui))
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Interactive",
        about = "Open the interactive contact list",
        long_about = "Open the full-screen contact list with filtering, add, edit and delete.",
        after_help = "EXAMPLES:\n    # Browse contacts\n    rdx tui\n\n    # Point at another server\n    rdx --api-url http://10.0.0.5:3000/api tui"
    )]
    Tui,

    #[command(
        next_help_heading = "Read",
        about = "List contacts",
        long_about = "Fetch every contact and print those matching the optional name and tag filters.",
        after_help = "EXAMPLES:\n    # List everyone\n    rdx list\n\n    # Names containing \"ali\" tagged work\n    rdx list --name ali --tag work\n\n    # Emit machine-readable output\n    rdx list --format json"
    )]
    List(cmd::list::ListArgs),

    #[command(
        next_help_heading = "Read",
        about = "Print the tag vocabulary",
        after_help = "EXAMPLES:\n    # Show configured tags\n    rdx tags"
    )]
    Tags,

    #[command(
        next_help_heading = "Write",
        about = "Add a contact",
        long_about = "Create a contact. Tags outside the configured vocabulary are sent but reported.",
        after_help = "EXAMPLES:\n    # Add a contact\n    rdx add --name Bob --phone 555-0100\n\n    # With tags\n    rdx add --name Bob --phone 555-0100 --tag friend --tag work"
    )]
    Add(cmd::add::AddArgs),

    #[command(
        next_help_heading = "Write",
        about = "Replace a contact's fields",
        long_about = "Overwrite every field of an existing contact.",
        after_help = "EXAMPLES:\n    # Rename and retag\n    rdx update 7 --name Robert --phone 555-0100 --tag work"
    )]
    Update(cmd::update::UpdateArgs),

    #[command(
        next_help_heading = "Write",
        about = "Delete a contact",
        long_about = "Delete a contact by id. Interactive terminals are asked to confirm first.",
        after_help = "EXAMPLES:\n    # Delete after confirming\n    rdx delete 7\n\n    # Skip the prompt\n    rdx delete 7 --yes"
    )]
    Delete(cmd::delete::DeleteArgs),

    #[command(
        next_help_heading = "Shell",
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n    # Bash\n    rdx completions bash > ~/.local/share/bash-completion/completions/rdx"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn default_filter(verbose: bool) -> &'static str {
    if verbose || env::var("DEBUG").is_ok() {
        "info,rolodex=debug,rdx=debug"
    } else {
        "warn,rolodex=info,rdx=info"
    }
}

/// Where log records go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogSink {
    Stderr,
    /// `rolodex.log` under the cache dir. The TUI owns the terminal.
    CacheFile,
    /// JSON output reserves stderr for the error object.
    Discard,
}

impl LogSink {
    const fn choose(tui: bool, output: OutputMode) -> Self {
        if tui {
            Self::CacheFile
        } else if output.is_json() {
            Self::Discard
        } else {
            Self::Stderr
        }
    }

    fn ansi(self) -> bool {
        self == Self::Stderr && io::stderr().is_terminal()
    }

    fn writer(self) -> BoxMakeWriter {
        match self {
            Self::Stderr => BoxMakeWriter::new(io::stderr),
            Self::Discard => BoxMakeWriter::new(io::sink),
            Self::CacheFile => {
                let file = dirs::cache_dir().and_then(|dir| {
                    let dir = dir.join("rolodex");
                    fs::create_dir_all(&dir).ok()?;
                    fs::OpenOptions::new()
                        .create(true)
                        .append(true)
                        .open(dir.join("rolodex.log"))
                        .ok()
                });
                match file {
                    Some(file) => BoxMakeWriter::new(Mutex::new(file)),
                    None => BoxMakeWriter::new(io::sink),
                }
            }
        }
    }
}

fn init_tracing(verbose: bool, sink: LogSink) {
    let filter = EnvFilter::try_from_env("ROLODEX_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    let format = env::var("ROLODEX_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());
    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(sink.writer()))
                .init();
        }
        _ => {
            registry
                .with(
                    fmt::layer()
                        .compact()
                        .with_ansi(sink.ansi())
                        .with_writer(sink.writer()),
                )
                .init();
        }
    }
}

fn run(cli: Cli, output: OutputMode) -> anyhow::Result<()> {
    if let Some(Commands::Completions(args)) = &cli.command {
        let mut command = Cli::command();
        return cmd::completions::run_completions(args.shell, &mut command);
    }

    let file = load_config(cli.config.as_deref()).context("failed to load configuration")?;
    let env_url = env::var(API_URL_ENV).ok();
    let config = resolve_config(&file, cli.api_url.as_deref(), env_url.as_deref())?;
    debug!(base_url = %config.base_url, "configuration resolved");

    let api: Arc<dyn ContactApi> = Arc::new(HttpContactClient::new(config.base_url.clone()));
    let ctx = Context {
        api: api.as_ref(),
        config: &config,
        output,
        quiet: cli.quiet,
    };

    match cli.command {
        None | Some(Commands::Tui) => tui::run_tui(Arc::clone(&api), &config),
        Some(Commands::List(args)) => cmd::list::run_list(&args, &ctx),
        Some(Commands::Tags) => cmd::tags::run_tags(&ctx),
        Some(Commands::Add(args)) => cmd::add::run_add(&args, &ctx),
        Some(Commands::Update(args)) => cmd::update::run_update(&args, &ctx),
        Some(Commands::Delete(args)) => cmd::delete::run_delete(&args, &ctx),
        Some(Commands::Completions(_)) => Ok(()),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let output = cli.output_mode();
    init_tracing(cli.verbose, LogSink::choose(cli.is_tui(), output));

    match run(cli, output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let _ = render_error(output, &CliError::from_anyhow(&err), &mut io::stderr());
            ExitCode::FAILURE
        }
    }
}
