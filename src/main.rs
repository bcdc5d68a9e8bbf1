//! # Media Reconcile - Main Entry Point
//!
//! ## Responsibilities:
//! - Parse the command line with `clap`
//! - Initialize logging with `tracing`
//! - Layer the configuration (file, environment, flags) and validate it
//! - Run one task, or the interactive task menu when no command is given
//!
//! ## Usage:
//! ```bash
//! media-reconcile --originals /photos/originals --storage /photos/storage private
//! media-reconcile --dry-run --yes organise
//! media-reconcile            # interactive menu
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dialoguer::console::Term;
use dialoguer::Select;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use media_reconciler::json_output::JsonMessage;
use media_reconciler::{Config, HashAlgorithm, Reconciler, Task, TerminalPrompter};

#[derive(Parser)]
#[command(name = "media-reconcile")]
#[command(about = "Reconcile PhotoPrism originals with their sidecar files")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Root of the original media files
    #[arg(long)]
    originals: Option<PathBuf>,

    /// Root of the sidecar files
    #[arg(long)]
    sidecar: Option<PathBuf>,

    /// PhotoPrism storage folder (sidecars are read from <storage>/sidecar)
    #[arg(long)]
    storage: Option<PathBuf>,

    /// Where orphan sidecars are moved
    #[arg(long)]
    lost_and_found: Option<PathBuf>,

    /// JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the effective configuration back to the config file
    #[arg(long)]
    save_config: bool,

    /// Don't ask, apply every operation
    #[arg(short, long)]
    yes: bool,

    /// Dry run - log operations but don't move or rename anything
    #[arg(long)]
    dry_run: bool,

    /// Checksum used for canonical names
    #[arg(long, value_enum)]
    hash: Option<HashAlgorithm>,

    /// Output events as JSON for programmatic use
    #[arg(long)]
    json: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand, Clone, Copy)]
enum Command {
    /// Move private media to originals/private
    Private,
    /// Move archived media to originals/archived
    Archived,
    /// Move sidecars without media to the lost-and-found folder
    Orphans,
    /// Move media into year/month folders
    Organise,
    /// Rename media stacks to their canonical names
    Rename,
}

impl From<Command> for Task {
    fn from(command: Command) -> Self {
        match command {
            Command::Private => Task::MovePrivate,
            Command::Archived => Task::MoveArchived,
            Command::Orphans => Task::Orphans,
            Command::Organise => Task::Organise,
            Command::Rename => Task::Rename,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // RUST_LOG wins over --verbose
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if args.verbose { "debug" } else { "info" }));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let json_output = args.json;
    if let Err(e) = run(args).await {
        if json_output {
            JsonMessage::Error { message: format!("{:#}", e) }.emit();
        }
        error!("{:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

async fn run(args: Args) -> Result<()> {
    let config_file = args.config.clone().or_else(Config::default_file);
    let mut config = Config::load(config_file.as_deref())
        .await
        .context("Failed to load configuration")?;

    apply_args(&mut config, &args);
    config.validate()?;

    if args.save_config {
        let path = config_file.context("No config file location available")?;
        config.save_to_file(&path).await?;
        info!("Saved configuration to {}", path.display());
    }

    let reconciler = Reconciler::new(config);
    let mut prompter = TerminalPrompter;

    match args.command {
        Some(command) => {
            reconciler.run(command.into(), &mut prompter).await?;
        }
        None => loop {
            let Some(task) = choose_task()? else {
                info!("Bye");
                break;
            };
            reconciler.run(task, &mut prompter).await?;
        },
    }

    Ok(())
}

/// CLI flags override everything loaded so far
fn apply_args(config: &mut Config, args: &Args) {
    if let Some(ref originals) = args.originals {
        config.originals_path = originals.clone();
    }
    if let Some(ref storage) = args.storage {
        config.sidecar_path = storage.join("sidecar");
    }
    if let Some(ref sidecar) = args.sidecar {
        config.sidecar_path = sidecar.clone();
    }
    if let Some(ref lost_and_found) = args.lost_and_found {
        config.lost_and_found_path = lost_and_found.clone();
    }
    if let Some(hash) = args.hash {
        config.hash_algorithm = hash;
    }
    config.auto_confirm |= args.yes;
    config.dry_run |= args.dry_run;
    config.json_output |= args.json;
}

/// Task menu, `None` when the user quits
fn choose_task() -> Result<Option<Task>> {
    let mut items: Vec<&str> = Task::ALL.iter().map(Task::label).collect();
    items.push("Quit");

    let selection = Select::new()
        .with_prompt("What do you want to do?")
        .items(&items)
        .default(0)
        .interact_on(&Term::stderr())?;

    Ok(Task::ALL.get(selection).copied())
}
