//! Villa Showcase - terminal preview and gallery admin CLI
//!
//! Runs the interactive carousel/booking-calendar preview and offers
//! scriptable commands for the categories, items and hero images stored in
//! the data directory.

use std::fs::File;
use std::path::PathBuf;
use std::process;
use std::sync::Mutex;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use villa_showcase::cli::{
    CategoryArgs, CliContext, CliError, CliResult, HeroArgs, InitArgs, ItemArgs, PreviewArgs,
    ValidateArgs,
};
use villa_showcase::config::Config;

/// Villa Showcase - carousel and booking calendar preview with gallery admin tools
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Command to run (defaults to `preview`)
    #[command(subcommand)]
    command: Option<Command>,

    /// Data directory (overrides [storage].data_dir)
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open the interactive preview
    Preview(PreviewArgs),
    /// Manage gallery categories
    Category(CategoryArgs),
    /// Inspect gallery items
    Item(ItemArgs),
    /// Inspect hero images
    Hero(HeroArgs),
    /// Check a file against the upload rules
    Validate(ValidateArgs),
    /// Seed default categories
    Init(InitArgs),
}

fn main() {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Preview(PreviewArgs::default()));

    if let Err(e) = init_logging(&command, cli.verbose) {
        eprintln!("Warning: {e:#}");
    }

    if let Err(err) = run(command, cli.config, cli.data_dir) {
        eprintln!("Error: {err}");
        process::exit(err.exit_code());
    }
}

fn run(command: Command, config: Option<PathBuf>, data_dir: Option<PathBuf>) -> CliResult<()> {
    let config = match config {
        Some(path) => Config::load_from(&path),
        None => Config::load(),
    }
    .map_err(|e| CliError::io(format!("Failed to load config: {e:#}")))?;

    let ctx = CliContext::new(config, data_dir)?;

    match command {
        Command::Preview(args) => args.execute(&ctx),
        Command::Category(args) => args.execute(&ctx),
        Command::Item(args) => args.execute(&ctx),
        Command::Hero(args) => args.execute(&ctx),
        Command::Validate(args) => args.execute(&ctx),
        Command::Init(args) => args.execute(&ctx),
    }
}

/// Logs go to stderr, except during the preview where the terminal belongs
/// to the UI and logs are only written with `--log-file`.
fn init_logging(command: &Command, verbose: bool) -> anyhow::Result<()> {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into());

    match command {
        Command::Preview(PreviewArgs {
            log_file: Some(path),
            ..
        }) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file: {}", path.display()))?;
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .try_init()?;
        }
        Command::Preview(_) => {}
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .try_init()?;
        }
    }

    Ok(())
}
