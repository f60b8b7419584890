use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use wtmplog_cli::commands::{boot, last, shutdown};
use wtmplog_cli::{Cli, Commands, Config, DatabaseArgs};

/// Resolve the database path: an explicit `--database` beats the
/// configured location.
fn database_path(args: &DatabaseArgs, config_path: Option<&Path>) -> Result<PathBuf> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");
    Ok(args
        .database
        .clone()
        .unwrap_or(config.database_path))
}

/// Open the database read-write, ensuring the parent directory exists.
fn open_database(path: &Path) -> Result<wtmplog_db::Database> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }
    wtmplog_db::Database::open(path).with_context(|| format!("failed to open {}", path.display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // try_init: a subscriber may already be installed when run from tests
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    match &cli.command {
        Some(Commands::Last(args)) => {
            let path = database_path(args, cli.config.as_deref())?;
            let mut stdout = io::stdout().lock();
            last::run(&mut stdout, &path)?;
        }
        Some(Commands::Boot(args)) => {
            let path = database_path(args, cli.config.as_deref())?;
            let db = open_database(&path)?;
            boot::run(&db)?;
        }
        Some(Commands::Shutdown(args)) => {
            let path = database_path(args, cli.config.as_deref())?;
            let db = open_database(&path)?;
            shutdown::run(&db)?;
        }
        None => {
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
