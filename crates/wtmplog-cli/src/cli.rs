//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Login accounting log.
///
/// Records boot and login sessions in a durable store and renders them as
/// a "last"-style history.
#[derive(Debug, Parser)]
#[command(name = "wtmplog", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show the session history, newest first.
    Last(DatabaseArgs),

    /// Record a boot marker for the current system start.
    Boot(DatabaseArgs),

    /// Close the current boot marker at system shutdown.
    Shutdown(DatabaseArgs),
}

/// Options shared by all subcommands.
#[derive(Debug, Args)]
pub struct DatabaseArgs {
    /// Use FILE as the session database.
    #[arg(short, long, value_name = "FILE")]
    pub database: Option<PathBuf>,
}
