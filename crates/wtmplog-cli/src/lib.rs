//! Login accounting CLI library.
//!
//! This crate provides the CLI interface for the login accounting log.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands, DatabaseArgs};
pub use config::Config;
