//! CLI subcommand implementations.

pub mod boot;
pub mod last;
pub mod shutdown;
