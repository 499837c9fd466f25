//! CLI subcommand implementations.

pub mod effects;
pub mod generate;
pub mod process;
