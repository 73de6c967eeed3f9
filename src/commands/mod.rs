//! Subcommand implementations.

pub mod sweep;
