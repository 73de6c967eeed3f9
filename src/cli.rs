use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::scanner::parse_size;

/// Dupe Sweeper - find and remove duplicate files and dependency caches
#[derive(Parser, Debug)]
#[command(name = "dupe-sweeper")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Remove duplicate files (and optionally cache directories)
    Sweep(SweepArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

#[derive(Args, Debug, Default)]
pub struct SweepArgs {
    /// Root directory to sweep (asked interactively when omitted)
    pub path: Option<PathBuf>,

    /// Delete cache directories (node_modules by default) before deduplicating
    #[arg(short, long)]
    pub purge_cache: bool,

    /// Cache directory name to purge (can be specified multiple times)
    #[arg(long, value_name = "NAME")]
    pub cache_dir: Vec<String>,

    /// Ignore files smaller than this (e.g. 4096, 10KB, 1.5MB)
    #[arg(short, long, value_name = "SIZE", value_parser = parse_min_size)]
    pub min_size: Option<u64>,

    /// Delete every batch without asking
    #[arg(short, long, conflicts_with = "dry_run")]
    pub yes: bool,

    /// Show what would be deleted without deleting anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Don't cross filesystem boundaries
    #[arg(short = 'x', long)]
    pub one_file_system: bool,

    /// Duplicates shown per confirmation prompt
    #[arg(short, long, value_name = "N", value_parser = clap::value_parser!(usize))]
    pub batch_size: Option<usize>,
}

fn parse_min_size(s: &str) -> Result<u64, String> {
    parse_size(s).ok_or_else(|| format!("invalid size '{}'", s))
}
