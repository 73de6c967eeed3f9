//! Dupe Sweeper - reclaim disk space from duplicate files
//!
//! This crate provides functionality for:
//! - Purging dependency cache directories such as `node_modules`
//! - Finding byte-identical files by SHA-256 digest
//! - Deleting duplicates in confirmed batches with a live freed-space line

pub mod cleaner;
pub mod cli;
pub mod commands;
pub mod config;
pub mod dedup;
pub mod error;
pub mod kind;
pub mod orchestrator;
pub mod progress;
pub mod prompt;
pub mod scanner;

// Re-export commonly used types
pub use config::Config;
pub use error::{Result, SweeperError};
pub use orchestrator::{SweepOptions, SweepSummary, Sweeper};
