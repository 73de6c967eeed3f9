//! Sweep command implementation.

use anyhow::{bail, Result};
use std::io;

use crate::cli::SweepArgs;
use crate::config::{Config, SweepConfig};
use crate::dedup::Confirm;
use crate::orchestrator::{SweepOptions, SweepSummary, Sweeper};
use crate::prompt::{select_operations, AutoConfirm, Operations, PromptConfirmer};
use crate::scanner::format_size;

/// Run the sweep command.
pub fn run(args: SweepArgs, config: Config, quiet: bool) -> Result<()> {
    let mut config = config;
    apply_overrides(&mut config.sweep, &args)?;
    config.validate()?;

    let ops = match &args.path {
        Some(path) => Operations {
            root: path.clone(),
            purge_cache: config.sweep.purge_cache_dirs,
            dedup: true,
            min_size: config.sweep.min_size,
        },
        None => {
            let mut stdin = io::stdin();
            let mut stdout = io::stdout();
            select_operations(&mut stdin, &mut stdout, &config.sweep)?
        }
    };

    if !ops.dedup {
        println!("No operation selected. Exiting the program.");
        return Ok(());
    }

    let mut options = SweepOptions::from_config(&ops.root, &config);
    options.purge_cache = ops.purge_cache;
    options.min_size = ops.min_size;
    options.dry_run = args.dry_run;
    options.show_progress = !quiet;

    let confirmer: Box<dyn Confirm> = if args.dry_run {
        println!("[DRY RUN] Nothing will be deleted.");
        Box::new(AutoConfirm::No)
    } else if args.yes {
        Box::new(AutoConfirm::Yes)
    } else {
        Box::new(PromptConfirmer::new(io::stdin(), io::stdout()))
    };

    tracing::info!(root = %ops.root.display(), purge = ops.purge_cache, min_size = ops.min_size, "Starting sweep");

    let summary = match Sweeper::new(options).run(confirmer) {
        Ok(summary) => summary,
        Err(e) => {
            tracing::error!("Sweep of {} aborted: {}", ops.root.display(), e);
            return Err(e.into());
        }
    };

    print_summary(&summary);
    Ok(())
}

/// Command line values win over the config file.
fn apply_overrides(sweep: &mut SweepConfig, args: &SweepArgs) -> Result<()> {
    if args.purge_cache {
        sweep.purge_cache_dirs = true;
    }
    if !args.cache_dir.is_empty() {
        sweep.cache_dir_names = args.cache_dir.clone();
    }
    if let Some(min_size) = args.min_size {
        sweep.min_size = min_size;
    }
    if let Some(batch_size) = args.batch_size {
        if batch_size == 0 {
            bail!("--batch-size must be at least 1");
        }
        sweep.batch_size = batch_size;
    }
    if args.one_file_system {
        sweep.one_file_system = true;
    }
    Ok(())
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

fn print_summary(summary: &SweepSummary) {
    println!("\nResults:");

    if let Some(purge) = &summary.purge {
        println!(
            "  Cache dirs: {} removed, {} freed",
            purge.removed_count,
            format_size(purge.total_freed)
        );
        if purge.skipped_count > 0 {
            println!(
                "  Would remove: {} cache dir{}",
                purge.skipped_count,
                plural(purge.skipped_count)
            );
        }
        if purge.failed_count > 0 {
            println!(
                "  Failed:  {} cache dir{}",
                purge.failed_count,
                plural(purge.failed_count)
            );
        }
    }

    let scan = &summary.scan;
    println!(
        "  Scanned: {} file{}",
        scan.files_scanned,
        plural(scan.files_scanned)
    );
    if scan.files_below_min > 0 {
        println!("  Ignored: {} below the size floor", scan.files_below_min);
    }
    println!(
        "  Duplicates: {} in {} batch{}",
        scan.duplicates_found,
        scan.batches_flushed,
        if scan.batches_flushed == 1 { "" } else { "es" }
    );

    let deletion = &summary.deletion;
    println!(
        "  Deleted: {} file{}",
        deletion.files_deleted,
        plural(deletion.files_deleted)
    );
    if deletion.batches_declined > 0 {
        println!(
            "  Kept:    {} batch{}",
            deletion.batches_declined,
            if deletion.batches_declined == 1 { "" } else { "es" }
        );
    }
    if deletion.removal_failures > 0 {
        println!(
            "  Failed:  {} file{}",
            deletion.removal_failures,
            plural(deletion.removal_failures)
        );
    }
    if scan.hash_failures > 0 {
        println!(
            "  Unreadable: {} file{}",
            scan.hash_failures,
            plural(scan.hash_failures)
        );
    }
    println!("  Freed:   {}", format_size(summary.freed_bytes));
}
