//! sanitize command - Reconcile ledger modules with the project

use std::collections::BTreeSet;

use anyhow::{Context as _, Result};

use crate::cli::Context;
use crate::core::ledger::Ledger;
use crate::core::modules::{self, validate_module_name};
use crate::ui::output;

/// Reconcile the ledger's module map, then persist unless `dry_run`.
///
/// `explicit` modules, when given, replace discovery.
pub fn sanitize(ctx: &Context, explicit: &[String], dry_run: bool) -> Result<()> {
    let current: BTreeSet<String> = if explicit.is_empty() {
        modules::discover(&ctx.config).context("Failed to discover modules")?
    } else {
        for name in explicit {
            validate_module_name(name)?;
        }
        explicit.iter().cloned().collect()
    };

    let mut ledger = Ledger::load(&ctx.ledger_path).context("Failed to load ledger")?;
    let report = ledger.sanitize_modules(current);

    if !report.added.is_empty() {
        output::print("Added:", ctx.verbosity);
        output::print(output::format_list(&report.added, "  + "), ctx.verbosity);
    }
    if !report.removed.is_empty() {
        output::print("Removed:", ctx.verbosity);
        output::print(output::format_list(&report.removed, "  - "), ctx.verbosity);
    }

    if dry_run {
        if report.is_noop() {
            output::print("Ledger modules already in sync.", ctx.verbosity);
        } else {
            output::print("Dry run: ledger not written.", ctx.verbosity);
        }
        return Ok(());
    }

    // Always rewrite, so a first run materializes the file
    ledger.persist().context("Failed to write ledger")?;
    if report.is_noop() {
        output::print("Ledger modules already in sync.", ctx.verbosity);
    }
    Ok(())
}
