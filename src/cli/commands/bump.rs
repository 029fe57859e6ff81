//! bump command - Advance the version to publish

use anyhow::{Context as _, Result};

use crate::cli::Context;
use crate::core::ledger::{BumpKind, Ledger};
use crate::ui::output;

/// Bump the version to publish and persist the ledger.
pub fn bump(ctx: &Context, kind: BumpKind) -> Result<()> {
    let mut ledger = Ledger::load(&ctx.ledger_path).context("Failed to load ledger")?;
    let previous = ledger.version_to_publish();

    let next = ledger
        .bump(kind)
        .with_context(|| format!("Failed to bump {} version", kind))?;

    if ctx.quiet() {
        output::value(next);
    } else {
        output::value(format!("{} -> {}", previous, next));
    }
    Ok(())
}
