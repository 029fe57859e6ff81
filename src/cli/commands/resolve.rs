//! resolve command - Settle unknown first versions

use anyhow::{Context as _, Result};

use crate::cli::Context;
use crate::core::ledger::Ledger;
use crate::ui::output;

/// Set every `XXX` first version to the version to publish and persist.
pub fn resolve(ctx: &Context) -> Result<()> {
    let mut ledger = Ledger::load(&ctx.ledger_path).context("Failed to load ledger")?;
    let target = ledger.version_to_publish();

    let resolved = ledger
        .resolve_unknown_first_versions()
        .context("Failed to resolve first versions")?;

    if resolved.is_empty() {
        output::print("No unknown first versions.", ctx.verbosity);
    } else {
        output::print(format!("First version {}:", target), ctx.verbosity);
        output::print(output::format_list(&resolved, "  "), ctx.verbosity);
    }
    Ok(())
}
