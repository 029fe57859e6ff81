//! artifact-version command - Print the publishable artifact version

use anyhow::{Context as _, Result};

use crate::cli::Context;
use crate::core::ledger::Ledger;
use crate::ui::output;

/// Print the version to publish followed by `suffix`.
pub fn artifact_version(ctx: &Context, suffix: Option<&str>) -> Result<()> {
    let ledger = Ledger::load(&ctx.ledger_path).context("Failed to load ledger")?;
    let version = ledger
        .artifact_version(suffix)
        .context("Cannot compute artifact version")?;
    output::value(version);
    Ok(())
}
