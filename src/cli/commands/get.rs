//! get command - Print a single version

use anyhow::{Context as _, Result};

use crate::cli::Context;
use crate::core::ledger::{Ledger, LedgerError};
use crate::ui::output;

/// Print the version to publish, or the first version of `module`.
pub fn get(ctx: &Context, module: Option<&str>) -> Result<()> {
    let ledger = Ledger::load(&ctx.ledger_path).context("Failed to load ledger")?;

    let version = match module {
        None => ledger.version_to_publish(),
        Some(name) => ledger
            .module_first_version(name)
            .ok_or_else(|| LedgerError::UnknownModule(name.to_string()))?,
    };

    output::value(version);
    Ok(())
}
