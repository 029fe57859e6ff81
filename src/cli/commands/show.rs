//! show command - Display the whole ledger

use std::collections::BTreeMap;

use anyhow::{Context as _, Result};
use serde::Serialize;

use crate::cli::Context;
use crate::core::ledger::Ledger;
use crate::core::version::Version;
use crate::ui::output;

/// JSON shape of `show --json`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ShowOutput<'a> {
    path: String,
    version_to_publish: Version,
    modules_first_version: BTreeMap<&'a str, Version>,
    unresolved: Vec<&'a str>,
}

/// Show the version to publish and every module's first version.
pub fn show(ctx: &Context, json: bool) -> Result<()> {
    let ledger = Ledger::load(&ctx.ledger_path).context("Failed to load ledger")?;

    if json {
        let out = ShowOutput {
            path: ledger.path().display().to_string(),
            version_to_publish: ledger.version_to_publish(),
            modules_first_version: ledger.modules().collect(),
            unresolved: ledger.unresolved_modules(),
        };
        output::value(serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    output::value(format!(
        "Version to publish: {}",
        ledger.version_to_publish()
    ));

    let width = ledger.modules().map(|(name, _)| name.len()).max();
    match width {
        None => output::print("No modules recorded.", ctx.verbosity),
        Some(width) => {
            output::print("Modules (first version):", ctx.verbosity);
            for (name, version) in ledger.modules() {
                output::value(format!("  {}", output::format_module(name, version, width)));
            }
        }
    }

    Ok(())
}
