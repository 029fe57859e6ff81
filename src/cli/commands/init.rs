//! init command - Create the ledger file

use anyhow::{bail, Context as _, Result};

use crate::cli::Context;
use crate::core::ledger::Ledger;
use crate::core::modules;
use crate::core::version::Version;
use crate::ui::output;

/// Create a ledger with `initial` as the version to publish and the
/// discovered modules recorded as `XXX`.
///
/// # Arguments
///
/// * `ctx` - Execution context
/// * `initial` - First version to publish
/// * `force` - Overwrite an existing ledger
pub fn init(ctx: &Context, initial: &str, force: bool) -> Result<()> {
    let version = Version::parse(initial).context("Invalid initial version")?;
    if version.is_unknown() {
        bail!("Initial version must be a release version, not {}", version);
    }

    if ctx.ledger_path.exists() && !force {
        bail!(
            "Ledger already exists at '{}'. Use --force to overwrite.",
            ctx.ledger_path.display()
        );
    }

    let current = modules::discover(&ctx.config).context("Failed to discover modules")?;

    let mut ledger = Ledger::empty(&ctx.ledger_path);
    ledger.set_version_to_publish(version)?;
    let report = ledger.sanitize_modules(current);
    ledger.persist().context("Failed to write ledger")?;

    output::print(
        format!(
            "Initialized {} (version {}, {} module(s))",
            ledger.path().display(),
            version,
            report.added.len()
        ),
        ctx.verbosity,
    );
    Ok(())
}
