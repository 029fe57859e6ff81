//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Loads the ledger from the context's ledger path
//! 2. Calls ledger operations (which persist where documented)
//! 3. Formats and displays output
//!
//! Read-only commands never write the ledger, even when it is absent.

mod artifact;
mod bump;
mod completion;
mod get;
mod init;
mod resolve;
mod sanitize;
mod show;

// Re-export command functions for testing and direct invocation
pub use artifact::artifact_version;
pub use bump::bump;
pub use completion::completion;
pub use get::get;
pub use init::init;
pub use resolve::resolve;
pub use sanitize::sanitize;
pub use show::show;

use crate::cli::args::Command;
use crate::cli::Context;
use anyhow::Result;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Show { json } => show(ctx, json),
        Command::Get { module } => get(ctx, module.as_deref()),
        Command::Bump { part } => bump(ctx, part),
        Command::Sanitize { modules, dry_run } => sanitize(ctx, &modules, dry_run),
        Command::Resolve => resolve(ctx),
        Command::Init { initial, force } => init(ctx, &initial, force),
        Command::ArtifactVersion { suffix } => artifact_version(ctx, suffix.as_deref()),
        Command::Completion { shell } => completion(shell),
    }
}
