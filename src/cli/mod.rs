//! cli
//!
//! Command-line interface layer for modver.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Resolve the project root, config, and ledger path into a [`Context`]
//! - Delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. Handlers load the [`Ledger`](crate::core::ledger::Ledger),
//! call its operations, and print results. Every write goes through the
//! ledger's own persist step.

pub mod args;
pub mod commands;

pub use args::Cli;

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use tracing::debug;

use crate::core::config::Config;
use crate::logging;
use crate::ui::output::{self, Verbosity};

/// Resolved execution context shared by all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Project configuration, rooted at the project directory
    pub config: Config,
    /// Ledger file every command reads and writes
    pub ledger_path: PathBuf,
    /// Output verbosity
    pub verbosity: Verbosity,
}

impl Context {
    /// Build a context from parsed CLI flags.
    ///
    /// `--ledger` overrides the configured ledger path; relative paths are
    /// resolved against the project root.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let root = match &cli.cwd {
            Some(cwd) => cwd.clone(),
            None => std::env::current_dir().context("Failed to determine current directory")?,
        };
        let verbosity = Verbosity::from_flags(cli.quiet, cli.debug);

        let loaded = Config::load(&root, cli.config.as_deref()).context("Failed to load config")?;
        for warning in &loaded.warnings {
            output::warn(
                format!("{} ({})", warning.message, warning.path.display()),
                verbosity,
            );
        }
        let config = loaded.config;

        let ledger_path = match &cli.ledger {
            Some(path) => root.join(path),
            None => config.ledger_path(),
        };

        debug!(
            root = %root.display(),
            config = ?config.loaded_from(),
            ledger = %ledger_path.display(),
            "context resolved"
        );

        Ok(Self {
            config,
            ledger_path,
            verbosity,
        })
    }

    /// Whether quiet mode is on.
    pub fn quiet(&self) -> bool {
        self.verbosity == Verbosity::Quiet
    }
}

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();
    logging::init(cli.debug);

    // Completion needs no project context
    if let args::Command::Completion { shell } = cli.command {
        return commands::completion(shell);
    }

    let ctx = Context::from_cli(&cli)?;
    commands::dispatch(cli.command, &ctx)
}
