//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--cwd <path>`: Project root (defaults to the current directory)
//! - `--config <file>`: Project config file
//! - `--ledger <file>`: Ledger file, overriding the config
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::core::ledger::BumpKind;

/// modver - Version ledger for multi-module projects
#[derive(Parser, Debug)]
#[command(name = "modver")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Run as if modver was started in this directory
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,

    /// Project config file (default: <root>/modver.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Ledger file (default: from config, else <root>/versions.yml)
    #[arg(long, global = true, value_name = "FILE")]
    pub ledger: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the version to publish and every module's first version
    #[command(
        name = "show",
        after_help = "\
EXAMPLES:
    modver show
    modver show --json"
    )]
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the version to publish, or a module's first version
    #[command(
        name = "get",
        long_about = "Print the version to publish.\n\n\
            With a MODULE argument, print the version in which that module first \
            appeared instead. Fails if the module is not recorded in the ledger."
    )]
    Get {
        /// Module to look up
        module: Option<String>,
    },

    /// Bump the version to publish and save the ledger
    #[command(
        name = "bump",
        after_help = "\
EXAMPLES:
    modver bump patch    # 1.4.2 -> 1.4.3
    modver bump minor    # 1.4.2 -> 1.5.0
    modver bump major    # 1.4.2 -> 2.0.0"
    )]
    Bump {
        /// Component to bump
        #[arg(value_enum)]
        part: BumpKind,
    },

    /// Reconcile the ledger's modules with the project's modules
    #[command(
        name = "sanitize",
        long_about = "Reconcile the ledger's modules with the project's modules.\n\n\
            Modules that left the project are removed; new modules are added with \
            the unknown version (XXX). Modules come from --module flags, else the \
            config's module list, else sub-directories holding the marker file.",
        after_help = "\
EXAMPLES:
    # Reconcile with discovered modules
    modver sanitize

    # Preview without writing
    modver sanitize --dry-run

    # Use an explicit module set
    modver sanitize --module core --module utils"
    )]
    Sanitize {
        /// Authoritative module name (repeatable)
        #[arg(long = "module", value_name = "NAME")]
        modules: Vec<String>,

        /// Show what would change without writing
        #[arg(long)]
        dry_run: bool,
    },

    /// Set unknown first versions to the version to publish
    #[command(
        name = "resolve",
        long_about = "Mark every module whose first version is unknown (XXX) as \
            first published in the current version to publish, then save the ledger."
    )]
    Resolve,

    /// Create the ledger file
    #[command(name = "init")]
    Init {
        /// Initial version to publish
        #[arg(long = "initial", value_name = "VERSION", default_value = "0.1.0")]
        initial: String,

        /// Overwrite an existing ledger
        #[arg(long)]
        force: bool,
    },

    /// Print the publishable artifact version
    #[command(
        name = "artifact-version",
        after_help = "\
EXAMPLES:
    modver artifact-version                     # 1.4.0
    modver artifact-version --suffix -SNAPSHOT  # 1.4.0-SNAPSHOT"
    )]
    ArtifactVersion {
        /// Pre-release or build suffix appended verbatim
        #[arg(long, allow_hyphen_values = true)]
        suffix: Option<String>,
    },

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        after_help = "\
EXAMPLES:
    modver completion bash >> ~/.bashrc
    modver completion zsh >> ~/.zshrc"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
