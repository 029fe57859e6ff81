//! modver - Version ledger for multi-module projects
//!
//! modver keeps one small, human-editable YAML file per project that records
//! the next version to publish for the whole project and the version in
//! which each module first appeared.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to core)
//! - [`core`] - Version type, ledger, configuration, module discovery
//! - [`ui`] - User-facing output
//! - [`logging`] - Diagnostic logging setup
//!
//! # Correctness Invariants
//!
//! 1. A module's first version is written once (`XXX` to a release version)
//! 2. Every ledger write replaces the whole file atomically
//! 3. Malformed ledger files fail loudly and are never rewritten

pub mod cli;
pub mod core;
pub mod logging;
pub mod ui;
