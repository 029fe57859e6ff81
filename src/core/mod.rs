//! core
//!
//! Core domain types, the version ledger, and project configuration.
//!
//! # Modules
//!
//! - [`version`] - Semantic version triple with the `XXX` unknown marker
//! - [`ledger`] - Version ledger: load, mutate, sanitize, persist
//! - [`modules`] - Module enumeration for a project root
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Versions are immutable values; every bump yields a new one
//! - The ledger is an explicit value passed to each operation, never global
//! - Malformed on-disk state is an error, never silently repaired

pub mod config;
pub mod ledger;
pub mod modules;
pub mod version;
