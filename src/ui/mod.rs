//! ui
//!
//! User interaction utilities.
//!
//! # Modules
//!
//! - [`output`] - Output formatting and display
//!
//! # Design
//!
//! All user-facing output goes through this module so quiet mode and
//! stdout/stderr routing are handled in one place. Diagnostics use
//! `tracing` instead (see [`crate::logging`]).

pub mod output;
