//! core::modules
//!
//! Module enumeration for a project root.
//!
//! The module set is the authoritative input to
//! [`Ledger::sanitize_modules`](crate::core::ledger::Ledger::sanitize_modules).
//! It comes from the `modules` list in the project config when present,
//! otherwise from the immediate sub-directories of the root that contain the
//! marker file.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::core::config::Config;

/// Errors from module discovery.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModuleError {
    #[error("failed to list modules under '{path}': {message}")]
    Read { path: PathBuf, message: String },

    #[error("invalid module name '{name}': {reason}")]
    InvalidName { name: String, reason: String },
}

/// Check that `name` can be used as a module identifier.
///
/// Names cannot be empty, start with `.`, or contain whitespace, control
/// characters, or path separators.
pub fn validate_module_name(name: &str) -> Result<(), ModuleError> {
    let invalid = |reason: &str| -> Result<(), ModuleError> {
        Err(ModuleError::InvalidName {
            name: name.to_string(),
            reason: reason.to_string(),
        })
    };

    if name.is_empty() {
        return invalid("name cannot be empty");
    }
    if name.starts_with('.') {
        return invalid("name cannot start with '.'");
    }
    if name.contains('/') || name.contains('\\') {
        return invalid("name cannot contain path separators");
    }
    if name.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return invalid("name cannot contain whitespace or control characters");
    }
    Ok(())
}

/// Determine the current module set for the project.
///
/// # Errors
///
/// - `ModuleError::Read` if the root cannot be listed
/// - `ModuleError::InvalidName` if a discovered directory name is not a
///   valid module name
pub fn discover(config: &Config) -> Result<BTreeSet<String>, ModuleError> {
    if let Some(modules) = config.modules() {
        for module in modules {
            validate_module_name(module)?;
        }
        debug!(count = modules.len(), "using configured module list");
        return Ok(modules.iter().cloned().collect());
    }

    scan_dirs(config.root(), config.module_marker(), &config.excluded_dirs())
}

fn scan_dirs(
    root: &Path,
    marker: &str,
    excluded: &[String],
) -> Result<BTreeSet<String>, ModuleError> {
    let read_err = |e: std::io::Error| ModuleError::Read {
        path: root.to_path_buf(),
        message: e.to_string(),
    };

    let mut modules = BTreeSet::new();
    for entry in fs::read_dir(root).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        if !entry.file_type().map_err(read_err)?.is_dir() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') || excluded.iter().any(|e| *e == name) {
            continue;
        }
        if !entry.path().join(marker).is_file() {
            continue;
        }

        validate_module_name(&name)?;
        modules.insert(name);
    }

    debug!(root = %root.display(), marker, modules = ?modules, "modules discovered");
    Ok(modules)
}
