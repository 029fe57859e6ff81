//! core::config::schema
//!
//! Project configuration schema.
//!
//! # Location
//!
//! Looked up (in order of precedence):
//! 1. `--config <file>`
//! 2. `$MODVER_CONFIG` if set
//! 3. `<root>/modver.toml` (canonical)
//! 4. `<root>/.modver.toml` (compatibility)
//!
//! # Validation
//!
//! Values are validated after parsing: module names must be valid module
//! identifiers, the marker must be a bare file name.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::core::modules::validate_module_name;

/// Project configuration.
///
/// # Example
///
/// ```toml
/// ledger = "versions.yml"
/// modules = ["core", "utils"]
/// module_marker = "Cargo.toml"
/// exclude = ["target", "docs"]
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    /// Ledger file, relative to the project root unless absolute
    pub ledger: Option<PathBuf>,

    /// Explicit module list; disables directory discovery
    pub modules: Option<Vec<String>>,

    /// File whose presence marks a sub-directory as a module
    pub module_marker: Option<String>,

    /// Directory names never treated as modules
    pub exclude: Option<Vec<String>>,
}

impl ProjectConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(ledger) = &self.ledger {
            if ledger.as_os_str().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "ledger path cannot be empty".to_string(),
                ));
            }
        }

        if let Some(modules) = &self.modules {
            for module in modules {
                validate_module_name(module)
                    .map_err(|e| ConfigError::InvalidValue(format!("modules: {}", e)))?;
            }
        }

        if let Some(marker) = &self.module_marker {
            if marker.is_empty() || marker.contains('/') || marker.contains('\\') {
                return Err(ConfigError::InvalidValue(format!(
                    "module_marker must be a file name, got '{}'",
                    marker
                )));
            }
        }

        Ok(())
    }
}
