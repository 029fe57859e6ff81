//! core::config
//!
//! Project configuration loading.
//!
//! # Precedence
//!
//! The first file found wins:
//! 1. Explicit path (`--config`)
//! 2. `$MODVER_CONFIG` if set
//! 3. `<root>/modver.toml` (canonical)
//! 4. `<root>/.modver.toml` (compatibility, warns)
//!
//! No file found means defaults. CLI flags such as `--ledger` are applied by
//! the caller on top of the loaded values.
//!
//! # Example
//!
//! ```no_run
//! use modver::core::config::Config;
//! use std::path::Path;
//!
//! let result = Config::load(Path::new("/path/to/project"), None).unwrap();
//! let config = result.config;
//!
//! println!("Ledger: {}", config.ledger_path().display());
//! println!("Marker: {}", config.module_marker());
//! ```

pub mod schema;

pub use schema::ProjectConfig;

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "MODVER_CONFIG";

/// Canonical config file name at the project root.
pub const CONFIG_FILE_NAME: &str = "modver.toml";

const COMPAT_CONFIG_FILE_NAME: &str = ".modver.toml";

/// Ledger file name used when none is configured.
pub const DEFAULT_LEDGER_FILE: &str = "versions.yml";

/// Marker file used when none is configured.
pub const DEFAULT_MODULE_MARKER: &str = "Cargo.toml";

const DEFAULT_EXCLUDES: &[&str] = &["target"];

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Warnings generated during config loading.
#[derive(Debug, Clone)]
pub struct ConfigWarning {
    /// The warning message.
    pub message: String,
    /// The path that triggered the warning.
    pub path: PathBuf,
}

/// Result of loading configuration.
#[derive(Debug)]
pub struct ConfigLoadResult {
    /// The loaded configuration.
    pub config: Config,
    /// Any warnings generated during loading.
    pub warnings: Vec<ConfigWarning>,
}

/// Resolved configuration for one project root.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Parsed project file (defaults if none was found)
    pub project: ProjectConfig,
    /// Project root all relative paths resolve against
    root: PathBuf,
    /// Path the project file was loaded from
    loaded_from: Option<PathBuf>,
}

impl Config {
    /// Load configuration for the project rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read, parsed,
    /// or validated. An explicit path that does not exist is a read error.
    pub fn load(root: &Path, explicit: Option<&Path>) -> Result<ConfigLoadResult, ConfigError> {
        let mut warnings = Vec::new();

        let found = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => Self::locate(root, &mut warnings),
        };

        let project = match &found {
            Some(path) => Self::read_project_config(path)?,
            None => ProjectConfig::default(),
        };
        project.validate()?;

        Ok(ConfigLoadResult {
            config: Config {
                project,
                root: root.to_path_buf(),
                loaded_from: found,
            },
            warnings,
        })
    }

    /// Build a config from already-parsed values.
    pub fn from_project(root: &Path, project: ProjectConfig) -> Self {
        Self {
            project,
            root: root.to_path_buf(),
            loaded_from: None,
        }
    }

    /// Find the config file for `root`, if any.
    fn locate(root: &Path, warnings: &mut Vec<ConfigWarning>) -> Option<PathBuf> {
        // 1. Check $MODVER_CONFIG
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        // 2. Check <root>/modver.toml
        let canonical = root.join(CONFIG_FILE_NAME);
        if canonical.exists() {
            return Some(canonical);
        }

        // 3. Check <root>/.modver.toml (compatibility)
        let compat = root.join(COMPAT_CONFIG_FILE_NAME);
        if compat.exists() {
            warnings.push(ConfigWarning {
                message: format!(
                    "Using deprecated config location. Please rename to '{}'",
                    canonical.display()
                ),
                path: compat.clone(),
            });
            return Some(compat);
        }

        None
    }

    /// Read and parse a project config file.
    fn read_project_config(path: &Path) -> Result<ProjectConfig, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Project root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Ledger path, resolved against the project root.
    ///
    /// Defaults to `<root>/versions.yml`.
    pub fn ledger_path(&self) -> PathBuf {
        let ledger = self
            .project
            .ledger
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LEDGER_FILE));
        self.root.join(ledger)
    }

    /// Explicitly configured modules, if any.
    pub fn modules(&self) -> Option<&[String]> {
        self.project.modules.as_deref()
    }

    /// Marker file for module discovery.
    ///
    /// Defaults to `Cargo.toml`.
    pub fn module_marker(&self) -> &str {
        self.project
            .module_marker
            .as_deref()
            .unwrap_or(DEFAULT_MODULE_MARKER)
    }

    /// Directory names skipped during module discovery.
    ///
    /// Defaults to `["target"]`.
    pub fn excluded_dirs(&self) -> Vec<String> {
        match &self.project.exclude {
            Some(exclude) => exclude.clone(),
            None => DEFAULT_EXCLUDES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Get the path the project config was loaded from.
    pub fn loaded_from(&self) -> Option<&Path> {
        self.loaded_from.as_deref()
    }
}
