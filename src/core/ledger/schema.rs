//! core::ledger::schema
//!
//! On-disk document shape for the version ledger.
//!
//! # Format
//!
//! ```yaml
//! versionToPublish: 1.4.0
//! modulesFirstVersion:
//!   core: 1.0.0
//!   utils: XXX
//! ```
//!
//! # Reading
//!
//! Both keys are optional on read (absent or null): a missing
//! `versionToPublish` means `XXX`, a missing `modulesFirstVersion` means no
//! modules. Any other top-level key is rejected.
//!
//! # Writing
//!
//! Both keys are always written. Module names are emitted in ascending order
//! so diffs stay reproducible.

use std::collections::BTreeMap;
use std::convert::Infallible;
use std::fmt;
use std::path::Path;

use serde::de::{self, DeserializeSeed, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use super::LedgerError;
use crate::core::version::Version;

/// Key holding the next version to publish.
pub const VERSION_TO_PUBLISH_KEY: &str = "versionToPublish";

/// Key holding the per-module first versions.
pub const MODULES_FIRST_VERSION_KEY: &str = "modulesFirstVersion";

/// Raw document as read from or written to disk.
///
/// Versions stay strings here; they are validated in [`decode`] so errors can
/// name the key that holds them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LedgerDocument {
    #[serde(rename = "versionToPublish", default)]
    pub version_to_publish: Option<String>,

    #[serde(rename = "modulesFirstVersion", default)]
    pub modules_first_version: Option<ModuleEntries>,
}

/// Raw `modulesFirstVersion` mapping. A module listed twice is an error
/// reported at that module's key.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(transparent)]
pub struct ModuleEntries(pub BTreeMap<String, String>);

impl<'de> Deserialize<'de> for ModuleEntries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ModuleEntriesVisitor)
    }
}

struct ModuleEntriesVisitor;

impl<'de> Visitor<'de> for ModuleEntriesVisitor {
    type Value = ModuleEntries;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a mapping of module names to versions")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut entries = BTreeMap::new();
        while let Some(module) = map.next_key::<String>()? {
            if entries.contains_key(&module) {
                // fail inside the value so the error path names the module
                match map.next_value_seed(DuplicateModule(module))? {}
            }
            let version = map.next_value::<String>()?;
            entries.insert(module, version);
        }
        Ok(ModuleEntries(entries))
    }
}

struct DuplicateModule(String);

impl<'de> DeserializeSeed<'de> for DuplicateModule {
    type Value = Infallible;

    fn deserialize<D: Deserializer<'de>>(self, _deserializer: D) -> Result<Infallible, D::Error> {
        Err(de::Error::custom(format!(
            "module '{}' is listed more than once",
            self.0
        )))
    }
}

/// Validated ledger contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerContents {
    pub version_to_publish: Version,
    pub modules_first_version: BTreeMap<String, Version>,
}

impl Default for LedgerContents {
    fn default() -> Self {
        Self {
            version_to_publish: Version::Unknown,
            modules_first_version: BTreeMap::new(),
        }
    }
}

/// Parse and validate ledger text.
///
/// # Errors
///
/// Returns `LedgerError::Format` naming the offending key when the document
/// has the wrong shape or holds an invalid version string.
pub fn decode(path: &Path, text: &str) -> Result<LedgerContents, LedgerError> {
    if text.trim().is_empty() {
        return Ok(LedgerContents::default());
    }

    let deserializer = serde_yaml::Deserializer::from_str(text);
    let document: LedgerDocument =
        serde_path_to_error::deserialize(deserializer).map_err(|e| LedgerError::Format {
            path: path.to_path_buf(),
            key: e.path().to_string(),
            message: e.into_inner().to_string(),
        })?;

    let version_to_publish = match document.version_to_publish {
        Some(raw) => parse_version(path, VERSION_TO_PUBLISH_KEY.to_string(), &raw)?,
        None => Version::Unknown,
    };

    let mut modules_first_version = BTreeMap::new();
    for (module, raw) in document.modules_first_version.unwrap_or_default().0 {
        let key = format!("{MODULES_FIRST_VERSION_KEY}.{module}");
        let version = parse_version(path, key, &raw)?;
        modules_first_version.insert(module, version);
    }

    Ok(LedgerContents {
        version_to_publish,
        modules_first_version,
    })
}

/// Render ledger contents as YAML.
pub fn encode(contents: &LedgerContents) -> Result<String, LedgerError> {
    let document = LedgerDocument {
        version_to_publish: Some(contents.version_to_publish.to_string()),
        modules_first_version: Some(ModuleEntries(
            contents
                .modules_first_version
                .iter()
                .map(|(module, version)| (module.clone(), version.to_string()))
                .collect(),
        )),
    };

    serde_yaml::to_string(&document).map_err(|e| LedgerError::Serialize(e.to_string()))
}

fn parse_version(path: &Path, key: String, raw: &str) -> Result<Version, LedgerError> {
    Version::parse(raw).map_err(|e| LedgerError::Format {
        path: path.to_path_buf(),
        key,
        message: e.to_string(),
    })
}
