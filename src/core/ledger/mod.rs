//! core::ledger
//!
//! Persistent record of the next version to publish and the first version of
//! every module.
//!
//! # Lifecycle
//!
//! 1. [`Ledger::load`] reads the backing file (absent file ⇒ fresh ledger)
//! 2. Callers mutate in memory: [`Ledger::sanitize_modules`],
//!    [`Ledger::set_version_to_publish`], [`Ledger::record_first_version`]
//! 3. [`Ledger::persist`] rewrites the whole file atomically
//!
//! The bump operations and [`Ledger::resolve_unknown_first_versions`] persist
//! on their own. Sanitizing never does, so callers can inspect the result
//! before committing it.
//!
//! # Invariants
//!
//! - A module's first version only ever moves from `XXX` to a release version
//! - The persisted file always carries both top-level keys
//! - A failed write never leaves a partially written ledger behind
//!
//! # Example
//!
//! ```no_run
//! use modver::core::ledger::Ledger;
//!
//! let mut ledger = Ledger::load("versions.yml").unwrap();
//! let report = ledger.sanitize_modules(["core", "utils"]);
//! if !report.is_noop() {
//!     ledger.persist().unwrap();
//! }
//! ledger.bump_minor().unwrap();
//! ```

pub mod schema;

pub use schema::{LedgerContents, MODULES_FIRST_VERSION_KEY, VERSION_TO_PUBLISH_KEY};

use std::collections::BTreeSet;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use thiserror::Error;
use tracing::{debug, info};

use crate::core::version::{Version, VersionError};

/// Errors from ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("failed to read ledger '{path}': {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write ledger '{path}': {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("invalid ledger '{path}' at key '{key}': {message}")]
    Format {
        path: PathBuf,
        key: String,
        message: String,
    },

    #[error("failed to serialize ledger: {0}")]
    Serialize(String),

    #[error(transparent)]
    Version(#[from] VersionError),

    #[error("module '{0}' is not recorded in the ledger")]
    UnknownModule(String),

    #[error("module '{module}' first appeared in {recorded}; refusing to change it to {requested}")]
    FirstVersionConflict {
        module: String,
        recorded: Version,
        requested: Version,
    },

    #[error("version to publish must increase: {current} -> {requested}")]
    NotIncreasing { current: Version, requested: Version },

    #[error("the version to publish is unknown ({})", Version::UNKNOWN_TOKEN)]
    UnknownVersionToPublish,
}

/// Which component a bump advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BumpKind {
    /// `(major + 1).0.0`
    Major,
    /// `major.(minor + 1).0`
    Minor,
    /// `major.minor.(patch + 1)`
    Patch,
}

impl BumpKind {
    /// Apply this bump to a version.
    pub fn apply(self, version: Version) -> Result<Version, VersionError> {
        match self {
            BumpKind::Major => version.bump_next_major(),
            BumpKind::Minor => version.bump_next_minor(),
            BumpKind::Patch => version.bump_next_patch(),
        }
    }
}

impl std::fmt::Display for BumpKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            BumpKind::Major => "major",
            BumpKind::Minor => "minor",
            BumpKind::Patch => "patch",
        };
        f.write_str(name)
    }
}

/// Changes made by [`Ledger::sanitize_modules`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SanitizeReport {
    /// Modules inserted with `XXX`, sorted.
    pub added: Vec<String>,
    /// Modules dropped because they left the project, sorted.
    pub removed: Vec<String>,
}

impl SanitizeReport {
    /// True when the module map was already in sync.
    pub fn is_noop(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// The version ledger bound to its backing file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ledger {
    path: PathBuf,
    contents: LedgerContents,
}

impl Ledger {
    /// A fresh ledger for `path`: version `XXX`, no modules. Does not touch disk.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            contents: LedgerContents::default(),
        }
    }

    /// Load the ledger stored at `path`.
    ///
    /// A missing file is the first-run state and yields [`Ledger::empty`].
    ///
    /// # Errors
    ///
    /// - `LedgerError::Read` if the path is not a regular file or cannot be read
    /// - `LedgerError::Format` if the content is malformed
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, LedgerError> {
        let path = path.into();

        let metadata = match fs::metadata(&path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "ledger file absent, starting empty");
                return Ok(Self::empty(path));
            }
            Err(e) => return Err(LedgerError::Read { path, source: e }),
        };

        if !metadata.is_file() {
            return Err(LedgerError::Read {
                path,
                source: io::Error::new(io::ErrorKind::Other, "not a regular file"),
            });
        }

        let text = fs::read_to_string(&path).map_err(|e| LedgerError::Read {
            path: path.clone(),
            source: e,
        })?;
        let contents = schema::decode(&path, &text)?;

        debug!(
            path = %path.display(),
            version_to_publish = %contents.version_to_publish,
            modules = contents.modules_first_version.len(),
            "ledger loaded"
        );

        Ok(Self { path, contents })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The next version to release for the whole project.
    pub fn version_to_publish(&self) -> Version {
        self.contents.version_to_publish
    }

    /// First version of `module`, or `None` if it was never recorded.
    pub fn module_first_version(&self, module: &str) -> Option<Version> {
        self.contents.modules_first_version.get(module).copied()
    }

    /// All recorded modules, sorted by name.
    pub fn modules(&self) -> impl Iterator<Item = (&str, Version)> {
        self.contents
            .modules_first_version
            .iter()
            .map(|(name, version)| (name.as_str(), *version))
    }

    /// Modules whose first version is still `XXX`.
    pub fn unresolved_modules(&self) -> Vec<&str> {
        self.modules()
            .filter(|(_, version)| version.is_unknown())
            .map(|(name, _)| name)
            .collect()
    }

    /// Bump the major component of the version to publish and persist.
    pub fn bump_major(&mut self) -> Result<Version, LedgerError> {
        self.bump(BumpKind::Major)
    }

    /// Bump the minor component of the version to publish and persist.
    pub fn bump_minor(&mut self) -> Result<Version, LedgerError> {
        self.bump(BumpKind::Minor)
    }

    /// Bump the patch component of the version to publish and persist.
    pub fn bump_patch(&mut self) -> Result<Version, LedgerError> {
        self.bump(BumpKind::Patch)
    }

    /// Replace the version to publish with its bump, then persist.
    ///
    /// Returns the new version. If the write fails the previous version is
    /// restored in memory.
    ///
    /// # Errors
    ///
    /// - `LedgerError::Version` when the current version is `XXX` or overflows
    /// - `LedgerError::Write` / `LedgerError::Serialize` when persisting fails
    pub fn bump(&mut self, kind: BumpKind) -> Result<Version, LedgerError> {
        let previous = self.contents.version_to_publish;
        let next = kind.apply(previous)?;

        self.contents.version_to_publish = next;
        if let Err(e) = self.persist() {
            self.contents.version_to_publish = previous;
            return Err(e);
        }

        info!(%previous, %next, kind = %kind, "version to publish bumped");
        Ok(next)
    }

    /// Set the version to publish without persisting.
    ///
    /// Any release version is accepted while the current one is `XXX`;
    /// otherwise the new version must be strictly greater.
    pub fn set_version_to_publish(&mut self, version: Version) -> Result<(), LedgerError> {
        let current = self.contents.version_to_publish;
        if version.is_unknown() || (!current.is_unknown() && version <= current) {
            return Err(LedgerError::NotIncreasing {
                current,
                requested: version,
            });
        }
        self.contents.version_to_publish = version;
        Ok(())
    }

    /// Reconcile recorded modules with the authoritative module set.
    ///
    /// Modules missing from `current` are removed; modules missing from the
    /// ledger are added with `XXX`. Existing entries keep their version.
    /// Does not persist.
    pub fn sanitize_modules<I, S>(&mut self, current: I) -> SanitizeReport
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let current: BTreeSet<String> = current.into_iter().map(Into::into).collect();
        let map = &mut self.contents.modules_first_version;

        let removed: Vec<String> = map
            .keys()
            .filter(|name| !current.contains(*name))
            .cloned()
            .collect();
        for name in &removed {
            map.remove(name);
        }

        let mut added = Vec::new();
        for name in current {
            if !map.contains_key(&name) {
                map.insert(name.clone(), Version::Unknown);
                added.push(name);
            }
        }

        debug!(added = ?added, removed = ?removed, "modules sanitized");
        SanitizeReport { added, removed }
    }

    /// Record that `module` first shipped in `version`. Does not persist.
    ///
    /// Setting the value it already holds is a no-op.
    ///
    /// # Errors
    ///
    /// - `LedgerError::UnknownModule` if the module is not in the ledger
    /// - `LedgerError::FirstVersionConflict` if a different release version
    ///   is already recorded, or `version` is `XXX` over a release version
    pub fn record_first_version(
        &mut self,
        module: &str,
        version: Version,
    ) -> Result<(), LedgerError> {
        let entry = self
            .contents
            .modules_first_version
            .get_mut(module)
            .ok_or_else(|| LedgerError::UnknownModule(module.to_string()))?;

        if *entry == version {
            return Ok(());
        }
        if !entry.is_unknown() {
            return Err(LedgerError::FirstVersionConflict {
                module: module.to_string(),
                recorded: *entry,
                requested: version,
            });
        }

        *entry = version;
        Ok(())
    }

    /// Set every `XXX` first version to the version to publish, then persist.
    ///
    /// Returns the modules that were resolved. If the write fails the
    /// modules are left unresolved in memory.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::UnknownVersionToPublish` when there is something
    /// to resolve but the version to publish is itself `XXX`.
    pub fn resolve_unknown_first_versions(&mut self) -> Result<Vec<String>, LedgerError> {
        let target = self.contents.version_to_publish;
        let unresolved: Vec<String> = self
            .unresolved_modules()
            .into_iter()
            .map(str::to_string)
            .collect();

        if !unresolved.is_empty() && target.is_unknown() {
            return Err(LedgerError::UnknownVersionToPublish);
        }

        let previous = self.contents.modules_first_version.clone();
        for module in &unresolved {
            self.record_first_version(module, target)?;
        }
        if let Err(e) = self.persist() {
            self.contents.modules_first_version = previous;
            return Err(e);
        }

        info!(version = %target, resolved = ?unresolved, "first versions resolved");
        Ok(unresolved)
    }

    /// The publishable artifact version: the version to publish followed by
    /// an optional pre-release or build suffix (e.g. `-SNAPSHOT`).
    pub fn artifact_version(&self, suffix: Option<&str>) -> Result<String, LedgerError> {
        let version = self.contents.version_to_publish;
        if version.is_unknown() {
            return Err(LedgerError::UnknownVersionToPublish);
        }
        Ok(format!("{}{}", version, suffix.unwrap_or_default()))
    }

    /// Write the full ledger to its backing file.
    ///
    /// Creates parent directories as needed. The content is written to a
    /// sibling temp file and renamed over the target.
    pub fn persist(&self) -> Result<(), LedgerError> {
        let text = schema::encode(&self.contents)?;
        write_atomic(&self.path, text.as_bytes())?;
        debug!(path = %self.path.display(), "ledger persisted");
        Ok(())
    }
}

/// Temp file next to `path`, so the final rename stays on one filesystem.
fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "ledger".to_string());
    path.with_file_name(format!(".{name}.tmp"))
}

/// Flush the directory entry created by the rename.
#[cfg(unix)]
fn sync_parent(path: &Path) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
fn sync_parent(_path: &Path) -> io::Result<()> {
    Ok(())
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), LedgerError> {
    let write_err = |p: &Path, e: io::Error| LedgerError::Write {
        path: p.to_path_buf(),
        source: e,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| write_err(path, e))?;
        }
    }

    let temp = temp_path(path);
    let result = (|| -> io::Result<()> {
        let mut file = fs::File::create(&temp)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        fs::rename(&temp, path)?;
        sync_parent(path)
    })();

    result.map_err(|e| {
        let _ = fs::remove_file(&temp);
        write_err(path, e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn ledger_with(
        dir: &TempDir,
        publish: Version,
        modules: &[(&str, Version)],
    ) -> Ledger {
        let mut ledger = Ledger::empty(dir.path().join("versions.yml"));
        ledger.contents.version_to_publish = publish;
        for (name, version) in modules {
            ledger
                .contents
                .modules_first_version
                .insert(name.to_string(), *version);
        }
        ledger
    }

    #[test]
    fn load_missing_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let ledger = Ledger::load(temp.path().join("nope.yml")).unwrap();

        assert_eq!(ledger.version_to_publish(), Version::Unknown);
        assert_eq!(ledger.modules().count(), 0);
    }

    #[test]
    fn load_directory_is_read_error() {
        let temp = TempDir::new().unwrap();
        let err = Ledger::load(temp.path()).unwrap_err();
        assert!(matches!(err, LedgerError::Read { .. }));
    }

    #[test]
    fn load_malformed_is_format_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("versions.yml");
        fs::write(&path, "versionToPublish: 1.2.x\n").unwrap();

        let err = Ledger::load(&path).unwrap_err();
        match err {
            LedgerError::Format { key, .. } => assert_eq!(key, VERSION_TO_PUBLISH_KEY),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn persist_then_load_round_trips() {
        let temp = TempDir::new().unwrap();
        let ledger = ledger_with(
            &temp,
            Version::new(1, 4, 0),
            &[("core", Version::new(1, 0, 0)), ("utils", Version::Unknown)],
        );

        ledger.persist().unwrap();
        assert_eq!(Ledger::load(ledger.path()).unwrap(), ledger);
    }

    #[test]
    fn persist_empty_round_trips() {
        let temp = TempDir::new().unwrap();
        let ledger = Ledger::empty(temp.path().join("versions.yml"));

        ledger.persist().unwrap();
        let text = fs::read_to_string(ledger.path()).unwrap();
        assert!(text.contains(VERSION_TO_PUBLISH_KEY));
        assert!(text.contains(MODULES_FIRST_VERSION_KEY));
        assert_eq!(Ledger::load(ledger.path()).unwrap(), ledger);
    }

    #[test]
    fn persist_creates_parent_dirs_and_leaves_no_temp() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("build/meta/versions.yml");
        let ledger = Ledger::empty(&path);

        ledger.persist().unwrap();
        assert!(path.is_file());
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn persist_fully_replaces_content() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("versions.yml");
        fs::write(
            &path,
            "versionToPublish: 9.9.9\nmodulesFirstVersion:\n  old: 1.0.0\n  older: 0.1.0\n",
        )
        .unwrap();

        let mut ledger = Ledger::load(&path).unwrap();
        ledger.sanitize_modules(["new"]);
        ledger.persist().unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(!text.contains("old"));
        assert!(text.contains("new: XXX"));
    }

    #[test]
    fn bump_operations_persist() {
        let temp = TempDir::new().unwrap();
        let mut ledger = ledger_with(&temp, Version::new(1, 4, 2), &[]);

        assert_eq!(ledger.bump_patch().unwrap(), Version::new(1, 4, 3));
        assert_eq!(ledger.bump_minor().unwrap(), Version::new(1, 5, 0));
        assert_eq!(ledger.bump_major().unwrap(), Version::new(2, 0, 0));

        let reloaded = Ledger::load(ledger.path()).unwrap();
        assert_eq!(reloaded.version_to_publish(), Version::new(2, 0, 0));
    }

    #[test]
    fn bump_does_not_touch_modules() {
        let temp = TempDir::new().unwrap();
        let mut ledger = ledger_with(&temp, Version::new(1, 0, 0), &[("a", Version::Unknown)]);

        ledger.bump_minor().unwrap();
        assert_eq!(ledger.module_first_version("a"), Some(Version::Unknown));
    }

    #[test]
    fn bump_unknown_fails_without_writing() {
        let temp = TempDir::new().unwrap();
        let mut ledger = Ledger::empty(temp.path().join("versions.yml"));

        let err = ledger.bump_major().unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Version(VersionError::UnknownBump)
        ));
        assert!(!ledger.path().exists());
    }

    #[test]
    fn failed_persist_restores_previous_version() {
        let temp = TempDir::new().unwrap();
        // the ledger path is an existing directory, so the rename fails
        let path = temp.path().join("versions.yml");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), "x").unwrap();

        let mut ledger = Ledger::empty(&path);
        ledger.contents.version_to_publish = Version::new(1, 0, 0);

        assert!(matches!(
            ledger.bump_patch(),
            Err(LedgerError::Write { .. })
        ));
        assert_eq!(ledger.version_to_publish(), Version::new(1, 0, 0));
        assert!(!temp_path(&path).exists());
    }

    #[test]
    #[cfg(unix)]
    fn parent_directory_sync() {
        let temp = TempDir::new().unwrap();
        assert!(sync_parent(&temp.path().join("versions.yml")).is_ok());
        assert!(sync_parent(Path::new("versions.yml")).is_ok());
        assert!(sync_parent(&temp.path().join("gone/versions.yml")).is_err());
    }

    #[test]
    fn sanitize_adds_and_removes() {
        let temp = TempDir::new().unwrap();
        let mut ledger = ledger_with(
            &temp,
            Version::new(1, 0, 0),
            &[("a", Version::new(1, 0, 0)), ("b", Version::Unknown)],
        );

        let report = ledger.sanitize_modules(["a", "c"]);

        assert_eq!(report.added, vec!["c".to_string()]);
        assert_eq!(report.removed, vec!["b".to_string()]);
        let map: BTreeMap<&str, Version> = ledger.modules().collect();
        assert_eq!(
            map,
            BTreeMap::from([("a", Version::new(1, 0, 0)), ("c", Version::Unknown)])
        );
    }

    #[test]
    fn sanitize_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let mut ledger = ledger_with(&temp, Version::Unknown, &[("x", Version::new(0, 1, 0))]);

        ledger.sanitize_modules(["x", "y", "z"]);
        let once = ledger.clone();
        let report = ledger.sanitize_modules(["z", "y", "x"]);

        assert!(report.is_noop());
        assert_eq!(ledger, once);
    }

    #[test]
    fn sanitize_does_not_persist() {
        let temp = TempDir::new().unwrap();
        let mut ledger = Ledger::empty(temp.path().join("versions.yml"));

        ledger.sanitize_modules(["core"]);
        assert!(!ledger.path().exists());
    }

    #[test]
    fn resolve_sets_unknown_to_publish_version() {
        let temp = TempDir::new().unwrap();
        let mut ledger = ledger_with(
            &temp,
            Version::new(2, 0, 0),
            &[("a", Version::Unknown), ("b", Version::new(1, 0, 0))],
        );

        let resolved = ledger.resolve_unknown_first_versions().unwrap();

        assert_eq!(resolved, vec!["a".to_string()]);
        assert_eq!(ledger.module_first_version("a"), Some(Version::new(2, 0, 0)));
        assert_eq!(ledger.module_first_version("b"), Some(Version::new(1, 0, 0)));
        assert_eq!(Ledger::load(ledger.path()).unwrap(), ledger);
    }

    #[test]
    fn resolve_with_unknown_publish_version_fails() {
        let temp = TempDir::new().unwrap();
        let mut ledger = ledger_with(&temp, Version::Unknown, &[("a", Version::Unknown)]);

        assert!(matches!(
            ledger.resolve_unknown_first_versions(),
            Err(LedgerError::UnknownVersionToPublish)
        ));
        assert_eq!(ledger.module_first_version("a"), Some(Version::Unknown));
    }

    #[test]
    fn failed_resolve_persist_keeps_modules_unresolved() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("versions.yml");
        let mut ledger = Ledger::empty(&path);
        ledger.contents.version_to_publish = Version::new(2, 0, 0);
        ledger
            .contents
            .modules_first_version
            .insert("a".to_string(), Version::Unknown);

        // a non-empty directory at the ledger path makes the rename fail
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), "x").unwrap();

        assert!(matches!(
            ledger.resolve_unknown_first_versions(),
            Err(LedgerError::Write { .. })
        ));
        assert_eq!(ledger.module_first_version("a"), Some(Version::Unknown));
        assert_eq!(ledger.unresolved_modules(), vec!["a"]);
    }

    #[test]
    fn record_first_version_is_write_once() {
        let temp = TempDir::new().unwrap();
        let mut ledger = ledger_with(&temp, Version::new(1, 0, 0), &[("a", Version::Unknown)]);

        ledger.record_first_version("a", Version::new(1, 0, 0)).unwrap();
        ledger.record_first_version("a", Version::new(1, 0, 0)).unwrap();

        let err = ledger
            .record_first_version("a", Version::new(1, 1, 0))
            .unwrap_err();
        assert!(matches!(err, LedgerError::FirstVersionConflict { .. }));
        assert!(matches!(
            ledger.record_first_version("a", Version::Unknown),
            Err(LedgerError::FirstVersionConflict { .. })
        ));
        assert!(matches!(
            ledger.record_first_version("missing", Version::new(1, 0, 0)),
            Err(LedgerError::UnknownModule(_))
        ));
    }

    #[test]
    fn set_version_to_publish_must_increase() {
        let temp = TempDir::new().unwrap();
        let mut ledger = Ledger::empty(temp.path().join("versions.yml"));

        ledger.set_version_to_publish(Version::new(0, 1, 0)).unwrap();
        ledger.set_version_to_publish(Version::new(0, 2, 0)).unwrap();
        assert!(matches!(
            ledger.set_version_to_publish(Version::new(0, 2, 0)),
            Err(LedgerError::NotIncreasing { .. })
        ));
        assert!(ledger.set_version_to_publish(Version::Unknown).is_err());
        assert!(!ledger.path().exists());
    }

    #[test]
    fn artifact_version_appends_suffix() {
        let temp = TempDir::new().unwrap();
        let ledger = ledger_with(&temp, Version::new(1, 2, 0), &[]);

        assert_eq!(ledger.artifact_version(None).unwrap(), "1.2.0");
        assert_eq!(
            ledger.artifact_version(Some("-SNAPSHOT")).unwrap(),
            "1.2.0-SNAPSHOT"
        );
        assert!(Ledger::empty("x.yml").artifact_version(None).is_err());
    }
}
