//! core::version
//!
//! Semantic version triple with an explicit "unknown" marker.
//!
//! # Textual Form
//!
//! - Release versions render as `<major>.<minor>.<patch>` (e.g. `1.4.0`)
//! - The unknown marker renders as the literal token `XXX`
//!
//! `Version::parse(&v.to_string()) == Ok(v)` holds for every value.
//!
//! # Ordering
//!
//! Release versions compare lexicographically on (major, minor, patch).
//! [`Version::Unknown`] sorts before every release version. It marks an
//! absent value and never stands for a real release.
//!
//! # Example
//!
//! ```
//! use modver::core::version::Version;
//!
//! let v = Version::parse("1.4.2").unwrap();
//! assert_eq!(v.bump_next_minor().unwrap(), Version::new(1, 5, 0));
//! assert!(Version::Unknown < v);
//! assert!(Version::parse("1.2").is_err());
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from version parsing and bumping.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VersionError {
    /// The text is neither `XXX` nor a `<major>.<minor>.<patch>` triple.
    #[error("invalid version '{input}': {reason}")]
    Format { input: String, reason: String },

    /// Bumps are only defined on release versions.
    #[error("cannot bump an unknown version ({})", Version::UNKNOWN_TOKEN)]
    UnknownBump,

    /// A component would exceed `u32::MAX`.
    #[error("{component} component overflows when bumping {version}")]
    Overflow {
        component: &'static str,
        version: String,
    },
}

/// A semantic version, or the unknown marker.
///
/// Values are immutable: every bump returns a new `Version`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Version {
    /// No version recorded yet. Renders as `XXX`.
    Unknown,
    /// A concrete release version.
    Release { major: u32, minor: u32, patch: u32 },
}

impl Version {
    /// Token used for [`Version::Unknown`] in text.
    pub const UNKNOWN_TOKEN: &'static str = "XXX";

    /// Create a release version.
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Version::Release {
            major,
            minor,
            patch,
        }
    }

    /// Parse a version from text.
    ///
    /// Accepts `XXX` or `<major>.<minor>.<patch>` with non-negative decimal
    /// components and no surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns `VersionError::Format` when the text has the wrong shape or
    /// a component does not fit in a `u32`.
    pub fn parse(text: &str) -> Result<Self, VersionError> {
        if text == Self::UNKNOWN_TOKEN {
            return Ok(Version::Unknown);
        }

        let parts: Vec<&str> = text.split('.').collect();
        if parts.len() != 3 {
            return Err(format_error(
                text,
                format!(
                    "expected '<major>.<minor>.<patch>' or '{}'",
                    Self::UNKNOWN_TOKEN
                ),
            ));
        }

        Ok(Version::new(
            parse_component(text, "major", parts[0])?,
            parse_component(text, "minor", parts[1])?,
            parse_component(text, "patch", parts[2])?,
        ))
    }

    /// Whether this is the unknown marker.
    pub fn is_unknown(&self) -> bool {
        matches!(self, Version::Unknown)
    }

    /// The (major, minor, patch) triple of a release version.
    pub fn release(&self) -> Option<(u32, u32, u32)> {
        match *self {
            Version::Unknown => None,
            Version::Release {
                major,
                minor,
                patch,
            } => Some((major, minor, patch)),
        }
    }

    /// `(major + 1).0.0`
    pub fn bump_next_major(self) -> Result<Self, VersionError> {
        let (major, _, _) = self.release_or_err()?;
        Ok(Version::new(self.increment("major", major)?, 0, 0))
    }

    /// `major.(minor + 1).0`
    pub fn bump_next_minor(self) -> Result<Self, VersionError> {
        let (major, minor, _) = self.release_or_err()?;
        Ok(Version::new(major, self.increment("minor", minor)?, 0))
    }

    /// `major.minor.(patch + 1)`
    pub fn bump_next_patch(self) -> Result<Self, VersionError> {
        let (major, minor, patch) = self.release_or_err()?;
        Ok(Version::new(major, minor, self.increment("patch", patch)?))
    }

    fn release_or_err(&self) -> Result<(u32, u32, u32), VersionError> {
        self.release().ok_or(VersionError::UnknownBump)
    }

    fn increment(&self, component: &'static str, value: u32) -> Result<u32, VersionError> {
        value.checked_add(1).ok_or_else(|| VersionError::Overflow {
            component,
            version: self.to_string(),
        })
    }
}

fn format_error(input: &str, reason: impl Into<String>) -> VersionError {
    VersionError::Format {
        input: input.to_string(),
        reason: reason.into(),
    }
}

fn parse_component(input: &str, name: &str, raw: &str) -> Result<u32, VersionError> {
    if raw.is_empty() {
        return Err(format_error(input, format!("{name} component is empty")));
    }
    // u32::from_str accepts a leading '+', digits only here
    if !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format_error(
            input,
            format!("{name} component '{raw}' is not a non-negative integer"),
        ));
    }
    raw.parse::<u32>()
        .map_err(|_| format_error(input, format!("{name} component '{raw}' is out of range")))
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Version::Unknown => f.write_str(Self::UNKNOWN_TOKEN),
            Version::Release {
                major,
                minor,
                patch,
            } => write!(f, "{major}.{minor}.{patch}"),
        }
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Version {
    type Error = VersionError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Version> for String {
    fn from(version: Version) -> Self {
        version.to_string()
    }
}
