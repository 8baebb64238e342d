//! Package versions and version constraints.
//!
//! Versions are dotted numeric `major.minor[.build[.revision]]`. A missing
//! component sorts before any present one, so `1.0 < 1.0.0`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PackageError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Version {
    major: u32,
    minor: u32,
    build: Option<u32>,
    revision: Option<u32>,
}

impl Version {
    pub fn new(major: u32, minor: u32) -> Self {
        Self {
            major,
            minor,
            build: None,
            revision: None,
        }
    }

    pub fn with_build(mut self, build: u32) -> Self {
        self.build = Some(build);
        self
    }

    pub fn major(&self) -> u32 {
        self.major
    }

    pub fn minor(&self) -> u32 {
        self.minor
    }

    pub fn build(&self) -> Option<u32> {
        self.build
    }

    pub fn revision(&self) -> Option<u32> {
        self.revision
    }
}

impl FromStr for Version {
    type Err = PackageError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || PackageError::InvalidVersion {
            value: s.to_string(),
        };

        let parts = s
            .trim()
            .split('.')
            .map(|part| {
                if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(invalid());
                }
                part.parse::<u32>().map_err(|_| invalid())
            })
            .collect::<Result<Vec<u32>>>()?;

        match parts.as_slice() {
            [major, minor] => Ok(Version::new(*major, *minor)),
            [major, minor, build] => Ok(Version::new(*major, *minor).with_build(*build)),
            [major, minor, build, revision] => Ok(Version {
                major: *major,
                minor: *minor,
                build: Some(*build),
                revision: Some(*revision),
            }),
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)?;
        if let Some(build) = self.build {
            write!(f, ".{}", build)?;
        }
        if let Some(revision) = self.revision {
            write!(f, ".{}", revision)?;
        }
        Ok(())
    }
}

impl TryFrom<String> for Version {
    type Error = PackageError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Version> for String {
    fn from(version: Version) -> Self {
        version.to_string()
    }
}

/// Constraint on the versions a dependency accepts. All bounds are inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum VersionSpec {
    Exact(Version),
    AtLeast(Version),
    AtMost(Version),
    Range { min: Version, max: Version },
}

impl VersionSpec {
    pub fn satisfies(&self, version: &Version) -> bool {
        match self {
            VersionSpec::Exact(exact) => version == exact,
            VersionSpec::AtLeast(min) => version >= min,
            VersionSpec::AtMost(max) => version <= max,
            VersionSpec::Range { min, max } => min <= version && version <= max,
        }
    }

    /// Whether the constraint names a minimum version. Resolution prefers the
    /// lowest acceptable version in that case and the highest otherwise.
    pub fn has_lower_bound(&self) -> bool {
        !matches!(self, VersionSpec::AtMost(_))
    }

    /// Human readable form used in messages, e.g. `>= 1.0 && <= 2.0`.
    pub fn describe(&self) -> String {
        match self {
            VersionSpec::Exact(v) => format!("= {}", v),
            VersionSpec::AtLeast(v) => format!(">= {}", v),
            VersionSpec::AtMost(v) => format!("<= {}", v),
            VersionSpec::Range { min, max } => format!(">= {} && <= {}", min, max),
        }
    }
}

impl FromStr for VersionSpec {
    type Err = PackageError;

    /// Parses interval notation: `1.0` / `[1.0,)` (at least), `[1.0]` (exact),
    /// `(,2.0]` (at most), `[1.0,2.0]` (range).
    fn from_str(s: &str) -> Result<Self> {
        let value = s.trim();
        let invalid = |reason: &str| PackageError::InvalidVersionSpec {
            value: s.to_string(),
            reason: reason.to_string(),
        };

        if value.is_empty() {
            return Err(invalid("empty version spec"));
        }

        let starts_interval = value.starts_with('[') || value.starts_with('(');
        if !starts_interval {
            return Ok(VersionSpec::AtLeast(value.parse()?));
        }

        if value.len() < 2 || !(value.ends_with(']') || value.ends_with(')')) {
            return Err(invalid("unterminated interval"));
        }

        let open_exclusive = value.starts_with('(');
        let close_exclusive = value.ends_with(')');
        let inner = &value[1..value.len() - 1];

        let Some((low, high)) = inner.split_once(',') else {
            if open_exclusive || close_exclusive {
                return Err(invalid("exact version must use square brackets"));
            }
            return Ok(VersionSpec::Exact(inner.parse()?));
        };

        let low = low.trim();
        let high = high.trim();

        // An open end is written with a parenthesis; a bound with one would be exclusive
        if open_exclusive && !low.is_empty() {
            return Err(invalid("exclusive lower bounds are not supported"));
        }
        if close_exclusive && !high.is_empty() {
            return Err(invalid("exclusive upper bounds are not supported"));
        }

        match (low.is_empty(), high.is_empty()) {
            (true, true) => Err(invalid("at least one bound is required")),
            (false, true) => Ok(VersionSpec::AtLeast(low.parse()?)),
            (true, false) => Ok(VersionSpec::AtMost(high.parse()?)),
            (false, false) => {
                let min: Version = low.parse()?;
                let max: Version = high.parse()?;
                if min > max {
                    return Err(invalid("minimum is greater than maximum"));
                }
                Ok(VersionSpec::Range { min, max })
            }
        }
    }
}

impl fmt::Display for VersionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionSpec::Exact(v) => write!(f, "[{}]", v),
            VersionSpec::AtLeast(v) => write!(f, "{}", v),
            VersionSpec::AtMost(v) => write!(f, "(,{}]", v),
            VersionSpec::Range { min, max } => write!(f, "[{},{}]", min, max),
        }
    }
}

impl TryFrom<String> for VersionSpec {
    type Error = PackageError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<VersionSpec> for String {
    fn from(spec: VersionSpec) -> Self {
        spec.to_string()
    }
}
