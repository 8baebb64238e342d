//! Target framework names and assembly reference filtering.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::Version;
use crate::error::PackageError;

const NET_FRAMEWORK: &str = ".NETFramework";
const SILVERLIGHT: &str = "Silverlight";
const NET_MICRO_FRAMEWORK: &str = ".NETMicroFramework";

/// A framework such as `.NETFramework,Version=v4.0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FrameworkName {
    identifier: String,
    version: Version,
}

impl FrameworkName {
    pub fn new(identifier: impl Into<String>, version: Version) -> Self {
        Self {
            identifier: identifier.into(),
            version,
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    /// Parse a `lib/` folder short name like `net40`, `net35`, `sl4` or `net4.0`.
    /// Unknown prefixes and malformed versions yield `None`.
    pub fn from_short_name(folder: &str) -> Option<Self> {
        // Profiles (net40-client) share the framework of their base name
        let folder = folder.split('-').next().unwrap_or(folder).to_ascii_lowercase();
        let split = folder.find(|c: char| c.is_ascii_digit())?;
        let (prefix, digits) = folder.split_at(split);

        let identifier = match prefix {
            "net" | "" => NET_FRAMEWORK,
            "sl" | "silverlight" => SILVERLIGHT,
            "netmf" => NET_MICRO_FRAMEWORK,
            _ => return None,
        };

        let version = if digits.contains('.') {
            digits.parse().ok()?
        } else {
            if !digits.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            let mut parts: Vec<String> = digits.chars().map(String::from).collect();
            if parts.len() == 1 {
                parts.push("0".to_string());
            }
            parts.join(".").parse().ok()?
        };

        Some(Self::new(identifier, version))
    }
}

impl FromStr for FrameworkName {
    type Err = PackageError;

    /// Parses the long form `<Identifier>,Version=v<version>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PackageError::InvalidArgument {
            name: "targetFramework",
        };

        let (identifier, rest) = s.split_once(',').ok_or_else(invalid)?;
        let version = rest
            .trim()
            .strip_prefix("Version=")
            .ok_or_else(invalid)?
            .trim_start_matches('v');

        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Err(invalid());
        }

        Ok(Self::new(identifier, version.parse()?))
    }
}

impl fmt::Display for FrameworkName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},Version=v{}", self.identifier, self.version)
    }
}

impl TryFrom<String> for FrameworkName {
    type Error = PackageError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FrameworkName> for String {
    fn from(framework: FrameworkName) -> Self {
        framework.to_string()
    }
}

/// An assembly shipped under `lib/`, optionally scoped to a framework folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyReference {
    /// Path inside the package, e.g. `lib/net40/a.dll`.
    pub path: String,
    /// File name used as the reference name in the project.
    pub name: String,
    pub framework: Option<FrameworkName>,
}

/// Select the references a project targeting `target` should use.
///
/// References are grouped by framework. The group with the highest version not
/// above the target (and the same identifier) wins, then the framework-less
/// group. `None` means nothing is compatible. A project without a target
/// framework takes every reference.
pub fn compatible_assembly_references<'a>(
    target: Option<&FrameworkName>,
    references: &'a [AssemblyReference],
) -> Option<Vec<&'a AssemblyReference>> {
    let Some(target) = target else {
        return Some(references.iter().collect());
    };

    let best = references
        .iter()
        .filter_map(|r| r.framework.as_ref())
        .filter(|f| {
            f.identifier.eq_ignore_ascii_case(&target.identifier) && f.version <= target.version
        })
        .max_by(|a, b| a.version.cmp(&b.version));

    let selected: Vec<&AssemblyReference> = match best {
        Some(framework) => references
            .iter()
            .filter(|r| r.framework.as_ref() == Some(framework))
            .collect(),
        None => references.iter().filter(|r| r.framework.is_none()).collect(),
    };

    if selected.is_empty() {
        None
    } else {
        Some(selected)
    }
}
