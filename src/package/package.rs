//! Packages, their identities and their files.

use std::fmt;
use std::hash::{Hash, Hasher};

use super::{AssemblyReference, FrameworkName, PackageDependency, Version};

const LIB_DIRECTORY: &str = "lib";
const CONTENT_DIRECTORY: &str = "content";
const ASSEMBLY_EXTENSION: &str = ".dll";

/// `{id, version}` with a case-insensitive id.
#[derive(Debug, Clone, Eq)]
pub struct PackageIdentity {
    pub id: String,
    pub version: Version,
}

impl PackageIdentity {
    pub fn new(id: impl Into<String>, version: Version) -> Self {
        Self {
            id: id.into(),
            version,
        }
    }
}

impl PartialEq for PackageIdentity {
    fn eq(&self, other: &Self) -> bool {
        self.id.eq_ignore_ascii_case(&other.id) && self.version == other.version
    }
}

impl Hash for PackageIdentity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.to_ascii_lowercase().hash(state);
        self.version.hash(state);
    }
}

impl fmt::Display for PackageIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.id, self.version)
    }
}

/// A file shipped by a package, addressed by a forward-slash relative path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageFile {
    pub path: String,
    pub contents: Vec<u8>,
}

impl PackageFile {
    pub fn new(path: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into().replace('\\', "/"),
            contents: contents.into(),
        }
    }
}

/// An immutable package. Shared through `Arc` once it leaves a repository.
#[derive(Debug, Clone)]
pub struct Package {
    id: String,
    version: Version,
    description: Option<String>,
    authors: Vec<String>,
    dependencies: Vec<PackageDependency>,
    files: Vec<PackageFile>,
}

impl Package {
    pub fn new(id: impl Into<String>, version: Version) -> Self {
        Self {
            id: id.into(),
            version,
            description: None,
            authors: Vec::new(),
            dependencies: Vec::new(),
            files: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_authors(mut self, authors: Vec<String>) -> Self {
        self.authors = authors;
        self
    }

    pub fn with_dependency(mut self, dependency: PackageDependency) -> Self {
        self.dependencies.push(dependency);
        self
    }

    pub fn with_file(mut self, file: PackageFile) -> Self {
        self.files.push(file);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn authors(&self) -> &[String] {
        &self.authors
    }

    pub fn dependencies(&self) -> &[PackageDependency] {
        &self.dependencies
    }

    pub fn files(&self) -> &[PackageFile] {
        &self.files
    }

    pub fn identity(&self) -> PackageIdentity {
        PackageIdentity::new(self.id.clone(), self.version)
    }

    /// Display name, e.g. `A 1.0`.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.id, self.version)
    }

    pub fn is_same_id(&self, id: &str) -> bool {
        self.id.eq_ignore_ascii_case(id)
    }

    /// Every `*.dll` below `lib/`. A direct child has no framework; one level
    /// deeper takes the framework from the folder's short name.
    pub fn assembly_references(&self) -> Vec<AssemblyReference> {
        self.files
            .iter()
            .filter_map(|file| {
                let rest = strip_directory(&file.path, LIB_DIRECTORY)?;
                if !rest.to_ascii_lowercase().ends_with(ASSEMBLY_EXTENSION) {
                    return None;
                }
                let name = rest.rsplit('/').next().unwrap_or(rest).to_string();
                let framework = match rest.split_once('/') {
                    Some((folder, _)) => FrameworkName::from_short_name(folder),
                    None => None,
                };
                Some(AssemblyReference {
                    path: file.path.clone(),
                    name,
                    framework,
                })
            })
            .collect()
    }

    /// Files below `content/` paired with their project-relative path.
    pub fn content_files(&self) -> impl Iterator<Item = (&str, &PackageFile)> {
        self.files
            .iter()
            .filter_map(|file| strip_directory(&file.path, CONTENT_DIRECTORY).map(|rest| (rest, file)))
    }
}

impl PartialEq for Package {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for Package {}

impl Hash for Package {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.id, self.version)
    }
}

fn strip_directory<'a>(path: &'a str, directory: &str) -> Option<&'a str> {
    let (head, rest) = path.split_once('/')?;
    if head.eq_ignore_ascii_case(directory) && !rest.is_empty() {
        Some(rest)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::package;
    use std::collections::HashSet;

    #[test]
    fn test_identity_ignores_id_case() {
        let a = package("A", "1.0");
        let lower = package("a", "1.0");
        assert_eq!(a, lower);
        assert_ne!(a, package("A", "1.0.0"));

        let set: HashSet<PackageIdentity> = [a.identity(), lower.identity()].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_full_name() {
        assert_eq!(package("A", "1.0").full_name(), "A 1.0");
        assert_eq!(package("A", "1.0").identity().to_string(), "A 1.0");
    }

    #[test]
    fn test_assembly_references_from_lib() {
        let p = package("A", "1.0")
            .with_file(PackageFile::new("lib/a.dll", "x"))
            .with_file(PackageFile::new("lib/net40/b.dll", "x"))
            .with_file(PackageFile::new("lib/net40/b.xml", "x"))
            .with_file(PackageFile::new("content/c.dll", "x"));

        let refs = p.assembly_references();
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].name, "a.dll");
        assert_eq!(refs[0].framework, None);
        assert_eq!(refs[1].name, "b.dll");
        assert_eq!(refs[1].path, "lib/net40/b.dll");
        assert_eq!(
            refs[1].framework.as_ref().map(|f| f.to_string()),
            Some(".NETFramework,Version=v4.0".to_string())
        );
    }

    #[test]
    fn test_content_files_strip_prefix() {
        let p = package("A", "1.0")
            .with_file(PackageFile::new("content\\scripts\\a.js", "x"))
            .with_file(PackageFile::new("lib/a.dll", "x"))
            .with_file(PackageFile::new("readme.txt", "x"));

        let content: Vec<&str> = p.content_files().map(|(path, _)| path).collect();
        assert_eq!(content, vec!["scripts/a.js"]);
    }
}
