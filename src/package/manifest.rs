use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::runtime::Runtime;

use super::{Package, PackageDependency, PackageFile, Version};

/// Package manifest stored next to the expanded files as `<Id>.<Version>.json`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Manifest {
    pub id: String,
    pub version: Version,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub dependencies: Vec<PackageDependency>,
    #[serde(default)]
    pub files: Vec<String>,
}

impl Manifest {
    pub fn from_package(package: &Package) -> Self {
        Manifest {
            id: package.id().to_string(),
            version: *package.version(),
            description: package.description().map(String::from),
            authors: package.authors().to_vec(),
            dependencies: package.dependencies().to_vec(),
            files: package.files().iter().map(|f| f.path.clone()).collect(),
        }
    }

    /// `<Id>.<Version>.json`
    pub fn file_name(id: &str, version: &Version) -> String {
        format!("{}.{}.json", id, version)
    }

    /// Build the package, pairing each listed path with its contents.
    pub fn into_package(self, files: Vec<PackageFile>) -> Package {
        let mut package = Package::new(self.id, self.version).with_authors(self.authors);
        if let Some(description) = self.description {
            package = package.with_description(description);
        }
        for dependency in self.dependencies {
            package = package.with_dependency(dependency);
        }
        for file in files {
            package = package.with_file(file);
        }
        package
    }

    #[tracing::instrument(skip(runtime, path))]
    pub fn load<R: Runtime>(runtime: &R, path: &Path) -> Result<Self> {
        let content = runtime.read_to_string(path)?;
        let manifest: Manifest = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse manifest {:?}", path))?;
        Ok(manifest)
    }

    #[tracing::instrument(skip(self, runtime, path))]
    pub fn save<R: Runtime>(&self, runtime: &R, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !runtime.exists(parent)
        {
            runtime.create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        runtime
            .write(path, content.as_bytes())
            .with_context(|| format!("Failed to save manifest to {:?}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MockRuntime;
    use crate::test_utils::{dep, package};
    use mockall::predicate::eq;
    use std::path::PathBuf;

    #[test]
    fn test_manifest_serialization() {
        let p = package("A", "1.0")
            .with_description("The A package")
            .with_dependency(dep("B", "[1.0]"))
            .with_file(PackageFile::new("content/readme.txt", "hi"));

        let json = serde_json::to_value(Manifest::from_package(&p)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "A",
                "version": "1.0",
                "description": "The A package",
                "authors": [],
                "dependencies": [{"id": "B", "version": "[1.0]"}],
                "files": ["content/readme.txt"]
            })
        );
    }

    #[test]
    fn test_manifest_defaults_and_into_package() {
        let manifest: Manifest =
            serde_json::from_str(r#"{"id": "A", "version": "2.0.1"}"#).unwrap();
        assert!(manifest.dependencies.is_empty());
        assert!(manifest.files.is_empty());

        let p = manifest.into_package(vec![PackageFile::new("lib/a.dll", "x")]);
        assert_eq!(p.full_name(), "A 2.0.1");
        assert_eq!(p.files().len(), 1);
    }

    #[test]
    fn test_manifest_rejects_bad_version() {
        let result = serde_json::from_str::<Manifest>(r#"{"id": "A", "version": "1"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_manifest_file_name() {
        assert_eq!(
            Manifest::file_name("A", &"1.0".parse().unwrap()),
            "A.1.0.json"
        );
    }

    #[test]
    fn test_manifest_load() {
        let mut runtime = MockRuntime::new();
        let path = PathBuf::from("/packages/A.1.0/A.1.0.json");

        runtime
            .expect_read_to_string()
            .with(eq(path.clone()))
            .returning(|_| {
                Ok(r#"{
                    "id": "A",
                    "version": "1.0",
                    "dependencies": [{"id": "B"}]
                }"#
                .into())
            });

        let manifest = Manifest::load(&runtime, &path).unwrap();
        assert_eq!(manifest.id, "A");
        assert_eq!(manifest.dependencies[0].to_string(), "B");
    }

    #[test]
    fn test_manifest_save_creates_parent() {
        let mut runtime = MockRuntime::new();
        let path = PathBuf::from("/packages/A.1.0/A.1.0.json");
        let parent = PathBuf::from("/packages/A.1.0");

        // --- Parent directory is missing ---
        runtime
            .expect_exists()
            .with(eq(parent.clone()))
            .returning(|_| false);
        runtime
            .expect_create_dir_all()
            .with(eq(parent))
            .times(1)
            .returning(|_| Ok(()));

        // --- Manifest is written ---
        runtime
            .expect_write()
            .withf(|p, contents| {
                p == Path::new("/packages/A.1.0/A.1.0.json")
                    && String::from_utf8_lossy(contents).contains("\"id\": \"A\"")
            })
            .times(1)
            .returning(|_, _| Ok(()));

        Manifest::from_package(&package("A", "1.0"))
            .save(&runtime, &path)
            .unwrap();
    }
}
