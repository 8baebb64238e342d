use std::collections::BTreeMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use super::ProjectSystem;
use crate::error::{PackageError, Result};
use crate::filesystem::{FileSystem, PhysicalFileSystem};
use crate::package::FrameworkName;
use crate::runtime::Runtime;

pub const PROJECT_FILE_NAME: &str = "project.json";

#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct ProjectDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    target_framework: Option<FrameworkName>,
    #[serde(default)]
    properties: BTreeMap<String, String>,
    #[serde(default)]
    references: BTreeMap<String, PathBuf>,
}

/// A project directory described by its `project.json`.
///
/// The descriptor is optional: without one the project has no target
/// framework, no properties and no references. It is written back whenever
/// references change.
pub struct PhysicalProjectSystem<'a, R: Runtime> {
    runtime: &'a R,
    files: PhysicalFileSystem<'a, R>,
    name: String,
    descriptor: ProjectDescriptor,
}

impl<'a, R: Runtime> PhysicalProjectSystem<'a, R> {
    #[tracing::instrument(skip(runtime))]
    pub fn open(runtime: &'a R, root: PathBuf) -> Result<Self> {
        let path = root.join(PROJECT_FILE_NAME);
        let descriptor = if runtime.exists(&path) {
            let content = runtime
                .read_to_string(&path)
                .map_err(PackageError::file_system(&path))?;
            serde_json::from_str(&content).map_err(|e| PackageError::InvalidManifest {
                path: path.clone(),
                reason: e.to_string(),
            })?
        } else {
            ProjectDescriptor::default()
        };

        let name = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self {
            runtime,
            files: PhysicalFileSystem::new(runtime, root),
            name,
            descriptor,
        })
    }

    /// Assembly references as `name -> path`.
    pub fn references(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.descriptor
            .references
            .iter()
            .map(|(name, path)| (name.as_str(), path.as_path()))
    }

    fn descriptor_path(&self) -> PathBuf {
        self.files.root().join(PROJECT_FILE_NAME)
    }

    fn save(&self) -> Result<()> {
        let path = self.descriptor_path();
        let content = serde_json::to_string_pretty(&self.descriptor)
            .map_err(|e| PackageError::file_system(&path)(e.into()))?;
        self.runtime
            .write(&path, content.as_bytes())
            .map_err(PackageError::file_system(&path))
    }
}

impl<R: Runtime> FileSystem for PhysicalProjectSystem<'_, R> {
    fn root(&self) -> &Path {
        self.files.root()
    }

    fn file_exists(&self, path: &Path) -> bool {
        self.files.file_exists(path)
    }

    fn directory_exists(&self, path: &Path) -> bool {
        self.files.directory_exists(path)
    }

    fn add_file(&self, path: &Path, contents: &mut dyn Read) -> Result<()> {
        self.files.add_file(path, contents)
    }

    fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        self.files.read_file(path)
    }

    fn delete_file(&self, path: &Path) -> Result<()> {
        self.files.delete_file(path)
    }

    fn delete_directory(&self, path: &Path, recursive: bool) -> Result<()> {
        self.files.delete_directory(path, recursive)
    }

    fn get_files(&self, path: &Path, filter: &str, recursive: bool) -> Result<Vec<PathBuf>> {
        self.files.get_files(path, filter, recursive)
    }

    fn get_directories(&self, path: &Path) -> Result<Vec<PathBuf>> {
        self.files.get_directories(path)
    }
}

impl<R: Runtime> ProjectSystem for PhysicalProjectSystem<'_, R> {
    fn project_name(&self) -> &str {
        &self.name
    }

    fn target_framework(&self) -> Option<&FrameworkName> {
        self.descriptor.target_framework.as_ref()
    }

    fn property_value(&self, name: &str) -> Option<String> {
        let configured = self
            .descriptor
            .properties
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.clone());

        configured.or_else(|| match name.to_ascii_lowercase().as_str() {
            "projectname" | "rootnamespace" => Some(self.name.clone()),
            _ => None,
        })
    }

    fn reference_exists(&self, name: &str) -> bool {
        self.descriptor
            .references
            .keys()
            .any(|key| key.eq_ignore_ascii_case(name))
    }

    fn add_reference(&mut self, name: &str, path: &Path) -> Result<()> {
        self.descriptor
            .references
            .insert(name.to_string(), path.to_path_buf());
        debug!("Added reference '{}' to project {}", name, self.name);
        self.save()
    }

    fn remove_reference(&mut self, name: &str) -> Result<()> {
        self.descriptor
            .references
            .retain(|key, _| !key.eq_ignore_ascii_case(name));
        debug!("Removed reference '{}' from project {}", name, self.name);
        self.save()
    }
}
