use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::warn;
use serde::{Deserialize, Serialize};

use super::{MemoryPackageRepository, PackageRepository};
use crate::error::{PackageError, Result};
use crate::package::{Package, Version};
use crate::runtime::Runtime;

pub const REFERENCE_FILE_NAME: &str = "packages.json";

/// One entry of a project's `packages.json`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PackageReference {
    pub id: String,
    pub version: Version,
}

#[derive(Serialize, Deserialize, Debug, Default)]
struct PackageReferenceFile {
    #[serde(default)]
    packages: Vec<PackageReference>,
}

/// What a single project references, persisted as `packages.json`.
///
/// The ledger only stores `{id, version}`; the packages themselves are looked
/// up in the repository given to [`PackageReferenceRepository::open`].
pub struct PackageReferenceRepository<'a, R: Runtime> {
    runtime: &'a R,
    path: PathBuf,
    index: MemoryPackageRepository,
}

impl<'a, R: Runtime> PackageReferenceRepository<'a, R> {
    #[tracing::instrument(skip(runtime, lookup))]
    pub fn open(runtime: &'a R, project_root: &Path, lookup: &dyn PackageRepository) -> Result<Self> {
        let path = project_root.join(REFERENCE_FILE_NAME);
        let mut index = MemoryPackageRepository::new();

        for reference in read_references(runtime, &path)? {
            match lookup.find_package(&reference.id, Some(&reference.version)) {
                Some(package) => index.add_package(package)?,
                None => warn!(
                    "Referenced package '{} {}' is not installed, ignoring it",
                    reference.id, reference.version
                ),
            }
        }

        Ok(Self {
            runtime,
            path,
            index,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn references(&self) -> Vec<PackageReference> {
        references_of(&self.index)
    }

    /// Writes `index` to disk and only then makes it the current state.
    fn commit(&mut self, index: MemoryPackageRepository) -> Result<()> {
        self.save(&index)?;
        self.index = index;
        Ok(())
    }

    fn save(&self, index: &MemoryPackageRepository) -> Result<()> {
        let to_fs_error = PackageError::file_system(&self.path);

        if index.is_empty() {
            if self.runtime.exists(&self.path) {
                self.runtime.remove_file(&self.path).map_err(to_fs_error)?;
            }
            return Ok(());
        }

        let file = PackageReferenceFile {
            packages: references_of(index),
        };
        let content = serde_json::to_string_pretty(&file)
            .map_err(|e| PackageError::file_system(&self.path)(e.into()))?;
        self.runtime
            .write(&self.path, content.as_bytes())
            .map_err(to_fs_error)
    }
}

fn references_of(index: &MemoryPackageRepository) -> Vec<PackageReference> {
    index
        .packages()
        .iter()
        .map(|p| PackageReference {
            id: p.id().to_string(),
            version: *p.version(),
        })
        .collect()
}

fn read_references<R: Runtime>(runtime: &R, path: &Path) -> Result<Vec<PackageReference>> {
    if !runtime.exists(path) {
        return Ok(Vec::new());
    }
    let content = runtime
        .read_to_string(path)
        .map_err(PackageError::file_system(path))?;
    let file: PackageReferenceFile =
        serde_json::from_str(&content).map_err(|e| PackageError::InvalidManifest {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    Ok(file.packages)
}

impl<R: Runtime> PackageRepository for PackageReferenceRepository<'_, R> {
    fn packages(&self) -> Vec<Arc<Package>> {
        self.index.packages()
    }

    fn add_package(&mut self, package: Arc<Package>) -> Result<()> {
        let mut index = self.index.clone();
        index.add_package(package)?;
        self.commit(index)
    }

    fn remove_package(&mut self, package: &Package) -> Result<()> {
        let mut index = self.index.clone();
        index.remove_package(package)?;
        self.commit(index)
    }

    fn find_packages_by_id(&self, id: &str) -> Vec<Arc<Package>> {
        self.index.find_packages_by_id(id)
    }
}
