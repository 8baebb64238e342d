use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::debug;

use super::{DefaultPackagePathResolver, MemoryPackageRepository, PackagePathResolver, PackageRepository};
use crate::error::{PackageError, Result};
use crate::filesystem::resolve_file_path;
use crate::package::{Manifest, Package, PackageFile, find_all_manifests};
use crate::runtime::Runtime;

/// Repository of expanded packages on disk.
///
/// Layout: `<root>/<Id>.<Version>/<Id>.<Version>.json` plus the files the
/// manifest lists. Serves as the solution-wide local repository and, opened
/// over another directory, as a read-only source feed.
pub struct LocalPackageRepository<'a, R: Runtime> {
    runtime: &'a R,
    resolver: DefaultPackagePathResolver,
    index: MemoryPackageRepository,
}

impl<'a, R: Runtime> LocalPackageRepository<'a, R> {
    /// Scan `root` and load every package that has a manifest.
    #[tracing::instrument(skip(runtime))]
    pub fn open(runtime: &'a R, root: PathBuf) -> Result<Self> {
        let mut index = MemoryPackageRepository::new();

        let manifests =
            find_all_manifests(runtime, &root).map_err(PackageError::file_system(&root))?;
        for manifest_path in manifests {
            let package = load_package(runtime, &manifest_path)?;
            debug!("Found package {} at {:?}", package.full_name(), manifest_path);
            index.add_package(Arc::new(package))?;
        }

        Ok(Self {
            runtime,
            resolver: DefaultPackagePathResolver::new(root),
            index,
        })
    }

    pub fn root(&self) -> &Path {
        self.resolver.root()
    }

    pub fn path_resolver(&self) -> &DefaultPackagePathResolver {
        &self.resolver
    }

    fn manifest_path(&self, package: &Package) -> PathBuf {
        self.resolver
            .install_path(package)
            .join(Manifest::file_name(package.id(), package.version()))
    }
}

fn load_package<R: Runtime>(runtime: &R, manifest_path: &Path) -> Result<Package> {
    let manifest = Manifest::load(runtime, manifest_path).map_err(|e| {
        if e.downcast_ref::<serde_json::Error>().is_some() {
            PackageError::InvalidManifest {
                path: manifest_path.to_path_buf(),
                reason: format!("{:#}", e),
            }
        } else {
            PackageError::file_system(manifest_path)(e)
        }
    })?;

    let directory = manifest_path.parent().unwrap_or(Path::new(""));
    let files = manifest
        .files
        .iter()
        .map(|path| {
            let full = resolve_file_path(directory, path)?;
            let contents = runtime
                .read(&full)
                .map_err(PackageError::file_system(&full))?;
            Ok(PackageFile::new(path.clone(), contents))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(manifest.into_package(files))
}

impl<R: Runtime> PackageRepository for LocalPackageRepository<'_, R> {
    fn packages(&self) -> Vec<Arc<Package>> {
        self.index.packages()
    }

    /// Registers a package whose files are already expanded by writing its manifest.
    fn add_package(&mut self, package: Arc<Package>) -> Result<()> {
        let manifest_path = self.manifest_path(&package);
        Manifest::from_package(&package)
            .save(self.runtime, &manifest_path)
            .map_err(PackageError::file_system(&manifest_path))?;
        self.index.add_package(package)
    }

    /// Unregisters a package whose files were already deleted.
    fn remove_package(&mut self, package: &Package) -> Result<()> {
        let manifest_path = self.manifest_path(package);
        if self.runtime.exists(&manifest_path) {
            self.runtime
                .remove_file(&manifest_path)
                .map_err(PackageError::file_system(&manifest_path))?;
        }

        let directory = self.resolver.install_path(package);
        if self.runtime.is_dir(&directory) {
            let leftovers = self
                .runtime
                .read_dir(&directory)
                .map_err(PackageError::file_system(&directory))?;
            if leftovers.is_empty() {
                self.runtime
                    .remove_dir(&directory)
                    .map_err(PackageError::file_system(&directory))?;
            } else {
                debug!("Keeping {:?}, it still holds {} entries", directory, leftovers.len());
            }
        }

        self.index.remove_package(package)
    }

    fn find_packages_by_id(&self, id: &str) -> Vec<Arc<Package>> {
        self.index.find_packages_by_id(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{MockRuntime, RealRuntime};
    use crate::test_utils::{dep, package};
    use tempfile::tempdir;

    #[test]
    fn test_open_missing_root_is_empty() {
        let runtime = RealRuntime;
        let tmp = tempdir().unwrap();
        let repo = LocalPackageRepository::open(&runtime, tmp.path().join("packages")).unwrap();
        assert!(repo.packages().is_empty());
    }

    #[test]
    fn test_add_reopen_remove() {
        let runtime = RealRuntime;
        let tmp = tempdir().unwrap();
        let root = tmp.path().to_path_buf();

        // --- Expand files, then register ---
        let a = package("A", "1.0")
            .with_dependency(dep("B", "[1.0]"))
            .with_file(PackageFile::new("content/readme.txt", "read me"));
        std::fs::create_dir_all(root.join("A.1.0/content")).unwrap();
        std::fs::write(root.join("A.1.0/content/readme.txt"), "read me").unwrap();

        let mut repo = LocalPackageRepository::open(&runtime, root.clone()).unwrap();
        repo.add_package(Arc::new(a)).unwrap();
        assert!(root.join("A.1.0/A.1.0.json").exists());

        // --- Reopen reads manifest and file contents back ---
        let reopened = LocalPackageRepository::open(&runtime, root.clone()).unwrap();
        let loaded = reopened.find_package("a", None).unwrap();
        assert_eq!(loaded.full_name(), "A 1.0");
        assert_eq!(loaded.dependencies()[0].to_string(), "B (= 1.0)");
        assert_eq!(loaded.files()[0].contents, b"read me");

        // --- Remove after files are gone prunes the directory ---
        std::fs::remove_dir_all(root.join("A.1.0/content")).unwrap();
        repo.remove_package(&loaded).unwrap();
        assert!(!root.join("A.1.0").exists());
        assert!(repo.packages().is_empty());
    }

    #[test]
    fn test_remove_keeps_directory_with_leftovers() {
        let runtime = RealRuntime;
        let tmp = tempdir().unwrap();
        let root = tmp.path().to_path_buf();

        let mut repo = LocalPackageRepository::open(&runtime, root.clone()).unwrap();
        let a = Arc::new(package("A", "1.0"));
        repo.add_package(a.clone()).unwrap();
        std::fs::write(root.join("A.1.0/edited.txt"), "mine").unwrap();

        repo.remove_package(&a).unwrap();
        assert!(root.join("A.1.0/edited.txt").exists());
        assert!(!root.join("A.1.0/A.1.0.json").exists());
    }

    #[test]
    fn test_invalid_manifest() {
        let runtime = RealRuntime;
        let tmp = tempdir().unwrap();
        std::fs::create_dir_all(tmp.path().join("A.1.0")).unwrap();
        std::fs::write(tmp.path().join("A.1.0/A.1.0.json"), "{ not json").unwrap();

        let err = LocalPackageRepository::open(&runtime, tmp.path().to_path_buf())
            .err()
            .unwrap();
        assert!(matches!(err, PackageError::InvalidManifest { .. }));
    }

    #[test]
    fn test_manifest_write_failure_leaves_index_unchanged() {
        let mut runtime = MockRuntime::new();
        runtime.expect_exists().returning(|_| false);
        runtime
            .expect_create_dir_all()
            .returning(|_| Err(anyhow::anyhow!("read-only file system")));

        let mut repo = LocalPackageRepository::open(&runtime, PathBuf::from("/packages")).unwrap();
        let err = repo.add_package(Arc::new(package("A", "1.0"))).unwrap_err();

        assert!(err.is_file_system());
        assert!(repo.packages().is_empty());
    }
}
