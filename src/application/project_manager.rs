//! Per-project package references.

use std::cmp::Ordering;
use std::sync::Arc;

use log::{debug, info};

use super::events::{Listeners, PackageEventListener, PackageOperationEvent};
use crate::error::{PackageError, Result};
use crate::filesystem::resolve_file_path;
use crate::package::{Package, Version};
use crate::project::{ProjectSystem, add_content, compatible_references, remove_content};
use crate::repository::{PackagePathResolver, PackageRepository};
use crate::resolver::{
    resolve_dependencies_for_project_install, resolve_dependencies_for_replace,
    resolve_dependencies_for_uninstall,
};

/// Adds, removes and updates the packages one project references.
///
/// `source` is where referenced packages come from, usually the solution's
/// local repository. `local` is the project's own reference ledger; a project
/// references at most one version of each id.
pub struct ProjectManager<'a> {
    source: &'a dyn PackageRepository,
    project: Box<dyn ProjectSystem + 'a>,
    path_resolver: Box<dyn PackagePathResolver + 'a>,
    local: Box<dyn PackageRepository + 'a>,
    listeners: Listeners<'a>,
}

impl<'a> ProjectManager<'a> {
    pub fn new(
        source: &'a dyn PackageRepository,
        project: Box<dyn ProjectSystem + 'a>,
        path_resolver: Box<dyn PackagePathResolver + 'a>,
        local: Box<dyn PackageRepository + 'a>,
    ) -> Self {
        Self {
            source,
            project,
            path_resolver,
            local,
            listeners: Listeners::default(),
        }
    }

    pub fn add_listener(&mut self, listener: Box<dyn PackageEventListener + 'a>) {
        self.listeners.push(listener);
    }

    pub fn project(&self) -> &dyn ProjectSystem {
        self.project.as_ref()
    }

    pub fn local(&self) -> &dyn PackageRepository {
        self.local.as_ref()
    }

    #[tracing::instrument(skip(self))]
    pub fn add_package_reference(&mut self, id: &str, version: Option<&Version>) -> Result<()> {
        check_id(id)?;
        let package = self
            .source
            .find_package(id, version)
            .ok_or_else(|| PackageError::UnknownPackage { id: id.to_string() })?;

        if let Some(existing) = self.local.find_package(id, None) {
            match package.version().cmp(existing.version()) {
                Ordering::Less => {
                    return Err(PackageError::AlreadyNewerVersionReferenced {
                        id: existing.id().to_string(),
                    });
                }
                Ordering::Greater => return self.replace(&existing, package, true),
                Ordering::Equal => {
                    info!(
                        "'{}' is already referenced by {}",
                        package.full_name(),
                        self.project.project_name()
                    );
                }
            }
        }

        let plan =
            resolve_dependencies_for_project_install(&package, self.local.as_ref(), self.source)?;
        self.apply(plan)
    }

    /// Remove a reference and, with `remove_dependencies`, the dependencies
    /// nothing else needs. Returns the packages actually removed.
    #[tracing::instrument(skip(self))]
    pub fn remove_package_reference(
        &mut self,
        id: &str,
        version: Option<&Version>,
        force: bool,
        remove_dependencies: bool,
    ) -> Result<Vec<Arc<Package>>> {
        check_id(id)?;
        let package = self
            .local
            .find_package(id, version)
            .ok_or_else(|| PackageError::UnknownPackage { id: id.to_string() })?;

        let plan = resolve_dependencies_for_uninstall(
            &package,
            self.local.as_ref(),
            force,
            remove_dependencies,
        )?;

        let mut removed = Vec::new();
        for package in plan {
            if self.remove_reference(&package)? {
                removed.push(package);
            }
        }
        Ok(removed)
    }

    /// Move a referenced package to `version`, or to the latest in the source.
    #[tracing::instrument(skip(self))]
    pub fn update_package_reference(
        &mut self,
        id: &str,
        version: Option<&Version>,
        update_dependencies: bool,
    ) -> Result<()> {
        check_id(id)?;
        let old = self
            .local
            .find_package(id, None)
            .ok_or_else(|| PackageError::PackageNotReferenced { id: id.to_string() })?;
        let new = self
            .source
            .find_package(id, version)
            .ok_or_else(|| PackageError::UnknownPackage { id: id.to_string() })?;

        match new.version().cmp(old.version()) {
            Ordering::Less => Err(PackageError::AlreadyNewerVersionReferenced {
                id: old.id().to_string(),
            }),
            Ordering::Equal => {
                info!("'{}' is already up to date", old.full_name());
                Ok(())
            }
            Ordering::Greater => self.replace(&old, new, update_dependencies),
        }
    }

    fn replace(&mut self, old: &Arc<Package>, new: Arc<Package>, update_dependencies: bool) -> Result<()> {
        info!("Updating '{}' to {}", old.full_name(), new.version());

        if !update_dependencies {
            if self.remove_reference(old)? {
                self.add_reference(new)?;
            } else {
                info!("Keeping '{}', skipping {}", old.full_name(), new.full_name());
            }
            return Ok(());
        }

        // Fails on conflicts before anything is touched
        resolve_dependencies_for_project_install(&new, self.local.as_ref(), self.source)?;

        for package in resolve_dependencies_for_replace(old, self.local.as_ref())? {
            self.remove_reference(&package)?;
        }

        let plan = resolve_dependencies_for_project_install(&new, self.local.as_ref(), self.source)?;
        self.apply(plan)
    }

    fn apply(&mut self, plan: Vec<Arc<Package>>) -> Result<()> {
        for package in plan {
            let previous = self
                .local
                .find_package(package.id(), None)
                .filter(|existing| existing.version() != package.version());
            if let Some(previous) = previous
                && !self.remove_reference(&previous)?
            {
                info!("Keeping '{}', skipping {}", previous.full_name(), package.full_name());
                continue;
            }
            self.add_reference(package)?;
        }
        Ok(())
    }

    fn event(&self, package: &Arc<Package>) -> PackageOperationEvent {
        PackageOperationEvent::new(package.clone(), self.path_resolver.install_path(package))
    }

    fn add_reference(&mut self, package: Arc<Package>) -> Result<()> {
        let references = compatible_references(self.project.as_ref(), &package)?;

        let mut event = self.event(&package);
        if !self.listeners.installing(&mut event) {
            info!("Skipping '{}'", package.full_name());
            return Ok(());
        }

        add_content(self.project.as_ref(), &package)?;

        for (name, path) in references {
            if self.project.reference_exists(&name) {
                debug!("Reference '{}' already exists", name);
                continue;
            }
            let target = resolve_file_path(&event.install_path, &path)?;
            self.project.add_reference(&name, &target)?;
        }

        self.local.add_package(package.clone())?;
        info!(
            "Successfully added '{}' to {}",
            package.full_name(),
            self.project.project_name()
        );

        self.listeners.installed(&event);
        Ok(())
    }

    fn remove_reference(&mut self, package: &Arc<Package>) -> Result<bool> {
        let mut event = self.event(package);
        if !self.listeners.uninstalling(&mut event) {
            info!("Skipping '{}'", package.full_name());
            return Ok(false);
        }

        let others: Vec<Arc<Package>> = self
            .local
            .packages()
            .into_iter()
            .filter(|other| other.identity() != package.identity())
            .collect();

        remove_content(self.project.as_ref(), package, &others)?;

        for reference in package.assembly_references() {
            let shared = others.iter().any(|other| {
                other
                    .assembly_references()
                    .iter()
                    .any(|r| r.name.eq_ignore_ascii_case(&reference.name))
            });
            if !shared && self.project.reference_exists(&reference.name) {
                self.project.remove_reference(&reference.name)?;
            }
        }

        self.local.remove_package(package)?;
        info!(
            "Successfully removed '{}' from {}",
            package.full_name(),
            self.project.project_name()
        );

        self.listeners.uninstalled(&event);
        Ok(true)
    }
}

fn check_id(id: &str) -> Result<()> {
    if id.trim().is_empty() {
        return Err(PackageError::InvalidArgument { name: "package_id" });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::MockPackageEventListener;
    use crate::package::PackageFile;
    use crate::project::PhysicalProjectSystem;
    use crate::repository::{DefaultPackagePathResolver, MemoryPackageRepository, PackageReferenceRepository};
    use crate::runtime::RealRuntime;
    use crate::test_utils::{dep, package};
    use std::path::{Path, PathBuf};
    use tempfile::{TempDir, tempdir};

    struct Workspace {
        tmp: TempDir,
    }

    impl Workspace {
        fn new() -> Self {
            let tmp = tempdir().unwrap();
            std::fs::create_dir(tmp.path().join("app")).unwrap();
            Self { tmp }
        }

        fn project_root(&self) -> PathBuf {
            self.tmp.path().join("app")
        }

        fn packages_root(&self) -> PathBuf {
            self.tmp.path().join("packages")
        }

        fn file(&self, path: &str) -> PathBuf {
            self.project_root().join(path)
        }

        fn manager<'a>(&self, runtime: &'a RealRuntime, source: &'a MemoryPackageRepository) -> ProjectManager<'a> {
            let project = PhysicalProjectSystem::open(runtime, self.project_root()).unwrap();
            let references =
                PackageReferenceRepository::open(runtime, &self.project_root(), source).unwrap();
            ProjectManager::new(
                source,
                Box::new(project),
                Box::new(DefaultPackagePathResolver::new(self.packages_root())),
                Box::new(references),
            )
        }

        fn write_descriptor(&self, json: &str) {
            std::fs::write(self.file("project.json"), json).unwrap();
        }

        fn descriptor(&self) -> serde_json::Value {
            let text = std::fs::read_to_string(self.file("project.json")).unwrap();
            serde_json::from_str(&text).unwrap()
        }
    }

    fn referenced(manager: &ProjectManager) -> Vec<String> {
        manager.local().packages().iter().map(|p| p.full_name()).collect()
    }

    fn v(s: &str) -> Version {
        s.parse().unwrap()
    }

    #[test_log::test]
    fn test_add_reference_with_dependencies() {
        let runtime = RealRuntime;
        let workspace = Workspace::new();
        let source = MemoryPackageRepository::from_iter(vec![
            package("A", "1.0")
                .with_dependency(dep("B", "1.0"))
                .with_file(PackageFile::new("content/a.txt", "a"))
                .with_file(PackageFile::new("lib/a.dll", "a")),
            package("B", "1.0").with_file(PackageFile::new("content/scripts/b.js", "b")),
        ]);
        let mut manager = workspace.manager(&runtime, &source);

        manager.add_package_reference("A", None).unwrap();

        assert_eq!(referenced(&manager), vec!["A 1.0", "B 1.0"]);
        assert!(workspace.file("a.txt").exists());
        assert!(workspace.file("scripts/b.js").exists());
        assert!(workspace.file("packages.json").exists());

        let descriptor = workspace.descriptor();
        let expected = workspace.packages_root().join("A.1.0").join("lib").join("a.dll");
        assert_eq!(
            descriptor["references"]["a.dll"].as_str(),
            Some(expected.to_string_lossy().as_ref())
        );
    }

    #[test_log::test]
    fn test_ledger_survives_reopen() {
        let runtime = RealRuntime;
        let workspace = Workspace::new();
        let source = MemoryPackageRepository::from_iter(vec![
            package("A", "1.0").with_dependency(dep("B", "1.0")),
            package("B", "1.0"),
        ]);

        workspace
            .manager(&runtime, &source)
            .add_package_reference("A", None)
            .unwrap();

        let manager = workspace.manager(&runtime, &source);
        assert_eq!(referenced(&manager), vec!["A 1.0", "B 1.0"]);
    }

    #[test_log::test]
    fn test_add_invalid_or_unknown() {
        let runtime = RealRuntime;
        let workspace = Workspace::new();
        let source = MemoryPackageRepository::new();
        let mut manager = workspace.manager(&runtime, &source);

        assert!(matches!(
            manager.add_package_reference(" ", None),
            Err(PackageError::InvalidArgument { .. })
        ));
        assert!(matches!(
            manager.add_package_reference("A", None),
            Err(PackageError::UnknownPackage { .. })
        ));
    }

    #[test_log::test]
    fn test_add_older_version_than_referenced() {
        let runtime = RealRuntime;
        let workspace = Workspace::new();
        let source = MemoryPackageRepository::from_iter(vec![package("A", "1.0"), package("A", "2.0")]);
        let mut manager = workspace.manager(&runtime, &source);

        manager.add_package_reference("A", None).unwrap();
        let err = manager.add_package_reference("A", Some(&v("1.0"))).unwrap_err();

        assert!(matches!(err, PackageError::AlreadyNewerVersionReferenced { .. }));
        assert_eq!(referenced(&manager), vec!["A 2.0"]);
    }

    #[test_log::test]
    fn test_add_same_version_references_missing_dependencies() {
        let runtime = RealRuntime;
        let workspace = Workspace::new();
        let source = MemoryPackageRepository::from_iter(vec![
            package("A", "1.0").with_dependency(dep("B", "1.0")),
            package("B", "1.0"),
        ]);
        let mut manager = workspace.manager(&runtime, &source);

        manager.add_package_reference("A", None).unwrap();
        manager.remove_package_reference("B", None, true, false).unwrap();
        assert_eq!(referenced(&manager), vec!["A 1.0"]);

        manager.add_package_reference("A", None).unwrap();
        assert_eq!(referenced(&manager), vec!["A 1.0", "B 1.0"]);
    }

    #[test_log::test]
    fn test_add_newer_version_upgrades_in_place() {
        let runtime = RealRuntime;
        let workspace = Workspace::new();
        let source = MemoryPackageRepository::from_iter(vec![
            package("A", "1.0").with_file(PackageFile::new("content/v1.txt", "1")),
            package("A", "2.0").with_file(PackageFile::new("content/v2.txt", "2")),
        ]);
        let mut manager = workspace.manager(&runtime, &source);

        manager.add_package_reference("A", Some(&v("1.0"))).unwrap();
        manager.add_package_reference("A", Some(&v("2.0"))).unwrap();

        assert_eq!(referenced(&manager), vec!["A 2.0"]);
        assert!(!workspace.file("v1.txt").exists());
        assert!(workspace.file("v2.txt").exists());
    }

    #[test_log::test]
    fn test_dependency_upgrade_replaces_old_reference() {
        let runtime = RealRuntime;
        let workspace = Workspace::new();
        let source = MemoryPackageRepository::from_iter(vec![
            package("A", "1.0").with_dependency(dep("C", "[1.0]")),
            package("B", "1.0").with_dependency(dep("C", "2.0")),
            package("C", "1.0"),
            package("C", "2.0"),
        ]);
        let mut manager = workspace.manager(&runtime, &source);

        manager.add_package_reference("C", Some(&v("1.0"))).unwrap();
        manager.add_package_reference("B", None).unwrap();

        assert_eq!(referenced(&manager), vec!["B 1.0", "C 2.0"]);
    }

    #[test_log::test]
    fn test_conflict_leaves_project_untouched() {
        let runtime = RealRuntime;
        let workspace = Workspace::new();
        let source = MemoryPackageRepository::from_iter(vec![
            package("A", "1.0").with_dependency(dep("C", "[1.0]")),
            package("A", "2.0").with_dependency(dep("C", "[2.0]")),
            package("G", "1.0").with_dependency(dep("C", "[1.0]")),
            package("C", "1.0"),
            package("C", "2.0"),
        ]);
        let mut manager = workspace.manager(&runtime, &source);

        manager.add_package_reference("A", Some(&v("1.0"))).unwrap();
        manager.add_package_reference("G", None).unwrap();

        let err = manager.update_package_reference("A", None, true).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Conflict occurred. 'C 1.0' referenced but requested 'C 2.0'. 'G 1.0' depends on 'C 1.0'"
        );
        assert_eq!(referenced(&manager), vec!["A 1.0", "C 1.0", "G 1.0"]);
    }

    #[test_log::test]
    fn test_update_with_dependencies() {
        let runtime = RealRuntime;
        let workspace = Workspace::new();
        let source = MemoryPackageRepository::from_iter(vec![
            package("A", "1.0").with_dependency(dep("B", "[1.0]")),
            package("A", "2.0").with_dependency(dep("B", "[2.0]")),
            package("B", "1.0").with_file(PackageFile::new("content/b1.txt", "1")),
            package("B", "2.0").with_file(PackageFile::new("content/b2.txt", "2")),
        ]);
        let mut manager = workspace.manager(&runtime, &source);

        manager.add_package_reference("A", Some(&v("1.0"))).unwrap();
        manager.update_package_reference("A", None, true).unwrap();

        assert_eq!(referenced(&manager), vec!["A 2.0", "B 2.0"]);
        assert!(!workspace.file("b1.txt").exists());
        assert!(workspace.file("b2.txt").exists());
    }

    #[test_log::test]
    fn test_update_with_mixed_dependencies() {
        // A 1.0 -> B, C; A 2.0 -> B, D; E -> C keeps C alive
        let runtime = RealRuntime;
        let workspace = Workspace::new();
        let source = MemoryPackageRepository::from_iter(vec![
            package("A", "1.0")
                .with_dependency(dep("B", "1.0"))
                .with_dependency(dep("C", "1.0")),
            package("A", "2.0")
                .with_dependency(dep("B", "1.0"))
                .with_dependency(dep("D", "1.0")),
            package("B", "1.0"),
            package("C", "1.0"),
            package("D", "1.0"),
            package("E", "1.0").with_dependency(dep("C", "1.0")),
        ]);
        let mut manager = workspace.manager(&runtime, &source);

        manager.add_package_reference("A", Some(&v("1.0"))).unwrap();
        manager.add_package_reference("E", None).unwrap();
        manager.update_package_reference("A", None, true).unwrap();

        assert_eq!(referenced(&manager), vec!["A 2.0", "B 1.0", "C 1.0", "D 1.0", "E 1.0"]);
    }

    #[test_log::test]
    fn test_update_without_dependencies_swaps_only_package() {
        let runtime = RealRuntime;
        let workspace = Workspace::new();
        let source = MemoryPackageRepository::from_iter(vec![
            package("A", "1.0").with_dependency(dep("B", "[1.0]")),
            package("A", "2.0").with_dependency(dep("B", "[2.0]")),
            package("B", "1.0"),
            package("B", "2.0"),
        ]);
        let mut manager = workspace.manager(&runtime, &source);

        manager.add_package_reference("A", Some(&v("1.0"))).unwrap();
        manager.update_package_reference("A", None, false).unwrap();

        assert_eq!(referenced(&manager), vec!["A 2.0", "B 1.0"]);
    }

    #[test_log::test]
    fn test_update_edge_cases() {
        let runtime = RealRuntime;
        let workspace = Workspace::new();
        let source = MemoryPackageRepository::from_iter(vec![package("A", "1.0"), package("A", "2.0")]);
        let mut manager = workspace.manager(&runtime, &source);

        assert!(matches!(
            manager.update_package_reference("A", None, true),
            Err(PackageError::PackageNotReferenced { .. })
        ));

        manager.add_package_reference("A", None).unwrap();
        manager.update_package_reference("A", None, true).unwrap();
        assert_eq!(referenced(&manager), vec!["A 2.0"]);

        assert!(matches!(
            manager.update_package_reference("A", Some(&v("1.0")), true),
            Err(PackageError::AlreadyNewerVersionReferenced { .. })
        ));
    }

    #[test_log::test]
    fn test_remove_reference_with_dependents() {
        let runtime = RealRuntime;
        let workspace = Workspace::new();
        let source = MemoryPackageRepository::from_iter(vec![
            package("A", "1.0").with_dependency(dep("B", "1.0")),
            package("B", "1.0"),
        ]);
        let mut manager = workspace.manager(&runtime, &source);

        manager.add_package_reference("A", None).unwrap();
        let err = manager.remove_package_reference("B", None, false, false).unwrap_err();

        assert_eq!(err.to_string(), "Unable to uninstall 'B 1.0' because 'A 1.0' depends on it");
        assert!(matches!(
            manager.remove_package_reference("Z", None, false, false),
            Err(PackageError::UnknownPackage { .. })
        ));
    }

    #[test_log::test]
    fn test_remove_reference_cleans_project() {
        let runtime = RealRuntime;
        let workspace = Workspace::new();
        let source = MemoryPackageRepository::from_iter(vec![
            package("A", "1.0")
                .with_dependency(dep("B", "1.0"))
                .with_file(PackageFile::new("content/Scripts/a.js", "a"))
                .with_file(PackageFile::new("lib/a.dll", "a")),
            package("B", "1.0")
                .with_file(PackageFile::new("content/Scripts/b.js", "b"))
                .with_file(PackageFile::new("lib/b.dll", "b")),
        ]);
        let mut manager = workspace.manager(&runtime, &source);

        manager.add_package_reference("A", None).unwrap();
        let removed = manager.remove_package_reference("A", None, false, true).unwrap();

        let removed: Vec<String> = removed.iter().map(|p| p.full_name()).collect();
        assert_eq!(removed, vec!["A 1.0", "B 1.0"]);
        assert!(referenced(&manager).is_empty());
        assert!(!workspace.file("Scripts").exists());
        assert!(!workspace.file("packages.json").exists());
        assert_eq!(workspace.descriptor()["references"], serde_json::json!({}));
    }

    #[test_log::test]
    fn test_shared_assembly_reference_is_kept() {
        let runtime = RealRuntime;
        let workspace = Workspace::new();
        let source = MemoryPackageRepository::from_iter(vec![
            package("A", "1.0").with_file(PackageFile::new("lib/shared.dll", "a")),
            package("B", "1.0").with_file(PackageFile::new("lib/shared.dll", "b")),
        ]);
        let mut manager = workspace.manager(&runtime, &source);

        manager.add_package_reference("A", None).unwrap();
        manager.add_package_reference("B", None).unwrap();
        manager.remove_package_reference("A", None, false, false).unwrap();

        assert!(manager.project().reference_exists("shared.dll"));
    }

    #[test_log::test]
    fn test_incompatible_framework_touches_nothing() {
        let runtime = RealRuntime;
        let workspace = Workspace::new();
        workspace.write_descriptor(r#"{"targetFramework": ".NETFramework,Version=v4.0"}"#);
        let source = MemoryPackageRepository::from_iter(vec![package("A", "1.0")
            .with_file(PackageFile::new("content/a.txt", "a"))
            .with_file(PackageFile::new("lib/sl4/a.dll", "a"))]);
        let mut manager = workspace.manager(&runtime, &source);

        let err = manager.add_package_reference("A", None).unwrap_err();

        assert!(matches!(err, PackageError::IncompatibleFramework { .. }));
        assert!(!workspace.file("a.txt").exists());
        assert!(!workspace.file("packages.json").exists());
    }

    #[test_log::test]
    fn test_framework_specific_reference_is_chosen() {
        let runtime = RealRuntime;
        let workspace = Workspace::new();
        workspace.write_descriptor(r#"{"targetFramework": ".NETFramework,Version=v3.5"}"#);
        let source = MemoryPackageRepository::from_iter(vec![package("A", "1.0")
            .with_file(PackageFile::new("lib/net20/a.dll", "2"))
            .with_file(PackageFile::new("lib/net30/a.dll", "3"))
            .with_file(PackageFile::new("lib/net40/a.dll", "4"))]);
        let mut manager = workspace.manager(&runtime, &source);

        manager.add_package_reference("A", None).unwrap();

        let expected = workspace
            .packages_root()
            .join("A.1.0")
            .join(Path::new("lib/net30/a.dll"));
        assert_eq!(
            workspace.descriptor()["references"]["a.dll"].as_str(),
            Some(expected.to_string_lossy().as_ref())
        );
    }

    #[test_log::test]
    fn test_canceled_reference_is_skipped() {
        let runtime = RealRuntime;
        let workspace = Workspace::new();
        let source = MemoryPackageRepository::from_iter(vec![
            package("A", "1.0").with_dependency(dep("B", "1.0")),
            package("B", "1.0"),
        ]);
        let mut manager = workspace.manager(&runtime, &source);

        let mut listener = MockPackageEventListener::new();
        listener.expect_installing().returning(|event| {
            event.cancel = event.package.id() == "A";
        });
        listener.expect_installed().times(1).returning(|_| ());
        manager.add_listener(Box::new(listener));

        manager.add_package_reference("A", None).unwrap();
        assert_eq!(referenced(&manager), vec!["B 1.0"]);
    }

    #[test_log::test]
    fn test_canceled_removal_keeps_previous_version() {
        let runtime = RealRuntime;
        let workspace = Workspace::new();
        let source = MemoryPackageRepository::from_iter(vec![package("A", "1.0"), package("A", "2.0")]);
        let mut manager = workspace.manager(&runtime, &source);
        manager.add_package_reference("A", Some(&v("1.0"))).unwrap();

        let mut listener = MockPackageEventListener::new();
        listener.expect_uninstalling().returning(|event| event.cancel = true);
        listener.expect_installing().never();
        manager.add_listener(Box::new(listener));

        manager.update_package_reference("A", None, false).unwrap();
        assert_eq!(referenced(&manager), vec!["A 1.0"]);

        manager.add_package_reference("A", Some(&v("2.0"))).unwrap();
        assert_eq!(referenced(&manager), vec!["A 1.0"]);
    }
}
