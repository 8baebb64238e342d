use std::collections::HashSet;
use std::sync::Arc;

use log::debug;

use super::{DependentLookup, Frame, cycle_chain, on_path};
use crate::error::{PackageError, Result};
use crate::package::{Package, PackageDependency, PackageIdentity};
use crate::repository::PackageRepository;

/// Packages to install, dependencies first, for the solution-wide repository.
///
/// Packages already in `local` are never part of the plan, but their
/// dependencies are still walked so missing ones get installed.
pub fn resolve_dependencies_for_install(
    package: &Arc<Package>,
    local: &dyn PackageRepository,
    source: &dyn PackageRepository,
) -> Result<Vec<Arc<Package>>> {
    InstallWalker::new(local, source, false).walk(package)
}

/// Like [`resolve_dependencies_for_install`], but a project holds one version
/// per id: replacing an installed version must not break its other dependents.
pub fn resolve_dependencies_for_project_install(
    package: &Arc<Package>,
    local: &dyn PackageRepository,
    source: &dyn PackageRepository,
) -> Result<Vec<Arc<Package>>> {
    InstallWalker::new(local, source, true).walk(package)
}

struct InstallWalker<'a> {
    local: &'a dyn PackageRepository,
    source: &'a dyn PackageRepository,
    check_conflicts: bool,
    lookup: Option<DependentLookup>,
}

impl<'a> InstallWalker<'a> {
    fn new(
        local: &'a dyn PackageRepository,
        source: &'a dyn PackageRepository,
        check_conflicts: bool,
    ) -> Self {
        Self {
            local,
            source,
            check_conflicts,
            lookup: None,
        }
    }

    fn walk(mut self, root: &Arc<Package>) -> Result<Vec<Arc<Package>>> {
        let mut plan = Vec::new();
        let mut visited: HashSet<PackageIdentity> = HashSet::new();
        let mut stack = vec![Frame::new(root.clone())];
        visited.insert(root.identity());

        if self.check_conflicts {
            self.check_conflict(root, &stack)?;
        }

        while let Some(frame) = stack.last_mut() {
            let dependencies = frame.package.dependencies();
            if frame.next_dependency >= dependencies.len() {
                if let Some(done) = stack.pop()
                    && !self.local.exists(&done.package)
                {
                    plan.push(done.package);
                }
                continue;
            }

            let index = frame.next_dependency;
            frame.next_dependency += 1;

            // Only the first dependency on a given id counts
            let dependency = &dependencies[index];
            if dependencies[..index]
                .iter()
                .any(|earlier| earlier.id.eq_ignore_ascii_case(&dependency.id))
            {
                continue;
            }
            let dependency = dependency.clone();
            let parent = frame.package.full_name();

            let resolved = self.resolve(&dependency, &parent, &stack)?;

            if on_path(&stack, &resolved) {
                return Err(PackageError::CircularDependency {
                    chain: cycle_chain(&stack, &resolved),
                });
            }

            if visited.insert(resolved.identity()) {
                stack.push(Frame::new(resolved));
            }
        }

        Ok(plan)
    }

    fn resolve(
        &mut self,
        dependency: &PackageDependency,
        parent: &str,
        stack: &[Frame],
    ) -> Result<Arc<Package>> {
        if let Some(installed) = self.local.find_dependency(dependency) {
            debug!(
                "Dependency '{}' of {} exists as {}",
                dependency,
                parent,
                installed.full_name()
            );
            return Ok(installed);
        }

        let resolved = self.source.find_dependency(dependency).ok_or_else(|| {
            PackageError::UnresolvedDependency {
                dependency: dependency.to_string(),
            }
        })?;
        debug!("Resolved '{}' to {}", dependency, resolved.full_name());

        if self.check_conflicts && !on_path(stack, &resolved) {
            self.check_conflict(&resolved, stack)?;
        }
        Ok(resolved)
    }

    /// Fail if replacing the installed version of `package` would leave one of
    /// its dependents unsatisfied. A dependent is not counted when the current
    /// path holds another version of its id, since this walk replaces it.
    fn check_conflict(&mut self, package: &Package, stack: &[Frame]) -> Result<()> {
        let Some(installed) = self.local.find_package(package.id(), None) else {
            return Ok(());
        };
        if installed.version() == package.version() {
            return Ok(());
        }

        let local = self.local;
        let lookup = self
            .lookup
            .get_or_insert_with(|| DependentLookup::create(local));

        let broken: Vec<String> = lookup
            .dependents(&installed)
            .iter()
            .filter(|dependent| !replaced_on_path(stack, dependent))
            .filter(|dependent| {
                dependent
                    .dependencies()
                    .iter()
                    .filter(|d| d.id.eq_ignore_ascii_case(package.id()))
                    .any(|d| !d.is_satisfied_by(package))
            })
            .map(|dependent| dependent.full_name())
            .collect();

        if broken.is_empty() {
            return Ok(());
        }

        Err(PackageError::DependencyConflict {
            installed: installed.full_name(),
            requested: package.full_name(),
            dependents: broken,
        })
    }
}

fn replaced_on_path(stack: &[Frame], package: &Package) -> bool {
    stack.iter().any(|frame| {
        frame.package.is_same_id(package.id()) && frame.package.version() != package.version()
    })
}
