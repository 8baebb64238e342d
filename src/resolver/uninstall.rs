use std::collections::HashSet;
use std::sync::Arc;

use log::debug;

use super::{DependentLookup, Frame, cycle_chain, on_path};
use crate::error::{PackageError, Result};
use crate::package::{Package, PackageIdentity};
use crate::repository::PackageRepository;

/// Packages to remove, `package` first and every package before its own
/// dependencies.
///
/// Without `force`, a package with dependents cannot be removed, and shared
/// dependencies that something outside the plan still needs are kept. With
/// `force`, every reachable dependency goes.
pub fn resolve_dependencies_for_uninstall(
    package: &Arc<Package>,
    local: &dyn PackageRepository,
    force: bool,
    remove_dependencies: bool,
) -> Result<Vec<Arc<Package>>> {
    let lookup = DependentLookup::create(local);

    if !force {
        let dependents = lookup.dependents(package);
        if !dependents.is_empty() {
            return Err(PackageError::PackageHasDependents {
                package: package.full_name(),
                dependents: dependents.iter().map(|p| p.full_name()).collect(),
            });
        }
    }

    if !remove_dependencies {
        return Ok(vec![package.clone()]);
    }

    let mut ordered = dependency_closure(package, local)?;
    ordered.reverse();

    if force {
        return Ok(ordered);
    }

    Ok(keep_shared(ordered, &lookup))
}

/// Packages to remove when `package` is being replaced by another version.
///
/// The root goes regardless of its dependents, who are checked against the
/// replacement instead. Its dependencies go unless something outside the
/// removal set still needs them.
pub fn resolve_dependencies_for_replace(
    package: &Arc<Package>,
    local: &dyn PackageRepository,
) -> Result<Vec<Arc<Package>>> {
    let lookup = DependentLookup::create(local);
    let mut ordered = dependency_closure(package, local)?;
    ordered.reverse();
    Ok(keep_shared(ordered, &lookup))
}

/// Drop every candidate after the root that a package outside the set still
/// depends on. Dropping one can make its own dependencies needed, so repeat
/// until stable.
fn keep_shared(ordered: Vec<Arc<Package>>, lookup: &DependentLookup) -> Vec<Arc<Package>> {
    let mut removal: HashSet<PackageIdentity> = ordered.iter().map(|p| p.identity()).collect();
    loop {
        let mut changed = false;
        for candidate in ordered.iter().skip(1) {
            if !removal.contains(&candidate.identity()) {
                continue;
            }
            let needed = lookup
                .dependents(candidate)
                .iter()
                .any(|dependent| !removal.contains(&dependent.identity()));
            if needed {
                debug!("Keeping {}, other packages depend on it", candidate.full_name());
                removal.remove(&candidate.identity());
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    ordered
        .into_iter()
        .filter(|p| removal.contains(&p.identity()))
        .collect()
}

/// Post-order of `root` and everything it transitively depends on in `local`.
fn dependency_closure(root: &Arc<Package>, local: &dyn PackageRepository) -> Result<Vec<Arc<Package>>> {
    let mut post_order = Vec::new();
    let mut visited: HashSet<PackageIdentity> = HashSet::new();
    let mut stack = vec![Frame::new(root.clone())];
    visited.insert(root.identity());

    while let Some(frame) = stack.last_mut() {
        let dependencies = frame.package.dependencies();
        if frame.next_dependency >= dependencies.len() {
            if let Some(done) = stack.pop() {
                post_order.push(done.package);
            }
            continue;
        }

        let dependency = dependencies[frame.next_dependency].clone();
        frame.next_dependency += 1;

        let resolved = local
            .find_dependency(&dependency)
            .ok_or_else(|| PackageError::MissingDependency {
                dependency: dependency.to_string(),
            })?;

        if on_path(&stack, &resolved) {
            return Err(PackageError::CircularDependency {
                chain: cycle_chain(&stack, &resolved),
            });
        }

        if visited.insert(resolved.identity()) {
            stack.push(Frame::new(resolved));
        }
    }

    Ok(post_order)
}
