use std::collections::HashMap;
use std::sync::Arc;

use log::debug;

use crate::package::{Package, PackageIdentity};
use crate::repository::PackageRepository;

/// Reverse dependency index over a snapshot of a repository.
///
/// Built once per top-level operation; later repository changes are not seen.
#[derive(Debug, Default)]
pub struct DependentLookup {
    dependents: HashMap<PackageIdentity, Vec<Arc<Package>>>,
}

impl DependentLookup {
    pub fn create(repository: &dyn PackageRepository) -> Self {
        let mut dependents: HashMap<PackageIdentity, Vec<Arc<Package>>> = HashMap::new();

        for package in repository.packages() {
            for dependency in package.dependencies() {
                let Some(target) = repository.find_dependency(dependency) else {
                    debug!(
                        "{} depends on {}, which is not in the repository",
                        package.full_name(),
                        dependency
                    );
                    continue;
                };
                if *target == *package {
                    continue;
                }
                let entry = dependents.entry(target.identity()).or_default();
                if !entry.iter().any(|p| **p == *package) {
                    entry.push(package.clone());
                }
            }
        }

        Self { dependents }
    }

    /// Packages that depend on exactly this identity.
    pub fn dependents(&self, package: &Package) -> &[Arc<Package>] {
        self.dependents
            .get(&package.identity())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
