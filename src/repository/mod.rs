//! Package repositories
//!
//! A repository is a mutable set of packages keyed by identity. The same trait
//! backs the source feed, the solution-wide local repository and the
//! per-project reference ledger.

mod local;
mod memory;
mod path_resolver;
mod reference;

use std::sync::Arc;

use crate::error::Result;
use crate::package::{DependencyResolver, Package, PackageDependency, Version};

pub use local::LocalPackageRepository;
pub use memory::MemoryPackageRepository;
pub use path_resolver::{DefaultPackagePathResolver, PackagePathResolver};
pub use reference::{PackageReference, PackageReferenceRepository};

pub trait PackageRepository {
    /// Every package, ordered by id then version. Iterating has no side effects.
    fn packages(&self) -> Vec<Arc<Package>>;

    fn add_package(&mut self, package: Arc<Package>) -> Result<()>;

    fn remove_package(&mut self, package: &Package) -> Result<()>;

    /// All versions of `id`, lowest first.
    fn find_packages_by_id(&self, id: &str) -> Vec<Arc<Package>> {
        self.packages()
            .into_iter()
            .filter(|p| p.is_same_id(id))
            .collect()
    }

    /// The exact version when one is given, otherwise the latest version.
    fn find_package(&self, id: &str, version: Option<&Version>) -> Option<Arc<Package>> {
        let candidates = self.find_packages_by_id(id);
        match version {
            Some(version) => candidates.into_iter().find(|p| p.version() == version),
            None => candidates
                .into_iter()
                .max_by(|a, b| a.version().cmp(b.version())),
        }
    }

    /// The package that satisfies `dependency` under the resolution policy.
    fn find_dependency(&self, dependency: &PackageDependency) -> Option<Arc<Package>> {
        DependencyResolver::select(self.find_packages_by_id(&dependency.id), dependency)
    }

    fn exists(&self, package: &Package) -> bool {
        self.find_package(package.id(), Some(package.version()))
            .is_some()
    }
}
