use std::collections::BTreeMap;
use std::sync::Arc;

use super::PackageRepository;
use crate::error::Result;
use crate::package::{Package, Version};

/// In-memory repository. Also the index behind the disk-backed repositories.
#[derive(Debug, Default, Clone)]
pub struct MemoryPackageRepository {
    packages: BTreeMap<(String, Version), Arc<Package>>,
}

impl MemoryPackageRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    fn key(package: &Package) -> (String, Version) {
        (package.id().to_ascii_lowercase(), *package.version())
    }
}

impl FromIterator<Package> for MemoryPackageRepository {
    fn from_iter<I: IntoIterator<Item = Package>>(iter: I) -> Self {
        let packages = iter
            .into_iter()
            .map(|p| (Self::key(&p), Arc::new(p)))
            .collect();
        Self { packages }
    }
}

impl PackageRepository for MemoryPackageRepository {
    fn packages(&self) -> Vec<Arc<Package>> {
        self.packages.values().cloned().collect()
    }

    fn add_package(&mut self, package: Arc<Package>) -> Result<()> {
        self.packages.insert(Self::key(&package), package);
        Ok(())
    }

    fn remove_package(&mut self, package: &Package) -> Result<()> {
        self.packages.remove(&Self::key(package));
        Ok(())
    }

    fn find_packages_by_id(&self, id: &str) -> Vec<Arc<Package>> {
        let id = id.to_ascii_lowercase();
        self.packages
            .iter()
            .filter(|((key, _), _)| *key == id)
            .map(|(_, p)| p.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{dep, package};

    fn repository() -> MemoryPackageRepository {
        [
            package("A", "1.0"),
            package("A", "2.0"),
            package("a", "1.5"),
            package("B", "1.0"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_find_package_exact_or_latest() {
        let repo = repository();

        let latest = repo.find_package("A", None).unwrap();
        assert_eq!(latest.full_name(), "A 2.0");

        let exact = repo.find_package("a", Some(&"1.0".parse().unwrap())).unwrap();
        assert_eq!(exact.full_name(), "A 1.0");

        assert!(repo.find_package("A", Some(&"3.0".parse().unwrap())).is_none());
        assert!(repo.find_package("Z", None).is_none());
    }

    #[test]
    fn test_find_packages_by_id_is_ordered_and_case_insensitive() {
        let versions: Vec<String> = repository()
            .find_packages_by_id("A")
            .iter()
            .map(|p| p.version().to_string())
            .collect();
        assert_eq!(versions, vec!["1.0", "1.5", "2.0"]);
    }

    #[test]
    fn test_add_and_remove() {
        let mut repo = MemoryPackageRepository::new();
        repo.add_package(Arc::new(package("A", "1.0"))).unwrap();
        // Same identity replaces
        repo.add_package(Arc::new(package("a", "1.0"))).unwrap();
        assert_eq!(repo.len(), 1);
        assert!(repo.exists(&package("A", "1.0")));

        repo.remove_package(&package("A", "1.0")).unwrap();
        assert!(repo.is_empty());

        // Removing something absent is a no-op
        repo.remove_package(&package("A", "1.0")).unwrap();
    }

    #[test]
    fn test_find_dependency_uses_resolution_policy() {
        let repo = repository();
        assert_eq!(
            repo.find_dependency(&dep("A", "1.2")).unwrap().full_name(),
            "a 1.5"
        );
        assert_eq!(
            repo.find_dependency(&dep("A", "(,1.9]")).unwrap().full_name(),
            "a 1.5"
        );
        assert!(repo.find_dependency(&dep("B", "[2.0]")).is_none());
    }
}
