use std::path::{Path, PathBuf};

use crate::package::{Package, Version};

/// Where a package's expanded files live.
pub trait PackagePathResolver {
    /// Directory relative to the repository root, e.g. `A.1.0`.
    fn package_directory(&self, package: &Package) -> PathBuf;

    /// Absolute install location, used for assembly references.
    fn install_path(&self, package: &Package) -> PathBuf;
}

/// `<root>/<Id>.<Version>` layout.
#[derive(Debug, Clone)]
pub struct DefaultPackagePathResolver {
    root: PathBuf,
}

impl DefaultPackagePathResolver {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn directory_name(id: &str, version: &Version) -> String {
        format!("{}.{}", id, version)
    }
}

impl PackagePathResolver for DefaultPackagePathResolver {
    fn package_directory(&self, package: &Package) -> PathBuf {
        PathBuf::from(Self::directory_name(package.id(), package.version()))
    }

    fn install_path(&self, package: &Package) -> PathBuf {
        self.root.join(self.package_directory(package))
    }
}
