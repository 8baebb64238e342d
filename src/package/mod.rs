//! Package model
//!
//! Versions, version constraints, dependencies, target frameworks and the
//! immutable package value shared by repositories, walkers and managers.

mod dependency;
mod discovery;
mod framework;
mod manifest;
#[allow(clippy::module_inception)]
mod package;
mod version;

pub use dependency::{DependencyResolver, PackageDependency};
pub use discovery::find_all_manifests;
pub use framework::{AssemblyReference, FrameworkName, compatible_assembly_references};
pub use manifest::Manifest;
pub use package::{Package, PackageFile, PackageIdentity};
pub use version::{Version, VersionSpec};
