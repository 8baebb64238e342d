use anyhow::Result;
use log::{debug, info};

use super::config::Config;
use super::{package_manager, parse_version, project_manager};
use crate::error::PackageError;
use crate::repository::{
    LocalPackageRepository, MemoryPackageRepository, PackageReferenceRepository, PackageRepository,
};
use crate::runtime::Runtime;

/// Install a package into the solution, then reference it from the project
#[tracing::instrument(skip(runtime, config))]
pub fn add<R: Runtime>(runtime: &R, config: &Config, id: &str, version: Option<&str>) -> Result<()> {
    let version = parse_version(version)?;
    let feed = LocalPackageRepository::open(runtime, config.source()?.to_path_buf())?;
    package_manager(runtime, &config.root, &feed)?.install_package(id, version.as_ref(), false)?;

    let solution = LocalPackageRepository::open(runtime, config.root.clone())?;
    let mut manager = project_manager(runtime, config, &solution)?;
    manager.add_package_reference(id, version.as_ref())?;
    Ok(())
}

/// Drop a project reference, then uninstall what the solution no longer needs
#[tracing::instrument(skip(runtime, config))]
pub fn remove<R: Runtime>(
    runtime: &R,
    config: &Config,
    id: &str,
    force: bool,
    remove_dependencies: bool,
) -> Result<()> {
    let removed = {
        let solution = LocalPackageRepository::open(runtime, config.root.clone())?;
        let mut manager = project_manager(runtime, config, &solution)?;
        manager.remove_package_reference(id, None, force, remove_dependencies)?
    };

    let source = MemoryPackageRepository::new();
    let mut manager = package_manager(runtime, &config.root, &source)?;
    for package in removed {
        match manager.uninstall_package(package.id(), Some(package.version()), false, false) {
            Ok(()) => {}
            Err(PackageError::PackageHasDependents { .. }) => {
                info!("Keeping '{}', other packages depend on it", package.full_name());
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

/// Move a project reference to a newer version
#[tracing::instrument(skip(runtime, config))]
pub fn update<R: Runtime>(
    runtime: &R,
    config: &Config,
    id: &str,
    version: Option<&str>,
    update_dependencies: bool,
) -> Result<()> {
    let version = parse_version(version)?;

    {
        let solution = LocalPackageRepository::open(runtime, config.root.clone())?;
        let references = PackageReferenceRepository::open(runtime, &config.project, &solution)?;
        if references.find_package(id, None).is_none() {
            return Err(PackageError::PackageNotReferenced { id: id.to_string() }.into());
        }
    }

    // Only the version the project moves to has to be in the solution
    let feed = LocalPackageRepository::open(runtime, config.source()?.to_path_buf())?;
    let target = match version {
        Some(v) => Some(v),
        None => feed.find_package(id, None).map(|p| *p.version()),
    };
    debug!("Updating {} to {:?}", id, target);
    package_manager(runtime, &config.root, &feed)?.install_package(
        id,
        target.as_ref(),
        !update_dependencies,
    )?;

    let solution = LocalPackageRepository::open(runtime, config.root.clone())?;
    let mut manager = project_manager(runtime, config, &solution)?;
    manager.update_package_reference(id, target.as_ref(), update_dependencies)?;
    Ok(())
}
