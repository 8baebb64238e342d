use anyhow::Result;
use log::debug;

use super::config::Config;
use super::{package_manager, parse_version};
use crate::repository::MemoryPackageRepository;
use crate::runtime::Runtime;

/// Remove a package from the solution repository
#[tracing::instrument(skip(runtime, config))]
pub fn uninstall<R: Runtime>(
    runtime: &R,
    config: &Config,
    id: &str,
    version: Option<&str>,
    force: bool,
    remove_dependencies: bool,
) -> Result<()> {
    let version = parse_version(version)?;
    debug!("Uninstalling {} from {:?}", id, config.root);

    // Nothing is fetched while uninstalling
    let source = MemoryPackageRepository::new();
    let mut manager = package_manager(runtime, &config.root, &source)?;
    manager.uninstall_package(id, version.as_ref(), force, remove_dependencies)?;
    Ok(())
}
