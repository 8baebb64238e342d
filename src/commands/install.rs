use anyhow::Result;
use log::debug;

use super::config::Config;
use super::{package_manager, parse_version};
use crate::repository::LocalPackageRepository;
use crate::runtime::Runtime;

/// Install a package and its dependencies into the solution repository
#[tracing::instrument(skip(runtime, config))]
pub fn install<R: Runtime>(
    runtime: &R,
    config: &Config,
    id: &str,
    version: Option<&str>,
    ignore_dependencies: bool,
) -> Result<()> {
    let version = parse_version(version)?;
    let source = LocalPackageRepository::open(runtime, config.source()?.to_path_buf())?;
    debug!("Installing {} from {:?} into {:?}", id, source.root(), config.root);

    let mut manager = package_manager(runtime, &config.root, &source)?;
    manager.install_package(id, version.as_ref(), ignore_dependencies)?;
    Ok(())
}
