use anyhow::Result;
use log::debug;

use super::config::Config;
use crate::repository::{LocalPackageRepository, PackageReferenceRepository, PackageRepository};
use crate::runtime::Runtime;

/// List installed packages, or the packages the project references
#[tracing::instrument(skip(runtime, config))]
pub fn list<R: Runtime>(runtime: &R, config: &Config, project: bool) -> Result<()> {
    for line in list_lines(runtime, config, project)? {
        println!("{}", line);
    }
    Ok(())
}

fn list_lines<R: Runtime>(runtime: &R, config: &Config, project: bool) -> Result<Vec<String>> {
    let solution = LocalPackageRepository::open(runtime, config.root.clone())?;

    let packages = if project {
        debug!("Listing references of {:?}", config.project);
        PackageReferenceRepository::open(runtime, &config.project, &solution)?.packages()
    } else {
        debug!("Listing packages in {:?}", config.root);
        solution.packages()
    };

    if packages.is_empty() {
        return Ok(vec!["No packages installed.".to_string()]);
    }
    Ok(packages
        .iter()
        .map(|p| format!("{} {}", p.id(), p.version()))
        .collect())
}
