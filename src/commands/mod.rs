use anyhow::Result;
use std::path::Path;

use crate::application::{PackageEventListener, PackageManager, PackageOperationEvent, ProjectManager};
use crate::filesystem::PhysicalFileSystem;
use crate::package::Version;
use crate::project::PhysicalProjectSystem;
use crate::repository::{LocalPackageRepository, PackageReferenceRepository, PackageRepository};
use crate::runtime::Runtime;

pub mod config;
mod install;
mod list;
mod reference;
mod uninstall;

pub use install::install;
pub use list::list;
pub use reference::{add, remove, update};
pub use uninstall::uninstall;

use config::Config;

/// Prints one line per package once an operation on it completed.
struct Progress {
    done: &'static str,
    undone: &'static str,
}

impl Progress {
    fn solution() -> Self {
        Self {
            done: "Installed",
            undone: "Uninstalled",
        }
    }

    fn project() -> Self {
        Self {
            done: "Added",
            undone: "Removed",
        }
    }
}

impl PackageEventListener for Progress {
    fn installed(&mut self, event: &PackageOperationEvent) {
        println!("{} {}", self.done, event.package.full_name());
    }

    fn uninstalled(&mut self, event: &PackageOperationEvent) {
        println!("{} {}", self.undone, event.package.full_name());
    }
}

fn parse_version(version: Option<&str>) -> Result<Option<Version>> {
    Ok(version.map(str::parse::<Version>).transpose()?)
}

fn package_manager<'a, R: Runtime>(
    runtime: &'a R,
    root: &Path,
    source: &'a dyn PackageRepository,
) -> Result<PackageManager<'a>> {
    let local = LocalPackageRepository::open(runtime, root.to_path_buf())?;
    let resolver = local.path_resolver().clone();
    let mut manager = PackageManager::new(
        source,
        Box::new(local),
        Box::new(resolver),
        Box::new(PhysicalFileSystem::new(runtime, root.to_path_buf())),
    );
    manager.add_listener(Box::new(Progress::solution()));
    Ok(manager)
}

fn project_manager<'a, R: Runtime>(
    runtime: &'a R,
    config: &Config,
    solution: &'a LocalPackageRepository<'a, R>,
) -> Result<ProjectManager<'a>> {
    let project = PhysicalProjectSystem::open(runtime, config.project.clone())?;
    let references = PackageReferenceRepository::open(runtime, &config.project, solution)?;
    let mut manager = ProjectManager::new(
        solution,
        Box::new(project),
        Box::new(solution.path_resolver().clone()),
        Box::new(references),
    );
    manager.add_listener(Box::new(Progress::project()));
    Ok(manager)
}
