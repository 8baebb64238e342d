//! Application layer
//!
//! Managers that turn resolution plans into file operations and repository
//! changes, firing lifecycle events around each package.

mod events;
mod package_manager;
mod project_manager;

pub use events::{PackageEventListener, PackageOperationEvent};
pub use package_manager::PackageManager;
pub use project_manager::ProjectManager;

#[cfg(test)]
pub use events::MockPackageEventListener;
