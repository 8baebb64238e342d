//! Solution-wide install and uninstall.

use std::sync::Arc;

use log::info;

use super::events::{Listeners, PackageEventListener, PackageOperationEvent};
use crate::error::{PackageError, Result};
use crate::filesystem::{FileSystem, add_files, delete_files};
use crate::package::{Package, Version};
use crate::repository::{PackagePathResolver, PackageRepository};
use crate::resolver::{resolve_dependencies_for_install, resolve_dependencies_for_uninstall};

/// Expands packages from a source into the local repository.
///
/// Each package's files are written before it is registered and deleted
/// before it is unregistered. A failure stops the operation; packages already
/// processed stay as they are.
pub struct PackageManager<'a> {
    source: &'a dyn PackageRepository,
    local: Box<dyn PackageRepository + 'a>,
    path_resolver: Box<dyn PackagePathResolver + 'a>,
    file_system: Box<dyn FileSystem + 'a>,
    listeners: Listeners<'a>,
}

impl<'a> PackageManager<'a> {
    pub fn new(
        source: &'a dyn PackageRepository,
        local: Box<dyn PackageRepository + 'a>,
        path_resolver: Box<dyn PackagePathResolver + 'a>,
        file_system: Box<dyn FileSystem + 'a>,
    ) -> Self {
        Self {
            source,
            local,
            path_resolver,
            file_system,
            listeners: Listeners::default(),
        }
    }

    pub fn add_listener(&mut self, listener: Box<dyn PackageEventListener + 'a>) {
        self.listeners.push(listener);
    }

    pub fn source(&self) -> &dyn PackageRepository {
        self.source
    }

    pub fn local(&self) -> &dyn PackageRepository {
        self.local.as_ref()
    }

    pub fn path_resolver(&self) -> &dyn PackagePathResolver {
        self.path_resolver.as_ref()
    }

    pub fn file_system(&self) -> &dyn FileSystem {
        self.file_system.as_ref()
    }

    #[tracing::instrument(skip(self))]
    pub fn install_package(
        &mut self,
        id: &str,
        version: Option<&Version>,
        ignore_dependencies: bool,
    ) -> Result<()> {
        if id.trim().is_empty() {
            return Err(PackageError::InvalidArgument { name: "package_id" });
        }

        let package = self
            .source
            .find_package(id, version)
            .ok_or_else(|| PackageError::UnknownPackage { id: id.to_string() })?;

        if self.local.exists(&package) {
            info!("'{}' already installed", package.full_name());
        }

        let plan = if ignore_dependencies {
            vec![package]
        } else {
            resolve_dependencies_for_install(&package, self.local.as_ref(), self.source)?
        };

        for package in plan {
            self.expand(package)?;
        }
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub fn uninstall_package(
        &mut self,
        id: &str,
        version: Option<&Version>,
        force: bool,
        remove_dependencies: bool,
    ) -> Result<()> {
        if id.trim().is_empty() {
            return Err(PackageError::InvalidArgument { name: "package_id" });
        }

        let package = self
            .local
            .find_package(id, version)
            .ok_or_else(|| PackageError::UnknownPackage { id: id.to_string() })?;

        let plan = resolve_dependencies_for_uninstall(
            &package,
            self.local.as_ref(),
            force,
            remove_dependencies,
        )?;

        for package in plan {
            self.remove(package)?;
        }
        Ok(())
    }

    fn event(&self, package: &Arc<Package>) -> PackageOperationEvent {
        PackageOperationEvent::new(package.clone(), self.path_resolver.install_path(package))
    }

    fn expand(&mut self, package: Arc<Package>) -> Result<()> {
        if self.local.exists(&package) {
            return Ok(());
        }

        let mut event = self.event(&package);
        if !self.listeners.installing(&mut event) {
            info!("Skipping '{}'", package.full_name());
            return Ok(());
        }

        let directory = self.path_resolver.package_directory(&package);
        add_files(self.file_system.as_ref(), package.files(), &directory)?;
        self.local.add_package(package.clone())?;
        info!("Successfully installed '{}'", package.full_name());

        self.listeners.installed(&event);
        Ok(())
    }

    fn remove(&mut self, package: Arc<Package>) -> Result<()> {
        let mut event = self.event(&package);
        if !self.listeners.uninstalling(&mut event) {
            info!("Skipping '{}'", package.full_name());
            return Ok(());
        }

        let directory = self.path_resolver.package_directory(&package);
        delete_files(self.file_system.as_ref(), package.files(), &directory)?;
        self.local.remove_package(&package)?;
        info!("Successfully uninstalled '{}'", package.full_name());

        self.listeners.uninstalled(&event);
        Ok(())
    }
}
